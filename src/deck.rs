//! Deck archives and per-card image derivation.

pub mod archive;
pub mod card;
pub mod library;
pub mod model;
pub mod orientation;

pub use archive::CardEntry;
pub use card::{CardImage, CardRenderOptions};
pub use library::DeckLibrary;
pub use model::Deck;
pub use orientation::{Reversed, Sideways};
