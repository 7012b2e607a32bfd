#![forbid(unsafe_code)]
//! Card-spread rendering from zip archives of JPEG card images.
//!
//! A [`DeckCache`] shares open [`Deck`]s between concurrent requests and closes each one when its
//! last holder releases it. A [`SpreadRenderer`] leases a deck, lays out a [`Spread`], and
//! composes the drawn cards into one JPEG.

pub mod cache;
pub mod deck;
pub mod foundation;
pub mod layout;
pub mod render;


pub use cache::{CacheStats, DeckCache, DeckLease};
pub use deck::{CardImage, CardRenderOptions, Deck, DeckLibrary, Reversed, Sideways};
pub use foundation::config::{CarddivConfig, DEFAULT_DECK, DEFAULT_JPEG_QUALITY, DEFAULT_WIDTH};
pub use foundation::core::{Point, Size};
pub use foundation::error::{CarddivError, CarddivResult};
pub use layout::{LayoutInfo, Placement, Spread, SpreadPlan, catalogue, catalogue_json};
pub use render::{
    DrawnCard, RenderOpts, SpreadImage, SpreadRenderer, SpreadRequest, encode_jpeg,
};
