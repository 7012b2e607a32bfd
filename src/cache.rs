//! Shared, reference-counted access to open decks.

pub mod deck_cache;
pub mod lease;

pub use deck_cache::{CacheStats, DeckCache};
pub use lease::DeckLease;
