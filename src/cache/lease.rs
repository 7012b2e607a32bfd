use std::{ops::Deref, sync::Arc};

use crate::{cache::deck_cache::DeckCache, deck::Deck};

/// Scoped acquisition of a cached deck. Releases back to its cache on drop.
pub struct DeckLease<'a> {
    cache: &'a DeckCache,
    deck: Arc<Deck>,
}

impl<'a> DeckLease<'a> {
    pub(crate) fn new(cache: &'a DeckCache, deck: Arc<Deck>) -> Self {
        Self { cache, deck }
    }

    pub fn deck(&self) -> &Arc<Deck> {
        &self.deck
    }
}

impl Deref for DeckLease<'_> {
    type Target = Deck;

    fn deref(&self) -> &Deck {
        &self.deck
    }
}

impl std::fmt::Debug for DeckLease<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DeckLease").field(&self.deck.identifier()).finish()
    }
}

impl Drop for DeckLease<'_> {
    fn drop(&mut self) {
        self.cache.release(Arc::clone(&self.deck));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/lease.rs"]
mod tests;
