use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tracing::{debug, warn};

use crate::{
    cache::lease::DeckLease,
    deck::{Deck, DeckLibrary, library::normalize_deck_name},
    foundation::config::CarddivConfig,
    foundation::error::CarddivResult,
};

/// Counters describing cache activity since construction.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Decks constructed on a cache miss.
    pub opened: u64,
    /// Decks whose archive was closed by the cache.
    pub closed: u64,
    /// Acquisitions served from an existing entry.
    pub hits: u64,
    /// Acquisitions answered with the default deck instead of the requested one.
    pub fallbacks: u64,
    /// Releases of a deck the table no longer held.
    pub stale_releases: u64,
}

struct CacheEntry {
    deck: Arc<Deck>,
    refcount: usize,
}

#[derive(Default)]
struct DeckTable {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
}

/// Reference-counted table of open decks, keyed by resolved archive path.
///
/// At most one [`Deck`] is open per identifier. A deck stays open while any acquisition is
/// outstanding and is closed by the release that drops its count to zero. Construction of a
/// missing deck happens under the table lock, so concurrent first requests for the same deck
/// open it once.
pub struct DeckCache {
    library: DeckLibrary,
    default_deck: String,
    table: Mutex<DeckTable>,
}

impl DeckCache {
    pub fn new(library: DeckLibrary, default_deck: impl Into<String>) -> Self {
        Self {
            library,
            default_deck: default_deck.into(),
            table: Mutex::new(DeckTable::default()),
        }
    }

    pub fn from_config(cfg: &CarddivConfig) -> Self {
        Self::new(DeckLibrary::new(cfg.deck_root.clone()), cfg.default_deck.clone())
    }

    pub fn library(&self) -> &DeckLibrary {
        &self.library
    }

    pub fn default_deck(&self) -> &str {
        &self.default_deck
    }

    /// Acquire the deck called `name`, falling back once to the default deck when `name`
    /// cannot be opened.
    ///
    /// Every successful call must be paired with exactly one [`DeckCache::release`]. Prefer
    /// [`DeckCache::lease`], which does the pairing on drop.
    #[tracing::instrument(skip(self))]
    pub fn acquire(&self, name: &str) -> CarddivResult<Arc<Deck>> {
        let err = match self.acquire_exact(name) {
            Ok(deck) => return Ok(deck),
            Err(err) => err,
        };
        if !err.is_deck_unavailable() || self.is_default(name) {
            return Err(err);
        }

        warn!(
            deck = name,
            fallback = %self.default_deck,
            error = %err,
            "deck unavailable, falling back to default"
        );
        match self.acquire_exact(&self.default_deck) {
            Ok(deck) => {
                self.lock_table().stats.fallbacks += 1;
                Ok(deck)
            }
            Err(fallback_err) => {
                warn!(
                    fallback = %self.default_deck,
                    error = %fallback_err,
                    "default deck unavailable"
                );
                Err(err)
            }
        }
    }

    /// Acquire `name` with no fallback.
    pub fn acquire_exact(&self, name: &str) -> CarddivResult<Arc<Deck>> {
        let path = self.library.resolve(name)?;
        let id = path.display().to_string();

        let mut guard = self.lock_table();
        let table = &mut *guard;
        if let Some(entry) = table.entries.get_mut(&id) {
            entry.refcount += 1;
            table.stats.hits += 1;
            debug!(deck = %id, refcount = entry.refcount, "deck cache hit");
            return Ok(Arc::clone(&entry.deck));
        }

        let deck = Arc::new(Deck::create(&path)?);
        table.entries.insert(
            id,
            CacheEntry {
                deck: Arc::clone(&deck),
                refcount: 1,
            },
        );
        table.stats.opened += 1;
        Ok(deck)
    }

    /// Give back one acquisition of `deck`. Never fails.
    ///
    /// The release that drops the count to zero closes the deck and removes its entry. A deck
    /// the table no longer holds (already released, or replaced by a newer generation) is closed
    /// on the spot and counted as stale.
    pub fn release(&self, deck: Arc<Deck>) {
        let mut guard = self.lock_table();
        let table = &mut *guard;
        let id = deck.identifier();

        let remaining = match table.entries.get_mut(id) {
            Some(entry) if Arc::ptr_eq(&entry.deck, &deck) => {
                entry.refcount = entry.refcount.saturating_sub(1);
                Some(entry.refcount)
            }
            _ => None,
        };

        match remaining {
            Some(0) => {
                if let Some(entry) = table.entries.remove(id) {
                    entry.deck.close();
                    table.stats.closed += 1;
                }
            }
            Some(refcount) => debug!(deck = id, refcount, "released deck"),
            None => {
                table.stats.stale_releases += 1;
                warn!(deck = id, "release of a deck the cache does not hold");
                if deck.close() {
                    table.stats.closed += 1;
                }
            }
        }
    }

    /// Acquire `name` for the lifetime of the returned guard.
    pub fn lease(&self, name: &str) -> CarddivResult<DeckLease<'_>> {
        let deck = self.acquire(name)?;
        Ok(DeckLease::new(self, deck))
    }

    pub fn stats(&self) -> CacheStats {
        self.lock_table().stats.clone()
    }

    /// Outstanding acquisitions of the deck keyed by `identifier`; 0 when not cached.
    pub fn refcount(&self, identifier: &str) -> usize {
        self.lock_table()
            .entries
            .get(identifier)
            .map_or(0, |e| e.refcount)
    }

    /// Identifiers of the currently open decks with their refcounts, sorted by identifier.
    pub fn open_decks(&self) -> Vec<(String, usize)> {
        let mut out: Vec<_> = self
            .lock_table()
            .entries
            .iter()
            .map(|(id, e)| (id.clone(), e.refcount))
            .collect();
        out.sort();
        out
    }

    fn is_default(&self, name: &str) -> bool {
        match (
            normalize_deck_name(name),
            normalize_deck_name(&self.default_deck),
        ) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    fn lock_table(&self) -> MutexGuard<'_, DeckTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for DeckCache {
    fn drop(&mut self) {
        let table = self.table.get_mut().unwrap_or_else(PoisonError::into_inner);
        for (id, entry) in table.entries.drain() {
            if entry.refcount > 0 {
                warn!(deck = %id, refcount = entry.refcount, "closing deck still in use");
            }
            entry.deck.close();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/deck_cache.rs"]
mod tests;
