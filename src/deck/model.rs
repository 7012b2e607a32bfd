use std::{
    path::Path,
    sync::{Mutex, MutexGuard, PoisonError},
};

use rand::Rng;
use tracing::debug;

use crate::{
    deck::archive::{CardArchive, CardEntry},
    deck::card::{CardImage, CardRenderOptions, decode_jpeg, resize_card},
    foundation::core::Size,
    foundation::error::{CarddivError, CarddivResult},
};

/// One opened deck archive plus the metadata derived from it at open time.
///
/// The card count and aspect ratio are fixed once the deck exists, so layout geometry never
/// needs a per-card decode. Card pixels are read and decoded on every [`Deck::image`] call.
pub struct Deck {
    id: String,
    archive: Mutex<Option<CardArchive>>,
    cards: Vec<CardEntry>,
    aspect_ratio: f64,
}

impl std::fmt::Debug for Deck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deck")
            .field("id", &self.id)
            .field("cards", &self.cards.len())
            .field("aspect_ratio", &self.aspect_ratio)
            .field("open", &self.is_open())
            .finish()
    }
}

impl Deck {
    /// Open the archive at `path`, index its card entries and probe the aspect ratio from the
    /// first card.
    pub fn create(path: &Path) -> CarddivResult<Self> {
        let mut archive = CardArchive::open(path)?;
        let cards = archive.card_entries()?;
        let Some(first) = cards.first() else {
            return Err(CarddivError::empty_deck(format!(
                "no .jpg/.jpeg entries in '{}'",
                path.display()
            )));
        };

        let probe = decode_jpeg(&archive.read(first)?).map_err(|e| {
            CarddivError::decode(format!("probe '{}' in '{}': {e}", first.name(), path.display()))
        })?;
        let (w, h) = probe.dimensions();
        if w == 0 || h == 0 {
            return Err(CarddivError::decode(format!(
                "probe '{}' has empty dimensions",
                first.name()
            )));
        }
        let aspect_ratio = f64::from(w) / f64::from(h);

        debug!(
            deck = %path.display(),
            cards = cards.len(),
            aspect_ratio,
            "opened deck"
        );

        Ok(Self {
            id: path.display().to_string(),
            archive: Mutex::new(Some(archive)),
            cards,
            aspect_ratio,
        })
    }

    /// Cache key of this deck: its resolved archive path.
    pub fn identifier(&self) -> &str {
        &self.id
    }

    pub fn num_cards(&self) -> usize {
        self.cards.len()
    }

    /// Width over height of the first card, assumed for every card.
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn card_names(&self) -> impl Iterator<Item = &str> {
        self.cards.iter().map(CardEntry::name)
    }

    pub fn card_height(&self, width: u32) -> u32 {
        (f64::from(width) / self.aspect_ratio).round() as u32
    }

    /// Upright card size for `width`, never collapsing to a zero-height card.
    pub fn card_size(&self, width: u32) -> Size {
        Size::new(width, self.card_height(width).max(1))
    }

    /// Decode card `index`, resize it to `width` and apply `options`.
    pub fn image(
        &self,
        index: usize,
        width: u32,
        options: CardRenderOptions,
    ) -> CarddivResult<CardImage> {
        let entry = self.cards.get(index).ok_or(CarddivError::IndexOutOfRange {
            index,
            len: self.cards.len(),
        })?;
        if width == 0 {
            return Err(CarddivError::validation("card width must be > 0"));
        }

        // Only the seek-and-read needs the archive; decoding runs unlocked.
        let bytes = {
            let mut archive = self.lock_archive();
            let archive = archive
                .as_mut()
                .ok_or_else(|| CarddivError::archive_closed(self.id.clone()))?;
            archive.read(entry)?
        };
        let decoded = decode_jpeg(&bytes)
            .map_err(|e| CarddivError::decode(format!("card '{}': {e}", entry.name())))?;
        let resized = resize_card(&decoded, self.card_size(width));
        Ok(CardImage::orient(resized, options))
    }

    /// `n` distinct card indices in random order.
    pub fn shuffled(&self, n: usize) -> CarddivResult<Vec<usize>> {
        self.shuffled_with(&mut rand::thread_rng(), n)
    }

    /// Like [`Deck::shuffled`], drawing from the caller's generator.
    pub fn shuffled_with<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> CarddivResult<Vec<usize>> {
        let available = self.cards.len();
        if n > available {
            return Err(CarddivError::InsufficientCards {
                requested: n,
                available,
            });
        }
        Ok(rand::seq::index::sample(rng, available, n).into_vec())
    }

    pub fn is_open(&self) -> bool {
        self.lock_archive().is_some()
    }

    /// Release the archive handle. Returns `false` if it was already released.
    pub fn close(&self) -> bool {
        let closed = self.lock_archive().take().is_some();
        if closed {
            debug!(deck = %self.id, "closed deck");
        }
        closed
    }

    fn lock_archive(&self) -> MutexGuard<'_, Option<CardArchive>> {
        self.archive.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/deck/model.rs"]
mod tests;
