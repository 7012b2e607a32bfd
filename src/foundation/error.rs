/// Convenience result type used across carddiv.
pub type CarddivResult<T> = Result<T, CarddivError>;

/// Top-level error taxonomy used by deck, cache and rendering APIs.
#[derive(thiserror::Error, Debug)]
pub enum CarddivError {
    /// Archive path unreadable or not a valid zip archive.
    #[error("archive open error: {0}")]
    ArchiveOpen(String),

    /// Archive opened but holds no `.jpg`/`.jpeg` entries.
    #[error("empty deck: {0}")]
    EmptyDeck(String),

    /// A card entry could not be read or decoded as JPEG.
    #[error("decode error: {0}")]
    Decode(String),

    /// Card index past the end of the deck.
    #[error("card index {index} out of range (deck has {len} cards)")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of cards in the deck.
        len: usize,
    },

    /// More cards requested than the deck holds.
    #[error("not enough cards in deck to draw {requested} (deck has {available})")]
    InsufficientCards {
        /// Requested draw size.
        requested: usize,
        /// Number of cards in the deck.
        available: usize,
    },

    /// Logical deck name could not be resolved to an archive.
    #[error("deck not found: {0}")]
    NotFound(String),

    /// Deck was read after its archive handle had been released.
    #[error("archive closed: {0}")]
    ArchiveClosed(String),

    /// Invalid request parameters or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CarddivError {
    /// Build a [`CarddivError::ArchiveOpen`] value.
    pub fn archive_open(msg: impl Into<String>) -> Self {
        Self::ArchiveOpen(msg.into())
    }

    /// Build a [`CarddivError::EmptyDeck`] value.
    pub fn empty_deck(msg: impl Into<String>) -> Self {
        Self::EmptyDeck(msg.into())
    }

    /// Build a [`CarddivError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`CarddivError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`CarddivError::ArchiveClosed`] value.
    pub fn archive_closed(msg: impl Into<String>) -> Self {
        Self::ArchiveClosed(msg.into())
    }

    /// Build a [`CarddivError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether the deck cache should retry this failure against the default deck.
    ///
    /// Only deck-construction failures qualify; per-call errors never do.
    pub fn is_deck_unavailable(&self) -> bool {
        matches!(
            self,
            Self::ArchiveOpen(_) | Self::EmptyDeck(_) | Self::Decode(_) | Self::NotFound(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
