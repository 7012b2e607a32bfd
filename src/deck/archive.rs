use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use zip::ZipArchive;

use crate::foundation::error::{CarddivError, CarddivResult};

/// Upper bound on the buffer reserved from an entry's declared size.
const MAX_PREALLOC: usize = 32 << 20;

/// Handle to one card image inside a deck archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardEntry {
    pub(crate) index: usize,
    name: String,
}

impl CardEntry {
    /// Full in-archive path of the entry.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Open zip archive holding a deck's card images.
///
/// Reading needs `&mut self` because the underlying reader seeks; callers share it behind a lock.
pub(crate) struct CardArchive {
    zip: ZipArchive<BufReader<File>>,
}

impl CardArchive {
    pub(crate) fn open(path: &Path) -> CarddivResult<Self> {
        let file = File::open(path).map_err(|e| {
            CarddivError::archive_open(format!("open '{}': {e}", path.display()))
        })?;
        let zip = ZipArchive::new(BufReader::new(file)).map_err(|e| {
            CarddivError::archive_open(format!("read zip index '{}': {e}", path.display()))
        })?;
        Ok(Self { zip })
    }

    /// Regular `.jpg`/`.jpeg` entries in archive order.
    pub(crate) fn card_entries(&mut self) -> CarddivResult<Vec<CardEntry>> {
        let mut out = Vec::with_capacity(self.zip.len());
        for index in 0..self.zip.len() {
            let file = self.zip.by_index_raw(index).map_err(|e| {
                CarddivError::archive_open(format!("read zip entry #{index}: {e}"))
            })?;
            if !file.is_file() || !is_card_name(file.name()) {
                continue;
            }
            out.push(CardEntry {
                index,
                name: file.name().to_string(),
            });
        }
        Ok(out)
    }

    pub(crate) fn read(&mut self, entry: &CardEntry) -> CarddivResult<Vec<u8>> {
        let mut file = self
            .zip
            .by_index(entry.index)
            .map_err(|e| CarddivError::decode(format!("open entry '{}': {e}", entry.name)))?;
        let mut bytes = Vec::with_capacity(prealloc_len(file.size()));
        file.read_to_end(&mut bytes)
            .map_err(|e| CarddivError::decode(format!("read entry '{}': {e}", entry.name)))?;
        Ok(bytes)
    }
}

/// Capacity to reserve for an entry declaring `declared` bytes. The header is untrusted, so
/// larger entries grow the buffer as they are read.
pub(crate) fn prealloc_len(declared: u64) -> usize {
    usize::try_from(declared).unwrap_or(usize::MAX).min(MAX_PREALLOC)
}

/// Case-insensitive `.jpg`/`.jpeg` check on the entry's base name.
pub(crate) fn is_card_name(name: &str) -> bool {
    let base = name.rsplit('/').next().unwrap_or(name).to_ascii_lowercase();
    base.ends_with(".jpg") || base.ends_with(".jpeg")
}

#[cfg(test)]
#[path = "../../tests/unit/deck/archive.rs"]
mod tests;
