use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{CarddivError, CarddivResult};

/// Maps logical deck names to archive files under one root directory.
#[derive(Clone, Debug)]
pub struct DeckLibrary {
    root: PathBuf,
}

impl DeckLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `name` to an existing archive path.
    ///
    /// `Lenormand`, `Lenormand.zip` and `./Lenormand.zip` all name the same file.
    pub fn resolve(&self, name: &str) -> CarddivResult<PathBuf> {
        let rel = normalize_deck_name(name)?;
        let path = self.root.join(rel);
        if !path.is_file() {
            return Err(CarddivError::not_found(format!(
                "'{name}' (looked for '{}')",
                path.display()
            )));
        }
        Ok(path)
    }

    /// File names of the `.zip` archives directly under the root, sorted.
    pub fn list(&self) -> CarddivResult<Vec<String>> {
        let rd = std::fs::read_dir(&self.root)
            .with_context(|| format!("read deck root '{}'", self.root.display()))?;
        let mut out = Vec::new();
        for entry in rd {
            let entry = entry.with_context(|| format!("list '{}'", self.root.display()))?;
            let path = entry.path();
            let is_zip = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("zip"));
            if !is_zip || !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                out.push(name.to_string());
            }
        }
        out.sort();
        Ok(out)
    }
}

/// Canonical relative archive path for a deck name.
pub(crate) fn normalize_deck_name(name: &str) -> CarddivResult<String> {
    let s = name.trim().replace('\\', "/");
    if s.starts_with('/') {
        return Err(CarddivError::validation("deck names must be relative"));
    }
    if s.is_empty() {
        return Err(CarddivError::validation("deck name must be non-empty"));
    }

    let mut parts = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(CarddivError::validation("deck names must not contain '..'"));
        }
        parts.push(part);
    }

    let Some(last) = parts.last() else {
        return Err(CarddivError::validation("deck name must contain a file name"));
    };
    let mut out = parts.join("/");
    if Path::new(last).extension().is_none() {
        out.push_str(".zip");
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/deck/library.rs"]
mod tests;
