use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{sources::write_json_atomic, types::CatalogIndex};

/// Persistent index storage with atomic writes.
///
/// The index is the single source of truth between builds; it is replaced
/// wholesale on save and never partially mutated, so a failed or abandoned
/// build leaves the previous index untouched.
pub struct IndexStore {
    path: PathBuf,
}

impl IndexStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the index from disk, returning an empty default when missing.
    pub fn load(&self) -> anyhow::Result<CatalogIndex> {
        if !self.path.exists() {
            return Ok(CatalogIndex::default());
        }
        let data = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read index {}", self.path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("failed to parse index {}", self.path.display()))
    }

    /// Save the index atomically via temp file + rename. Failure here is the
    /// one fatal error of a build; the write is all-or-nothing.
    pub fn save(&self, index: &CatalogIndex) -> anyhow::Result<()> {
        write_json_atomic(&self.path, index)
            .with_context(|| format!("failed to persist index {}", self.path.display()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
