use std::path::PathBuf;

use crate::{sources::write_json_atomic, types::Favorites};

/// Persistent favorites storage. Every toggle is a full load-modify-persist
/// so concurrent callers cannot lose each other's updates through stale
/// in-memory copies.
pub struct FavoritesStore {
    path: PathBuf,
}

impl FavoritesStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load favorites, tolerating a missing or corrupt document.
    pub fn load(&self) -> Favorites {
        if !self.path.exists() {
            return Favorites::default();
        }
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|data| serde_json::from_str(&data).ok())
            .unwrap_or_default()
    }

    /// Toggle a skill id in/out of the favorites set. Involutive.
    pub fn toggle_skill(&self, skill_id: &str) -> anyhow::Result<Favorites> {
        let mut favorites = self.load();
        if favorites.skills.iter().any(|id| id == skill_id) {
            favorites.skills.retain(|id| id != skill_id);
        } else {
            favorites.skills.push(skill_id.to_string());
        }
        self.save(&favorites)?;
        Ok(favorites)
    }

    /// Toggle an `owner/repo` key in/out of the favorites set. Involutive.
    pub fn toggle_repo(&self, repo_key: &str) -> anyhow::Result<Favorites> {
        let mut favorites = self.load();
        if favorites.repos.iter().any(|key| key == repo_key) {
            favorites.repos.retain(|key| key != repo_key);
        } else {
            favorites.repos.push(repo_key.to_string());
        }
        self.save(&favorites)?;
        Ok(favorites)
    }

    fn save(&self, favorites: &Favorites) -> anyhow::Result<()> {
        write_json_atomic(&self.path, favorites)
    }
}
