//! Read-side reconciliation: join the persisted index with local state
//! (installed set, favorites, on-disk working copies) at read time. Nothing
//! here is cached; every call recomputes from current inputs so a change to
//! any layer shows up on the next read without invalidation plumbing.

use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use crate::{
    sources::{CustomRepo, FetchedRepos, RepoCatalog},
    types::{CatalogIndex, Favorites, ViewRepository, ViewSkill},
};

/// Snapshot of which working copies exist and when they were last fetched.
#[derive(Debug, Clone, Default)]
pub struct FetchState {
    /// `owner/repo` keys with a working copy present on disk.
    pub present: HashSet<String>,
    /// `owner/repo` to last successful fetch timestamp.
    pub last_fetched: HashMap<String, String>,
}

impl FetchState {
    /// Build the snapshot from the repos root layout (`<root>/<owner>/<repo>`)
    /// and the fetch-tracking document. Presence comes from the filesystem,
    /// not from the tracker, so a manually deleted copy reads as not fetched.
    pub fn scan(repos_root: &Path, fetched: &FetchedRepos) -> Self {
        let mut present = HashSet::new();
        if let Ok(owners) = std::fs::read_dir(repos_root) {
            for owner in owners.flatten() {
                if !owner.path().is_dir() {
                    continue;
                }
                let owner_name = owner.file_name().to_string_lossy().to_string();
                let Ok(repos) = std::fs::read_dir(owner.path()) else {
                    continue;
                };
                for repo in repos.flatten() {
                    if repo.path().is_dir() {
                        let repo_name = repo.file_name().to_string_lossy().to_string();
                        present.insert(format!("{owner_name}/{repo_name}"));
                    }
                }
            }
        }
        Self {
            present,
            last_fetched: fetched.repos.clone(),
        }
    }
}

/// Annotate every indexed skill with installed and favorite flags.
///
/// Installed matching is by skill *name*: the installed directory only knows
/// entry names, so two repositories offering a same-named skill both read as
/// installed when either one is.
pub fn view_skills(
    index: &CatalogIndex,
    favorites: &Favorites,
    installed_names: &[String],
) -> Vec<ViewSkill> {
    let installed: HashSet<&str> = installed_names.iter().map(String::as_str).collect();
    let favorite_ids: HashSet<&str> = favorites.skills.iter().map(String::as_str).collect();

    index
        .skills
        .iter()
        .map(|record| ViewSkill {
            is_installed: installed.contains(record.name.as_str()),
            is_favorite: favorite_ids.contains(record.id.as_str()),
            record: record.clone(),
        })
        .collect()
}

/// Annotate the configured repositories with fetch, favorite, and count state.
/// Order follows the index's repository echo, which is declaration order.
pub fn view_repositories(
    index: &CatalogIndex,
    catalog: &RepoCatalog,
    custom: &[CustomRepo],
    favorites: &Favorites,
    fetch: &FetchState,
) -> Vec<ViewRepository> {
    let favorite_keys: HashSet<&str> = favorites.repos.iter().map(String::as_str).collect();
    let highlighted: HashSet<&str> = catalog
        .repos
        .iter()
        .filter(|r| r.highlight)
        .map(|r| r.url.as_str())
        .collect();
    let custom_keys: HashSet<String> = custom
        .iter()
        .map(|r| format!("{}/{}", r.owner, r.repo))
        .collect();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in &index.skills {
        *counts
            .entry(format!("{}/{}", record.owner, record.repo))
            .or_default() += 1;
    }

    index
        .repositories
        .iter()
        .map(|source| {
            let key = source.key();
            ViewRepository {
                owner: source.owner.clone(),
                repo: source.repo.clone(),
                is_fetched: fetch.present.contains(&key),
                is_favorite: favorite_keys.contains(key.as_str()),
                is_custom: custom_keys.contains(&key),
                highlight: highlighted.contains(key.as_str()),
                skill_count: counts.get(&key).copied().unwrap_or(0),
                last_fetched: fetch.last_fetched.get(&key).cloned(),
            }
        })
        .collect()
}
