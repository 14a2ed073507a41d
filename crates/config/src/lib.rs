//! Path resolution for skilldeck state.
//!
//! Two roots, resolved via `directories::ProjectDirs`:
//! - config dir (`~/.config/skilldeck/`): small persisted documents
//!   (favorites, settings, custom repos, fetched-repos).
//! - data dir (`~/.local/share/skilldeck/`): the library (cloned working
//!   copies + index) and installed skills.
//!
//! Both can be overridden process-wide, which tests use to point everything
//! at a tempdir.

use std::{
    path::PathBuf,
    sync::RwLock,
};

static CONFIG_DIR_OVERRIDE: RwLock<Option<PathBuf>> = RwLock::new(None);
static DATA_DIR_OVERRIDE: RwLock<Option<PathBuf>> = RwLock::new(None);

const APP_NAME: &str = "skilldeck";

/// Returns the user-global config directory (`~/.config/skilldeck/`).
pub fn config_dir() -> PathBuf {
    if let Ok(guard) = CONFIG_DIR_OVERRIDE.read()
        && let Some(dir) = guard.as_ref()
    {
        return dir.clone();
    }
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the user-global data directory (`~/.local/share/skilldeck/`).
pub fn data_dir() -> PathBuf {
    if let Ok(guard) = DATA_DIR_OVERRIDE.read()
        && let Some(dir) = guard.as_ref()
    {
        return dir.clone();
    }
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Override the config directory for this process (e.g. `--config-dir`).
pub fn set_config_dir(dir: PathBuf) {
    if let Ok(mut guard) = CONFIG_DIR_OVERRIDE.write() {
        tracing::debug!(dir = %dir.display(), "config dir override set");
        *guard = Some(dir);
    }
}

/// Override the data directory for this process (e.g. `--data-dir`).
pub fn set_data_dir(dir: PathBuf) {
    if let Ok(mut guard) = DATA_DIR_OVERRIDE.write() {
        tracing::debug!(dir = %dir.display(), "data dir override set");
        *guard = Some(dir);
    }
}

/// Clear the config directory override.
pub fn clear_config_dir() {
    if let Ok(mut guard) = CONFIG_DIR_OVERRIDE.write() {
        *guard = None;
    }
}

/// Clear the data directory override.
pub fn clear_data_dir() {
    if let Ok(mut guard) = DATA_DIR_OVERRIDE.write() {
        *guard = None;
    }
}

/// Root of the skill library: cloned working copies and the persisted index.
pub fn library_dir() -> PathBuf {
    data_dir().join("library")
}

/// Where repository working copies are cloned: `<library>/skills/<owner>/<repo>`.
pub fn repos_dir() -> PathBuf {
    library_dir().join("skills")
}

/// Path of the persisted catalog index.
pub fn index_path() -> PathBuf {
    library_dir().join("index.json")
}

/// Directory holding installed skills (one child directory per skill).
pub fn installed_dir() -> PathBuf {
    data_dir().join("installed-skills")
}

/// Path of the static repo catalog (`catalog.json`).
pub fn catalog_path() -> PathBuf {
    library_dir().join("catalog.json")
}

/// Path of the user-added custom repos document.
pub fn custom_repos_path() -> PathBuf {
    config_dir().join("custom-repos.json")
}

/// Path of the favorites document.
pub fn favorites_path() -> PathBuf {
    config_dir().join("favorites.json")
}

/// Path of the settings document.
pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Path of the fetched-repos tracking document.
pub fn fetched_repos_path() -> PathBuf {
    config_dir().join("fetched-repos.json")
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        set_data_dir(tmp.path().to_path_buf());
        assert_eq!(data_dir(), tmp.path());
        assert_eq!(library_dir(), tmp.path().join("library"));
        assert_eq!(repos_dir(), tmp.path().join("library/skills"));
        assert_eq!(index_path(), tmp.path().join("library/index.json"));
        clear_data_dir();
        assert_ne!(data_dir(), tmp.path());
    }

    #[test]
    fn config_paths_live_under_config_dir() {
        let tmp = tempfile::tempdir().unwrap();
        set_config_dir(tmp.path().to_path_buf());
        assert_eq!(favorites_path(), tmp.path().join("favorites.json"));
        assert_eq!(settings_path(), tmp.path().join("settings.json"));
        assert_eq!(custom_repos_path(), tmp.path().join("custom-repos.json"));
        clear_config_dir();
    }
}
