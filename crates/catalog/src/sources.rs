use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use {
    anyhow::Context,
    serde::{Deserialize, Serialize},
    tracing::warn,
};

/// Default layout convention: skills live in immediate children of this
/// subdirectory.
pub const DEFAULT_SKILLS_DIR: &str = "skills";

/// Sentinel convention meaning "the skill lives at the repository root".
pub const ROOT_CONVENTION: &str = ".";

/// Known single-skill repositories whose skill lives at the root even though
/// the name does not carry the `-skill` suffix rule.
const KNOWN_ROOT_REPOS: &[&str] = &[
    "avdlee/swiftui-agent-skill",
    "avdlee/swift-concurrency-agent-skill",
    "avdlee/swift-testing-agent-skill",
    "nextlevelbuilder/ui-ux-pro-max-skill",
    "199-biotechnologies/claude-deep-research-skill",
    "superdesigndev/superdesign-skill",
    "yusukebe/hono-skill",
    "heredotnow/skill",
    "leonxlnx/taste-skill",
    "pleaseprompto/notebooklm-skill",
];

/// One configured remote collection of skills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoSource {
    pub owner: String,
    pub repo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Explicit layout override. `None` means "resolve by heuristic".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills_path: Option<String>,
}

impl RepoSource {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: None,
            skills_path: None,
        }
    }

    /// `owner/repo` key used by favorites, fetch tracking, and grouping.
    pub fn key(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    pub fn clone_url(&self) -> String {
        format!("https://github.com/{}/{}.git", self.owner, self.repo)
    }

    /// Local working copy location under the repos root.
    pub fn local_path(&self, repos_root: &Path) -> PathBuf {
        repos_root.join(&self.owner).join(&self.repo)
    }

    /// Effective layout convention: explicit override wins, then the fixed
    /// lookup plus `-skill` suffix rule, then the `skills/` default.
    pub fn effective_skills_path(&self) -> &str {
        if let Some(ref path) = self.skills_path {
            return path;
        }
        resolve_skills_path(&self.owner, &self.repo)
    }
}

/// Resolve the layout convention for a repository by naming heuristic.
pub fn resolve_skills_path(owner: &str, repo: &str) -> &'static str {
    let full = format!("{owner}/{repo}");
    if KNOWN_ROOT_REPOS.contains(&full.as_str()) || repo.ends_with("-skill") {
        ROOT_CONVENTION
    } else {
        DEFAULT_SKILLS_DIR
    }
}

/// Parse `owner/repo` from a user-supplied source string.
/// Accepts `owner/repo`, GitHub URLs, and trailing `/` or `.git`.
/// Rejects malformed input with a descriptive error before any network use.
pub fn parse_source(source: &str) -> anyhow::Result<(String, String)> {
    let s = source.trim().trim_end_matches('/').trim_end_matches(".git");
    let s = s
        .strip_prefix("https://github.com/")
        .or_else(|| s.strip_prefix("http://github.com/"))
        .or_else(|| s.strip_prefix("github.com/"))
        .unwrap_or(s);
    let parts: Vec<&str> = s.split('/').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        anyhow::bail!(
            "invalid repository source '{}': expected 'owner/repo' or GitHub URL",
            source
        );
    }
    Ok((parts[0].to_string(), parts[1].to_string()))
}

// ── Static catalog ───────────────────────────────────────────────────────────

/// One entry of the shipped `catalog.json` repo list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRepo {
    /// `owner/repo`.
    pub url: String,
    #[serde(default)]
    pub highlight: bool,
}

/// The shipped repo catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoCatalog {
    #[serde(default)]
    pub repos: Vec<CatalogRepo>,
}

impl RepoCatalog {
    /// Load the catalog, returning an empty one when the file is missing.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "catalog not found, using empty catalog");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("failed to parse {}", path.display()))
    }
}

// ── Custom repos ─────────────────────────────────────────────────────────────

/// User-added repository, persisted with its resolved convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRepo {
    pub owner: String,
    pub repo: String,
    pub skills_path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CustomRepoDoc {
    #[serde(default)]
    repos: Vec<CustomRepo>,
}

/// Persistent store for user-added repositories.
pub struct CustomRepoStore {
    path: PathBuf,
}

impl CustomRepoStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn list(&self) -> anyhow::Result<Vec<CustomRepo>> {
        Ok(self.load()?.repos)
    }

    /// Add a repo if not already present. Returns whether it was added.
    pub fn add(&self, entry: CustomRepo) -> anyhow::Result<bool> {
        let mut doc = self.load()?;
        if doc
            .repos
            .iter()
            .any(|r| r.owner == entry.owner && r.repo == entry.repo)
        {
            return Ok(false);
        }
        doc.repos.push(entry);
        self.save(&doc)?;
        Ok(true)
    }

    /// Remove a repo. Returns whether anything was removed.
    pub fn remove(&self, owner: &str, repo: &str) -> anyhow::Result<bool> {
        let mut doc = self.load()?;
        let before = doc.repos.len();
        doc.repos.retain(|r| !(r.owner == owner && r.repo == repo));
        let removed = doc.repos.len() != before;
        if removed {
            self.save(&doc)?;
        }
        Ok(removed)
    }

    fn load(&self) -> anyhow::Result<CustomRepoDoc> {
        if !self.path.exists() {
            return Ok(CustomRepoDoc::default());
        }
        let data = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn save(&self, doc: &CustomRepoDoc) -> anyhow::Result<()> {
        write_json_atomic(&self.path, doc)
    }
}

// ── Fetched-repos tracking ───────────────────────────────────────────────────

/// Map of `owner/repo` to last successful fetch timestamp (ISO-8601).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchedRepos {
    #[serde(default)]
    pub repos: HashMap<String, String>,
}

/// Persistent store for fetch tracking.
pub struct FetchedRepoStore {
    path: PathBuf,
}

impl FetchedRepoStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> FetchedRepos {
        if !self.path.exists() {
            return FetchedRepos::default();
        }
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|data| serde_json::from_str(&data).ok())
            .unwrap_or_default()
    }

    pub fn mark_fetched(&self, repo_key: &str, timestamp: String) -> anyhow::Result<()> {
        let mut doc = self.load();
        doc.repos.insert(repo_key.to_string(), timestamp);
        write_json_atomic(&self.path, &doc)
    }
}

/// Merge the static catalog with custom repos into the ordered source list.
/// Catalog order first, then custom repos not already present.
pub fn resolve_sources(
    catalog: &RepoCatalog,
    custom: &[CustomRepo],
) -> Vec<RepoSource> {
    let mut sources: Vec<RepoSource> = Vec::new();
    for entry in &catalog.repos {
        match entry.url.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => {
                sources.push(RepoSource::new(owner, repo));
            },
            _ => {
                warn!(url = %entry.url, "skipping malformed catalog entry");
            },
        }
    }
    for entry in custom {
        let exists = sources
            .iter()
            .any(|s| s.owner == entry.owner && s.repo == entry.repo);
        if !exists {
            sources.push(RepoSource {
                owner: entry.owner.clone(),
                repo: entry.repo.clone(),
                branch: None,
                skills_path: Some(entry.skills_path.clone()),
            });
        }
    }
    sources
}

/// Serialize to a temp file then rename, so readers never see a torn write.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_string_pretty(value)?;
    std::fs::write(&tmp, data)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
