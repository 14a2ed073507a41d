//! Catalog service behind the method registry.
//!
//! The `Noop` implementation lets the registry run standalone; the live one
//! wires the catalog crate to an explicit path set so tests never depend on
//! process-global directories.

use std::path::{Path, PathBuf};

use {async_trait::async_trait, serde_json::Value, tracing::info};

use skilldeck_catalog::{
    build,
    favorites::FavoritesStore,
    index::IndexStore,
    installed,
    reconcile::{self, FetchState},
    settings::{Settings, SettingsStore},
    sources::{
        self, CustomRepo, CustomRepoStore, FetchedRepoStore, RepoCatalog, RepoSource,
    },
    sync,
    types::SkillRecord,
};

use crate::protocol::{error_codes, ErrorShape};

// ── Errors ───────────────────────────────────────────────────────────────────

/// Error type returned by service methods.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{message}")]
    Message { message: String },
    #[error("{message}")]
    InvalidParams { message: String },
    #[error("{0}")]
    Serde(#[from] serde_json::Error),
}

impl ServiceError {
    #[must_use]
    pub fn message(message: impl std::fmt::Display) -> Self {
        Self::Message {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn invalid(message: impl std::fmt::Display) -> Self {
        Self::InvalidParams {
            message: message.to_string(),
        }
    }
}

impl From<String> for ServiceError {
    fn from(value: String) -> Self {
        Self::message(value)
    }
}

impl From<&str> for ServiceError {
    fn from(value: &str) -> Self {
        Self::message(value)
    }
}

impl From<anyhow::Error> for ServiceError {
    fn from(value: anyhow::Error) -> Self {
        Self::message(value)
    }
}

impl From<ServiceError> for ErrorShape {
    fn from(err: ServiceError) -> Self {
        let code = match err {
            ServiceError::InvalidParams { .. } => error_codes::INVALID_REQUEST,
            _ => error_codes::UNAVAILABLE,
        };
        Self::new(code, err.to_string())
    }
}

pub type ServiceResult<T = Value> = Result<T, ServiceError>;

fn require_str(params: &Value, key: &str) -> Result<String, ServiceError> {
    params
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ServiceError::invalid(format!("missing required param: {key}")))
}

// ── Trait ────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn build_index(&self) -> ServiceResult;
    async fn fetch_repo(&self, params: Value) -> ServiceResult;
    async fn repos_list(&self) -> ServiceResult;
    async fn repos_add(&self, params: Value) -> ServiceResult;
    async fn repos_remove(&self, params: Value) -> ServiceResult;
    async fn repo_readme(&self, params: Value) -> ServiceResult;
    async fn skills_list(&self) -> ServiceResult;
    async fn skill_install(&self, params: Value) -> ServiceResult;
    async fn skill_uninstall(&self, params: Value) -> ServiceResult;
    async fn installed_list(&self) -> ServiceResult;
    async fn favorites_get(&self) -> ServiceResult;
    async fn favorite_skill_toggle(&self, params: Value) -> ServiceResult;
    async fn favorite_repo_toggle(&self, params: Value) -> ServiceResult;
    async fn settings_get(&self) -> ServiceResult;
    async fn settings_save(&self, params: Value) -> ServiceResult;
}

// ── Noop ─────────────────────────────────────────────────────────────────────

pub struct NoopCatalogService;

#[async_trait]
impl CatalogService for NoopCatalogService {
    async fn build_index(&self) -> ServiceResult {
        Err("catalog service not configured".into())
    }

    async fn fetch_repo(&self, _params: Value) -> ServiceResult {
        Err("catalog service not configured".into())
    }

    async fn repos_list(&self) -> ServiceResult {
        Ok(serde_json::json!([]))
    }

    async fn repos_add(&self, _params: Value) -> ServiceResult {
        Err("catalog service not configured".into())
    }

    async fn repos_remove(&self, _params: Value) -> ServiceResult {
        Err("catalog service not configured".into())
    }

    async fn repo_readme(&self, _params: Value) -> ServiceResult {
        Err("catalog service not configured".into())
    }

    async fn skills_list(&self) -> ServiceResult {
        Ok(serde_json::json!([]))
    }

    async fn skill_install(&self, _params: Value) -> ServiceResult {
        Err("catalog service not configured".into())
    }

    async fn skill_uninstall(&self, _params: Value) -> ServiceResult {
        Err("catalog service not configured".into())
    }

    async fn installed_list(&self) -> ServiceResult {
        Ok(serde_json::json!([]))
    }

    async fn favorites_get(&self) -> ServiceResult {
        Ok(serde_json::json!({ "skills": [], "repos": [] }))
    }

    async fn favorite_skill_toggle(&self, _params: Value) -> ServiceResult {
        Err("catalog service not configured".into())
    }

    async fn favorite_repo_toggle(&self, _params: Value) -> ServiceResult {
        Err("catalog service not configured".into())
    }

    async fn settings_get(&self) -> ServiceResult {
        Ok(serde_json::to_value(Settings::default())?)
    }

    async fn settings_save(&self, _params: Value) -> ServiceResult {
        Err("catalog service not configured".into())
    }
}

// ── Live ─────────────────────────────────────────────────────────────────────

/// Everything the live service touches on disk, spelled out so callers (and
/// tests) control exactly where state lives.
#[derive(Debug, Clone)]
pub struct CatalogPaths {
    pub library_dir: PathBuf,
    pub installed_dir: PathBuf,
    pub catalog_path: PathBuf,
    pub custom_repos_path: PathBuf,
    pub favorites_path: PathBuf,
    pub settings_path: PathBuf,
    pub fetched_repos_path: PathBuf,
}

impl CatalogPaths {
    /// Resolve from the process-wide config/data directories.
    pub fn from_env() -> Self {
        Self {
            library_dir: skilldeck_config::library_dir(),
            installed_dir: skilldeck_config::installed_dir(),
            catalog_path: skilldeck_config::catalog_path(),
            custom_repos_path: skilldeck_config::custom_repos_path(),
            favorites_path: skilldeck_config::favorites_path(),
            settings_path: skilldeck_config::settings_path(),
            fetched_repos_path: skilldeck_config::fetched_repos_path(),
        }
    }

    /// Root for tests: everything under one directory.
    pub fn under(root: &Path) -> Self {
        Self {
            library_dir: root.join("library"),
            installed_dir: root.join("installed-skills"),
            catalog_path: root.join("library/catalog.json"),
            custom_repos_path: root.join("custom-repos.json"),
            favorites_path: root.join("favorites.json"),
            settings_path: root.join("settings.json"),
            fetched_repos_path: root.join("fetched-repos.json"),
        }
    }

    pub fn repos_dir(&self) -> PathBuf {
        self.library_dir.join("skills")
    }

    pub fn index_path(&self) -> PathBuf {
        self.library_dir.join("index.json")
    }
}

pub struct LiveCatalogService {
    paths: CatalogPaths,
}

impl LiveCatalogService {
    pub fn new(paths: CatalogPaths) -> Self {
        Self { paths }
    }

    fn index_store(&self) -> IndexStore {
        IndexStore::new(self.paths.index_path())
    }

    fn favorites_store(&self) -> FavoritesStore {
        FavoritesStore::new(self.paths.favorites_path.clone())
    }

    fn custom_store(&self) -> CustomRepoStore {
        CustomRepoStore::new(self.paths.custom_repos_path.clone())
    }

    fn fetched_store(&self) -> FetchedRepoStore {
        FetchedRepoStore::new(self.paths.fetched_repos_path.clone())
    }

    fn configured_sources(&self) -> ServiceResult<(RepoCatalog, Vec<CustomRepo>, Vec<RepoSource>)> {
        let catalog = RepoCatalog::load(&self.paths.catalog_path)?;
        let custom = self.custom_store().list()?;
        let sources = sources::resolve_sources(&catalog, &custom);
        Ok((catalog, custom, sources))
    }

    /// Replace one repo's records in the persisted index after a targeted
    /// fetch. Full builds still rewrite the whole document.
    fn refresh_index_records(
        &self,
        source: &RepoSource,
        records: Vec<SkillRecord>,
    ) -> ServiceResult<usize> {
        let store = self.index_store();
        let mut index = store.load()?;
        let count = records.len();
        index
            .skills
            .retain(|r| !(r.owner == source.owner && r.repo == source.repo));
        index.skills.extend(records);
        if !index.repositories.iter().any(|s| s.key() == source.key()) {
            index.repositories.push(source.clone());
        }
        index.last_updated = chrono::Utc::now().to_rfc3339();
        store.save(&index)?;
        Ok(count)
    }
}

#[async_trait]
impl CatalogService for LiveCatalogService {
    async fn build_index(&self) -> ServiceResult {
        let (_, _, sources) = self.configured_sources()?;
        let store = self.index_store();
        let report = build::build_and_persist(&sources, &self.paths.library_dir, &store).await?;

        let tracker = self.fetched_store();
        let now = chrono::Utc::now().to_rfc3339();
        for outcome in report.outcomes.iter().filter(|o| o.success) {
            tracker.mark_fetched(&outcome.repo, now.clone())?;
        }

        Ok(serde_json::json!({
            "skills": report.index.skills.len(),
            "repositories": report.index.repositories.len(),
            "outcomes": report
                .outcomes
                .iter()
                .map(|o| serde_json::json!({
                    "repo": o.repo,
                    "success": o.success,
                    "detail": o.detail,
                }))
                .collect::<Vec<_>>(),
        }))
    }

    async fn fetch_repo(&self, params: Value) -> ServiceResult {
        let owner = require_str(&params, "owner")?;
        let repo = require_str(&params, "repo")?;
        let (_, _, sources) = self.configured_sources()?;
        let key = format!("{owner}/{repo}");
        // A configured source carries its persisted layout override.
        let source = sources
            .into_iter()
            .find(|s| s.key() == key)
            .unwrap_or_else(|| RepoSource::new(owner.clone(), repo.clone()));

        let repos_dir = self.paths.repos_dir();
        let outcome = sync::sync(&source, &repos_dir).await;
        if !outcome.success {
            return Err(ServiceError::message(format!(
                "failed to fetch {key}: {}",
                outcome.detail.unwrap_or_else(|| "unknown error".into())
            )));
        }
        self.fetched_store()
            .mark_fetched(&key, chrono::Utc::now().to_rfc3339())?;

        let repo_path = source.local_path(&repos_dir);
        let records =
            skilldeck_catalog::locate::locate(&source, &repo_path, &self.paths.library_dir);
        let count = self.refresh_index_records(&source, records)?;

        info!(repo = %key, skills = count, "fetched repository");
        Ok(serde_json::json!({
            "repo": key,
            "skills": count,
            "message": format!("Fetched {key} ({count} skills)"),
        }))
    }

    async fn repos_list(&self) -> ServiceResult {
        let (catalog, custom, sources) = self.configured_sources()?;
        // Configured sources drive the listing even before the first build.
        let mut index = self.index_store().load()?;
        index.repositories = sources;

        let favorites = self.favorites_store().load();
        let fetch = FetchState::scan(&self.paths.repos_dir(), &self.fetched_store().load());
        let views = reconcile::view_repositories(&index, &catalog, &custom, &favorites, &fetch);
        Ok(serde_json::to_value(views)?)
    }

    async fn repos_add(&self, params: Value) -> ServiceResult {
        let raw = require_str(&params, "source")?;
        let (owner, repo) =
            sources::parse_source(&raw).map_err(|e| ServiceError::invalid(e.to_string()))?;
        let skills_path = sources::resolve_skills_path(&owner, &repo).to_string();

        let added = self.custom_store().add(CustomRepo {
            owner: owner.clone(),
            repo: repo.clone(),
            skills_path,
        })?;
        if !added {
            return Err(ServiceError::invalid(format!(
                "repository {owner}/{repo} is already configured"
            )));
        }

        // Fetch eagerly so the new repo shows up populated.
        self.fetch_repo(serde_json::json!({ "owner": owner, "repo": repo }))
            .await
    }

    async fn repos_remove(&self, params: Value) -> ServiceResult {
        let owner = require_str(&params, "owner")?;
        let repo = require_str(&params, "repo")?;
        let removed = self.custom_store().remove(&owner, &repo)?;

        // Drop the repo's records so reads reflect the configured set
        // immediately instead of waiting for the next full build.
        let store = self.index_store();
        let mut index = store.load()?;
        let before = index.skills.len() + index.repositories.len();
        index
            .skills
            .retain(|r| !(r.owner == owner && r.repo == repo));
        index
            .repositories
            .retain(|s| !(s.owner == owner && s.repo == repo));
        if index.skills.len() + index.repositories.len() != before {
            index.last_updated = chrono::Utc::now().to_rfc3339();
            store.save(&index)?;
        }

        let copy = self.paths.repos_dir().join(&owner).join(&repo);
        if copy.is_dir() {
            tokio::fs::remove_dir_all(&copy)
                .await
                .map_err(|e| ServiceError::message(format!("failed to remove working copy: {e}")))?;
        }

        Ok(serde_json::json!({ "removed": removed }))
    }

    async fn repo_readme(&self, params: Value) -> ServiceResult {
        let owner = require_str(&params, "owner")?;
        let repo = require_str(&params, "repo")?;
        let repo_path = self.paths.repos_dir().join(&owner).join(&repo);

        for name in ["README.md", "readme.md", "Readme.md", "README.MD"] {
            let path = repo_path.join(name);
            if path.exists() {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| ServiceError::message(format!("failed to read readme: {e}")))?;
                return Ok(serde_json::json!({ "content": content }));
            }
        }
        Err(ServiceError::message(format!(
            "no readme found for {owner}/{repo}"
        )))
    }

    async fn skills_list(&self) -> ServiceResult {
        let index = self.index_store().load()?;
        let favorites = self.favorites_store().load();
        let installed = installed::installed_names(&self.paths.installed_dir);
        let views = reconcile::view_skills(&index, &favorites, &installed);
        Ok(serde_json::to_value(views)?)
    }

    async fn skill_install(&self, params: Value) -> ServiceResult {
        let id = require_str(&params, "id")?;
        let index = self.index_store().load()?;
        let record = index
            .skills
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| ServiceError::invalid(format!("unknown skill id: {id}")))?;

        let skills_path = index
            .repositories
            .iter()
            .find(|s| s.owner == record.owner && s.repo == record.repo)
            .map(|s| s.effective_skills_path().to_string())
            .unwrap_or_else(|| {
                sources::resolve_skills_path(&record.owner, &record.repo).to_string()
            });

        let method = match params.get("method").and_then(Value::as_str) {
            Some(raw) => installed::InstallMethod::parse(raw)
                .map_err(|e| ServiceError::invalid(e.to_string()))?,
            None => {
                let settings = SettingsStore::new(self.paths.settings_path.clone()).load();
                installed::InstallMethod::parse(&settings.install_method)?
            },
        };

        let message = installed::install_skill(
            &record.owner,
            &record.repo,
            &record.name,
            &record.path,
            &skills_path,
            method,
            &self.paths.repos_dir(),
            &self.paths.installed_dir,
        )
        .await?;
        Ok(serde_json::json!({ "message": message }))
    }

    async fn skill_uninstall(&self, params: Value) -> ServiceResult {
        let name = require_str(&params, "name")?;
        installed::uninstall_skill(&name, &self.paths.installed_dir).await?;
        Ok(serde_json::json!({ "uninstalled": name }))
    }

    async fn installed_list(&self) -> ServiceResult {
        Ok(serde_json::to_value(installed::installed_names(
            &self.paths.installed_dir,
        ))?)
    }

    async fn favorites_get(&self) -> ServiceResult {
        Ok(serde_json::to_value(self.favorites_store().load())?)
    }

    async fn favorite_skill_toggle(&self, params: Value) -> ServiceResult {
        let id = require_str(&params, "id")?;
        let updated = self.favorites_store().toggle_skill(&id)?;
        Ok(serde_json::to_value(updated)?)
    }

    async fn favorite_repo_toggle(&self, params: Value) -> ServiceResult {
        let key = require_str(&params, "repo")?;
        let updated = self.favorites_store().toggle_repo(&key)?;
        Ok(serde_json::to_value(updated)?)
    }

    async fn settings_get(&self) -> ServiceResult {
        let settings = SettingsStore::new(self.paths.settings_path.clone()).load();
        Ok(serde_json::to_value(settings)?)
    }

    async fn settings_save(&self, params: Value) -> ServiceResult {
        let settings: Settings = serde_json::from_value(params)
            .map_err(|e| ServiceError::invalid(format!("invalid settings document: {e}")))?;
        installed::InstallMethod::parse(&settings.install_method)
            .map_err(|e| ServiceError::invalid(e.to_string()))?;
        SettingsStore::new(self.paths.settings_path.clone()).save(&settings)?;
        Ok(serde_json::to_value(settings)?)
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn seed_repo(paths: &CatalogPaths, owner: &str, repo: &str, skills: &[&str]) {
        for skill in skills {
            let dir = paths.repos_dir().join(owner).join(repo).join("skills").join(skill);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(
                dir.join("SKILL.md"),
                format!("---\nname: {skill}\ndescription: test skill\n---\n"),
            )
            .unwrap();
        }
    }

    fn seeded_service(root: &Path) -> LiveCatalogService {
        let paths = CatalogPaths::under(root);
        seed_repo(&paths, "alice", "tools", &["fmt", "lint"]);
        LiveCatalogService::new(paths)
    }

    #[tokio::test]
    async fn build_index_over_seeded_copies() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = seeded_service(tmp.path());
        std::fs::create_dir_all(svc.paths.catalog_path.parent().unwrap()).unwrap();
        std::fs::write(
            &svc.paths.catalog_path,
            r#"{ "repos": [{ "url": "alice/tools" }] }"#,
        )
        .unwrap();

        // The seeded working copy is not a git repo, so the pull fails and
        // the build degrades to scanning the stale copy.
        let report = svc.build_index().await.unwrap();
        assert_eq!(report["skills"], 2);
        assert_eq!(report["repositories"], 1);
        assert_eq!(report["outcomes"][0]["success"], false);

        let listed = svc.skills_list().await.unwrap();
        assert_eq!(listed.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn skills_list_reads_persisted_index() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = seeded_service(tmp.path());

        // Index the seeded working copy directly, bypassing the network.
        let source = RepoSource::new("alice", "tools");
        let repo_path = source.local_path(&svc.paths.repos_dir());
        let records =
            skilldeck_catalog::locate::locate(&source, &repo_path, &svc.paths.library_dir);
        svc.refresh_index_records(&source, records).unwrap();

        let listed = svc.skills_list().await.unwrap();
        let items = listed.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["id"], "alice/tools/fmt");
        assert_eq!(items[0]["isInstalled"], false);
    }

    #[tokio::test]
    async fn install_flow_flips_is_installed() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = seeded_service(tmp.path());
        let source = RepoSource::new("alice", "tools");
        let repo_path = source.local_path(&svc.paths.repos_dir());
        let records =
            skilldeck_catalog::locate::locate(&source, &repo_path, &svc.paths.library_dir);
        svc.refresh_index_records(&source, records).unwrap();

        svc.skill_install(serde_json::json!({ "id": "alice/tools/fmt" }))
            .await
            .unwrap();

        let installed = svc.installed_list().await.unwrap();
        assert_eq!(installed, serde_json::json!(["fmt"]));

        let listed = svc.skills_list().await.unwrap();
        let fmt = &listed.as_array().unwrap()[0];
        assert_eq!(fmt["isInstalled"], true);

        svc.skill_uninstall(serde_json::json!({ "name": "fmt" }))
            .await
            .unwrap();
        assert_eq!(svc.installed_list().await.unwrap(), serde_json::json!([]));
    }

    #[tokio::test]
    async fn install_unknown_id_is_invalid() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = seeded_service(tmp.path());
        let err = svc
            .skill_install(serde_json::json!({ "id": "nobody/none/x" }))
            .await
            .unwrap_err();
        let shape: ErrorShape = err.into();
        assert_eq!(shape.code, error_codes::INVALID_REQUEST);
    }

    #[tokio::test]
    async fn repos_add_rejects_malformed_source_before_any_network() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = seeded_service(tmp.path());
        let err = svc
            .repos_add(serde_json::json!({ "source": "not-a-repo" }))
            .await
            .unwrap_err();
        let shape: ErrorShape = err.into();
        assert_eq!(shape.code, error_codes::INVALID_REQUEST);
        assert!(svc.custom_store().list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn favorites_toggle_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = seeded_service(tmp.path());

        let on = svc
            .favorite_skill_toggle(serde_json::json!({ "id": "alice/tools/fmt" }))
            .await
            .unwrap();
        assert_eq!(on["skills"], serde_json::json!(["alice/tools/fmt"]));

        let off = svc
            .favorite_skill_toggle(serde_json::json!({ "id": "alice/tools/fmt" }))
            .await
            .unwrap();
        assert_eq!(off["skills"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn repo_readme_tries_case_variants() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = seeded_service(tmp.path());
        let repo_dir = svc.paths.repos_dir().join("alice/tools");
        std::fs::write(repo_dir.join("readme.md"), "# Tools").unwrap();

        let payload = svc
            .repo_readme(serde_json::json!({ "owner": "alice", "repo": "tools" }))
            .await
            .unwrap();
        assert_eq!(payload["content"], "# Tools");

        assert!(svc
            .repo_readme(serde_json::json!({ "owner": "alice", "repo": "missing" }))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn settings_save_validates_method() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = seeded_service(tmp.path());

        assert_eq!(
            svc.settings_get().await.unwrap()["installMethod"],
            "copy"
        );
        svc.settings_save(serde_json::json!({ "installMethod": "cli" }))
            .await
            .unwrap();
        assert_eq!(svc.settings_get().await.unwrap()["installMethod"], "cli");

        assert!(svc
            .settings_save(serde_json::json!({ "installMethod": "ftp" }))
            .await
            .is_err());

        // A document that does not deserialize is a bad request, not an
        // unavailable service.
        let err = svc
            .settings_save(serde_json::json!({}))
            .await
            .unwrap_err();
        let shape: ErrorShape = err.into();
        assert_eq!(shape.code, error_codes::INVALID_REQUEST);
    }

    #[tokio::test]
    async fn repos_remove_deletes_working_copy() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = seeded_service(tmp.path());
        svc.custom_store()
            .add(CustomRepo {
                owner: "alice".into(),
                repo: "tools".into(),
                skills_path: "skills".into(),
            })
            .unwrap();

        let payload = svc
            .repos_remove(serde_json::json!({ "owner": "alice", "repo": "tools" }))
            .await
            .unwrap();
        assert_eq!(payload["removed"], true);
        assert!(!svc.paths.repos_dir().join("alice/tools").exists());
    }

    #[tokio::test]
    async fn repos_remove_purges_index_records() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = seeded_service(tmp.path());
        svc.custom_store()
            .add(CustomRepo {
                owner: "alice".into(),
                repo: "tools".into(),
                skills_path: "skills".into(),
            })
            .unwrap();
        let source = RepoSource::new("alice", "tools");
        let repo_path = source.local_path(&svc.paths.repos_dir());
        let records =
            skilldeck_catalog::locate::locate(&source, &repo_path, &svc.paths.library_dir);
        svc.refresh_index_records(&source, records).unwrap();
        assert_eq!(svc.skills_list().await.unwrap().as_array().unwrap().len(), 2);

        svc.repos_remove(serde_json::json!({ "owner": "alice", "repo": "tools" }))
            .await
            .unwrap();

        // The removed repo's skills vanish without a full rebuild.
        assert!(svc.skills_list().await.unwrap().as_array().unwrap().is_empty());
        let index = svc.index_store().load().unwrap();
        assert!(index.repositories.is_empty());
    }
}
