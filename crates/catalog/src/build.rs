use std::path::Path;

use {
    futures::{stream, StreamExt},
    tracing::{info, warn},
};

use crate::{
    index::IndexStore,
    locate,
    sources::RepoSource,
    sync::{self, SyncOutcome},
    types::{CatalogIndex, SkillRecord, INDEX_VERSION},
};

/// How many sources are synchronized and scanned at once.
pub const MAX_CONCURRENT_SOURCES: usize = 4;

/// Result of a full catalog build: the index plus per-source sync outcomes.
#[derive(Debug)]
pub struct BuildReport {
    pub index: CatalogIndex,
    pub outcomes: Vec<SyncOutcome>,
}

/// Build a fresh index over every configured source.
///
/// One worker per source (bounded pool): synchronize, then locate skills if
/// a working copy exists on disk; a stale copy left by an earlier run is
/// still scanned when the sync fails. Partial record lists are merged in
/// source-declaration order after all workers complete, so the resulting
/// order is stable across runs. Sources that yield nothing still appear in
/// the index's `repositories` metadata.
pub async fn build(sources: &[RepoSource], library_root: &Path) -> BuildReport {
    let repos_root = library_root.join("skills");

    // Workers take owned sources so the futures carry no borrowed state.
    let partials: Vec<(usize, SyncOutcome, Vec<SkillRecord>)> =
        stream::iter(sources.to_vec().into_iter().enumerate())
            .map(|(position, source)| {
                let repos_root = repos_root.clone();
                let library_root = library_root.to_path_buf();
                async move {
                    let outcome = sync::sync(&source, &repos_root).await;
                    let repo_path = source.local_path(&repos_root);
                    let records = if repo_path.is_dir() {
                        locate::locate(&source, &repo_path, &library_root)
                    } else {
                        Vec::new()
                    };
                    if !outcome.success {
                        warn!(repo = %outcome.repo, stale = !records.is_empty(),
                              "source failed to sync");
                    }
                    (position, outcome, records)
                }
            })
            .buffer_unordered(MAX_CONCURRENT_SOURCES)
            .collect()
            .await;

    // Coordinator merge: declaration order, not completion order.
    let mut partials = partials;
    partials.sort_by_key(|(position, ..)| *position);

    let mut skills = Vec::new();
    let mut outcomes = Vec::new();
    for (_, outcome, records) in partials {
        info!(repo = %outcome.repo, count = records.len(), "indexed");
        outcomes.push(outcome);
        skills.extend(records);
    }

    let index = CatalogIndex {
        version: INDEX_VERSION.to_string(),
        last_updated: chrono::Utc::now().to_rfc3339(),
        repositories: sources.to_vec(),
        skills,
    };

    BuildReport { index, outcomes }
}

/// Build and persist in one step. The only fatal failure of a build is the
/// index write; everything upstream degrades per source.
pub async fn build_and_persist(
    sources: &[RepoSource],
    library_root: &Path,
    store: &IndexStore,
) -> anyhow::Result<BuildReport> {
    let report = build(sources, library_root).await;
    store.save(&report.index)?;
    info!(
        skills = report.index.skills.len(),
        repos = report.index.repositories.len(),
        path = %store.path().display(),
        "catalog index written"
    );
    Ok(report)
}
