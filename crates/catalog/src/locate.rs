use std::path::Path;

use tracing::{debug, warn};

use crate::{
    parse::{self, find_manifest},
    sources::{RepoSource, ROOT_CONVENTION},
    types::SkillRecord,
};

/// Discover skill records in a repository working copy.
///
/// Three-branch decision procedure, first match wins:
/// 1. root convention (`"."`): single manifest in the working copy root;
/// 2. otherwise: enumerate immediate children of the convention
///    subdirectory, one record per child with a parseable manifest;
/// 3. fallback: when branch 2 yields zero records (subdirectory missing,
///    unreadable, or without valid manifests), retry the root search.
///
/// `local_path` on each record is relative to `library_root` so the index
/// stays portable across library locations. Per-directory failures are
/// logged and skipped; this function never fails.
pub fn locate(source: &RepoSource, repo_path: &Path, library_root: &Path) -> Vec<SkillRecord> {
    let convention = source.effective_skills_path();

    if convention == ROOT_CONVENTION {
        return root_record(source, repo_path, library_root)
            .into_iter()
            .collect();
    }

    let records = scan_subdirectory(source, &repo_path.join(convention), library_root);
    if !records.is_empty() {
        return records;
    }

    // Last resort: a single skill at the repository root.
    root_record(source, repo_path, library_root)
        .into_iter()
        .collect()
}

/// Branch 1/3: zero or one record from a manifest in the working copy root.
fn root_record(
    source: &RepoSource,
    repo_path: &Path,
    library_root: &Path,
) -> Option<SkillRecord> {
    let manifest = find_manifest(repo_path)?;
    let content = match std::fs::read_to_string(&manifest) {
        Ok(c) => c,
        Err(e) => {
            warn!(manifest = %manifest.display(), error = %e, "failed to read manifest");
            return None;
        },
    };
    let descriptor = parse::parse_descriptor(&content, repo_path)?;
    Some(record_for(
        source,
        descriptor,
        ROOT_CONVENTION,
        repo_path,
        library_root,
    ))
}

/// Branch 2: one record per immediate child directory with a valid manifest.
fn scan_subdirectory(
    source: &RepoSource,
    skills_dir: &Path,
    library_root: &Path,
) -> Vec<SkillRecord> {
    let mut records = Vec::new();

    let entries = match std::fs::read_dir(skills_dir) {
        Ok(entries) => entries,
        Err(e) => {
            // Missing or unreadable is "zero records"; the caller falls back.
            debug!(dir = %skills_dir.display(), error = %e, "skills directory not enumerable");
            return records;
        },
    };

    // read_dir order is platform-dependent; sort for stable discovery order.
    let mut children: Vec<_> = entries.flatten().collect();
    children.sort_by_key(std::fs::DirEntry::file_name);

    for entry in children {
        let skill_dir = entry.path();
        if !skill_dir.is_dir() {
            continue;
        }
        let Some(manifest) = find_manifest(&skill_dir) else {
            continue;
        };
        let content = match std::fs::read_to_string(&manifest) {
            Ok(c) => c,
            Err(e) => {
                warn!(manifest = %manifest.display(), error = %e, "failed to read manifest");
                continue;
            },
        };
        let Some(descriptor) = parse::parse_descriptor(&content, &skill_dir) else {
            debug!(dir = %skill_dir.display(), "skipping directory without valid manifest");
            continue;
        };
        let child = entry.file_name().to_string_lossy().to_string();
        records.push(record_for(source, descriptor, &child, &skill_dir, library_root));
    }

    records
}

fn record_for(
    source: &RepoSource,
    descriptor: parse::SkillDescriptor,
    relative: &str,
    skill_dir: &Path,
    library_root: &Path,
) -> SkillRecord {
    let local_path = skill_dir
        .strip_prefix(library_root)
        .unwrap_or(skill_dir)
        .to_string_lossy()
        .to_string();
    SkillRecord {
        id: SkillRecord::derive_id(&source.owner, &source.repo, &descriptor.name),
        name: descriptor.name,
        description: descriptor.description,
        owner: source.owner.clone(),
        repo: source.repo.clone(),
        path: relative.to_string(),
        local_path,
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn write_skill(dir: &Path, name: &str, description: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(
            dir.join("SKILL.md"),
            format!("---\nname: {name}\ndescription: \"{description}\"\n---\nbody\n"),
        )
        .unwrap();
    }

    fn root_source(owner: &str, repo: &str) -> RepoSource {
        RepoSource {
            skills_path: Some(ROOT_CONVENTION.into()),
            ..RepoSource::new(owner, repo)
        }
    }

    #[test]
    fn root_convention_yields_single_record() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = tmp.path().join("skills/alice/tools-skill");
        write_skill(&repo, "Formatter", "reformats code");

        let source = RepoSource::new("alice", "tools-skill"); // -skill suffix
        let records = locate(&source, &repo, tmp.path());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "alice/tools-skill/Formatter");
        assert_eq!(records[0].path, ".");
        assert_eq!(records[0].description, "reformats code");
        assert_eq!(records[0].local_path, "skills/alice/tools-skill");
    }

    #[test]
    fn subdirectory_convention_skips_children_without_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = tmp.path().join("skills/bob/collection");
        write_skill(&repo.join("skills/a"), "Alpha", "first");
        std::fs::create_dir_all(repo.join("skills/b")).unwrap(); // no manifest

        let source = RepoSource::new("bob", "collection");
        let records = locate(&source, &repo, tmp.path());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "bob/collection/Alpha");
        assert_eq!(records[0].path, "a");
        assert_eq!(records[0].local_path, "skills/bob/collection/skills/a");
    }

    #[test]
    fn subdirectory_beats_root_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = tmp.path().join("skills/bob/both");
        write_skill(&repo, "RootOne", "at root");
        write_skill(&repo.join("skills/a"), "Alpha", "in skills dir");

        let source = RepoSource::new("bob", "both");
        let records = locate(&source, &repo, tmp.path());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Alpha");
    }

    #[test]
    fn falls_back_to_root_when_subdirectory_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = tmp.path().join("skills/carol/single");
        write_skill(&repo, "Solo", "root fallback");
        std::fs::create_dir_all(repo.join("skills")).unwrap(); // present but empty

        let source = RepoSource::new("carol", "single");
        let records = locate(&source, &repo, tmp.path());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Solo");
        assert_eq!(records[0].path, ".");
    }

    #[test]
    fn falls_back_when_subdirectory_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = tmp.path().join("skills/carol/nosubdir");
        write_skill(&repo, "Solo", "no skills dir at all");

        let source = RepoSource::new("carol", "nosubdir");
        let records = locate(&source, &repo, tmp.path());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Solo");
    }

    #[test]
    fn root_convention_without_manifest_yields_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = tmp.path().join("skills/dave/empty");
        std::fs::create_dir_all(&repo).unwrap();

        let records = locate(&root_source("dave", "empty"), &repo, tmp.path());
        assert!(records.is_empty());
    }

    #[test]
    fn lowercase_manifest_variant_is_found() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = tmp.path().join("skills/erin/lower-skill");
        std::fs::create_dir_all(&repo).unwrap();
        std::fs::write(
            repo.join("skill.md"),
            "---\nname: Lower\ndescription: lowercase file\n---\nbody\n",
        )
        .unwrap();

        let records = locate(&root_source("erin", "lower-skill"), &repo, tmp.path());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Lower");
    }

    #[test]
    fn malformed_child_manifest_does_not_abort_enumeration() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = tmp.path().join("skills/frank/mixed");
        write_skill(&repo.join("skills/good"), "Good", "fine");
        std::fs::create_dir_all(repo.join("skills/bad")).unwrap();
        std::fs::write(repo.join("skills/bad/SKILL.md"), "no frontmatter").unwrap();

        let source = RepoSource::new("frank", "mixed");
        let records = locate(&source, &repo, tmp.path());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Good");
    }
}
