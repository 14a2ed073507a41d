use serde::{Deserialize, Serialize};

use crate::sources::RepoSource;

/// Current index document version.
pub const INDEX_VERSION: &str = "1.0.0";

/// One indexed skill. The `id` is derived as `owner/repo/name` and is the
/// stable identity used by selection, favorites, and install matching. Two
/// skills with the same name in the same repository collide; the later one
/// overwrites the earlier and this is not resolved here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub owner: String,
    pub repo: String,
    /// Directory holding the manifest, relative to the working copy.
    /// `"."` for a root-level skill.
    pub path: String,
    /// Skill directory relative to the library root, for locating content
    /// on disk regardless of where the library lives.
    pub local_path: String,
}

impl SkillRecord {
    /// Derive the stable record id for a skill.
    pub fn derive_id(owner: &str, repo: &str, name: &str) -> String {
        format!("{owner}/{repo}/{name}")
    }
}

/// The persisted, point-in-time merged result of scanning all configured
/// sources. Replaced wholesale by each build, never partially mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogIndex {
    pub version: String,
    /// ISO-8601 build timestamp.
    pub last_updated: String,
    /// Echo of the source list the build actually used, including sources
    /// that failed to sync.
    pub repositories: Vec<RepoSource>,
    /// Flat record list, source-declaration order then discovery order.
    #[serde(default)]
    pub skills: Vec<SkillRecord>,
}

impl Default for CatalogIndex {
    fn default() -> Self {
        Self {
            version: INDEX_VERSION.to_string(),
            last_updated: String::new(),
            repositories: Vec::new(),
            skills: Vec::new(),
        }
    }
}

/// Favorited skill ids and favorited `owner/repo` keys. Two independent sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorites {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub repos: Vec<String>,
}

/// A skill record annotated with local state for the read-side view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSkill {
    #[serde(flatten)]
    pub record: SkillRecord,
    /// Matched by skill *name* against the installed set, not by id. Two
    /// repositories offering a same-named skill are indistinguishable here;
    /// the ambiguity is inherited behavior, kept on purpose.
    pub is_installed: bool,
    pub is_favorite: bool,
}

/// A configured repository annotated with local state for the read-side view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRepository {
    pub owner: String,
    pub repo: String,
    /// A local working copy exists on disk.
    pub is_fetched: bool,
    pub is_favorite: bool,
    pub is_custom: bool,
    pub highlight: bool,
    pub skill_count: usize,
    /// Last successful fetch timestamp, if tracked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_fetched: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_owner_repo_name() {
        assert_eq!(
            SkillRecord::derive_id("alice", "tools-skill", "Formatter"),
            "alice/tools-skill/Formatter"
        );
    }

    #[test]
    fn index_default_has_version_and_no_records() {
        let idx = CatalogIndex::default();
        assert_eq!(idx.version, INDEX_VERSION);
        assert!(idx.skills.is_empty());
        assert!(idx.repositories.is_empty());
    }
}
