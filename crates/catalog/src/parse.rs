use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Manifest filename variants, checked in this fixed order. First existing
/// file wins.
pub const MANIFEST_NAMES: &[&str] = &["SKILL.md", "skill.md", "Skill.md"];

/// Metadata extracted from a manifest's frontmatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillDescriptor {
    pub name: String,
    pub description: String,
    pub license: Option<String>,
}

/// Frontmatter fields we read. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
struct Frontmatter {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    license: Option<String>,
}

/// Find the manifest file in a directory, trying the case variants in order.
pub fn find_manifest(dir: &Path) -> Option<PathBuf> {
    MANIFEST_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Parse manifest content into a descriptor.
///
/// The frontmatter block must open the file, fenced by `---` lines. A missing
/// fence or unparseable YAML yields `None`; this is a recoverable per-file
/// condition, never fatal to a scan. A missing `name` falls back to the base
/// name of `skill_dir`.
pub fn parse_descriptor(content: &str, skill_dir: &Path) -> Option<SkillDescriptor> {
    let frontmatter = split_frontmatter(content)?;
    let parsed: Frontmatter = match serde_yaml::from_str(frontmatter) {
        Ok(f) => f,
        Err(e) => {
            tracing::debug!(dir = %skill_dir.display(), error = %e, "invalid manifest frontmatter");
            return None;
        },
    };

    let fallback_name = || {
        skill_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    };

    Some(SkillDescriptor {
        name: parsed
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(fallback_name),
        description: parsed.description.unwrap_or_default(),
        license: parsed.license,
    })
}

/// Extract the frontmatter between the opening `---` and the next `---` line.
/// Returns `None` when the file does not open with a fence or never closes it.
fn split_frontmatter(content: &str) -> Option<&str> {
    let trimmed = content.trim_start();
    let after_open = trimmed.strip_prefix("---")?;
    let close = after_open.find("\n---")?;
    Some(after_open[..close].trim())
}
