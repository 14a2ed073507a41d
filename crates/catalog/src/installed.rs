use std::path::Path;

use {
    anyhow::{bail, Context},
    tokio::process::Command,
    tracing::{info, warn},
};

/// How a skill is placed into the installed directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMethod {
    /// Recursive copy from the library working copy.
    Copy,
    /// Delegate to the external `npx skills` CLI.
    Cli,
}

impl InstallMethod {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "copy" => Ok(Self::Copy),
            "cli" => Ok(Self::Cli),
            other => bail!("unknown install method '{other}' (expected 'copy' or 'cli')"),
        }
    }
}

/// Names of installed skills: the child entries of the installed directory.
/// A missing directory means nothing is installed. Membership by *name* is
/// all the reconciliation layer gets; it never inspects contents.
pub fn installed_names(installed_dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(installed_dir) else {
        return Vec::new();
    };
    entries
        .flatten()
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect()
}

/// Install a skill into the installed directory.
///
/// `skill_path` and `skills_path` mirror the index record: the skill's
/// directory name within the working copy and the repo's layout convention.
pub async fn install_skill(
    owner: &str,
    repo: &str,
    skill_name: &str,
    skill_path: &str,
    skills_path: &str,
    method: InstallMethod,
    repos_root: &Path,
    installed_dir: &Path,
) -> anyhow::Result<String> {
    match method {
        InstallMethod::Copy => {
            let repo_path = repos_root.join(owner).join(repo);
            let source = if skills_path == "." {
                if skill_path == "." {
                    repo_path
                } else {
                    repo_path.join(skill_path)
                }
            } else {
                repo_path.join(skills_path).join(skill_path)
            };
            let dest = installed_dir.join(skill_name);

            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)
                    .context("failed to create installed-skills directory")?;
            }
            copy_dir_recursive(&source, &dest)
                .with_context(|| format!("failed to copy skill from {}", source.display()))?;

            info!(skill = %skill_name, dest = %dest.display(), "installed via copy");
            Ok(format!("Skill '{skill_name}' installed via direct copy"))
        },
        InstallMethod::Cli => {
            let output = Command::new("npx")
                .args([
                    "skills",
                    "add",
                    &format!("{owner}/{repo}"),
                    &format!("--skill={skill_name}"),
                ])
                .output()
                .await
                .context("failed to run npx skills")?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                bail!("skills CLI install failed: {}", stderr.trim());
            }
            info!(skill = %skill_name, "installed via skills CLI");
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        },
    }
}

/// Remove an installed skill. Absent entries are fine; a partially removed
/// entry must not linger, so symlinks, files, and directories are all handled.
pub async fn uninstall_skill(skill_name: &str, installed_dir: &Path) -> anyhow::Result<()> {
    let path = installed_dir.join(skill_name);
    if !path.exists() && !path.is_symlink() {
        warn!(skill = %skill_name, "uninstall of a skill that is not installed");
        return Ok(());
    }

    if path.is_symlink() {
        tokio::fs::remove_file(&path)
            .await
            .context("failed to remove symlink")?;
    } else if path.is_dir() {
        tokio::fs::remove_dir_all(&path)
            .await
            .context("failed to remove skill directory")?;
    } else {
        tokio::fs::remove_file(&path)
            .await
            .context("failed to remove skill file")?;
    }
    info!(skill = %skill_name, "uninstalled");
    Ok(())
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    if !src.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("source path does not exist: {}", src.display()),
        ));
    }

    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        // Root-convention installs copy the working copy itself; the clone
        // metadata stays behind.
        if entry.file_name() == ".git" {
            continue;
        }
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn seed_repo(repos_root: &Path) {
        let skill_dir = repos_root.join("alice/tools/skills/fmt");
        std::fs::create_dir_all(skill_dir.join("assets")).unwrap();
        std::fs::write(skill_dir.join("SKILL.md"), "---\nname: fmt\n---\n").unwrap();
        std::fs::write(skill_dir.join("assets/help.txt"), "help").unwrap();
    }

    #[tokio::test]
    async fn copy_install_then_uninstall() {
        let tmp = tempfile::tempdir().unwrap();
        let repos_root = tmp.path().join("repos");
        let installed = tmp.path().join("installed");
        seed_repo(&repos_root);

        install_skill(
            "alice",
            "tools",
            "fmt",
            "fmt",
            "skills",
            InstallMethod::Copy,
            &repos_root,
            &installed,
        )
        .await
        .unwrap();

        assert!(installed.join("fmt/SKILL.md").is_file());
        assert!(installed.join("fmt/assets/help.txt").is_file());
        assert_eq!(installed_names(&installed), vec!["fmt"]);

        uninstall_skill("fmt", &installed).await.unwrap();
        assert!(installed_names(&installed).is_empty());
    }

    #[tokio::test]
    async fn root_convention_install_copies_repo_root() {
        let tmp = tempfile::tempdir().unwrap();
        let repos_root = tmp.path().join("repos");
        let installed = tmp.path().join("installed");
        let repo = repos_root.join("bob/single-skill");
        std::fs::create_dir_all(repo.join(".git/objects")).unwrap();
        std::fs::write(repo.join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();
        std::fs::write(repo.join("SKILL.md"), "---\nname: solo\n---\n").unwrap();

        install_skill(
            "bob",
            "single-skill",
            "solo",
            ".",
            ".",
            InstallMethod::Copy,
            &repos_root,
            &installed,
        )
        .await
        .unwrap();
        assert!(installed.join("solo/SKILL.md").is_file());
        assert!(!installed.join("solo/.git").exists());
    }

    #[tokio::test]
    async fn copy_install_missing_source_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let result = install_skill(
            "ghost",
            "none",
            "x",
            "x",
            "skills",
            InstallMethod::Copy,
            &tmp.path().join("repos"),
            &tmp.path().join("installed"),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn uninstall_missing_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        uninstall_skill("nothing", tmp.path()).await.unwrap();
    }

    #[test]
    fn installed_names_missing_dir_is_empty() {
        assert!(installed_names(Path::new("/nonexistent/installed")).is_empty());
    }

    #[test]
    fn install_method_parse() {
        assert_eq!(InstallMethod::parse("copy").unwrap(), InstallMethod::Copy);
        assert_eq!(InstallMethod::parse("cli").unwrap(), InstallMethod::Cli);
        assert!(InstallMethod::parse("npx").is_err());
    }
}
