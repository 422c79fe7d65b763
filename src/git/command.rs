use std::path::{Path, PathBuf};
use std::process::Command;
use crate::error::{Result, TallyError};
use crate::git::{BlameSource, LastTouch};
use crate::types::AttributionMode;

/// Runs the `git` binary against one repository at one revision.
///
/// Repository, revision and attribution mode are fixed for the whole run and
/// carried here instead of in globals.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo: PathBuf,
    revision: String,
    mode: AttributionMode,
}

impl GitCli {
    pub fn new(repo: impl Into<PathBuf>, revision: impl Into<String>, mode: AttributionMode) -> Self {
        GitCli {
            repo: repo.into(),
            revision: revision.into(),
            mode,
        }
    }

    pub fn repo(&self) -> &Path {
        &self.repo
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }

    /// Every tracked file at the revision, in `git ls-tree` order.
    ///
    /// Submodules and other non-blob entries are left out, since there is
    /// nothing to blame in them.
    pub fn list_files(&self) -> Result<Vec<String>> {
        let out = self.run(&["ls-tree", "-r", "-z", &self.revision])?;
        parse_tree_listing(&out)
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let command = format!("git {}", args.join(" "));

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo)
            .output()
            .map_err(|e| TallyError::StreamUnavailable {
                command: command.clone(),
                detail: format!("failed to run git: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TallyError::StreamUnavailable {
                command,
                detail: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl BlameSource for GitCli {
    fn blame(&self, path: &str) -> Result<String> {
        self.run(&["blame", "--porcelain", &self.revision, "--", path])
    }

    fn last_touch(&self, path: &str) -> Result<Option<LastTouch>> {
        let format = format!("--format={}%n%H", self.mode.log_placeholder());
        let out = self.run(&["log", "-1", &format, &self.revision, "--", path])?;
        parse_last_touch(path, &out)
    }
}

/// Parses NUL-separated `<mode> <type> <object>\t<path>` records.
/// Paths are raw with `-z`, so non-ASCII names arrive unquoted.
fn parse_tree_listing(output: &str) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for (idx, record) in output.split('\0').enumerate() {
        if record.is_empty() {
            continue;
        }
        let (meta, path) = record.split_once('\t').ok_or_else(|| {
            TallyError::malformed("<ls-tree>", idx + 1, format!("no tab in entry {record:?}"))
        })?;
        if meta.split(' ').nth(1) == Some("blob") && !path.is_empty() {
            files.push(path.to_string());
        }
    }
    Ok(files)
}

/// Parses `<identity>\n<hash>` as printed by `git log -1`.
fn parse_last_touch(path: &str, output: &str) -> Result<Option<LastTouch>> {
    if output.trim().is_empty() {
        return Ok(None);
    }
    let mut lines = output.lines();
    let identity = lines.next().unwrap_or_default();
    let commit = lines.next().map(str::trim).unwrap_or_default();
    if commit.is_empty() {
        return Err(TallyError::malformed(path, 2, "git log did not print a commit hash"));
    }
    Ok(Some(LastTouch {
        commit: commit.to_string(),
        identity: identity.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_listing_keeps_blobs_only() {
        let out = concat!(
            "100644 blob 1111111111111111111111111111111111111111\tsrc/main.rs\0",
            "160000 commit 2222222222222222222222222222222222222222\tvendor/sub\0",
            "100755 blob 3333333333333333333333333333333333333333\tscripts/run me.sh\0",
            "120000 blob 4444444444444444444444444444444444444444\tlink\0",
        );
        let files = parse_tree_listing(out).unwrap();
        assert_eq!(files, vec!["src/main.rs", "scripts/run me.sh", "link"]);
    }

    #[test]
    fn test_tree_listing_paths_are_not_quoted() {
        let out = "100644 blob 1111111111111111111111111111111111111111\tdocs/café.txt\0";
        assert_eq!(parse_tree_listing(out).unwrap(), vec!["docs/café.txt"]);
    }

    #[test]
    fn test_tree_listing_empty_and_malformed() {
        assert!(parse_tree_listing("").unwrap().is_empty());
        let err = parse_tree_listing("100644 blob abc no-tab\0").unwrap_err();
        assert!(matches!(err, TallyError::MalformedStream { .. }), "got {err:?}");
    }

    #[test]
    fn test_parse_last_touch() {
        let out = "Carol Doe\n3f2a9c1d0b8e7f6a5c4d3e2f1a0b9c8d7e6f5a4b\n";
        let touch = parse_last_touch("empty.txt", out).unwrap().expect("should find a commit");
        assert_eq!(touch.identity, "Carol Doe");
        assert_eq!(touch.commit, "3f2a9c1d0b8e7f6a5c4d3e2f1a0b9c8d7e6f5a4b");
    }

    #[test]
    fn test_parse_last_touch_empty_output_is_none() {
        assert_eq!(parse_last_touch("x", "").unwrap(), None);
        assert_eq!(parse_last_touch("x", "\n").unwrap(), None);
    }

    #[test]
    fn test_parse_last_touch_missing_hash_is_malformed() {
        let err = parse_last_touch("x", "Carol Doe\n").unwrap_err();
        assert!(matches!(err, TallyError::MalformedStream { .. }), "got {err:?}");
    }

    #[test]
    fn test_missing_repo_reports_stream_unavailable() {
        let cli = GitCli::new("/definitely/not/a/repo", "HEAD", AttributionMode::Author);
        let err = cli.list_files().unwrap_err();
        assert!(
            matches!(err, TallyError::StreamUnavailable { ref command, .. } if command.starts_with("git ls-tree")),
            "got {err:?}"
        );
    }
}
