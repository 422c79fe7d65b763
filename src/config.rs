use serde::Deserialize;
use std::path::Path;
use crate::error::{Result, TallyError};
use crate::types::{OutputFormat, RankKey};

/// All settings that can be placed in a .git-tally.yml config file.
/// Every field is optional. Omitted fields fall back to CLI defaults.
/// CLI flags always take precedence over values set here.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TallyConfig {
    // What to analyze
    pub repository: Option<String>,
    pub revision: Option<String>,
    pub use_committer: Option<bool>,

    // Report
    pub order_by: Option<String>,
    pub format: Option<String>,
    pub output: Option<String>,

    // File selection
    pub extensions: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub restrict_to: Option<Vec<String>>,

    pub jobs: Option<usize>,
}

impl TallyConfig {
    /// Validates semantic constraints that serde cannot enforce.
    /// Called automatically by [`load_config`].
    pub fn validate(&self) -> Result<()> {
        if let Some(key) = &self.order_by {
            key.parse::<RankKey>()?;
        }
        if let Some(fmt) = &self.format {
            fmt.parse::<OutputFormat>()?;
        }
        if let Some(0) = self.jobs {
            return Err(TallyError::Config(
                "Invalid 'jobs' value: 0. Must be 1 or greater (omit it to use one thread per CPU)"
                    .to_string(),
            ));
        }
        if let Some(rev) = &self.revision {
            if rev.trim().is_empty() {
                return Err(TallyError::Config("Invalid 'revision' value: empty string".to_string()));
            }
        }
        Ok(())
    }
}

/// Reads, parses, and validates a YAML config file from `path`.
pub fn load_config(path: &Path) -> Result<TallyConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        TallyError::Config(format!("Cannot read config file '{}': {e}", path.display()))
    })?;
    let cfg: TallyConfig = serde_yaml::from_str(&content).map_err(|e| {
        TallyError::Config(format!("Invalid config file '{}': {e}", path.display()))
    })?;
    cfg.validate()
        .map_err(|e| TallyError::Config(format!("Config file '{}': {e}", path.display())))?;
    Ok(cfg)
}

/// Annotated YAML template printed by `--generate-config`.
pub static TEMPLATE: &str = r#"# git-tally configuration file
# Generated by: git-tally --generate-config
#
# All settings are optional. Omit any field to use the built-in default.
# CLI flags always take precedence over values in this file.
#
#   git-tally --config .git-tally.yml

# ── What to analyze ────────────────────────────────────────────────────────────

# Path to the repository.
# repository: "."

# Revision whose tree is blamed (branch, tag or commit hash).
# revision: "HEAD"

# Credit lines to the committer instead of the author.
# use_committer: false

# ── Report ─────────────────────────────────────────────────────────────────────

# Primary sort key: lines, commits, files
# order_by: "lines"

# Output format: tabular, csv, json, json-lines
# format: "tabular"

# Write the report to this file instead of stdout.
# output: "contributors.csv"

# ── File selection ─────────────────────────────────────────────────────────────

# Only count files with these extensions (with or without the leading dot).
# extensions:
#   - ".go"
#   - ".rs"

# Only count files written in these languages (case-insensitive).
# languages:
#   - "python"
#   - "typescript"

# Glob patterns of files to skip. Patterns match the whole repository-relative
# path; `*` does not cross `/`.
# exclude:
#   - "vendor/*"
#   - "*.lock"

# When present, only files matching at least one of these globs are counted.
# restrict_to:
#   - "src/*"

# ── Performance ────────────────────────────────────────────────────────────────

# Number of files blamed in parallel. Defaults to one per CPU.
# jobs: 4
"#;

/// Prints the config template to stdout, or writes it to `output_path` if given.
pub fn print_template(output_path: Option<&Path>) -> Result<()> {
    match output_path {
        Some(path) => std::fs::write(path, TEMPLATE).map_err(|e| {
            TallyError::Config(format!(
                "Cannot write config template to '{}': {e}",
                path.display()
            ))
        }),
        None => {
            print!("{TEMPLATE}");
            Ok(())
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_template_is_valid_yaml() {
        let result: std::result::Result<TallyConfig, _> = serde_yaml::from_str(TEMPLATE);
        assert!(
            result.is_ok(),
            "TEMPLATE must parse as valid TallyConfig: {:?}",
            result.err()
        );
        let cfg = result.unwrap();
        // Everything is commented out in the template
        assert!(cfg.repository.is_none());
        assert!(cfg.order_by.is_none());
        assert!(cfg.exclude.is_none());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let cfg: TallyConfig = serde_yaml::from_str("{}").expect("empty map should parse");
        assert!(cfg.validate().is_ok());
        assert!(cfg.revision.is_none());
        assert!(cfg.jobs.is_none());
    }

    #[test]
    fn test_lists_parsed() {
        let yaml = "extensions:\n  - .go\nexclude:\n  - \"vendor/*\"\nrestrict_to:\n  - \"src/*\"\n";
        let cfg: TallyConfig = serde_yaml::from_str(yaml).expect("should parse");
        assert_eq!(cfg.extensions, Some(vec![".go".to_string()]));
        assert_eq!(cfg.exclude, Some(vec!["vendor/*".to_string()]));
        assert_eq!(cfg.restrict_to, Some(vec!["src/*".to_string()]));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: std::result::Result<TallyConfig, _> = serde_yaml::from_str("order: lines\n");
        assert!(result.is_err(), "Unknown fields should be rejected by deny_unknown_fields");
    }

    #[test]
    fn test_validate_invalid_order_by_rejected() {
        let cfg: TallyConfig = serde_yaml::from_str("order_by: authors\n").unwrap();
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, TallyError::UnsupportedRankingKey(_)), "got {err:?}");
    }

    #[test]
    fn test_validate_invalid_format_rejected() {
        let cfg: TallyConfig = serde_yaml::from_str("format: html\n").unwrap();
        let msg = cfg.validate().unwrap_err().to_string();
        assert!(
            msg.contains("tabular") && msg.contains("csv") && msg.contains("json-lines"),
            "Error should list all valid values: {msg}"
        );
    }

    #[test]
    fn test_validate_zero_jobs_rejected() {
        let cfg: TallyConfig = serde_yaml::from_str("jobs: 0\n").unwrap();
        let msg = cfg.validate().unwrap_err().to_string();
        assert!(msg.contains("jobs"), "Error should mention 'jobs': {msg}");
    }

    #[test]
    fn test_validate_blank_revision_rejected() {
        let cfg: TallyConfig = serde_yaml::from_str("revision: \"  \"\n").unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_load_config_reports_path_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yml");
        std::fs::write(&path, "order_by: size\n").unwrap();
        let msg = load_config(&path).unwrap_err().to_string();
        assert!(msg.contains("bad.yml"), "Error should name the file: {msg}");
        assert!(msg.contains("size"), "Error should quote the bad value: {msg}");
    }

    #[test]
    fn test_print_template_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.yml");
        print_template(Some(&path)).unwrap();
        let cfg = load_config(&path).expect("written template should load");
        assert!(cfg.format.is_none());
    }

    #[test]
    fn test_load_example_file() {
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let example_path = manifest_dir.join(".git-tally.example.yml");

        let cfg = load_config(&example_path).unwrap_or_else(|e| {
            panic!("Example config file should parse and validate successfully: {e}")
        });

        assert_eq!(cfg.revision.as_deref(), Some("HEAD"));
        assert_eq!(cfg.order_by.as_deref(), Some("commits"));
        assert_eq!(cfg.format.as_deref(), Some("tabular"));
        assert_eq!(cfg.use_committer, Some(false));
        assert_eq!(cfg.jobs, Some(4));

        let langs = cfg.languages.as_ref().expect("languages should be set in example file");
        assert!(langs.contains(&"rust".to_string()));
        assert!(langs.contains(&"go".to_string()));

        let exclude = cfg.exclude.as_ref().expect("exclude should be set in example file");
        assert!(exclude.contains(&"vendor/*".to_string()));
        assert!(cfg.restrict_to.is_none(), "restrict_to is left unset in the example");
    }
}
