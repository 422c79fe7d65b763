use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use crate::error::TallyError;

// ─── Blame Data ───────────────────────────────────────────────────────────────

/// Hex object name as printed by git (40 chars for SHA-1, 64 for SHA-256).
pub type CommitId = String;

/// commit → lines of the current file attributed to it
pub type CommitLineCounts = HashMap<CommitId, usize>;

/// commit → author (or committer) identity, recorded once per file
pub type CommitAuthor = HashMap<CommitId, String>;

/// The two commit-keyed maps produced from one file's blame stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedBlame {
    pub line_counts: CommitLineCounts,
    pub authors: CommitAuthor,
}

/// Whose name a line is credited to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttributionMode {
    #[default]
    Author,
    Committer,
}

impl AttributionMode {
    /// Porcelain tag carrying the identity for this mode.
    pub fn porcelain_tag(self) -> &'static str {
        match self {
            AttributionMode::Author    => "author",
            AttributionMode::Committer => "committer",
        }
    }

    /// `git log --format` placeholder for the identity name.
    pub fn log_placeholder(self) -> &'static str {
        match self {
            AttributionMode::Author    => "%an",
            AttributionMode::Committer => "%cn",
        }
    }
}

// ─── Per-file Output ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorShare {
    pub lines: usize,
    pub commits: HashSet<CommitId>,
}

/// author → share of one file
pub type FileContribution = HashMap<String, AuthorShare>;

// ─── Report ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorStats {
    pub name: String,
    pub lines: usize,
    pub commits: usize,
    pub files: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RankKey {
    #[default]
    Lines,
    Commits,
    Files,
}

impl FromStr for RankKey {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lines"   => Ok(RankKey::Lines),
            "commits" => Ok(RankKey::Commits),
            "files"   => Ok(RankKey::Files),
            other     => Err(TallyError::UnsupportedRankingKey(other.to_string())),
        }
    }
}

impl std::fmt::Display for RankKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankKey::Lines   => write!(f, "lines"),
            RankKey::Commits => write!(f, "commits"),
            RankKey::Files   => write!(f, "files"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Tabular,
    Csv,
    Json,
    JsonLines,
}

impl FromStr for OutputFormat {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tabular"    => Ok(OutputFormat::Tabular),
            "csv"        => Ok(OutputFormat::Csv),
            "json"       => Ok(OutputFormat::Json),
            "json-lines" => Ok(OutputFormat::JsonLines),
            other        => Err(TallyError::UnsupportedFormat(other.to_string())),
        }
    }
}
