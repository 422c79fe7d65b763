pub mod blame;
pub mod command;

pub use command::GitCli;

use crate::error::Result;
use crate::types::CommitId;

/// Most recent commit touching a path, with the identity for the active mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastTouch {
    pub commit: CommitId,
    pub identity: String,
}

/// Where per-file attribution data comes from.
///
/// Implementations must be shareable across the rayon worker pool.
pub trait BlameSource: Sync {
    /// Raw `git blame --porcelain` output for `path`. Empty for an empty file.
    fn blame(&self, path: &str) -> Result<String>;

    /// Newest commit touching `path` at or before the analyzed revision.
    fn last_touch(&self, path: &str) -> Result<Option<LastTouch>>;
}
