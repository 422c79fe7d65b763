use std::collections::{HashMap, HashSet};
use crate::types::{AuthorStats, CommitId, FileContribution};

#[derive(Debug, Default)]
struct AuthorTotals {
    lines: usize,
    commits: HashSet<CommitId>,
    files: usize,
}

/// Folds per-file contributions into repository-wide author totals.
///
/// The result does not depend on the order files are added in.
#[derive(Debug, Default)]
pub struct RepositoryAggregator {
    totals: HashMap<String, AuthorTotals>,
}

impl RepositoryAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, contribution: FileContribution) {
        for (author, share) in contribution {
            let totals = self.totals.entry(author).or_default();
            totals.lines += share.lines;
            totals.commits.extend(share.commits);
            totals.files += 1;
        }
    }

    /// Unordered per-author records; pass them through `rank` for output.
    pub fn finish(self) -> Vec<AuthorStats> {
        self.totals
            .into_iter()
            .map(|(name, t)| AuthorStats {
                name,
                lines: t.lines,
                commits: t.commits.len(),
                files: t.files,
            })
            .collect()
    }
}

/// Convenience fold over a sequence of file contributions.
pub fn aggregate<I>(contributions: I) -> Vec<AuthorStats>
where
    I: IntoIterator<Item = FileContribution>,
{
    let mut agg = RepositoryAggregator::new();
    for c in contributions {
        agg.add_file(c);
    }
    agg.finish()
}
