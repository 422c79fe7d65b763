use std::cmp::Ordering;
use crate::types::{AuthorStats, RankKey};

/// Sorts descending by `key`, then by the remaining counters in the order
/// lines > commits > files, then by name ascending.
pub fn rank(stats: &mut [AuthorStats], key: RankKey) {
    stats.sort_by(|a, b| compare(a, b, key));
}

fn lines(s: &AuthorStats) -> usize { s.lines }
fn commits(s: &AuthorStats) -> usize { s.commits }
fn files(s: &AuthorStats) -> usize { s.files }

fn compare(a: &AuthorStats, b: &AuthorStats, key: RankKey) -> Ordering {
    let order: [fn(&AuthorStats) -> usize; 3] = match key {
        RankKey::Lines   => [lines, commits, files],
        RankKey::Commits => [commits, lines, files],
        RankKey::Files   => [files, lines, commits],
    };

    order
        .iter()
        .map(|field| field(b).cmp(&field(a)))
        .find(|o| o.is_ne())
        .unwrap_or_else(|| a.name.cmp(&b.name))
}
