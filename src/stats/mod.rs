pub mod aggregate;
pub mod file_stats;
pub mod rank;

pub use file_stats::build_file_contribution;
pub use rank::rank;

use indicatif::ProgressBar;
use rayon::prelude::*;
use crate::error::Result;
use crate::git::{blame, BlameSource};
use crate::types::{AttributionMode, AuthorStats, FileContribution};

/// Blames every file on the current rayon pool and folds the results.
///
/// Per-file results are collected in `files` order before folding, so the
/// outcome does not depend on which worker finishes first. The first failing
/// file aborts the whole tally.
pub fn tally<S: BlameSource>(
    source: &S,
    files: &[String],
    mode: AttributionMode,
    progress: &ProgressBar,
) -> Result<Vec<AuthorStats>> {
    let contributions: Vec<FileContribution> = files
        .par_iter()
        .filter(|path| !path.is_empty())
        .map(|path| {
            let parsed = blame::read_file(source, path, mode)?;
            let contribution = build_file_contribution(path, &parsed)?;
            progress.inc(1);
            Ok(contribution)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(aggregate::aggregate(contributions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TallyError;
    use crate::git::LastTouch;
    use std::collections::HashMap;

    const C1: &str = "c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1";
    const C2: &str = "c2c2c2c2c2c2c2c2c2c2c2c2c2c2c2c2c2c2c2c2";
    const C3: &str = "c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3";

    struct Repo {
        streams: HashMap<&'static str, String>,
        touches: HashMap<&'static str, LastTouch>,
    }

    impl BlameSource for Repo {
        fn blame(&self, path: &str) -> Result<String> {
            self.streams.get(path).cloned().ok_or_else(|| TallyError::StreamUnavailable {
                command: format!("git blame -- {path}"),
                detail: "fatal: no such path".to_string(),
            })
        }

        fn last_touch(&self, path: &str) -> Result<Option<LastTouch>> {
            Ok(self.touches.get(path).cloned())
        }
    }

    fn header(commit: &str, n: usize) -> String {
        format!("{commit} 1 1 {n}\n")
    }

    fn content(n: usize) -> String {
        "\tcode\n".repeat(n)
    }

    /// main.go: alice 5 (c1), bob 3 (c2), alice 2 more (c1, no metadata)
    /// util.go: bob 4 (c2)
    /// empty.go: nothing, last touched by carol in c3
    fn repo() -> Repo {
        let main_go = [
            header(C1, 5), "author alice\ncommitter alice\n".to_string(), content(5),
            header(C2, 3), "author bob\ncommitter bob\n".to_string(), content(3),
            header(C1, 2), content(2),
        ]
        .concat();
        let util_go = [header(C2, 4), "author bob\n".to_string(), content(4)].concat();

        Repo {
            streams: HashMap::from([
                ("main.go", main_go),
                ("util.go", util_go),
                ("empty.go", String::new()),
            ]),
            touches: HashMap::from([(
                "empty.go",
                LastTouch { commit: C3.to_string(), identity: "carol".to_string() },
            )]),
        }
    }

    fn files(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tally_end_to_end() {
        let list = files(&["main.go", "", "util.go", "empty.go"]);
        let mut stats = tally(&repo(), &list, AttributionMode::Author, &ProgressBar::hidden()).unwrap();
        rank(&mut stats, crate::types::RankKey::Lines);

        // alice and bob tie on lines and commits; bob touched more files
        let expected = vec![
            AuthorStats { name: "bob".into(), lines: 7, commits: 1, files: 2 },
            AuthorStats { name: "alice".into(), lines: 7, commits: 1, files: 1 },
            AuthorStats { name: "carol".into(), lines: 0, commits: 1, files: 1 },
        ];
        assert_eq!(stats, expected);
    }

    #[test]
    fn test_tally_same_result_for_any_file_order() {
        let mut a = tally(&repo(), &files(&["main.go", "util.go", "empty.go"]), AttributionMode::Author, &ProgressBar::hidden()).unwrap();
        let mut b = tally(&repo(), &files(&["empty.go", "util.go", "main.go"]), AttributionMode::Author, &ProgressBar::hidden()).unwrap();
        rank(&mut a, crate::types::RankKey::Files);
        rank(&mut b, crate::types::RankKey::Files);
        assert_eq!(a, b);
    }

    #[test]
    fn test_tally_fails_on_unavailable_file() {
        let err = tally(&repo(), &files(&["main.go", "gone.go"]), AttributionMode::Author, &ProgressBar::hidden())
            .unwrap_err();
        assert!(matches!(err, TallyError::StreamUnavailable { .. }), "got {err:?}");
    }

    #[test]
    fn test_tally_advances_progress_per_file() {
        let pb = ProgressBar::hidden();
        tally(&repo(), &files(&["main.go", "util.go"]), AttributionMode::Author, &pb).unwrap();
        assert_eq!(pb.position(), 2);
    }
}
