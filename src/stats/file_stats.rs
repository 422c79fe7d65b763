use crate::error::{Result, TallyError};
use crate::types::{FileContribution, ParsedBlame};

/// Joins commit line counts with commit identities into per-author shares.
///
/// Every counted commit must have an identity; a gap means the stream never
/// carried metadata for that commit, and is reported rather than guessed.
pub fn build_file_contribution(path: &str, parsed: &ParsedBlame) -> Result<FileContribution> {
    let mut contribution = FileContribution::new();

    for (commit, &lines) in &parsed.line_counts {
        let author = parsed.authors.get(commit).ok_or_else(|| {
            TallyError::AttributionInconsistency {
                path: path.to_string(),
                commit: commit.clone(),
            }
        })?;
        let share = contribution.entry(author.clone()).or_default();
        share.lines += lines;
        share.commits.insert(commit.clone());
    }

    Ok(contribution)
}
