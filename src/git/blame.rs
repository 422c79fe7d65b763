//! Parsing of `git blame --porcelain` output into commit-keyed maps.
//!
//! ```text
//! <hash> <orig-line> <final-line> <num-lines>   opens a hunk of <num-lines>
//! author <name>                                 metadata, first occurrence of a commit only
//! committer <name>
//! filename <path>
//! \t<content>
//! <hash> <orig-line> <final-line>               next line of the same hunk
//! \t<content>
//! ```
//!
//! Line counts are keyed by commit, and identities are keyed by commit, so
//! a hunk whose commit already appeared earlier (and therefore carries no
//! metadata) is still credited correctly once the two maps are joined.

use crate::error::{Result, TallyError};
use crate::git::BlameSource;
use crate::types::{AttributionMode, ParsedBlame};

/// Fetches and parses the blame stream for `path`.
///
/// An empty file produces an empty stream; it is credited to the last commit
/// that touched it, with zero lines.
pub fn read_file<S: BlameSource + ?Sized>(
    source: &S,
    path: &str,
    mode: AttributionMode,
) -> Result<ParsedBlame> {
    let stream = source.blame(path)?;
    if !stream.trim().is_empty() {
        return parse_porcelain(path, &stream, mode);
    }

    let touch = source.last_touch(path)?.ok_or_else(|| {
        TallyError::malformed(path, 0, "empty blame output and no commit in history")
    })?;

    let mut parsed = ParsedBlame::default();
    parsed.line_counts.insert(touch.commit.clone(), 0);
    parsed.authors.insert(touch.commit, touch.identity);
    Ok(parsed)
}

/// Parses one file's porcelain stream.
pub fn parse_porcelain(path: &str, stream: &str, mode: AttributionMode) -> Result<ParsedBlame> {
    let tag = mode.porcelain_tag();
    let mut parsed = ParsedBlame::default();

    let mut remaining: usize = 0;
    let mut current = String::new();
    let mut capture = false;

    for (idx, line) in stream.lines().enumerate() {
        let lineno = idx + 1;

        if line.is_empty() {
            continue;
        }

        if remaining == 0 {
            let (commit, count) = parse_hunk_header(path, lineno, line)?;
            *parsed.line_counts.entry(commit.to_string()).or_insert(0) += count;
            remaining = count;
            current = commit.to_string();
            capture = true;
        } else if line.starts_with('\t') {
            remaining -= 1;
        } else if capture {
            if let Some(identity) = metadata_value(line, tag) {
                parsed
                    .authors
                    .entry(current.clone())
                    .or_insert_with(|| identity.to_string());
                capture = false;
            }
        }
    }

    if remaining > 0 {
        let total = stream.lines().count();
        return Err(TallyError::malformed(
            path,
            total,
            format!("stream ended with {remaining} line(s) of commit {current} unread"),
        ));
    }

    Ok(parsed)
}

/// `<hash> <orig-line> <final-line> <num-lines>` → (hash, num-lines)
fn parse_hunk_header<'a>(path: &str, lineno: usize, line: &'a str) -> Result<(&'a str, usize)> {
    let fields: Vec<&str> = line.split_whitespace().collect();

    let commit = fields.first().copied().unwrap_or_default();
    if !is_commit_id(commit) {
        return Err(TallyError::malformed(
            path,
            lineno,
            format!("expected a hunk header starting with a commit hash, got {line:?}"),
        ));
    }
    if fields.len() != 4 {
        return Err(TallyError::malformed(
            path,
            lineno,
            format!("hunk header has {} field(s), expected 4", fields.len()),
        ));
    }

    let count: usize = fields[3].parse().map_err(|_| {
        TallyError::malformed(path, lineno, format!("invalid line count {:?}", fields[3]))
    })?;
    if count == 0 {
        return Err(TallyError::malformed(path, lineno, "hunk declares zero lines"));
    }

    Ok((commit, count))
}

fn is_commit_id(s: &str) -> bool {
    (s.len() == 40 || s.len() == 64) && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Value of a `<tag> <value>` metadata line when the tag matches exactly.
/// `author-mail` does not match `author`.
fn metadata_value<'a>(line: &'a str, tag: &str) -> Option<&'a str> {
    match line.split_once(' ') {
        Some((t, value)) if t == tag => Some(value),
        None if line == tag => Some(""),
        _ => None,
    }
}
