//! Reduction of the engine's textual output into a typed mapping.
//!
//! Parsing is two-phase. First the output frame is discarded by position:
//! the engine brackets its data lines with exactly one metadata line at
//! the top and one summary line at the bottom, a structural (not
//! content-based) assumption pinned by the constants below and their
//! tests. Second, the remaining lines are matched against the fixed
//! print pattern; lines that do not match are ignored, because the engine
//! may interleave warnings with data, while a matching line with an
//! unparseable value fails the whole reduction: that shape signals an
//! output-format mismatch, which must never read as "metric absent".

use crate::error::{QueryError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Parsed results keyed by output token (step name minus its `ds`
/// prefix), e.g. `out_avg_smooth_diff`.
pub type ResultMapping = BTreeMap<String, f64>;

/// Number of engine metadata lines preceding the data lines.
pub const LEADING_NON_DATA_LINES: usize = 1;

/// Number of engine summary lines following the data lines.
pub const TRAILING_NON_DATA_LINES: usize = 1;

/// Matches one output line of the fixed print format
/// `curr_ds<token> = <value>`, tolerating the padding `%6.2lf` adds.
static RESULT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^curr_ds(\S+)\s*=\s*(\S+)\s*$").unwrap_or_else(|_| unreachable!())
});

/// Drops the positional frame (header and trailer lines) around the data
/// lines. Output too short to contain any data reduces to nothing.
#[must_use]
pub fn discard_frame<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    if lines.len() <= LEADING_NON_DATA_LINES + TRAILING_NON_DATA_LINES {
        return Vec::new();
    }
    lines[LEADING_NON_DATA_LINES..lines.len() - TRAILING_NON_DATA_LINES].to_vec()
}

/// Reduces already-unframed lines into a [`ResultMapping`].
pub fn reduce_lines<'a, I>(lines: I) -> Result<ResultMapping>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut mapping = ResultMapping::new();
    for line in lines {
        let Some(caps) = RESULT_LINE.captures(line) else {
            tracing::trace!(line, "skipping non-data line");
            continue;
        };
        // Both groups are non-optional in the pattern.
        let token = caps.get(1).map_or("", |m| m.as_str());
        let value = caps.get(2).map_or("", |m| m.as_str());
        let parsed: f64 = value
            .parse()
            .map_err(|_| QueryError::MalformedNumber {
                token: token.to_string(),
                value: value.to_string(),
            })?;
        mapping.insert(token.to_string(), parsed);
    }
    Ok(mapping)
}

/// Reduces raw engine stdout: splits into lines, discards the positional
/// frame, then applies the line pattern.
pub fn reduce_output(stdout: &str) -> Result<ResultMapping> {
    let lines: Vec<&str> = stdout.lines().collect();
    reduce_lines(discard_frame(&lines))
}
