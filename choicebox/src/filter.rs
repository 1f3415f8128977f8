//! Candidate filtering for dropdown lists.
//!
//! The default mode is a case-insensitive substring match over the label and
//! description, preserving source order. A fuzzy mode backed by
//! nucleo-matcher is available for larger option sets; fuzzy results are
//! sorted by score.

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

use crate::choice::Choice;

/// How a dropdown filters its candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    /// Case-insensitive substring match, source order preserved (default).
    #[default]
    Substring,
    /// Fuzzy match, best score first.
    Fuzzy,
}

/// Result of a filter operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterMatch {
    /// Index of the matched item in the original list.
    pub index: usize,
    /// Match score (higher is better; 0 for substring matches).
    pub score: u32,
}

/// Filter choices with the given mode.
///
/// Empty queries return every choice in original order regardless of mode.
/// Nothing matching yields an empty vec, never an error.
pub fn filter_choices<M>(query: &str, choices: &[Choice<M>], mode: FilterMode) -> Vec<FilterMatch> {
    if query.is_empty() {
        return choices
            .iter()
            .enumerate()
            .map(|(index, _)| FilterMatch { index, score: 0 })
            .collect();
    }

    match mode {
        FilterMode::Substring => substring_filter(query, choices),
        FilterMode::Fuzzy => fuzzy_filter(query, choices),
    }
}

/// Case-insensitive substring filter over label and description.
pub fn substring_filter<M>(query: &str, choices: &[Choice<M>]) -> Vec<FilterMatch> {
    let needle = query.to_lowercase();
    choices
        .iter()
        .enumerate()
        .filter(|(_, choice)| {
            choice.label.to_lowercase().contains(&needle)
                || choice
                    .description
                    .as_ref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .map(|(index, _)| FilterMatch { index, score: 0 })
        .collect()
}

/// Fuzzy filter using nucleo-matcher, sorted by score descending.
pub fn fuzzy_filter<M>(query: &str, choices: &[Choice<M>]) -> Vec<FilterMatch> {
    let mut matcher = Matcher::new(Config::DEFAULT);
    let pattern = Pattern::new(
        query,
        CaseMatching::Ignore,
        Normalization::Smart,
        AtomKind::Fuzzy,
    );

    let mut matches: Vec<FilterMatch> = choices
        .iter()
        .enumerate()
        .filter_map(|(index, choice)| {
            let mut buf = Vec::new();
            let haystack = Utf32Str::new(&choice.label, &mut buf);
            pattern
                .score(haystack, &mut matcher)
                .map(|score| FilterMatch { index, score })
        })
        .collect();

    matches.sort_by(|a, b| b.score.cmp(&a.score));

    matches
}
