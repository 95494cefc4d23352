//! Artist-to-show matching.

use serde::Serialize;

use crate::artists::AliasTable;
use crate::shows::ShowRecord;

/// One (artist, show) pair. A show matching two artists yields two results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub artist: String,
    pub show: ShowRecord,
}

/// Find every show whose display name contains a surface form of a tracked
/// artist.
///
/// Iterates artists in table order and, for each, shows in input order, so
/// the output is grouped by artist. Matching is a plain substring test with no
/// word-boundary or case folding: a short alias that is also a common word
/// will match unrelated titles.
#[must_use]
pub fn match_shows(shows: &[ShowRecord], aliases: &AliasTable) -> Vec<MatchResult> {
    let mut results = Vec::new();

    for alias in aliases.entries() {
        for show in shows {
            let name = show.display_name();
            if name.is_empty() {
                continue;
            }
            if alias
                .surface_forms
                .iter()
                .any(|form| name.contains(form.as_str()))
            {
                results.push(MatchResult {
                    artist: alias.canonical_name.clone(),
                    show: show.clone(),
                });
            }
        }
    }

    results
}

#[cfg(test)]
#[path = "matcher_test.rs"]
mod tests;
