// SPDX-License-Identifier: PMPL-1.0-or-later

//! Placeholder marker scanning
//!
//! Qt strings carry two marker kinds: `%n` (the plural count, optionally
//! `%Ln` for locale-formatted output) and positional `%1`..`%99` arguments.
//! Validation compares marker cardinality between source and translation;
//! order is allowed to differ because locale grammar reorders arguments.

use regex::Regex;
use std::collections::BTreeMap;

/// Markers found in one string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Placeholders {
    /// Occurrences of `%n` / `%Ln`.
    pub count_markers: usize,
    /// Occurrences per positional index (1-based).
    pub positional: BTreeMap<u8, usize>,
}

impl Placeholders {
    /// True when `self` and `other` reference the same markers the same
    /// number of times, in any order.
    pub fn same_cardinality(&self, other: &Placeholders) -> bool {
        self.count_markers == other.count_markers && self.positional == other.positional
    }

    /// Positional indices present here but absent (or less frequent) in
    /// `other`. Sorted, deduplicated by BTreeMap order.
    pub fn missing_from(&self, other: &Placeholders) -> Vec<u8> {
        self.positional
            .iter()
            .filter(|(idx, n)| other.positional.get(idx).copied().unwrap_or(0) < **n)
            .map(|(&idx, _)| idx)
            .collect()
    }
}

/// Reusable marker scanner. Compiles its regex once; create one per
/// validation pass rather than per message.
pub struct PlaceholderScanner {
    re: Regex,
}

impl PlaceholderScanner {
    pub fn new() -> Self {
        let re = Regex::new(r"%L?(n|[1-9][0-9]?)").expect("placeholder regex is valid");
        Self { re }
    }

    pub fn scan(&self, text: &str) -> Placeholders {
        let mut found = Placeholders::default();
        for capture in self.re.captures_iter(text) {
            let marker = &capture[1];
            if marker == "n" {
                found.count_markers += 1;
            } else if let Ok(idx) = marker.parse::<u8>() {
                *found.positional.entry(idx).or_insert(0) += 1;
            }
        }
        found
    }
}

impl Default for PlaceholderScanner {
    fn default() -> Self {
        Self::new()
    }
}
