// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Lesezeichen.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Patterns applied when the caller supplies none.
pub const DEFAULT_PATTERNS: [&str; 2] = [".pdf", "outline placeholder"];

/// Unique identifier for a filtering job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Case-insensitive substring patterns deciding which bookmarks are removed.
///
/// Patterns are stored lower-cased and trimmed. Empty patterns are dropped on
/// construction, so an empty label can never match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct FilterSpec {
    patterns: Vec<String>,
}

impl FilterSpec {
    /// Build a spec from raw patterns, normalising and de-duplicating them
    /// while keeping first-seen order.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalised: Vec<String> = Vec::new();
        for pattern in patterns {
            let lowered = pattern.as_ref().trim().to_lowercase();
            if lowered.is_empty() || normalised.contains(&lowered) {
                continue;
            }
            normalised.push(lowered);
        }
        Self {
            patterns: normalised,
        }
    }

    /// Parse the comma-separated form, e.g. `".pdf, outline placeholder"`.
    pub fn parse_list(input: &str) -> Self {
        Self::new(input.split(','))
    }

    /// True if the lower-cased label contains any pattern.
    pub fn matches(&self, label: &str) -> bool {
        if label.is_empty() || self.patterns.is_empty() {
            return false;
        }
        let lowered = label.to_lowercase();
        self.patterns.iter().any(|p| lowered.contains(p.as_str()))
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERNS)
    }
}

impl From<Vec<String>> for FilterSpec {
    fn from(patterns: Vec<String>) -> Self {
        Self::new(patterns)
    }
}

impl From<FilterSpec> for Vec<String> {
    fn from(spec: FilterSpec) -> Self {
        spec.patterns
    }
}

impl std::fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.patterns.join(", "))
    }
}

/// What a single filtering pass did to an outline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterReport {
    /// Descendants of the root that were tested against the spec.
    pub visited: usize,
    /// Matched bookmarks removed from the tree.
    pub removed: usize,
    /// Children re-parented onto the parent of a removed bookmark.
    pub promoted: usize,
    /// Children the host reported as unreachable and treated as already gone.
    pub skipped: usize,
}

impl FilterReport {
    /// Result of filtering an absent outline: nothing visited, nothing changed.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_noop(&self) -> bool {
        self.removed == 0 && self.promoted == 0
    }

    pub fn surviving(&self) -> usize {
        self.visited - self.removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_is_case_insensitive() {
        let spec = FilterSpec::new([".PDF"]);
        assert!(spec.matches("Chapter.pdf"));
        assert!(spec.matches("CHAPTER.PDF"));
        assert!(!spec.matches("Chapter"));
    }

    #[test]
    fn empty_label_never_matches() {
        assert!(!FilterSpec::default().matches(""));
    }

    #[test]
    fn empty_patterns_are_dropped() {
        let spec = FilterSpec::parse_list(" , .pdf,, ");
        assert_eq!(spec.patterns(), &[".pdf".to_string()]);
        assert!(!spec.matches("Intro"));
    }

    #[test]
    fn parse_list_trims_and_dedups() {
        let spec = FilterSpec::parse_list(".pdf, Outline Placeholder, .PDF");
        assert_eq!(
            spec.patterns(),
            &[".pdf".to_string(), "outline placeholder".to_string()]
        );
    }

    #[test]
    fn default_spec_uses_service_patterns() {
        let spec = FilterSpec::default();
        assert!(spec.matches("Outline placeholder"));
        assert!(spec.matches("appendix.pdf"));
        assert!(!spec.matches("Introduction"));
    }

    #[test]
    fn empty_spec_matches_nothing() {
        let spec = FilterSpec::new(Vec::<String>::new());
        assert!(spec.is_empty());
        assert!(!spec.matches("anything"));
    }

    #[test]
    fn spec_deserializes_normalised() {
        let spec: FilterSpec = serde_json::from_str(r#"["  .PDF ", ""]"#).unwrap();
        assert_eq!(spec, FilterSpec::new([".pdf"]));
        assert_eq!(serde_json::to_string(&spec).unwrap(), r#"[".pdf"]"#);
    }

    #[test]
    fn report_surviving_accounts_for_removals() {
        let report = FilterReport {
            visited: 7,
            removed: 3,
            promoted: 2,
            skipped: 0,
        };
        assert_eq!(report.surviving(), 4);
        assert!(!report.is_noop());
        assert!(FilterReport::empty().is_noop());
    }
}
