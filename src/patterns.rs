//! Shared lexical pattern library.
//!
//! One source of truth for the cue regexes reused across field plugins:
//! action verbs, priority words, duration units, location prepositions,
//! temporal words, and the handle/tag/link token shapes. Patterns are
//! compiled case-insensitive into a name-keyed registry; a source that fails
//! to compile is skipped (the name is simply absent) and plugins treat a
//! missing pattern as "no match".

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::error::PatternError;

/// Verbs the action plugin accepts at the start of an entry.
pub const ACTION_VERBS: &[&str] = &[
    "call", "text", "meet", "email", "review", "read", "write", "send", "buy",
    "fix", "finish", "schedule", "plan", "prepare", "check", "visit", "book",
    "pay", "submit", "update",
];

/// Builtin pattern sources, compiled once into [`PatternLibrary::builtin`].
const BUILTIN_SOURCES: &[(&str, &str)] = &[
    (
        "action-verbs",
        r"^(call|text|meet|email|review|read|write|send|buy|fix|finish|schedule|plan|prepare|check|visit|book|pay|submit|update)\b",
    ),
    (
        "priority-words",
        r"\b(?:(high)\s+priority|(low)\s+priority|(urgent)(?:ly)?)\b",
    ),
    (
        "duration-units",
        r"\b(\d+)\s*(hours?|hrs?|h|minutes?|mins?|m)\b",
    ),
    ("location-prepositions", r"\b(at|in)\b"),
    (
        "temporal-words",
        r"\b(?:today|tonight|tomorrow|yesterday|this|next|last|week|weekend|month|quarter|year|monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b",
    ),
    ("handle", r"@([A-Za-z][A-Za-z0-9_]*)"),
    ("hashtag", r"#([A-Za-z][A-Za-z0-9_-]*)"),
    ("url", r#"(?:https?|file)://[^\s<>"')\]]+"#),
];

/// Case-insensitive name → precompiled regex registry.
///
/// Immutable after [`compile`](PatternLibrary::compile); safe to share
/// read-only across concurrent parses.
#[derive(Debug, Default)]
pub struct PatternLibrary {
    patterns: HashMap<String, Regex>,
}

impl PatternLibrary {
    /// Compile a name → source map into a library.
    ///
    /// Sources are compiled case-insensitive. Invalid sources are skipped
    /// without error; the name is absent from the result.
    pub fn compile(entries: &[(&str, &str)]) -> Self {
        let mut patterns = HashMap::with_capacity(entries.len());
        for (name, source) in entries {
            if name.trim().is_empty() {
                tracing::debug!(source, "skipping pattern with empty name");
                continue;
            }
            match RegexBuilder::new(source).case_insensitive(true).build() {
                Ok(re) => {
                    patterns.insert(name.to_lowercase(), re);
                }
                Err(e) => {
                    let err = PatternError::Invalid {
                        name: name.to_string(),
                        message: e.to_string(),
                    };
                    tracing::debug!(error = %err, "skipping invalid pattern");
                }
            }
        }
        Self { patterns }
    }

    /// The shared builtin cue sets.
    pub fn builtin() -> &'static PatternLibrary {
        static BUILTIN: LazyLock<PatternLibrary> =
            LazyLock::new(|| PatternLibrary::compile(BUILTIN_SOURCES));
        &BUILTIN
    }

    /// Look up a pattern by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&Regex> {
        self.patterns.get(&name.to_lowercase())
    }

    /// Whether a pattern with this name compiled successfully.
    pub fn contains(&self, name: &str) -> bool {
        self.patterns.contains_key(&name.to_lowercase())
    }

    /// Number of compiled patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the library is empty.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_valid_patterns() {
        let lib = PatternLibrary::compile(&[("greeting", r"^hello\b")]);
        assert_eq!(lib.len(), 1);
        assert!(lib.get("greeting").unwrap().is_match("hello world"));
    }

    #[test]
    fn skips_invalid_pattern_without_error() {
        let lib = PatternLibrary::compile(&[
            ("good", r"\d+"),
            ("bad", r"(unclosed"),
        ]);
        assert_eq!(lib.len(), 1);
        assert!(lib.contains("good"));
        assert!(!lib.contains("bad"));
    }

    #[test]
    fn skips_empty_name() {
        let lib = PatternLibrary::compile(&[("", r"\d+"), ("  ", r"\w+")]);
        assert!(lib.is_empty());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let lib = PatternLibrary::compile(&[("Action-Verbs", r"^call\b")]);
        assert!(lib.contains("action-verbs"));
        assert!(lib.get("ACTION-VERBS").is_some());
    }

    #[test]
    fn patterns_compile_case_insensitive() {
        let lib = PatternLibrary::compile(&[("verb", r"^call\b")]);
        assert!(lib.get("verb").unwrap().is_match("Call John"));
        assert!(lib.get("verb").unwrap().is_match("CALL John"));
    }

    #[test]
    fn builtin_has_all_cue_sets() {
        let lib = PatternLibrary::builtin();
        for name in [
            "action-verbs",
            "priority-words",
            "duration-units",
            "location-prepositions",
            "temporal-words",
            "handle",
            "hashtag",
            "url",
        ] {
            assert!(lib.contains(name), "builtin library missing '{name}'");
        }
    }

    #[test]
    fn builtin_action_verbs_anchor_to_start() {
        let re = PatternLibrary::builtin().get("action-verbs").unwrap();
        assert!(re.is_match("Call John"));
        assert!(!re.is_match("Please call John"));
    }

    #[test]
    fn builtin_handle_and_hashtag_capture() {
        let lib = PatternLibrary::builtin();
        let handle = lib.get("handle").unwrap();
        let caps = handle.captures("ping @robin please").unwrap();
        assert_eq!(&caps[1], "robin");

        let hashtag = lib.get("hashtag").unwrap();
        let caps = hashtag.captures("tagged #disaster here").unwrap();
        assert_eq!(&caps[1], "disaster");
    }

    #[test]
    fn builtin_url_matches_file_scheme() {
        let re = PatternLibrary::builtin().get("url").unwrap();
        assert!(re.is_match("see file:///home/notes/plan.md"));
        assert!(re.is_match("see https://example.com/x"));
    }
}
