//! Action, subject, and category plugins.

use std::sync::LazyLock;

use regex::Regex;

use super::{FieldPlugin, FieldResult, ParseContext};
use crate::entry::FieldValue;
use crate::patterns::PatternLibrary;

// ---------------------------------------------------------------------------
// action
// ---------------------------------------------------------------------------

/// First-word match against the action verb allow-list.
///
/// The verb must open the entry ("Call John", not "Please call John");
/// matching is case-insensitive and the emitted verb is lowercased.
pub struct ActionPlugin;

impl FieldPlugin for ActionPlugin {
    fn name(&self) -> &str {
        "action"
    }

    fn parse(&self, text: &str, _ctx: &ParseContext) -> FieldResult {
        let Some(re) = PatternLibrary::builtin().get("action-verbs") else {
            return Ok(None);
        };
        Ok(re
            .captures(text.trim_start())
            .map(|caps| FieldValue::Text(caps[1].to_lowercase())))
    }
}

// ---------------------------------------------------------------------------
// subject
// ---------------------------------------------------------------------------

static RE_SUBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:re:?|about|regarding)\s+(.+)$").unwrap()
});

static RE_SUBJECT_CUTOFF: LazyLock<Regex> = LazyLock::new(|| {
    // Trailing participant/tag/urgency chatter is not part of the subject.
    Regex::new(r"(?i)\s+(?:with\s+@|@|#|urgent)").unwrap()
});

/// What the entry is about: the phrase following `re`/`about`/`regarding`,
/// with trailing participant and tag tokens stripped.
pub struct SubjectPlugin;

impl FieldPlugin for SubjectPlugin {
    fn name(&self) -> &str {
        "subject"
    }

    fn parse(&self, text: &str, _ctx: &ParseContext) -> FieldResult {
        let Some(caps) = RE_SUBJECT.captures(text) else {
            return Ok(None);
        };
        let phrase = &caps[1];
        let phrase = match RE_SUBJECT_CUTOFF.find(phrase) {
            Some(m) => &phrase[..m.start()],
            None => phrase,
        };
        let phrase = phrase.trim().trim_end_matches(['.', ',', ';']);
        if phrase.is_empty() {
            Ok(None)
        } else {
            Ok(Some(FieldValue::Text(phrase.to_string())))
        }
    }
}

// ---------------------------------------------------------------------------
// categories
// ---------------------------------------------------------------------------

/// Keyword bucket → category label.
const CATEGORY_BUCKETS: &[(&str, &str)] = &[
    (r"(?i)\b(?:call|phone|ring)\b", "calls"),
    (r"(?i)\b(?:meet|meeting|appointment)\b", "meetings"),
    (r"(?i)\b(?:email|mail)\b", "correspondence"),
    (r"(?i)\b(?:review|read)\b", "review"),
    (r"(?i)\b(?:buy|purchase)\b", "errands"),
];

static CATEGORY_REGEXES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    CATEGORY_BUCKETS
        .iter()
        .filter_map(|(src, label)| Regex::new(src).ok().map(|re| (re, *label)))
        .collect()
});

/// Coarse category labels inferred from keyword buckets over the whole text.
pub struct CategoriesPlugin;

impl FieldPlugin for CategoriesPlugin {
    fn name(&self) -> &str {
        "categories"
    }

    fn parse(&self, text: &str, _ctx: &ParseContext) -> FieldResult {
        let mut found = Vec::new();
        for (re, label) in CATEGORY_REGEXES.iter() {
            if re.is_match(text) && !found.iter().any(|f| f == label) {
                found.push(label.to_string());
            }
        }
        if found.is_empty() {
            Ok(None)
        } else {
            Ok(Some(FieldValue::List(found)))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
