//! Location and context plugins.

use std::sync::LazyLock;

use regex::Regex;

use super::{FieldPlugin, FieldResult, ParseContext};
use crate::entry::{FieldValue, Location};

// ---------------------------------------------------------------------------
// location
// ---------------------------------------------------------------------------

static RE_LOCATION_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:at|location|place|venue):\s*([^,;.]+)").unwrap()
});

// Bare "in <Capitalized Phrase>" form; checked after the explicit prefixes.
static RE_LOCATION_IN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bin\s+([A-Z][\w'-]*(?:\s+[A-Z][\w'-]*)*)").unwrap()
});

/// Where the entry happens: `at:`/`location:`/`place:`/`venue: X`, or a bare
/// `in <Capitalized Phrase>`. The explicit prefix form wins.
pub struct LocationPlugin;

impl FieldPlugin for LocationPlugin {
    fn name(&self) -> &str {
        "location"
    }

    fn parse(&self, text: &str, _ctx: &ParseContext) -> FieldResult {
        if let Some(caps) = RE_LOCATION_PREFIX.captures(text) {
            let value = caps[1].trim();
            if !value.is_empty() {
                return Ok(Some(FieldValue::Location(Location::new(value))));
            }
        }
        if let Some(caps) = RE_LOCATION_IN.captures(text) {
            return Ok(Some(FieldValue::Location(Location::new(caps[1].trim()))));
        }
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// contexts
// ---------------------------------------------------------------------------

static RE_CONTEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(office|home|computer|phone|online|errands?)\b").unwrap()
});

/// GTD-style context cues (office, home, computer, phone, online, errands),
/// lowercased and de-duplicated.
pub struct ContextsPlugin;

impl FieldPlugin for ContextsPlugin {
    fn name(&self) -> &str {
        "contexts"
    }

    fn parse(&self, text: &str, _ctx: &ParseContext) -> FieldResult {
        let mut found: Vec<String> = Vec::new();
        for caps in RE_CONTEXT.captures_iter(text) {
            let mut context = caps[1].to_lowercase();
            if context == "errand" {
                context.push('s');
            }
            if !found.contains(&context) {
                found.push(context);
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
