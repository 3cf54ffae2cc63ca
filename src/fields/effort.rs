//! Duration, priority, status, urgency, and complexity plugins.

use std::sync::LazyLock;

use regex::Regex;

use super::{FieldPlugin, FieldResult, ParseContext};
use crate::entry::{ComplexityLevel, DurationValue, FieldValue, Priority, Status, UrgencyLevel};
use crate::patterns::PatternLibrary;

// ---------------------------------------------------------------------------
// duration
// ---------------------------------------------------------------------------

static RE_DURATION_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:duration|takes|length):\s*(?:(\d{1,3})\s*h(?:ours?|rs?)?)?\s*(?:(\d{1,3})\s*m(?:in(?:ute)?s?)?)?",
    )
    .unwrap()
});

static RE_DURATION_FOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bfor\s+(\d{1,3})\s+(hours?|hrs?|minutes?|mins?)\b").unwrap()
});

/// Duration in total minutes with a formatted `<H>h<M>m` rendering. Only a
/// positive computed total counts as a match.
pub struct DurationPlugin;

impl FieldPlugin for DurationPlugin {
    fn name(&self) -> &str {
        "duration"
    }

    fn parse(&self, text: &str, _ctx: &ParseContext) -> FieldResult {
        if let Some(caps) = RE_DURATION_PREFIX.captures(text) {
            let hours: u32 = caps
                .get(1)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0);
            let minutes: u32 = caps
                .get(2)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0);
            let total = hours * 60 + minutes;
            if total > 0 {
                return Ok(Some(FieldValue::Duration(DurationValue::from_minutes(
                    total,
                ))));
            }
        }

        if let Some(caps) = RE_DURATION_FOR.captures(text) {
            let n: u32 = match caps[1].parse() {
                Ok(n) => n,
                Err(_) => return Ok(None),
            };
            let total = if caps[2].to_lowercase().starts_with('h') {
                n * 60
            } else {
                n
            };
            if total > 0 {
                return Ok(Some(FieldValue::Duration(DurationValue::from_minutes(
                    total,
                ))));
            }
        }

        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// priority
// ---------------------------------------------------------------------------

/// Explicit priority cues. Unlike most plugins this one never abstains:
/// absent cues yield the `normal` default.
pub struct PriorityPlugin;

impl FieldPlugin for PriorityPlugin {
    fn name(&self) -> &str {
        "priority"
    }

    fn parse(&self, text: &str, _ctx: &ParseContext) -> FieldResult {
        let priority = PatternLibrary::builtin()
            .get("priority-words")
            .and_then(|re| re.captures(text))
            .map(|caps| {
                if caps.get(2).is_some() {
                    Priority::Low
                } else {
                    Priority::High
                }
            })
            .unwrap_or(Priority::Normal);
        Ok(Some(FieldValue::Priority(priority)))
    }
}

// ---------------------------------------------------------------------------
// status
// ---------------------------------------------------------------------------

static RE_STATUS_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(blocked|completed?|done|started|closed|abandoned)\b").unwrap()
});

static RE_STATUS_PENDING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:next|tomorrow)\b").unwrap());

/// Entry status from an explicit keyword, with a `Pending` heuristic for
/// forward-looking text ("next", "tomorrow") and the `None` default
/// otherwise. Never abstains.
pub struct StatusPlugin;

impl FieldPlugin for StatusPlugin {
    fn name(&self) -> &str {
        "status"
    }

    fn parse(&self, text: &str, _ctx: &ParseContext) -> FieldResult {
        if let Some(caps) = RE_STATUS_KEYWORD.captures(text) {
            if let Some(status) = Status::from_keyword(&caps[1]) {
                return Ok(Some(FieldValue::Status(status)));
            }
        }
        if RE_STATUS_PENDING.is_match(text) {
            return Ok(Some(FieldValue::Status(Status::Pending)));
        }
        Ok(Some(FieldValue::Status(Status::None)))
    }
}

// ---------------------------------------------------------------------------
// urgency
// ---------------------------------------------------------------------------

static RE_URGENCY_IMMEDIATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:urgent(?:ly)?|asap|immediately|critical)\b").unwrap()
});

static RE_URGENCY_TODAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:today|by\s+end\s+of\s+day|eod)\b").unwrap()
});

static RE_URGENCY_SOON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:soon|shortly|this\s+week)\b").unwrap());

/// Urgency level from phrasing; the strongest cue wins.
pub struct UrgencyPlugin;

impl FieldPlugin for UrgencyPlugin {
    fn name(&self) -> &str {
        "urgency"
    }

    fn parse(&self, text: &str, _ctx: &ParseContext) -> FieldResult {
        let level = if RE_URGENCY_IMMEDIATE.is_match(text) {
            Some(UrgencyLevel::Immediate)
        } else if RE_URGENCY_TODAY.is_match(text) {
            Some(UrgencyLevel::Today)
        } else if RE_URGENCY_SOON.is_match(text) {
            Some(UrgencyLevel::Soon)
        } else {
            None
        };
        Ok(level.map(FieldValue::Urgency))
    }
}

// ---------------------------------------------------------------------------
// complexity
// ---------------------------------------------------------------------------

static RE_COMPLEXITY_HIGH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:complex|complicated|difficult|hard)\b").unwrap()
});

static RE_COMPLEXITY_LOW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:simple|easy|quick|trivial)\b").unwrap());

/// Complexity cue; absent means medium to consumers.
pub struct ComplexityPlugin;

impl FieldPlugin for ComplexityPlugin {
    fn name(&self) -> &str {
        "complexity"
    }

    fn parse(&self, text: &str, _ctx: &ParseContext) -> FieldResult {
        let level = if RE_COMPLEXITY_HIGH.is_match(text) {
            Some(ComplexityLevel::High)
        } else if RE_COMPLEXITY_LOW.is_match(text) {
            Some(ComplexityLevel::Low)
        } else {
            None
        };
        Ok(level.map(FieldValue::Complexity))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
