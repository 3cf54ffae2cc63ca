//! Date, recurrence, time-of-day, and reminder plugins.

use std::sync::LazyLock;

use regex::Regex;

use super::{FieldPlugin, FieldResult, ParseContext};
use crate::dates;
use crate::entry::{ClockTime, FieldValue, RecurUnit, Recurrence, ReminderSpec};

// ---------------------------------------------------------------------------
// date
// ---------------------------------------------------------------------------

static RE_DATE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:due|deadline|date|on):\s*([^,;]+)").unwrap()
});

/// Prefix-gated deadline: `due:`/`deadline:`/`date:`/`on:` followed by a
/// phrase handed to the date resolver. Bare relative phrases without a prefix
/// are handled by the facade's deadline fallback, not here.
pub struct DatePlugin;

impl FieldPlugin for DatePlugin {
    fn name(&self) -> &str {
        "date"
    }

    fn parse(&self, text: &str, ctx: &ParseContext) -> FieldResult {
        let Some(caps) = RE_DATE_PREFIX.captures(text) else {
            return Ok(None);
        };
        Ok(dates::resolve_phrase(ctx.now, caps[1].trim())
            .map(|dt| FieldValue::Deadline(dt.into())))
    }
}

// ---------------------------------------------------------------------------
// recurring
// ---------------------------------------------------------------------------

static RE_EVERY_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:every|each)\s+(?:(\d+)\s+)?(days?|weeks?|months?|years?)\b").unwrap()
});

static RE_EVERY_WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:every|each)\s+(sunday|monday|tuesday|wednesday|thursday|friday|saturday)\b",
    )
    .unwrap()
});

static RE_REPEAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:repeat|recurring):\s*(?:(daily|weekly|monthly|yearly)|(\d+)\s+(days?|weeks?|months?|years?))\b")
        .unwrap()
});

fn unit_from(word: &str) -> Option<RecurUnit> {
    let lower = word.to_lowercase();
    if lower.starts_with("day") || lower == "daily" {
        Some(RecurUnit::Day)
    } else if lower.starts_with("week") || lower == "weekly" {
        Some(RecurUnit::Week)
    } else if lower.starts_with("month") || lower == "monthly" {
        Some(RecurUnit::Month)
    } else if lower.starts_with("year") || lower == "yearly" {
        Some(RecurUnit::Year)
    } else {
        None
    }
}

/// Recurrence: `every/each <unit or weekday>` and `repeat:/recurring:` with a
/// named frequency or a numeric interval. Emits `{count, unit}`.
pub struct RecurringPlugin;

impl FieldPlugin for RecurringPlugin {
    fn name(&self) -> &str {
        "recurring"
    }

    fn parse(&self, text: &str, _ctx: &ParseContext) -> FieldResult {
        if let Some(caps) = RE_EVERY_WEEKDAY.captures(text) {
            return Ok(Some(FieldValue::Recurrence(Recurrence {
                count: 1,
                unit: RecurUnit::Week,
                weekday: Some(caps[1].to_lowercase()),
            })));
        }

        if let Some(caps) = RE_EVERY_UNIT.captures(text) {
            let count = caps
                .get(1)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(1);
            if let Some(unit) = unit_from(&caps[2]) {
                return Ok(Some(FieldValue::Recurrence(Recurrence {
                    count,
                    unit,
                    weekday: None,
                })));
            }
        }

        if let Some(caps) = RE_REPEAT_PREFIX.captures(text) {
            let (count, unit_word) = match (caps.get(1), caps.get(2), caps.get(3)) {
                (Some(named), _, _) => (1, named.as_str().to_string()),
                (None, Some(n), Some(unit)) => {
                    (n.as_str().parse().unwrap_or(1), unit.as_str().to_string())
                }
                _ => return Ok(None),
            };
            if let Some(unit) = unit_from(&unit_word) {
                return Ok(Some(FieldValue::Recurrence(Recurrence {
                    count,
                    unit,
                    weekday: None,
                })));
            }
        }

        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// timeOfDay
// ---------------------------------------------------------------------------

static RE_CLOCK: LazyLock<Regex> = LazyLock::new(|| {
    // Requires am/pm or an explicit minute part; a bare "at 5" is too
    // ambiguous against street numbers and quantities.
    Regex::new(r"(?i)\bat\s+(\d{1,2})(?::(\d{2})\s*(am|pm)?|\s*(am|pm))\b").unwrap()
});

static RE_PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(morning|noon|afternoon|evening|night)\b").unwrap()
});

/// Time of day: `at 3pm`, `at 15:30`, or a named period (morning 9:00,
/// noon 12:00, afternoon 14:00, evening 18:00, night 20:00).
pub struct TimeOfDayPlugin;

impl FieldPlugin for TimeOfDayPlugin {
    fn name(&self) -> &str {
        "timeOfDay"
    }

    fn parse(&self, text: &str, _ctx: &ParseContext) -> FieldResult {
        if let Some(caps) = RE_CLOCK.captures(text) {
            let mut hour: u32 = match caps[1].parse() {
                Ok(h) => h,
                Err(_) => return Ok(None),
            };
            let minute: u32 = caps
                .get(2)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0);
            let meridiem = caps
                .get(3)
                .or(caps.get(4))
                .map(|m| m.as_str().to_lowercase());
            match meridiem.as_deref() {
                Some("pm") if hour < 12 => hour += 12,
                Some("am") if hour == 12 => hour = 0,
                _ => {}
            }
            if hour > 23 || minute > 59 {
                return Ok(None);
            }
            return Ok(Some(FieldValue::TimeOfDay(ClockTime::new(hour, minute))));
        }

        if let Some(caps) = RE_PERIOD.captures(text) {
            let time = match caps[1].to_lowercase().as_str() {
                "morning" => ClockTime::new(9, 0),
                "noon" => ClockTime::new(12, 0),
                "afternoon" => ClockTime::new(14, 0),
                "evening" => ClockTime::new(18, 0),
                _ => ClockTime::new(20, 0),
            };
            return Ok(Some(FieldValue::TimeOfDay(time)));
        }

        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// reminders
// ---------------------------------------------------------------------------

static RE_REMINDER_QUANTIFIED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:remind(?:\s+me)?|reminder:?|alert:?)\b.*?\b(\d{1,4})\s*(minutes?|mins?|hours?|hrs?)\s+before\b")
        .unwrap()
});

static RE_REMINDER_BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bremind(?:\s+me)?\b").unwrap());

/// Reminder lead time. A quantified form ("remind me 15 minutes before")
/// yields the minutes; a bare "remind me" emits the zero marker so the
/// per-action default can be substituted downstream.
pub struct RemindersPlugin;

impl FieldPlugin for RemindersPlugin {
    fn name(&self) -> &str {
        "reminders"
    }

    fn parse(&self, text: &str, _ctx: &ParseContext) -> FieldResult {
        if let Some(caps) = RE_REMINDER_QUANTIFIED.captures(text) {
            let n: u32 = match caps[1].parse() {
                Ok(n) => n,
                Err(_) => return Ok(None),
            };
            let minutes = if caps[2].to_lowercase().starts_with('h') {
                n.saturating_mul(60)
            } else {
                n
            };
            return Ok(Some(FieldValue::Reminder(ReminderSpec {
                minutes_before: minutes,
            })));
        }

        if RE_REMINDER_BARE.is_match(text) {
            return Ok(Some(FieldValue::Reminder(ReminderSpec {
                minutes_before: 0,
            })));
        }

        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
