//! Heuristic defaults and advisory validation for merged parse results.
//!
//! [`apply_defaults`] runs inside the parse path and fills gaps (inferred
//! action, default time of day, reminder lead times, the priority inference
//! chain). [`validate_result`] is a reporting utility for callers: it collects
//! every violation instead of failing fast and never blocks persistence.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::entry::{
    ClockTime, FieldValue, ParsedFields, Priority, ReminderSpec, UrgencyLevel,
};

/// Category label → inferred action verb.
const CATEGORY_ACTIONS: &[(&str, &str)] = &[
    ("calls", "call"),
    ("meetings", "meet"),
    ("correspondence", "email"),
];

/// Time of day assumed when an action exists but no time was parsed.
const DEFAULT_TIME: ClockTime = ClockTime { hour: 10, minute: 0 };

// ---------------------------------------------------------------------------
// Reminder defaults
// ---------------------------------------------------------------------------

/// Config table of default reminder lead times, keyed by action verb.
#[derive(Debug, Clone)]
pub struct ReminderDefaults {
    by_action: HashMap<String, u32>,
}

impl Default for ReminderDefaults {
    fn default() -> Self {
        let mut by_action = HashMap::new();
        by_action.insert("call".to_string(), 10);
        by_action.insert("meet".to_string(), 30);
        by_action.insert("email".to_string(), 5);
        Self { by_action }
    }
}

impl ReminderDefaults {
    /// An empty table: no action gets a default reminder.
    pub fn none() -> Self {
        Self {
            by_action: HashMap::new(),
        }
    }

    /// Set or override the default lead time for an action.
    pub fn set(&mut self, action: impl Into<String>, minutes: u32) {
        self.by_action.insert(action.into(), minutes);
    }

    /// Default lead time for an action, if the table supplies one.
    pub fn minutes_for(&self, action: &str) -> Option<u32> {
        self.by_action.get(action).copied()
    }
}

// ---------------------------------------------------------------------------
// Defaults pass
// ---------------------------------------------------------------------------

static RE_PRIORITY_HIGH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:urgent|asap|important)\b").unwrap());

static RE_PRIORITY_MEDIUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:normal|moderate|regular)\b").unwrap());

static RE_PRIORITY_LOW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:low|minor|whenever)\b").unwrap());

fn priority_from_urgency(fields: &ParsedFields) -> Option<Priority> {
    match fields.plugins.get("urgency") {
        Some(FieldValue::Urgency(UrgencyLevel::Immediate)) => Some(Priority::High),
        Some(FieldValue::Urgency(UrgencyLevel::Today)) => Some(Priority::Medium),
        Some(FieldValue::Urgency(UrgencyLevel::Soon)) => Some(Priority::Low),
        _ => None,
    }
}

fn priority_from_keywords(text: &str) -> Option<Priority> {
    if RE_PRIORITY_HIGH.is_match(text) {
        Some(Priority::High)
    } else if RE_PRIORITY_MEDIUM.is_match(text) {
        Some(Priority::Medium)
    } else if RE_PRIORITY_LOW.is_match(text) {
        Some(Priority::Low)
    } else {
        None
    }
}

/// Fill gaps in a merged result:
///
/// - infer the action from categories when no verb matched;
/// - assume 10:00 when an action exists but no time was parsed;
/// - substitute per-action reminder lead times from the config table;
/// - run the priority inference chain (explicit value → urgency level →
///   keyword scan → stay normal).
pub fn apply_defaults(fields: &mut ParsedFields, reminders: &ReminderDefaults) {
    if fields.action.is_none() {
        for (category, action) in CATEGORY_ACTIONS {
            if fields.categories.iter().any(|c| c == category) {
                fields.action = Some((*action).to_string());
                break;
            }
        }
    }

    if fields.action.is_some() && !fields.plugins.contains_key("timeOfDay") {
        fields
            .plugins
            .insert("timeOfDay".to_string(), FieldValue::TimeOfDay(DEFAULT_TIME));
    }

    if let Some(action) = fields.action.clone() {
        if let Some(minutes) = reminders.minutes_for(&action) {
            match fields.plugins.get_mut("reminders") {
                Some(FieldValue::Reminder(spec)) if spec.minutes_before == 0 => {
                    spec.minutes_before = minutes;
                }
                None => {
                    fields.plugins.insert(
                        "reminders".to_string(),
                        FieldValue::Reminder(ReminderSpec {
                            minutes_before: minutes,
                        }),
                    );
                }
                _ => {}
            }
        }
    }

    if fields.priority == Priority::Normal {
        if let Some(inferred) =
            priority_from_urgency(fields).or_else(|| priority_from_keywords(&fields.text))
        {
            fields.priority = inferred;
        }
    }
}

// ---------------------------------------------------------------------------
// Advisory validation
// ---------------------------------------------------------------------------

/// The outcome of [`validate_result`]: every violation collected, and the
/// result echoed back only when clean.
#[derive(Debug)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub result: Option<ParsedFields>,
}

fn check_clock(errors: &mut Vec<String>, time: &ClockTime) {
    if time.hour > 23 {
        errors.push(format!("time of day hour out of range: {}", time.hour));
    }
    if time.minute > 59 {
        errors.push(format!("time of day minute out of range: {}", time.minute));
    }
}

/// Collect structural violations in a merged result without throwing:
/// time-of-day bounds, positive durations and reminder lead times, known
/// priority values, and `progress` within 0–100 for custom plugin payloads.
/// `result` is `None` exactly when any violation was found.
pub fn validate_result(fields: &ParsedFields) -> ValidationReport {
    let mut errors = Vec::new();

    if let Some(FieldValue::TimeOfDay(time)) = fields.plugins.get("timeOfDay") {
        check_clock(&mut errors, time);
    }

    if let Some(duration) = &fields.duration {
        if duration.minutes == 0 {
            errors.push("duration must be a positive number of minutes".to_string());
        }
    }

    if let Some(FieldValue::Reminder(spec)) = fields.plugins.get("reminders") {
        if spec.minutes_before == 0 {
            errors.push("reminder lead time must be a positive number of minutes".to_string());
        }
    }

    for (name, value) in &fields.plugins {
        let FieldValue::Json(json) = value else {
            continue;
        };
        if let Some(priority) = json.get("priority").and_then(|v| v.as_str()) {
            if !matches!(priority, "high" | "medium" | "normal" | "low") {
                errors.push(format!("plugin '{name}' reports unknown priority '{priority}'"));
            }
        }
        if let Some(progress) = json.get("progress").and_then(|v| v.as_f64()) {
            if !(0.0..=100.0).contains(&progress) {
                errors.push(format!(
                    "plugin '{name}' reports progress {progress} outside 0-100"
                ));
            }
        }
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        result: if errors.is_empty() {
            Some(fields.clone())
        } else {
            None
        },
        errors,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::DurationValue;
    use serde_json::json;

    fn fields_with_text(text: &str) -> ParsedFields {
        ParsedFields {
            text: text.to_string(),
            ..ParsedFields::default()
        }
    }

    #[test]
    fn action_inferred_from_categories() {
        let mut fields = fields_with_text("ring the bank");
        fields.categories = vec!["calls".to_string()];
        apply_defaults(&mut fields, &ReminderDefaults::default());
        assert_eq!(fields.action.as_deref(), Some("call"));
    }

    #[test]
    fn explicit_action_not_overwritten() {
        let mut fields = fields_with_text("Meet the team");
        fields.action = Some("meet".to_string());
        fields.categories = vec!["calls".to_string()];
        apply_defaults(&mut fields, &ReminderDefaults::default());
        assert_eq!(fields.action.as_deref(), Some("meet"));
    }

    #[test]
    fn default_time_of_day_when_action_present() {
        let mut fields = fields_with_text("Call John");
        fields.action = Some("call".to_string());
        apply_defaults(&mut fields, &ReminderDefaults::default());
        assert_eq!(
            fields.plugins.get("timeOfDay"),
            Some(&FieldValue::TimeOfDay(ClockTime::new(10, 0)))
        );
    }

    #[test]
    fn no_default_time_without_action() {
        let mut fields = fields_with_text("nothing actionable");
        apply_defaults(&mut fields, &ReminderDefaults::default());
        assert!(!fields.plugins.contains_key("timeOfDay"));
    }

    #[test]
    fn parsed_time_not_overwritten() {
        let mut fields = fields_with_text("Call at 3pm");
        fields.action = Some("call".to_string());
        fields.plugins.insert(
            "timeOfDay".to_string(),
            FieldValue::TimeOfDay(ClockTime::new(15, 0)),
        );
        apply_defaults(&mut fields, &ReminderDefaults::default());
        assert_eq!(
            fields.plugins.get("timeOfDay"),
            Some(&FieldValue::TimeOfDay(ClockTime::new(15, 0)))
        );
    }

    #[test]
    fn reminder_marker_substituted_by_action_default() {
        let mut fields = fields_with_text("Call John, remind me");
        fields.action = Some("call".to_string());
        fields.plugins.insert(
            "reminders".to_string(),
            FieldValue::Reminder(ReminderSpec { minutes_before: 0 }),
        );
        apply_defaults(&mut fields, &ReminderDefaults::default());
        assert_eq!(
            fields.plugins.get("reminders"),
            Some(&FieldValue::Reminder(ReminderSpec { minutes_before: 10 }))
        );
    }

    #[test]
    fn quantified_reminder_kept() {
        let mut fields = fields_with_text("Call John, remind me 45 minutes before");
        fields.action = Some("call".to_string());
        fields.plugins.insert(
            "reminders".to_string(),
            FieldValue::Reminder(ReminderSpec { minutes_before: 45 }),
        );
        apply_defaults(&mut fields, &ReminderDefaults::default());
        assert_eq!(
            fields.plugins.get("reminders"),
            Some(&FieldValue::Reminder(ReminderSpec { minutes_before: 45 }))
        );
    }

    #[test]
    fn empty_table_supplies_no_reminder() {
        let mut fields = fields_with_text("Call John");
        fields.action = Some("call".to_string());
        apply_defaults(&mut fields, &ReminderDefaults::none());
        assert!(!fields.plugins.contains_key("reminders"));
    }

    #[test]
    fn priority_inferred_from_urgency_level() {
        let mut fields = fields_with_text("finish the report");
        fields
            .plugins
            .insert("urgency".to_string(), FieldValue::Urgency(UrgencyLevel::Today));
        apply_defaults(&mut fields, &ReminderDefaults::default());
        assert_eq!(fields.priority, Priority::Medium);
    }

    #[test]
    fn priority_inferred_from_keywords() {
        let mut fields = fields_with_text("this is important");
        apply_defaults(&mut fields, &ReminderDefaults::default());
        assert_eq!(fields.priority, Priority::High);

        let mut fields = fields_with_text("minor cleanup whenever");
        apply_defaults(&mut fields, &ReminderDefaults::default());
        assert_eq!(fields.priority, Priority::Low);
    }

    #[test]
    fn explicit_priority_wins_over_inference() {
        let mut fields = fields_with_text("low priority but today");
        fields.priority = Priority::Low;
        fields
            .plugins
            .insert("urgency".to_string(), FieldValue::Urgency(UrgencyLevel::Today));
        apply_defaults(&mut fields, &ReminderDefaults::default());
        assert_eq!(fields.priority, Priority::Low);
    }

    #[test]
    fn priority_left_normal_without_cues() {
        let mut fields = fields_with_text("water the plants");
        apply_defaults(&mut fields, &ReminderDefaults::default());
        assert_eq!(fields.priority, Priority::Normal);
    }

    #[test]
    fn validate_clean_result_echoes_fields() {
        let fields = fields_with_text("Call John");
        let report = validate_result(&fields);
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
        assert_eq!(report.result.as_ref(), Some(&fields));
    }

    #[test]
    fn validate_collects_all_violations() {
        let mut fields = fields_with_text("broken");
        fields.plugins.insert(
            "timeOfDay".to_string(),
            FieldValue::TimeOfDay(ClockTime::new(27, 75)),
        );
        fields.duration = Some(DurationValue::from_minutes(0));
        fields.plugins.insert(
            "reminders".to_string(),
            FieldValue::Reminder(ReminderSpec { minutes_before: 0 }),
        );

        let report = validate_result(&fields);
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 4);
        assert!(report.result.is_none());
    }

    #[test]
    fn validate_checks_custom_plugin_payloads() {
        let mut fields = fields_with_text("custom");
        fields.plugins.insert(
            "custom".to_string(),
            FieldValue::Json(json!({"priority": "extreme", "progress": 140})),
        );

        let report = validate_result(&fields);
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 2);
    }
}
