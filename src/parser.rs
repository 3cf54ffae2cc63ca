//! The parser facade: the single entry point storage and UI code call.
//!
//! `parse(content)` normalizes the input, runs the plugin registry, merges
//! partial results into one [`ParsedEntry`], computes the deadline fallback,
//! and applies heuristic defaults. It never raises: per-plugin failures are
//! logged and dropped here (the registry only collects them), and a failure
//! anywhere else degrades to the fully-defaulted entry. Every call produces
//! a fresh entry; the parser keeps no memory of parsed text.

use std::panic::{AssertUnwindSafe, catch_unwind};

use chrono::{DateTime, Utc};

use crate::dates;
use crate::entry::{EntryKind, FieldValue, ParsedEntry, ParsedFields, RawEntry};
use crate::fields::{FieldPlugin, ParseContext};
use crate::registry::PluginRegistry;
use crate::validate::{self, ReminderDefaults};

/// Stateless entry parser over a long-lived plugin registry.
#[derive(Debug)]
pub struct Parser {
    registry: PluginRegistry,
    reminders: ReminderDefaults,
}

impl Parser {
    /// A parser over the builtin plugin set and default reminder table.
    pub fn new() -> Self {
        Self::with_registry(PluginRegistry::with_builtins())
    }

    /// A parser over an explicitly constructed registry.
    pub fn with_registry(registry: PluginRegistry) -> Self {
        Self {
            registry,
            reminders: ReminderDefaults::default(),
        }
    }

    /// Replace the reminder-defaults config table.
    pub fn with_reminder_defaults(mut self, reminders: ReminderDefaults) -> Self {
        self.reminders = reminders;
        self
    }

    /// The underlying registry (read-only).
    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Register an externally supplied plugin. Boundary-faithful surface:
    /// `true` on success, `false` on rejection (duplicate or malformed name),
    /// never a panic. The rejection reason is logged.
    pub fn register_plugin(&mut self, plugin: Box<dyn FieldPlugin>) -> bool {
        match self.registry.register(plugin) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "plugin registration rejected");
                false
            }
        }
    }

    /// Invoke plugin cleanup hooks and clear the registry.
    pub fn cleanup(&mut self) {
        self.registry.cleanup();
    }

    /// Parse an entry against the wall clock.
    pub fn parse(&self, input: impl Into<RawEntry>) -> ParsedEntry {
        self.parse_at(input, Utc::now())
    }

    /// Parse an entry against an injected reference instant. All relative
    /// date phrases resolve against `now`, which keeps results deterministic
    /// under test.
    pub fn parse_at(&self, input: impl Into<RawEntry>, now: DateTime<Utc>) -> ParsedEntry {
        let raw = input.into();

        // Only notes run the pipeline; other kinds are stored with an
        // empty parse result, as is garbled/empty input.
        if raw.kind != EntryKind::Note || raw.raw.trim().is_empty() {
            return ParsedEntry::empty(raw.raw);
        }

        let text = raw.raw.clone();
        match catch_unwind(AssertUnwindSafe(|| self.run_pipeline(&text, now))) {
            Ok(fields) => ParsedEntry {
                raw_content: raw.raw.clone(),
                markdown: raw.raw,
                parsed: fields,
            },
            Err(_) => {
                tracing::error!("parse pipeline panicked; degrading to defaulted entry");
                ParsedEntry::empty(raw.raw)
            }
        }
    }

    fn run_pipeline(&self, text: &str, now: DateTime<Utc>) -> ParsedFields {
        let ctx = ParseContext::at(now);
        let run = self.registry.parse_all(text, &ctx);

        // Failure policy lives here: log and drop, siblings keep their output.
        for failure in &run.failures {
            tracing::warn!(
                plugin = %failure.plugin,
                error = %failure.error,
                "plugin failed; dropping its contribution"
            );
        }
        if run.is_empty() {
            tracing::debug!("no plugin recognized anything in this entry");
        }

        let mut fields = ParsedFields {
            text: text.to_string(),
            ..ParsedFields::default()
        };
        for (name, value) in run.values {
            merge_top_level(&mut fields, &name, &value);
            fields.plugins.insert(name, value);
        }

        // Deadline fallback: the date plugin only fires on explicit prefixes;
        // a bare relative phrase ("next week") resolves here. Explicit wins.
        if fields.final_deadline.is_none() {
            if let Some(deadline) = dates::resolve_phrase(now, text) {
                fields.final_deadline = Some(deadline.into());
            }
        }

        validate::apply_defaults(&mut fields, &self.reminders);
        fields
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Surface selected plugin results as top-level fields of the merged
/// envelope, for consumers that read them directly.
fn merge_top_level(fields: &mut ParsedFields, name: &str, value: &FieldValue) {
    match (name, value) {
        ("action", FieldValue::Text(s)) => fields.action = Some(s.clone()),
        ("contact", FieldValue::Text(s)) => fields.contact = Some(s.clone()),
        ("project", FieldValue::Project(p)) => fields.project = Some(p.clone()),
        ("date", FieldValue::Deadline(d)) => fields.final_deadline = Some(*d),
        ("duration", FieldValue::Duration(d)) => fields.duration = Some(d.clone()),
        ("location", FieldValue::Location(l)) => fields.location = Some(l.clone()),
        ("recurring", FieldValue::Recurrence(r)) => fields.recurrence = Some(r.clone()),
        ("status", FieldValue::Status(s)) => fields.status = *s,
        ("priority", FieldValue::Priority(p)) => fields.priority = *p,
        ("tags", FieldValue::List(items)) => fields.tags = items.clone(),
        ("participants", FieldValue::List(items)) => fields.participants = items.clone(),
        ("links", FieldValue::List(items)) => fields.links = items.clone(),
        ("contexts", FieldValue::List(items)) => fields.contexts = items.clone(),
        ("categories", FieldValue::List(items)) => fields.categories = items.clone(),
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{Priority, Status};
    use crate::fields::FieldResult;
    use chrono::TimeZone;

    /// 2024-01-01 is a Monday.
    fn monday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn merges_plugin_results_top_level() {
        let parser = Parser::new();
        let entry = parser.parse_at(
            "Call Fiona next wednesday re Project Cheesecake urgently with @robin and @ian #disaster",
            monday(),
        );

        let parsed = &entry.parsed;
        assert_eq!(parsed.action.as_deref(), Some("call"));
        assert_eq!(parsed.contact.as_deref(), Some("Fiona"));
        assert_eq!(
            parsed.project.as_ref().map(|p| p.project.as_str()),
            Some("Project Cheesecake")
        );
        assert_eq!(parsed.participants, vec!["robin", "ian"]);
        assert_eq!(parsed.tags, vec!["disaster"]);
        assert_eq!(parsed.priority, Priority::High);
        // "next wednesday" resolves through the bare-phrase fallback.
        assert_eq!(
            parsed.final_deadline.map(|d| d.to_iso()),
            Some("2024-01-10T09:00:00.000Z".to_string())
        );
    }

    #[test]
    fn explicit_date_prefix_wins_over_fallback() {
        let parser = Parser::new();
        let entry = parser.parse_at("submit due: tomorrow but also next week", monday());
        assert_eq!(
            entry.parsed.final_deadline.map(|d| d.to_iso()),
            Some("2024-01-02T09:00:00.000Z".to_string())
        );
    }

    #[test]
    fn plugins_map_carries_every_contribution() {
        let parser = Parser::new();
        let entry = parser.parse_at("Call John", monday());
        assert!(entry.parsed.plugins.contains_key("action"));
        assert!(entry.parsed.plugins.contains_key("contact"));
        assert!(entry.parsed.plugins.contains_key("status"));
        assert!(entry.parsed.plugins.contains_key("priority"));
        assert!(entry.parsed.plugins.contains_key("participants"));
    }

    #[test]
    fn non_note_kinds_skip_the_pipeline() {
        let parser = Parser::new();
        let entry = parser.parse_at(
            RawEntry {
                raw: "Call John tomorrow".to_string(),
                kind: EntryKind::Html,
            },
            monday(),
        );
        assert!(entry.parsed.plugins.is_empty());
        assert!(entry.parsed.action.is_none());
        assert_eq!(entry.raw_content, "Call John tomorrow");
    }

    #[test]
    fn empty_input_short_circuits() {
        let parser = Parser::new();
        for input in ["", "   ", "\n\t"] {
            let entry = parser.parse_at(input, monday());
            assert_eq!(entry.parsed.status, Status::None);
            assert_eq!(entry.parsed.priority, Priority::Normal);
            assert!(entry.parsed.plugins.is_empty());
        }
    }

    #[test]
    fn register_plugin_surface_returns_bool() {
        struct NoopPlugin;
        impl FieldPlugin for NoopPlugin {
            fn name(&self) -> &str {
                "noop"
            }
            fn parse(&self, _text: &str, _ctx: &ParseContext) -> FieldResult {
                Ok(None)
            }
        }

        let mut parser = Parser::new();
        assert!(parser.register_plugin(Box::new(NoopPlugin)));
        // Duplicate is rejected, not replaced.
        assert!(!parser.register_plugin(Box::new(NoopPlugin)));
    }

    #[test]
    fn custom_plugin_output_lands_in_plugins_map() {
        struct MoodPlugin;
        impl FieldPlugin for MoodPlugin {
            fn name(&self) -> &str {
                "mood"
            }
            fn parse(&self, text: &str, _ctx: &ParseContext) -> FieldResult {
                Ok(text
                    .contains(":)")
                    .then(|| FieldValue::Json(serde_json::json!({"mood": "good"}))))
            }
        }

        let mut parser = Parser::new();
        assert!(parser.register_plugin(Box::new(MoodPlugin)));
        let entry = parser.parse_at("Call John :)", monday());
        assert_eq!(
            entry.parsed.plugins.get("mood"),
            Some(&FieldValue::Json(serde_json::json!({"mood": "good"})))
        );
    }

    #[test]
    fn cleanup_empties_the_registry() {
        let mut parser = Parser::new();
        parser.cleanup();
        assert!(parser.registry().is_empty());
        // Parsing still returns a well-formed (defaulted) entry.
        let entry = parser.parse_at("Call John", monday());
        assert_eq!(entry.parsed.status, Status::None);
        assert!(entry.parsed.plugins.is_empty());
    }
}
