//! The parsed-entry data model.
//!
//! [`ParsedEntry`] is the envelope the storage layer persists verbatim:
//! `{ raw_content, markdown, parsed: { ...top-level fields, plugins: {...} } }`.
//! Every field value a builtin plugin can produce is a [`FieldValue`] variant,
//! so the per-plugin breakdown and the merged top-level fields share one
//! vocabulary. Custom plugins fall back to [`FieldValue::Json`].

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Declared kind of a raw entry. Only notes run the parse pipeline;
/// everything else is stored with an empty parse result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[default]
    Note,
    Document,
    Template,
    Html,
}

/// Raw input as handed over by the editor/storage shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEntry {
    /// The entry text as typed.
    pub raw: String,
    /// Declared type; absent means note.
    #[serde(default, rename = "type")]
    pub kind: EntryKind,
}

impl RawEntry {
    pub fn note(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            kind: EntryKind::Note,
        }
    }
}

impl From<&str> for RawEntry {
    fn from(raw: &str) -> Self {
        Self::note(raw)
    }
}

impl From<String> for RawEntry {
    fn from(raw: String) -> Self {
        Self::note(raw)
    }
}

// ---------------------------------------------------------------------------
// Scalar field vocabularies
// ---------------------------------------------------------------------------

/// Entry status. Emitted Title-Case; `None` is the default for text that
/// carries no status cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    None,
    Blocked,
    Complete,
    Started,
    Closed,
    Abandoned,
    Pending,
}

impl Status {
    /// Map an explicit status keyword (case-insensitive) to its status.
    /// Returns `None` for anything outside the five explicit keywords —
    /// `Pending` is only ever inferred, never matched.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.to_lowercase().as_str() {
            "blocked" => Some(Self::Blocked),
            "complete" | "completed" | "done" => Some(Self::Complete),
            "started" => Some(Self::Started),
            "closed" => Some(Self::Closed),
            "abandoned" => Some(Self::Abandoned),
            _ => None,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::None => "None",
            Self::Blocked => "Blocked",
            Self::Complete => "Complete",
            Self::Started => "Started",
            Self::Closed => "Closed",
            Self::Abandoned => "Abandoned",
            Self::Pending => "Pending",
        };
        write!(f, "{s}")
    }
}

/// Entry priority. `Normal` is the default; `Medium` only appears via the
/// inference chain in [`crate::validate`], never as a plugin default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    #[default]
    Normal,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Normal => "normal",
            Self::Low => "low",
        };
        write!(f, "{s}")
    }
}

/// Urgency level extracted from phrasing ("urgently", "by end of day", "soon").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Immediate,
    Today,
    Soon,
}

/// Task complexity cue. Absent means "medium" to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Low,
    High,
}

// ---------------------------------------------------------------------------
// Structured field values
// ---------------------------------------------------------------------------

/// A project reference. The surface form is preserved exactly as matched
/// ("Project Cheesecake" keeps the word "Project").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub project: String,
}

/// A normalized duration: total minutes plus the human-readable form ("2h0m").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationValue {
    pub minutes: u32,
    pub formatted: String,
}

impl DurationValue {
    /// Build from total minutes; formats as `<H>h<M>m`.
    pub fn from_minutes(minutes: u32) -> Self {
        Self {
            minutes,
            formatted: format!("{}h{}m", minutes / 60, minutes % 60),
        }
    }
}

/// A parsed location. Serializes as `{"type":"location","value":...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "type")]
    pub kind: LocationKind,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    #[default]
    Location,
}

impl Location {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            kind: LocationKind::Location,
            value: value.into(),
        }
    }
}

/// Recurrence interval unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurUnit {
    Day,
    Week,
    Month,
    Year,
}

/// A recurrence rule: `{count, unit}`, optionally pinned to a weekday
/// ("every tuesday" → count 1, unit week, weekday tuesday).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub count: u32,
    pub unit: RecurUnit,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub weekday: Option<String>,
}

/// People vs teams mentioned as attendees.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttendeeSet {
    pub people: Vec<String>,
    pub teams: Vec<String>,
}

/// A reminder lead time. `minutes_before == 0` marks "remind me" with no
/// quantity; validation substitutes the per-action default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSpec {
    pub minutes_before: u32,
}

/// A wall-clock time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }
}

// ---------------------------------------------------------------------------
// Instants
// ---------------------------------------------------------------------------

/// A UTC instant that serializes as ISO-8601 with millisecond precision
/// (`2024-01-08T09:00:00.000Z`), the exact form the storage layer persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct IsoInstant(pub DateTime<Utc>);

impl IsoInstant {
    pub fn to_iso(self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl From<DateTime<Utc>> for IsoInstant {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl std::fmt::Display for IsoInstant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_iso())
    }
}

impl Serialize for IsoInstant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso())
    }
}

impl<'de> Deserialize<'de> for IsoInstant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Field value union
// ---------------------------------------------------------------------------

/// The contribution of one plugin: a tagged union of every shape the builtin
/// plugins emit, serialized untagged so the envelope stays duck-type compatible
/// with what the shell already persists. [`FieldValue::Json`] is the escape
/// hatch for externally registered plugins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Project(ProjectRef),
    Duration(DurationValue),
    Location(Location),
    Recurrence(Recurrence),
    Attendees(AttendeeSet),
    Reminder(ReminderSpec),
    TimeOfDay(ClockTime),
    Deadline(IsoInstant),
    Status(Status),
    Priority(Priority),
    Urgency(UrgencyLevel),
    Complexity(ComplexityLevel),
    List(Vec<String>),
    Text(String),
    Json(serde_json::Value),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The merged `parsed` object: per-plugin breakdown plus the top-level
/// convenience fields consumers read directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedFields {
    pub text: String,
    pub status: Status,
    pub priority: Priority,
    pub action: Option<String>,
    pub contact: Option<String>,
    pub project: Option<ProjectRef>,
    pub final_deadline: Option<IsoInstant>,
    pub duration: Option<DurationValue>,
    pub location: Option<Location>,
    pub recurrence: Option<Recurrence>,
    pub contexts: Vec<String>,
    pub categories: Vec<String>,
    pub links: Vec<String>,
    pub participants: Vec<String>,
    pub tags: Vec<String>,
    pub plugins: BTreeMap<String, FieldValue>,
}

impl Default for ParsedFields {
    fn default() -> Self {
        Self {
            text: String::new(),
            status: Status::None,
            priority: Priority::Normal,
            action: None,
            contact: None,
            project: None,
            final_deadline: None,
            duration: None,
            location: None,
            recurrence: None,
            contexts: Vec::new(),
            categories: Vec::new(),
            links: Vec::new(),
            participants: Vec::new(),
            tags: Vec::new(),
            plugins: BTreeMap::new(),
        }
    }
}

/// The assembled output of one `parse()` call. Created fresh per call and
/// handed to the caller for persistence; the parser retains no memory of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedEntry {
    pub raw_content: String,
    pub markdown: String,
    pub parsed: ParsedFields,
}

impl ParsedEntry {
    /// A fully-defaulted entry for the given raw text: status `None`,
    /// priority `normal`, every array empty, every scalar absent.
    pub fn empty(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            markdown: raw.clone(),
            parsed: ParsedFields {
                text: raw.clone(),
                ..ParsedFields::default()
            },
            raw_content: raw,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn default_fields_are_empty_and_normal() {
        let fields = ParsedFields::default();
        assert_eq!(fields.status, Status::None);
        assert_eq!(fields.priority, Priority::Normal);
        assert!(fields.tags.is_empty());
        assert!(fields.participants.is_empty());
        assert!(fields.links.is_empty());
        assert!(fields.categories.is_empty());
        assert!(fields.contexts.is_empty());
        assert!(fields.action.is_none());
        assert!(fields.final_deadline.is_none());
    }

    #[test]
    fn status_keyword_mapping() {
        assert_eq!(Status::from_keyword("BLOCKED"), Some(Status::Blocked));
        assert_eq!(Status::from_keyword("done"), Some(Status::Complete));
        assert_eq!(Status::from_keyword("closed"), Some(Status::Closed));
        assert_eq!(Status::from_keyword("pending"), None);
        assert_eq!(Status::from_keyword("whatever"), None);
    }

    #[test]
    fn status_serializes_title_case() {
        assert_eq!(serde_json::to_string(&Status::None).unwrap(), "\"None\"");
        assert_eq!(
            serde_json::to_string(&Status::Blocked).unwrap(),
            "\"Blocked\""
        );
    }

    #[test]
    fn priority_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
        assert_eq!(
            serde_json::to_string(&Priority::Normal).unwrap(),
            "\"normal\""
        );
    }

    #[test]
    fn iso_instant_has_millisecond_precision() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap();
        assert_eq!(IsoInstant(dt).to_iso(), "2024-01-08T09:00:00.000Z");
    }

    #[test]
    fn iso_instant_roundtrips_through_serde() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 15, 14, 30, 0).unwrap();
        let json = serde_json::to_string(&IsoInstant(dt)).unwrap();
        assert_eq!(json, "\"2024-03-15T14:30:00.000Z\"");
        let back: IsoInstant = serde_json::from_str(&json).unwrap();
        assert_eq!(back.0, dt);
    }

    #[test]
    fn location_envelope_shape() {
        let loc = Location::new("Berlin");
        let json = serde_json::to_value(&loc).unwrap();
        assert_eq!(json["type"], "location");
        assert_eq!(json["value"], "Berlin");
    }

    #[test]
    fn duration_formats_hours_and_minutes() {
        assert_eq!(DurationValue::from_minutes(120).formatted, "2h0m");
        assert_eq!(DurationValue::from_minutes(45).formatted, "0h45m");
        assert_eq!(DurationValue::from_minutes(135).formatted, "2h15m");
    }

    #[test]
    fn recurrence_omits_absent_weekday() {
        let rec = Recurrence {
            count: 3,
            unit: RecurUnit::Day,
            weekday: None,
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert!(json.get("weekday").is_none());
        assert_eq!(json["count"], 3);
        assert_eq!(json["unit"], "day");
    }

    #[test]
    fn empty_entry_mirrors_raw_text() {
        let entry = ParsedEntry::empty("garbled ~~ input");
        assert_eq!(entry.raw_content, "garbled ~~ input");
        assert_eq!(entry.markdown, "garbled ~~ input");
        assert_eq!(entry.parsed.text, "garbled ~~ input");
        assert_eq!(entry.parsed.status, Status::None);
    }

    #[test]
    fn entry_kind_defaults_to_note() {
        let raw: RawEntry = serde_json::from_str(r#"{"raw":"Call John"}"#).unwrap();
        assert_eq!(raw.kind, EntryKind::Note);
        let raw: RawEntry =
            serde_json::from_str(r#"{"raw":"<p>hi</p>","type":"html"}"#).unwrap();
        assert_eq!(raw.kind, EntryKind::Html);
    }
}
