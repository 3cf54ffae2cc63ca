//! Contact, participant, and attendee plugins.

use std::sync::LazyLock;

use regex::Regex;

use super::{FieldPlugin, FieldResult, ParseContext};
use crate::entry::{AttendeeSet, FieldValue};
use crate::patterns::{ACTION_VERBS, PatternLibrary};

/// Words that can follow an action verb without naming a person.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "my", "me", "him", "her", "them", "it", "this", "that",
    "about", "re", "regarding", "with", "at", "in", "on", "for", "back",
    "again", "later", "soon", "now", "next", "last", "tomorrow", "today",
    "someone", "everyone", "all", "urgently", "please", "team", "due",
    "deadline",
];

fn is_stop_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    STOP_WORDS.iter().any(|w| *w == lower)
}

// ---------------------------------------------------------------------------
// contact
// ---------------------------------------------------------------------------

static RE_AFTER_VERB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^\s*(?:{})\s+@?([A-Za-z][\w'-]*)",
        ACTION_VERBS.join("|")
    ))
    .unwrap()
});

static RE_AFTER_WITH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bwith\s+@?([A-Za-z][\w'-]*)").unwrap());

/// The primary person of the entry: the name following the opening action
/// verb or "with", or the first `@handle`. Stop words are never contacts.
pub struct ContactPlugin;

impl FieldPlugin for ContactPlugin {
    fn name(&self) -> &str {
        "contact"
    }

    fn parse(&self, text: &str, _ctx: &ParseContext) -> FieldResult {
        for re in [&*RE_AFTER_VERB, &*RE_AFTER_WITH] {
            if let Some(caps) = re.captures(text) {
                let name = &caps[1];
                if !is_stop_word(name) {
                    return Ok(Some(FieldValue::Text(name.to_string())));
                }
            }
        }
        if let Some(re) = PatternLibrary::builtin().get("handle") {
            if let Some(caps) = re.captures(text) {
                return Ok(Some(FieldValue::Text(caps[1].to_string())));
            }
        }
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// participants
// ---------------------------------------------------------------------------

/// Every `@handle` in the text, de-duplicated in first-seen order.
/// Always an array; empty when the text mentions no one.
pub struct ParticipantsPlugin;

impl FieldPlugin for ParticipantsPlugin {
    fn name(&self) -> &str {
        "participants"
    }

    fn parse(&self, text: &str, _ctx: &ParseContext) -> FieldResult {
        let Some(re) = PatternLibrary::builtin().get("handle") else {
            return Ok(Some(FieldValue::List(Vec::new())));
        };
        let mut seen = Vec::new();
        for caps in re.captures_iter(text) {
            let handle = caps[1].to_string();
            if !seen.contains(&handle) {
                seen.push(handle);
            }
        }
        Ok(Some(FieldValue::List(seen)))
    }
}

// ---------------------------------------------------------------------------
// attendees
// ---------------------------------------------------------------------------

static RE_TEAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[Tt]eam\s+([A-Z][\w-]*)").unwrap());

static RE_WITH_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b[Ww]ith\s+((?:@?[A-Z][\w'-]*|@\w+)(?:(?:\s*,\s*|\s+and\s+|\s+)(?:@?[A-Z][\w'-]*|@\w+))*)",
    )
    .unwrap()
});

static RE_NAME_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*,\s*|\s+and\s+|\s+").unwrap());

/// Distinguishes `team <Name>` mentions from `with <Name, Name and Name>`
/// mentions; a name claimed as a team is not repeated under people.
pub struct AttendeesPlugin;

impl FieldPlugin for AttendeesPlugin {
    fn name(&self) -> &str {
        "attendees"
    }

    fn parse(&self, text: &str, _ctx: &ParseContext) -> FieldResult {
        let mut teams = Vec::new();
        for caps in RE_TEAM.captures_iter(text) {
            let team = caps[1].to_string();
            if !teams.contains(&team) {
                teams.push(team);
            }
        }

        let mut people = Vec::new();
        if let Some(caps) = RE_WITH_LIST.captures(text) {
            for raw in RE_NAME_SPLIT.split(&caps[1]) {
                let name = raw.trim_start_matches('@').trim();
                if name.is_empty() || is_stop_word(name) {
                    continue;
                }
                let name = name.to_string();
                if !teams.contains(&name) && !people.contains(&name) {
                    people.push(name);
                }
            }
        }

        if teams.is_empty() && people.is_empty() {
            Ok(None)
        } else {
            Ok(Some(FieldValue::Attendees(AttendeeSet { people, teams })))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
