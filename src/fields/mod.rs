//! Field plugins: one self-contained unit per semantic attribute.
//!
//! Every plugin implements [`FieldPlugin`]: a name, a pure
//! `parse(text, ctx) -> Result<Option<FieldValue>, PluginError>`, and an
//! optional `cleanup()` hook. Plugins never mutate the input, never share
//! state, and are independently testable with literal text fixtures. A
//! plugin that recognizes nothing returns `Ok(None)`; a handful (priority,
//! status, the harvest plugins) always produce a value by contract.

pub mod action;
pub mod effort;
pub mod people;
pub mod place;
pub mod project;
pub mod schedule;

use std::fmt;

use chrono::{DateTime, Utc};

use crate::entry::FieldValue;
use crate::error::PluginError;

/// Per-parse context handed to every plugin.
///
/// Carries the reference instant so date-dependent plugins stay pure
/// functions of their inputs.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext {
    /// The instant relative date phrases are resolved against.
    pub now: DateTime<Utc>,
}

impl ParseContext {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

/// Result of one plugin invocation.
pub type FieldResult = Result<Option<FieldValue>, PluginError>;

/// A unit responsible for recognizing and extracting exactly one semantic
/// attribute from free text.
///
/// Implementations must not panic across this boundary; the registry
/// additionally isolates panics so a buggy external plugin cannot affect
/// its siblings.
pub trait FieldPlugin: Send + Sync {
    /// Name the plugin's results are keyed by in the parsed envelope.
    fn name(&self) -> &str;

    /// Extract this plugin's field from `text`, or `Ok(None)` when the text
    /// carries no cue for it.
    fn parse(&self, text: &str, ctx: &ParseContext) -> FieldResult;

    /// Optional teardown hook, invoked best-effort by the registry.
    fn cleanup(&self) {}
}

impl fmt::Debug for dyn FieldPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldPlugin({})", self.name())
    }
}

/// The full builtin plugin set, in registration order.
pub fn builtins() -> Vec<Box<dyn FieldPlugin>> {
    vec![
        Box::new(action::ActionPlugin),
        Box::new(action::SubjectPlugin),
        Box::new(action::CategoriesPlugin),
        Box::new(people::ContactPlugin),
        Box::new(people::ParticipantsPlugin),
        Box::new(people::AttendeesPlugin),
        Box::new(project::ProjectPlugin),
        Box::new(project::TagsPlugin),
        Box::new(project::LinksPlugin),
        Box::new(project::DependenciesPlugin),
        Box::new(schedule::DatePlugin),
        Box::new(schedule::RecurringPlugin),
        Box::new(schedule::TimeOfDayPlugin),
        Box::new(schedule::RemindersPlugin),
        Box::new(effort::DurationPlugin),
        Box::new(effort::PriorityPlugin),
        Box::new(effort::StatusPlugin),
        Box::new(effort::UrgencyPlugin),
        Box::new(effort::ComplexityPlugin),
        Box::new(place::LocationPlugin),
        Box::new(place::ContextsPlugin),
    ]
}
