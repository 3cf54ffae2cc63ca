//! Project, tag, link, and dependency plugins.

use std::sync::LazyLock;

use regex::Regex;

use super::{FieldPlugin, FieldResult, ParseContext};
use crate::entry::{FieldValue, ProjectRef};
use crate::patterns::PatternLibrary;

// ---------------------------------------------------------------------------
// project
// ---------------------------------------------------------------------------

static RE_PROJECT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[Pp]roject:\s*(\S+(?:\s+[A-Z][\w-]*)*)").unwrap());

// Surface form preserved: the whole "Project Cheesecake" phrase, word included.
static RE_PROJECT_NAMED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([Pp]roject\s+[A-Z][\w-]*(?:\s+[A-Z][\w-]*)*)").unwrap()
});

static RE_PROJECT_FOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bfor\s+([A-Z][\w-]*)").unwrap());

static RE_PROJECT_SIGIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Za-z][\w-]*)").unwrap());

/// Project reference: `project: Name`, the literal `Project Name` phrase
/// (surface form kept verbatim), `for Name`, or `$name`. First pattern wins.
pub struct ProjectPlugin;

impl FieldPlugin for ProjectPlugin {
    fn name(&self) -> &str {
        "project"
    }

    fn parse(&self, text: &str, _ctx: &ParseContext) -> FieldResult {
        for re in [
            &*RE_PROJECT_PREFIX,
            &*RE_PROJECT_NAMED,
            &*RE_PROJECT_FOR,
            &*RE_PROJECT_SIGIL,
        ] {
            if let Some(caps) = re.captures(text) {
                let project = caps[1].trim().to_string();
                if !project.is_empty() {
                    return Ok(Some(FieldValue::Project(ProjectRef { project })));
                }
            }
        }
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// tags
// ---------------------------------------------------------------------------

/// Every `#tag` in the text, in order of appearance. Always an array.
pub struct TagsPlugin;

impl FieldPlugin for TagsPlugin {
    fn name(&self) -> &str {
        "tags"
    }

    fn parse(&self, text: &str, _ctx: &ParseContext) -> FieldResult {
        let Some(re) = PatternLibrary::builtin().get("hashtag") else {
            return Ok(Some(FieldValue::List(Vec::new())));
        };
        let tags = re
            .captures_iter(text)
            .map(|caps| caps[1].to_string())
            .collect();
        Ok(Some(FieldValue::List(tags)))
    }
}

// ---------------------------------------------------------------------------
// links
// ---------------------------------------------------------------------------

/// Every `http(s)://` or `file://` URL in the text. Always an array.
pub struct LinksPlugin;

impl FieldPlugin for LinksPlugin {
    fn name(&self) -> &str {
        "links"
    }

    fn parse(&self, text: &str, _ctx: &ParseContext) -> FieldResult {
        let Some(re) = PatternLibrary::builtin().get("url") else {
            return Ok(Some(FieldValue::List(Vec::new())));
        };
        let links = re
            .find_iter(text)
            .map(|m| m.as_str().trim_end_matches(['.', ',']).to_string())
            .collect();
        Ok(Some(FieldValue::List(links)))
    }
}

// ---------------------------------------------------------------------------
// dependencies
// ---------------------------------------------------------------------------

static RE_DEPENDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:depends\s+on|blocked\s+by|waiting\s+on|after)\s+([^,.;]+(?:,[^,.;]+)*)")
        .unwrap()
});

static RE_DEP_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*,\s*|\s+and\s+").unwrap());

/// What this entry waits on: the names following `depends on`, `blocked by`,
/// `waiting on`, or `after`, split on commas and "and".
pub struct DependenciesPlugin;

impl FieldPlugin for DependenciesPlugin {
    fn name(&self) -> &str {
        "dependencies"
    }

    fn parse(&self, text: &str, _ctx: &ParseContext) -> FieldResult {
        let Some(caps) = RE_DEPENDS.captures(text) else {
            return Ok(None);
        };
        let deps: Vec<String> = RE_DEP_SPLIT
            .split(caps[1].trim())
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .collect();
        if deps.is_empty() {
            Ok(None)
        } else {
            Ok(Some(FieldValue::List(deps)))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
