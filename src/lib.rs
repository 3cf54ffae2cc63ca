//! # notelex
//!
//! Natural-language entry parser for the Notelex personal information
//! manager. Free-form text ("Call Fiona next wednesday re Project Cheesecake
//! urgently with @robin and @ian #disaster") is run through a pipeline of
//! independent field plugins, each owning one semantic attribute, and merged
//! into a single [`entry::ParsedEntry`] the storage layer persists.
//!
//! ## Architecture
//!
//! - **Pattern library** (`patterns`): shared precompiled lexical cues
//! - **Date resolver** (`dates`): relative phrases → absolute dates, pure
//!   over an injected reference instant
//! - **Field plugins** (`fields`): one unit per attribute, uniform contract
//! - **Plugin registry** (`registry`): registration validation + per-plugin
//!   failure isolation
//! - **Parser facade** (`parser`): normalization, merging, defaults, and the
//!   never-throws guarantee
//! - **Validation** (`validate`): heuristic gap-filling and advisory checks
//!
//! ## Library usage
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use notelex::parser::Parser;
//!
//! let parser = Parser::new();
//! let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
//! let entry = parser.parse_at("Call John next week", now);
//! assert_eq!(entry.parsed.action.as_deref(), Some("call"));
//! assert_eq!(entry.parsed.contact.as_deref(), Some("John"));
//! ```

pub mod dates;
pub mod entry;
pub mod error;
pub mod fields;
pub mod parser;
pub mod patterns;
pub mod registry;
pub mod validate;
