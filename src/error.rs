//! Rich diagnostic error types for the notelex parser.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text. These are reporting values, not control
//! flow for the parse path: nothing here ever escapes [`crate::parser::Parser::parse`],
//! which degrades to a defaulted entry instead.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the notelex parser.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the embedding application.
#[derive(Debug, Error, Diagnostic)]
pub enum NotelexError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Plugin(#[from] PluginError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Pattern(#[from] PatternError),
}

/// Result type used throughout the notelex crate.
pub type NotelexResult<T> = std::result::Result<T, NotelexError>;

// ---------------------------------------------------------------------------
// Registry errors (registration-time rejection)
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum RegistryError {
    #[error("a plugin named '{name}' is already registered")]
    #[diagnostic(
        code(notelex::registry::duplicate_name),
        help(
            "Plugin names must be unique; the existing plugin was left untouched. \
             Pick a different name, or call `cleanup()` first if you intend to \
             replace the whole plugin set."
        )
    )]
    DuplicateName { name: String },

    #[error("plugin name must not be empty")]
    #[diagnostic(
        code(notelex::registry::empty_name),
        help("Give the plugin a non-empty name; results are keyed by it in the parsed envelope.")
    )]
    EmptyPluginName,
}

// ---------------------------------------------------------------------------
// Plugin execution errors (caught at the registry boundary)
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum PluginError {
    #[error("plugin '{plugin}' failed: {message}")]
    #[diagnostic(
        code(notelex::plugin::failed),
        help(
            "The plugin reported an internal failure for this input. Its contribution \
             was dropped; all other plugins still ran."
        )
    )]
    Failed { plugin: String, message: String },

    #[error("plugin '{plugin}' panicked during parse")]
    #[diagnostic(
        code(notelex::plugin::panicked),
        help(
            "The plugin panicked and was isolated at the registry boundary. \
             Fix the plugin; the rest of the parse completed normally."
        )
    )]
    Panicked { plugin: String },
}

// ---------------------------------------------------------------------------
// Pattern errors (compile-time skip, logged not raised)
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum PatternError {
    #[error("pattern '{name}' failed to compile: {message}")]
    #[diagnostic(
        code(notelex::pattern::invalid),
        help(
            "The pattern source is not a valid regular expression. The name is \
             absent from the compiled library; plugins treat a missing pattern \
             as 'no match'."
        )
    )]
    Invalid { name: String, message: String },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_error_converts_to_notelex_error() {
        let err = RegistryError::DuplicateName {
            name: "status".into(),
        };
        let top: NotelexError = err.into();
        assert!(matches!(
            top,
            NotelexError::Registry(RegistryError::DuplicateName { .. })
        ));
    }

    #[test]
    fn plugin_error_converts_to_notelex_error() {
        let err = PluginError::Panicked {
            plugin: "custom".into(),
        };
        let top: NotelexError = err.into();
        assert!(matches!(
            top,
            NotelexError::Plugin(PluginError::Panicked { .. })
        ));
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = PluginError::Failed {
            plugin: "duration".into(),
            message: "bad capture".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("duration"));
        assert!(msg.contains("bad capture"));

        let err = PatternError::Invalid {
            name: "verbs".into(),
            message: "unclosed group".into(),
        };
        assert!(format!("{err}").contains("verbs"));
    }
}
