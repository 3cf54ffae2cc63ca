//! Plugin registry: holds the active plugin set and runs it over one input.
//!
//! The registry is an explicitly constructed value, not a process-wide
//! singleton; tests build as many independent registries as they like.
//! Registration validates plugin shape (non-empty, unique name) and rejects
//! duplicates without touching the existing plugin. Execution isolates
//! failures per plugin: an error or panic in one plugin is collected into
//! the run's failure list and never affects its siblings. The decision to
//! log-and-drop lives in the facade, which owns failure policy.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::entry::FieldValue;
use crate::error::{PluginError, RegistryError};
use crate::fields::{FieldPlugin, ParseContext};

/// One plugin's failure during a run, keyed by plugin name.
#[derive(Debug)]
pub struct PluginFailure {
    pub plugin: String,
    pub error: PluginError,
}

/// The aggregate outcome of running every registered plugin over one input.
#[derive(Debug, Default)]
pub struct ParseRun {
    /// Non-empty plugin contributions, keyed by plugin name.
    pub values: BTreeMap<String, FieldValue>,
    /// Plugins that errored or panicked; their contributions are absent.
    pub failures: Vec<PluginFailure>,
}

impl ParseRun {
    /// "Nothing recognized": zero plugins produced output.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Registry of field plugins, iterated in registration order.
pub struct PluginRegistry {
    plugins: Vec<(String, Box<dyn FieldPlugin>)>,
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.plugins.iter().map(|(n, _)| n.as_str()).collect();
        f.debug_struct("PluginRegistry")
            .field("plugins", &names)
            .finish()
    }
}

impl PluginRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Create a registry pre-populated with the builtin field plugins.
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        for plugin in crate::fields::builtins() {
            if let Err(e) = reg.register(plugin) {
                tracing::warn!(error = %e, "skipping builtin plugin");
            }
        }
        reg
    }

    /// Register a plugin. Rejects empty names and duplicates; a rejected
    /// registration leaves the existing plugin set untouched.
    pub fn register(&mut self, plugin: Box<dyn FieldPlugin>) -> Result<(), RegistryError> {
        let name = plugin.name().trim().to_string();
        if name.is_empty() {
            return Err(RegistryError::EmptyPluginName);
        }
        if self.contains(&name) {
            return Err(RegistryError::DuplicateName { name });
        }
        self.plugins.push((name, plugin));
        Ok(())
    }

    /// Whether a plugin with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.plugins.iter().any(|(n, _)| n == name)
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Registered plugin names, in registration order.
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Run every registered plugin over `text`, collecting non-empty results
    /// keyed by plugin name and isolating per-plugin failures.
    pub fn parse_all(&self, text: &str, ctx: &ParseContext) -> ParseRun {
        let mut run = ParseRun::default();

        for (name, plugin) in &self.plugins {
            match catch_unwind(AssertUnwindSafe(|| plugin.parse(text, ctx))) {
                Ok(Ok(Some(value))) => {
                    run.values.insert(name.clone(), value);
                }
                Ok(Ok(None)) => {}
                Ok(Err(error)) => {
                    run.failures.push(PluginFailure {
                        plugin: name.clone(),
                        error,
                    });
                }
                Err(_) => {
                    run.failures.push(PluginFailure {
                        plugin: name.clone(),
                        error: PluginError::Panicked {
                            plugin: name.clone(),
                        },
                    });
                }
            }
        }

        run
    }

    /// Invoke every plugin's `cleanup()` hook best-effort, then clear the
    /// registry. Used at process teardown or test reset.
    pub fn cleanup(&mut self) {
        for (name, plugin) in &self.plugins {
            if catch_unwind(AssertUnwindSafe(|| plugin.cleanup())).is_err() {
                tracing::warn!(plugin = %name, "plugin cleanup panicked");
            }
        }
        self.plugins.clear();
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::FieldValue;
    use crate::fields::FieldResult;
    use crate::fields::testutil::ctx;

    struct EchoPlugin {
        name: &'static str,
    }

    impl FieldPlugin for EchoPlugin {
        fn name(&self) -> &str {
            self.name
        }

        fn parse(&self, text: &str, _ctx: &ParseContext) -> FieldResult {
            Ok(Some(FieldValue::Text(text.to_string())))
        }
    }

    struct ThrowingPlugin;

    impl FieldPlugin for ThrowingPlugin {
        fn name(&self) -> &str {
            "throwing"
        }

        fn parse(&self, _text: &str, _ctx: &ParseContext) -> FieldResult {
            Err(PluginError::Failed {
                plugin: "throwing".into(),
                message: "always fails".into(),
            })
        }
    }

    struct PanickingPlugin;

    impl FieldPlugin for PanickingPlugin {
        fn name(&self) -> &str {
            "panicking"
        }

        fn parse(&self, _text: &str, _ctx: &ParseContext) -> FieldResult {
            panic!("boom");
        }
    }

    #[test]
    fn with_builtins_registers_full_set() {
        let reg = PluginRegistry::with_builtins();
        assert_eq!(reg.len(), 21);
        assert!(reg.contains("action"));
        assert!(reg.contains("timeOfDay"));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut reg = PluginRegistry::new();
        reg.register(Box::new(EchoPlugin { name: "echo" })).unwrap();

        let err = reg
            .register(Box::new(EchoPlugin { name: "echo" }))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName { .. }));
        assert_eq!(reg.len(), 1);

        // The original keeps working.
        let run = reg.parse_all("hello", &ctx());
        assert_eq!(
            run.values.get("echo"),
            Some(&FieldValue::Text("hello".into()))
        );
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut reg = PluginRegistry::new();
        let err = reg.register(Box::new(EchoPlugin { name: "  " })).unwrap_err();
        assert!(matches!(err, RegistryError::EmptyPluginName));
        assert!(reg.is_empty());
    }

    #[test]
    fn failing_plugin_does_not_affect_siblings() {
        let mut reg = PluginRegistry::new();
        reg.register(Box::new(EchoPlugin { name: "echo" })).unwrap();
        reg.register(Box::new(ThrowingPlugin)).unwrap();

        let run = reg.parse_all("hello", &ctx());
        assert_eq!(
            run.values.get("echo"),
            Some(&FieldValue::Text("hello".into()))
        );
        assert!(!run.values.contains_key("throwing"));
        assert_eq!(run.failures.len(), 1);
        assert_eq!(run.failures[0].plugin, "throwing");
    }

    #[test]
    fn panicking_plugin_is_isolated() {
        let mut reg = PluginRegistry::new();
        reg.register(Box::new(PanickingPlugin)).unwrap();
        reg.register(Box::new(EchoPlugin { name: "echo" })).unwrap();

        let run = reg.parse_all("hello", &ctx());
        assert_eq!(
            run.values.get("echo"),
            Some(&FieldValue::Text("hello".into()))
        );
        assert_eq!(run.failures.len(), 1);
        assert!(matches!(
            run.failures[0].error,
            PluginError::Panicked { .. }
        ));
    }

    #[test]
    fn empty_run_signals_nothing_recognized() {
        let reg = PluginRegistry::new();
        let run = reg.parse_all("anything", &ctx());
        assert!(run.is_empty());
    }

    #[test]
    fn cleanup_clears_registry() {
        let mut reg = PluginRegistry::with_builtins();
        assert!(!reg.is_empty());
        reg.cleanup();
        assert!(reg.is_empty());

        // A fresh registration works after cleanup.
        reg.register(Box::new(EchoPlugin { name: "echo" })).unwrap();
        assert_eq!(reg.len(), 1);
    }
}
