//! Plugin configuration.
//!
//! Hosts pass a partial [`PluginOptions`] record; [`PluginConfig::resolve`] overlays it on
//! the documented defaults once per plugin lifetime. The resolved config is read-only and
//! shared by every transform call.

use crate::error::ConfigError;
#[cfg(feature = "napi")]
use napi_derive::napi;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ═══════════════════════════════════════════════════════════════════════════════
// DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

pub const DEFAULT_SOURCE_PATH_PREFIX: &str = "/app/src/";

/// Wrapper components that render no DOM of their own.
pub const DEFAULT_EXCLUDE_TAGS: [&str; 9] = [
    "Fragment",
    "React.Fragment",
    "<>",
    "Suspense",
    "React.Suspense",
    "StrictMode",
    "React.StrictMode",
    "Profiler",
    "React.Profiler",
];

/// Hook-style names never render markup.
const HOOK_PREFIX: &str = "use";
const PRIVATE_PREFIX: char = '_';

// ═══════════════════════════════════════════════════════════════════════════════
// OPTIONS (partial, host-supplied)
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
pub struct PluginOptions {
    pub enabled: Option<bool>,
    pub exclude_tags: Option<Vec<String>>,
    pub source_path_prefix: Option<String>,
    pub include_line_numbers: Option<bool>,
    pub verbose: Option<bool>,
}

impl PluginOptions {
    /// Parse options from JSON text. Unknown keys are ignored.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESOLVED CONFIG
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    pub enabled: bool,
    pub exclude_tags: HashSet<String>,
    pub source_path_prefix: String,
    pub include_line_numbers: bool,
    pub verbose: bool,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            exclude_tags: DEFAULT_EXCLUDE_TAGS.iter().map(|t| t.to_string()).collect(),
            source_path_prefix: DEFAULT_SOURCE_PATH_PREFIX.to_string(),
            include_line_numbers: true,
            verbose: false,
        }
    }
}

impl PluginConfig {
    /// Overlay `options` on the defaults. Missing keys keep their default;
    /// a supplied `exclude_tags` list replaces the default set.
    pub fn resolve(options: PluginOptions) -> Self {
        let defaults = Self::default();
        Self {
            enabled: options.enabled.unwrap_or(defaults.enabled),
            exclude_tags: options
                .exclude_tags
                .map(|tags| tags.into_iter().collect())
                .unwrap_or(defaults.exclude_tags),
            source_path_prefix: options
                .source_path_prefix
                .unwrap_or(defaults.source_path_prefix),
            include_line_numbers: options
                .include_line_numbers
                .unwrap_or(defaults.include_line_numbers),
            verbose: options.verbose.unwrap_or(defaults.verbose),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        PluginOptions::from_json(json).map(Self::resolve)
    }

    /// Name-based exclusion: explicit exclude list first, then the `use` / `_` prefix rules.
    /// An empty (unresolvable) name is never excluded.
    pub fn is_excluded(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        self.exclude_tags.contains(name)
            || name.starts_with(HOOK_PREFIX)
            || name.starts_with(PRIVATE_PREFIX)
    }

    /// Value baked into `data-source-file`.
    pub fn source_file(&self, relative_path: &str) -> String {
        format!("{}{}", self.source_path_prefix, relative_path)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ACTIVATION
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    Development,
    Production,
}

impl BuildMode {
    /// Map the host's mode/command string. Dev server and development builds both count.
    pub fn from_host(mode: &str) -> Self {
        match mode {
            "development" | "serve" => BuildMode::Development,
            _ => BuildMode::Production,
        }
    }
}

/// Explicit `enabled` always wins; otherwise the plugin only runs in development.
pub fn should_activate(options: &PluginOptions, mode: BuildMode) -> bool {
    match options.enabled {
        Some(enabled) => enabled,
        None => mode == BuildMode::Development,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI EXPORTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
#[napi(js_name = "shouldActivate")]
pub fn should_activate_native(options: Option<PluginOptions>, mode: String) -> bool {
    should_activate(&options.unwrap_or_default(), BuildMode::from_host(&mode))
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PluginConfig::resolve(PluginOptions::default());
        assert!(config.enabled);
        assert!(config.include_line_numbers);
        assert!(!config.verbose);
        assert_eq!(config.source_path_prefix, "/app/src/");
        assert_eq!(config.exclude_tags.len(), DEFAULT_EXCLUDE_TAGS.len());
        for tag in DEFAULT_EXCLUDE_TAGS {
            assert!(config.exclude_tags.contains(tag), "missing default {tag}");
        }
        assert_eq!(config, PluginConfig::default());
    }

    #[test]
    fn test_partial_overlay() {
        let config = PluginConfig::resolve(PluginOptions {
            source_path_prefix: Some("/workspace/src/".to_string()),
            include_line_numbers: Some(false),
            ..PluginOptions::default()
        });
        assert_eq!(config.source_path_prefix, "/workspace/src/");
        assert!(!config.include_line_numbers);
        // Untouched keys keep defaults
        assert!(config.enabled);
        assert!(config.exclude_tags.contains("React.Fragment"));
    }

    #[test]
    fn test_exclude_tags_replace_defaults() {
        let config = PluginConfig::resolve(PluginOptions {
            exclude_tags: Some(vec!["Portal".to_string()]),
            ..PluginOptions::default()
        });
        assert!(config.is_excluded("Portal"));
        assert!(!config.is_excluded("Fragment"));
    }

    #[test]
    fn test_from_json_ignores_unknown_keys() {
        let config = PluginConfig::from_json(
            r#"{ "verbose": true, "excludeTags": ["Slot"], "hotReload": { "port": 24678 } }"#,
        )
        .unwrap();
        assert!(config.verbose);
        assert!(config.is_excluded("Slot"));
        assert_eq!(config.source_path_prefix, DEFAULT_SOURCE_PATH_PREFIX);
    }

    #[test]
    fn test_from_json_rejects_malformed_text() {
        assert!(PluginOptions::from_json("{ enabled: ").is_err());
    }

    #[test]
    fn test_prefix_rules() {
        let config = PluginConfig::default();
        assert!(config.is_excluded("useTheme"));
        assert!(config.is_excluded("_Internal"));
        assert!(config.is_excluded("Suspense"));
        assert!(!config.is_excluded("Button"));
        assert!(!config.is_excluded("div"));
        assert!(!config.is_excluded("User")); // Case-sensitive prefix
        assert!(!config.is_excluded(""));
    }

    #[test]
    fn test_source_file() {
        let config = PluginConfig::default();
        assert_eq!(
            config.source_file("components/Button.tsx"),
            "/app/src/components/Button.tsx"
        );
    }

    #[test]
    fn test_should_activate() {
        let unset = PluginOptions::default();
        assert!(should_activate(&unset, BuildMode::Development));
        assert!(!should_activate(&unset, BuildMode::Production));

        let forced_on = PluginOptions {
            enabled: Some(true),
            ..PluginOptions::default()
        };
        assert!(should_activate(&forced_on, BuildMode::Production));

        let forced_off = PluginOptions {
            enabled: Some(false),
            ..PluginOptions::default()
        };
        assert!(!should_activate(&forced_off, BuildMode::Development));
    }

    #[test]
    fn test_build_mode_from_host() {
        assert_eq!(BuildMode::from_host("serve"), BuildMode::Development);
        assert_eq!(BuildMode::from_host("development"), BuildMode::Development);
        assert_eq!(BuildMode::from_host("build"), BuildMode::Production);
        assert_eq!(BuildMode::from_host("production"), BuildMode::Production);
    }
}
