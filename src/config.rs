//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/lighttree/lighttree.toml`
//! 3. Local config: `<dir>/.lighttree.toml` (usually the working directory)
//! 4. Environment variables: `LIGHTTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::browser::DEFAULT_REPR_NAME;
use crate::domain::tree::DEFAULT_PATH_SEPARATOR;
use crate::domain::LineStyle;
use crate::util::path::expand_path;

/// Raw settings for intermediate parsing (None means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub line_style: Option<LineStyle>,
    pub limit: Option<usize>,
    pub path_separator: Option<String>,
    pub coerce_attrs: Option<bool>,
    pub repr_name: Option<String>,
    pub history_file: Option<PathBuf>,
}

/// Unified configuration for lighttree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Glyph set used when rendering trees
    pub line_style: LineStyle,
    /// Maximum number of rendered lines (unlimited when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Separator between keys in node paths
    pub path_separator: String,
    /// Coerce child keys into valid attribute names in the browser
    pub coerce_attrs: bool,
    /// Name shown in browser headers
    pub repr_name: String,
    /// Line editor history of the interactive browser
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            line_style: LineStyle::default(),
            limit: None,
            path_separator: DEFAULT_PATH_SEPARATOR.to_string(),
            coerce_attrs: false,
            repr_name: DEFAULT_REPR_NAME.to_string(),
            history_file: default_history_file(),
        }
    }
}

/// Default history location (`$XDG_DATA_HOME/lighttree/history.txt`).
fn default_history_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "lighttree").map(|dirs| dirs.data_dir().join("history.txt"))
}

/// Get the XDG config directory for lighttree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "lighttree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("lighttree.toml"))
}

/// Get the path to the local config file in `dir`.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".lighttree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.history_file = self.history_file.as_deref().map(expand_path);
    }

    /// Merge overlay config onto self (base): overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            line_style: overlay.line_style.unwrap_or(self.line_style),
            limit: overlay.limit.or(self.limit),
            path_separator: overlay
                .path_separator
                .clone()
                .unwrap_or_else(|| self.path_separator.clone()),
            coerce_attrs: overlay.coerce_attrs.unwrap_or(self.coerce_attrs),
            repr_name: overlay
                .repr_name
                .clone()
                .unwrap_or_else(|| self.repr_name.clone()),
            history_file: overlay
                .history_file
                .clone()
                .or_else(|| self.history_file.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.lighttree.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/lighttree/lighttree.toml`
    /// 3. Local config: `<local_dir>/.lighttree.toml`
    /// 4. Environment variables: `LIGHTTREE_*` prefix
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply LIGHTTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(Environment::with_prefix("LIGHTTREE").separator("__"));
        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("line_style") {
            settings.line_style = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_int("limit") {
            settings.limit = usize::try_from(val).ok();
        }
        if let Ok(val) = config.get_string("path_separator") {
            settings.path_separator = val;
        }
        if let Ok(val) = config.get_bool("coerce_attrs") {
            settings.coerce_attrs = val;
        }
        if let Ok(val) = config.get_string("repr_name") {
            settings.repr_name = val;
        }
        if let Ok(val) = config.get_string("history_file") {
            settings.history_file = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# lighttree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/lighttree/lighttree.toml
#   Local:  ./.lighttree.toml
#   Env:    LIGHTTREE_* environment variables (e.g. LIGHTTREE_LIMIT=40)

# Glyphs: ascii, ascii-ex, ascii-exr, ascii-em, ascii-emv, ascii-emh
# line_style = "ascii-ex"

# Truncate rendered trees after this many lines
# limit = 100

# Separator between keys in node paths (a.b.0)
# path_separator = "."

# Turn keys like "2022-01" into attribute names like "_2022_01" when browsing
# coerce_attrs = false

# Name shown in browser headers
# repr_name = "Tree"

# History of the interactive browser
# history_file = "~/.local/share/lighttree/history.txt"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_created_then_match_domain_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.line_style, LineStyle::AsciiEx);
        assert_eq!(settings.path_separator, ".");
        assert_eq!(settings.repr_name, "Tree");
        assert_eq!(settings.limit, None);
        assert!(!settings.coerce_attrs);
    }

    #[test]
    fn given_overlay_when_merging_then_specified_fields_win() {
        let base = Settings::default();
        let overlay = RawSettings {
            line_style: Some(LineStyle::Ascii),
            limit: Some(5),
            ..RawSettings::default()
        };

        let result = base.merge_with(&overlay);

        assert_eq!(result.line_style, LineStyle::Ascii);
        assert_eq!(result.limit, Some(5));
        assert_eq!(result.path_separator, base.path_separator);
        assert_eq!(result.repr_name, base.repr_name);
    }

    #[test]
    fn given_toml_when_parsed_then_kebab_case_styles_accepted() {
        let raw: RawSettings = toml::from_str("line_style = \"ascii-emh\"\ncoerce_attrs = true\n").unwrap();
        assert_eq!(raw.line_style, Some(LineStyle::AsciiEmh));
        assert_eq!(raw.coerce_attrs, Some(true));
        assert_eq!(raw.limit, None);
    }

    #[test]
    fn given_tilde_in_history_file_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            history_file: Some(PathBuf::from("~/.lighttree_history")),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let history = settings.history_file.unwrap();
        assert!(history.to_string_lossy().starts_with(&home));
        assert!(!history.to_string_lossy().contains('~'));
    }

    #[test]
    fn given_settings_when_serialized_then_round_trip_through_toml() {
        let settings = Settings {
            limit: Some(12),
            history_file: None,
            ..Settings::default()
        };

        let toml = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&toml).unwrap();

        assert!(toml.contains("line_style = \"ascii-ex\""));
        assert_eq!(parsed.limit, Some(12));
        assert_eq!(parsed.line_style, settings.line_style);
    }

    #[test]
    fn given_template_when_parsed_then_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.line_style.is_none());
    }
}
