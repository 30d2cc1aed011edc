//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/boxtree/boxtree.toml`
//! 3. Local config: `<scanned dir>/.boxtree.toml`
//! 4. Environment variables: `BOXTREE_*` prefix
//!
//! Command line flags are applied on top by the CLI layer.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, IoResultExt, ScanOptions};
use crate::application::{ErrorPolicy, SortOrder};

/// Unified configuration for boxtree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Include entries whose name starts with `.`
    pub show_hidden: bool,
    /// Maximum levels below the scanned directory
    pub max_depth: Option<usize>,
    /// Entry order within a directory
    pub sort: SortOrder,
    /// List directories before files
    pub dirs_first: bool,
    /// Follow symbolic links
    pub follow_links: bool,
    /// Append `/` to directory names
    pub classify: bool,
    /// Regex patterns for entry names to leave out
    pub exclude: Vec<String>,
    /// Reaction to unreadable entries
    pub on_error: ErrorPolicy,
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub show_hidden: Option<bool>,
    pub max_depth: Option<usize>,
    pub sort: Option<SortOrder>,
    pub dirs_first: Option<bool>,
    pub follow_links: Option<bool>,
    pub classify: Option<bool>,
    pub exclude: Option<Vec<String>>,
    pub on_error: Option<ErrorPolicy>,
}

/// Get the XDG config directory for boxtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "boxtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("boxtree.toml"))
}

/// Get the path to the local config file of a scanned directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".boxtree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).with_path_context("read config", path)?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are de-duplicated
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["a", "b"], &["c"])       // → ["a", "b", "c"]
    /// merge_array(&["a", "b"], &["!a", "c"]) // → ["b", "c"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: HashSet<String> = base.iter().cloned().collect();

        for pattern in overlay {
            if let Some(negated) = pattern.strip_prefix('!') {
                result.remove(negated);
            } else {
                result.insert(pattern.clone());
            }
        }

        let mut vec: Vec<String> = result.into_iter().collect();
        vec.sort();
        vec
    }

    /// Apply global config onto defaults: every specified value replaces.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            exclude: global
                .exclude
                .clone()
                .unwrap_or_else(|| self.exclude.clone()),
            ..self.overlay_scalars(global)
        }
    }

    /// Merge a local config onto self: scalars replace, `exclude` unions.
    fn merge_with(&self, local: &RawSettings) -> Self {
        Self {
            exclude: local
                .exclude
                .as_ref()
                .map(|o| Self::merge_array(&self.exclude, o))
                .unwrap_or_else(|| self.exclude.clone()),
            ..self.overlay_scalars(local)
        }
    }

    fn overlay_scalars(&self, raw: &RawSettings) -> Self {
        Self {
            show_hidden: raw.show_hidden.unwrap_or(self.show_hidden),
            max_depth: raw.max_depth.or(self.max_depth),
            sort: raw.sort.unwrap_or(self.sort),
            dirs_first: raw.dirs_first.unwrap_or(self.dirs_first),
            follow_links: raw.follow_links.unwrap_or(self.follow_links),
            classify: raw.classify.unwrap_or(self.classify),
            exclude: self.exclude.clone(),
            on_error: raw.on_error.unwrap_or(self.on_error),
        }
    }

    /// Load settings for scanning `local_dir` with layered precedence.
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config (`exclude` REPLACES defaults)
    /// 3. Local `.boxtree.toml` (`exclude` UNIONS, `!pattern` removes)
    /// 4. Environment variables: `BOXTREE_*` (REPLACE)
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_with(global_config_path().as_deref(), local_dir)
    }

    /// [`Settings::load`] with an explicit global config location.
    pub fn load_with(
        global_path: Option<&Path>,
        local_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_path {
            if global_path.exists() {
                let raw = load_raw_settings(global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        Self::apply_env_overrides(current)
    }

    /// Apply BOXTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("BOXTREE")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("exclude"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value(&config, "show_hidden")? {
            settings.show_hidden = val;
        }
        if let Some(val) = env_value::<usize>(&config, "max_depth")? {
            settings.max_depth = Some(val);
        }
        if let Some(val) = env_value::<String>(&config, "sort")? {
            settings.sort = parse_enum("BOXTREE_SORT", &val)?;
        }
        if let Some(val) = env_value(&config, "dirs_first")? {
            settings.dirs_first = val;
        }
        if let Some(val) = env_value(&config, "follow_links")? {
            settings.follow_links = val;
        }
        if let Some(val) = env_value(&config, "classify")? {
            settings.classify = val;
        }
        if let Some(val) = env_value(&config, "exclude")? {
            settings.exclude = val;
        }
        if let Some(val) = env_value::<String>(&config, "on_error")? {
            settings.on_error = parse_enum("BOXTREE_ON_ERROR", &val)?;
        }

        Ok(settings)
    }

    /// Scanner options derived from these settings.
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            show_hidden: self.show_hidden,
            max_depth: self.max_depth,
            sort: self.sort,
            dirs_first: self.dirs_first,
            follow_links: self.follow_links,
            classify: self.classify,
            exclude: self.exclude.clone(),
            on_error: self.on_error,
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# boxtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/boxtree/boxtree.toml  (defines your baseline)
#   Local:  <dir>/.boxtree.toml             (per-directory additions)
#   Env:    BOXTREE_* environment variables  (explicit overrides)
#
# Use "!pattern" in a local config to REMOVE an inherited exclude:
#   exclude = ["^dist$", "!^target$"]

# Show entries starting with "."
# show_hidden = false

# Levels to descend below the listed directory
# max_depth = 3

# "name" or "none"
# sort = "name"

# dirs_first = false
# follow_links = false

# Append "/" to directory names
# classify = false

# Regex patterns matched against entry names. A leading "~" is expanded
# to the home directory; "$" keeps its regex meaning.
# exclude = ["^target$", "^node_modules$"]

# "skip", "placeholder" or "fail"
# on_error = "skip"
"#
        .to_string()
    }
}

/// Typed value of one environment key; `None` when the variable is unset.
fn env_value<'de, T: Deserialize<'de>>(
    config: &Config,
    key: &str,
) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(ApplicationError::Config {
            message: format!("BOXTREE_{}: {}", key.to_uppercase(), e),
        }),
    }
}

fn parse_enum<E: ValueEnum>(key: &str, value: &str) -> Result<E, ApplicationError> {
    E::from_str(value, true).map_err(|e| ApplicationError::Config {
        message: format!("{key}: {e}"),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
