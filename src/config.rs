//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/orgtree/orgtree.toml`
//! 3. Local config: `.orgtree.toml` in the working directory
//! 4. Environment variables: `ORGTREE_*` prefix, `__` between section and key
//!
//! Validation thresholds are fixed constants in `domain::rules`, not settings.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, RosterOptions};
use crate::domain::DuplicateIdPolicy;

pub const LOCAL_CONFIG_FILE: &str = ".orgtree.toml";

/// Roster parsing settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RosterConfig {
    /// Require the `Id,firstName,lastName,salary,managerId` header line
    pub require_header: bool,
    /// Skip malformed rows with a warning instead of failing
    pub skip_malformed_rows: bool,
}

impl Default for RosterConfig {
    fn default() -> Self {
        let options = RosterOptions::default();
        Self {
            require_header: options.require_header,
            skip_malformed_rows: options.skip_malformed_rows,
        }
    }
}

impl RosterConfig {
    pub fn options(&self) -> RosterOptions {
        RosterOptions {
            require_header: self.require_header,
            skip_malformed_rows: self.skip_malformed_rows,
        }
    }
}

/// Tree construction settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TreeConfig {
    /// `last_write_wins` or `reject`
    pub duplicate_ids: DuplicateIdPolicy,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Print the hierarchy before the validation report
    pub show_tree: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { show_tree: true }
    }
}

/// Raw settings for intermediate parsing (None = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub roster: RawRosterConfig,
    pub tree: RawTreeConfig,
    pub output: RawOutputConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRosterConfig {
    pub require_header: Option<bool>,
    pub skip_malformed_rows: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawTreeConfig {
    pub duplicate_ids: Option<DuplicateIdPolicy>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawOutputConfig {
    pub show_tree: Option<bool>,
}

/// Unified configuration for orgtree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub roster: RosterConfig,
    pub tree: TreeConfig,
    pub output: OutputConfig,
}

/// Get the XDG config directory for orgtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orgtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("orgtree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(LOCAL_CONFIG_FILE)
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
    /// Overlay wins for every key it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            roster: RosterConfig {
                require_header: overlay
                    .roster
                    .require_header
                    .unwrap_or(self.roster.require_header),
                skip_malformed_rows: overlay
                    .roster
                    .skip_malformed_rows
                    .unwrap_or(self.roster.skip_malformed_rows),
            },
            tree: TreeConfig {
                duplicate_ids: overlay
                    .tree
                    .duplicate_ids
                    .unwrap_or(self.tree.duplicate_ids),
            },
            output: OutputConfig {
                show_tree: overlay.output.show_tree.unwrap_or(self.output.show_tree),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Directory searched for `.orgtree.toml` (usually cwd)
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        let local = local_dir.map(local_config_path).filter(|p| p.exists());
        Self::load_from(global.as_deref(), local.as_deref())
    }

    /// Load from explicit config files; missing layers are skipped.
    pub fn load_from(global: Option<&Path>, local: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        for path in [global, local].into_iter().flatten() {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        Self::apply_env_overrides(current)
    }

    /// Apply ORGTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ORGTREE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value(&config, "roster.require_header")? {
            settings.roster.require_header = val;
        }
        if let Some(val) = env_value(&config, "roster.skip_malformed_rows")? {
            settings.roster.skip_malformed_rows = val;
        }
        if let Some(val) = env_value::<DuplicateIdPolicy>(&config, "tree.duplicate_ids")? {
            settings.tree.duplicate_ids = val;
        }
        if let Some(val) = env_value(&config, "output.show_tree")? {
            settings.output.show_tree = val;
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
        r#"# orgtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/orgtree/orgtree.toml
#   Local:  ./.orgtree.toml
#   Env:    ORGTREE_<SECTION>__<KEY>, e.g. ORGTREE_TREE__DUPLICATE_IDS=reject
#
# Salary bounds (1.20x / 1.50x of the direct-report average) and the
# reporting depth limit (4) are fixed and cannot be configured.

[roster]
# Require the "Id,firstName,lastName,salary,managerId" header line
# require_header = true

# Skip malformed rows with a warning (false: abort on the first bad row)
# skip_malformed_rows = true

[tree]
# What to do when an id appears twice: "last_write_wins" or "reject"
# duplicate_ids = "last_write_wins"

[output]
# Print the hierarchy before the validation report
# show_tree = true
"#
        .to_string()
    }
}

/// An unset key is `None`; a set key that does not parse is an error, as in a TOML layer.
fn env_value<T: DeserializeOwned>(
    config: &Config,
    key: &str,
) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
