//! Layered configuration.
//!
//! Settings are merged with figment, later layers winning:
//!
//! 1. built-in defaults
//! 2. `config.toml` in the platform config directory, or the file given with
//!    `--config`
//! 3. `HASHDUPE_*` environment variables
//!
//! CLI flags are applied on top by [`crate::app`].
//!
//! ```toml
//! exclusions = ["\\.git", "node_modules"]
//! io_threads = 8
//! prune_excluded = false
//! progress = true
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::scanner::walker::DEFAULT_THREADS;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "HASHDUPE_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Exclusion regexes applied to every walk, before any given on the
    /// command line
    pub exclusions: Vec<String>,
    /// Worker threads per walk
    pub io_threads: usize,
    /// Skip whole subtrees under excluded directories
    pub prune_excluded: bool,
    /// Show a progress spinner
    pub progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclusions: Vec::new(),
            io_threads: DEFAULT_THREADS,
            prune_excluded: false,
            progress: true,
        }
    }
}

impl Config {
    /// Load from the default config file (if any) and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is malformed, or a value has
    /// the wrong type.
    pub fn load() -> Result<Self, figment::Error> {
        match Self::default_path() {
            Some(path) => Self::load_from_path(path),
            None => Self::figment(None).extract(),
        }
    }

    /// Load using `path` as the config file. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, figment::Error> {
        let path = path.as_ref();
        log::debug!("Loading configuration from {}", path.display());
        Self::figment(Some(path)).extract()
    }

    /// The layered figment, for callers that want to add providers.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Platform config file path, e.g. `~/.config/hashdupe/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "hashdupe", "hashdupe")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Render as TOML, e.g. for writing a starter file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
