//! Application configuration management.
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. A TOML file: `--config PATH`, or `twintrim/config.toml` in the
//!    platform configuration directory
//! 3. `TWINTRIM_*` environment variables (`TWINTRIM_HASH_FUNCTION=sha256`)
//! 4. Command-line flags
//!
//! The merged [`Config`] is turned into the immutable [`Options`] record
//! by [`Config::into_options`], which also rejects contradictions.
//!
//! ```toml
//! hash_function = "sha256"
//! recursive = true
//! pattern = '(.+?)(?:__\d)*\..*'
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::options::{ConfigurationError, Options};
use crate::scanner::HashAlgorithm;

/// Prefix of environment variables read into the configuration.
pub const ENV_PREFIX: &str = "TWINTRIM_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Digest used to compare file content
    pub hash_function: HashAlgorithm,
    /// Search subdirectories
    pub recursive: bool,
    /// Report only, delete nothing
    pub no_action: bool,
    /// Ask which file to keep
    pub interactive: bool,
    /// Keep the oldest file instead of the shortest name
    pub keep_oldest: bool,
    /// Replace deleted files with hard links to the kept file
    pub make_links: bool,
    /// Allow deleting hard links of the kept file
    pub remove_links: bool,
    /// Custom filename pattern
    pub pattern: Option<String>,
    /// Capture groups of `pattern` forming the key
    pub key_groups: Option<Vec<usize>>,
    /// Group by checksum alone
    pub only_checksum: bool,
}

impl Config {
    /// Load defaults, the configuration file and the environment.
    ///
    /// With `explicit` set, that file must exist. Otherwise the platform
    /// default file is used when present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Load`] if the file is missing or
    /// malformed, or a value has the wrong type.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigurationError> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        match explicit {
            Some(path) => {
                if !path.is_file() {
                    let message = format!("config file not found: {}", path.display());
                    return Err(ConfigurationError::Load(Box::new(figment::Error::from(
                        message,
                    ))));
                }
                figment = figment.merge(Toml::file(path));
            }
            None => {
                if let Some(path) = Self::default_path().filter(|p| p.is_file()) {
                    log::debug!("Reading configuration from {}", path.display());
                    figment = figment.merge(Toml::file(path));
                }
            }
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigurationError::Load(Box::new(e)))
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "twintrim", "twintrim")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply command-line flags on top of the loaded settings.
    ///
    /// Switches given on the command line turn a setting on; values given on
    /// the command line replace the loaded ones.
    pub fn merge_cli(&mut self, cli: &Cli) {
        self.recursive |= cli.recursive;
        self.no_action |= cli.no_action;
        self.interactive |= cli.interactive;
        self.keep_oldest |= cli.keep_oldest;
        self.make_links |= cli.make_links;
        self.remove_links |= cli.remove_links;
        self.only_checksum |= cli.only_checksum;

        if let Some(algorithm) = cli.hash_function {
            self.hash_function = algorithm;
        }
        if let Some(pattern) = &cli.pattern {
            self.pattern = Some(pattern.clone());
        }
        if !cli.key_groups.is_empty() {
            self.key_groups = Some(cli.key_groups.clone());
        }
    }

    /// Produce the validated options record.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the settings contradict each other
    /// or the pattern cannot be used.
    pub fn into_options(self) -> Result<Options, ConfigurationError> {
        let options = Options {
            hash_algorithm: self.hash_function,
            recursive: self.recursive,
            dry_run: self.no_action,
            interactive: self.interactive,
            keep_oldest: self.keep_oldest,
            make_links: self.make_links,
            remove_links: self.remove_links,
            regex_pattern: self.pattern,
            key_groups: self.key_groups,
            skip_regex: self.only_checksum,
        };
        options.validate()?;
        Ok(options)
    }
}
