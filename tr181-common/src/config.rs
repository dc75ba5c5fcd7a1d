//! Lookup configuration file
//!
//! All settings are optional. An example TOML file:
//!
//! ```toml
//! # Start with case sensitive searching
//! case_sensitive = true
//! # One of "any", "read-only" or "read-write"
//! access = "read-write"
//! # "auto" inserts a '.' between object and parameter names when the object name lacks one;
//! # "concat" joins them as written
//! name_join = "auto"
//! history_file = "/home/me/.tr181-history"
//! history_size = 1000
//! ```
use std::path::{Path, PathBuf};

use serde::Deserialize;
use snafu::{ResultExt, Snafu};

use crate::{access::AccessFilter, filter::Query, model::NameJoin};

/// Error returned when loading a configuration file
#[derive(Debug, Snafu)]
pub enum ConfigError {
    /// The file could not be read
    #[snafu(display("IO error loading {path}: {source:?}"))]
    Io {
        /// The path which was read
        path: String,
        /// The underlying IO error
        source: std::io::Error,
    },
    /// The file is not valid TOML, or has unknown or mistyped fields
    #[snafu(display("Error parsing TOML: {source}"))]
    TomlDeserialization {
        /// The toml error
        source: toml::de::Error,
    },
}

fn default_history_file() -> PathBuf {
    PathBuf::from("/tmp/tr181-cli-history")
}

fn default_history_size() -> usize {
    10000
}

/// Settings for a lookup session and the interactive shell
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct LookupConfig {
    /// Start with case sensitive searching. Defaults to false.
    #[serde(default)]
    pub case_sensitive: bool,
    /// The starting access constraint. Defaults to any.
    #[serde(default)]
    pub access: AccessFilter,
    /// How object and parameter names are joined. Defaults to auto.
    #[serde(default)]
    pub name_join: NameJoin,
    /// Where the shell keeps command history
    #[serde(default = "default_history_file")]
    pub history_file: PathBuf,
    /// The maximum number of history lines kept
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            access: AccessFilter::default(),
            name_join: NameJoin::default(),
            history_file: default_history_file(),
            history_size: default_history_size(),
        }
    }
}

impl LookupConfig {
    /// Read a configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<LookupConfig, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).context(IoSnafu {
            path: path.to_string_lossy(),
        })?;
        Self::load_from_str(&content)
    }

    /// Read a configuration from a string
    pub fn load_from_str(s: &str) -> Result<LookupConfig, ConfigError> {
        toml::from_str(s).context(TomlDeserializationSnafu)
    }

    /// The query a new session starts with
    pub fn query(&self) -> Query {
        Query::default()
            .with_case_sensitive(self.case_sensitive)
            .with_access_filter(self.access)
    }
}
