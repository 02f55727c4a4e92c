//! Error types for configuration resolution

use crate::functions::Arity;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while loading, merging or evaluating a configuration.
///
/// Resolution is all-or-nothing: any of these aborts the whole operation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Entry point or override target does not exist.
    #[error("config file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// File exists but could not be read.
    #[error("failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File contents are not valid YAML.
    #[error("error parsing YAML file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Top level of a document is a sequence or scalar.
    #[error("top level of '{}' must be a mapping", .path.display())]
    NotAMapping { path: PathBuf },

    /// The `override` key holds something other than a path string.
    #[error("'override' in '{}' must be a string path, found {found}", .path.display())]
    InvalidOverride { path: PathBuf, found: String },

    /// Override chain revisits a file.
    #[error("override cycle detected: {}", display_chain(.chain))]
    Cycle { chain: Vec<PathBuf> },

    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error("function '{name}' expects {expected} argument(s), got {actual}")]
    Arity { name: String, expected: Arity, actual: usize },

    /// A registered function returned an error.
    #[error("function '{name}' failed: {message}")]
    FunctionFailed { name: String, message: String },

    #[error("recursion depth limit of {limit} exceeded while {stage}")]
    DepthExceeded { limit: usize, stage: &'static str },

    /// Resolved tree does not fit the requested type.
    #[error("resolved config does not match the requested type: {0}")]
    Deserialize(#[source] serde_yaml::Error),
}

impl ConfigError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read { path: path.into(), source }
    }

    pub fn parse(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self::Parse { path: path.into(), source }
    }

    pub fn function_failed(name: impl Into<String>, source: anyhow::Error) -> Self {
        Self::FunctionFailed { name: name.into(), message: format!("{source:#}") }
    }
}

fn display_chain(chain: &[PathBuf]) -> String {
    chain.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(" -> ")
}
