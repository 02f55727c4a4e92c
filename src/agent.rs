//! Public entry point tying the loader and evaluator together

use crate::config::Loader;
use crate::error::ConfigError;
use crate::expr::Evaluator;
use crate::functions::FunctionRegistry;
use crate::options::ResolveOptions;
use once_cell::unsync::OnceCell;
use serde::de::DeserializeOwned;
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves one entry document into its final configuration tree.
///
/// Resolution happens once, on first access; later calls return the same tree
/// without touching the filesystem again.
#[derive(Debug)]
pub struct ConfigAgent {
    path: PathBuf,
    registry: FunctionRegistry,
    options: ResolveOptions,
    resolved: OnceCell<Value>,
}

impl ConfigAgent {
    pub fn new(path: impl Into<PathBuf>, registry: FunctionRegistry) -> Self {
        Self {
            path: path.into(),
            registry,
            options: ResolveOptions::default(),
            resolved: OnceCell::new(),
        }
    }

    /// Construct and resolve immediately, failing if resolution fails.
    pub fn resolve(path: impl Into<PathBuf>, registry: FunctionRegistry) -> Result<Self, ConfigError> {
        let agent = Self::new(path, registry);
        agent.config()?;
        Ok(agent)
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// The fully merged and evaluated tree.
    pub fn config(&self) -> Result<&Value, ConfigError> {
        self.resolved.get_or_try_init(|| self.compute())
    }

    /// Consume the agent, returning the resolved tree.
    pub fn into_config(mut self) -> Result<Value, ConfigError> {
        match self.resolved.take() {
            Some(value) => Ok(value),
            None => self.compute(),
        }
    }

    /// Look up a dotted path such as `db.replicas.0.host`.
    ///
    /// Numeric segments index into sequences.
    pub fn get(&self, dotted: &str) -> Result<Option<&Value>, ConfigError> {
        let mut node = self.config()?;
        for segment in dotted.split('.').filter(|s| !s.is_empty()) {
            let next = match node {
                Value::Sequence(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                Value::Mapping(mapping) => mapping.get(segment),
                _ => None,
            };
            match next {
                Some(value) => node = value,
                None => return Ok(None),
            }
        }
        Ok(Some(node))
    }

    /// Deserialize the resolved tree into a typed structure.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        serde_yaml::from_value(self.config()?.clone()).map_err(ConfigError::Deserialize)
    }

    fn compute(&self) -> Result<Value, ConfigError> {
        debug!(path = %self.path.display(), "Resolving config");
        let merged = Loader::new().max_depth(self.options.max_depth).load(&self.path)?;
        if !self.options.evaluate {
            return Ok(merged);
        }
        Evaluator::new(&self.registry).max_depth(self.options.max_depth).evaluate(&merged)
    }
}
