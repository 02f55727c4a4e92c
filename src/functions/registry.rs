//! Named functions callable from configuration expressions

use crate::error::ConfigError;
use serde_yaml::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Callable backing a registered function.
pub type NativeFn = Arc<dyn Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync>;

/// Number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many arguments.
    Fixed(usize),
    /// Any number of arguments, including none.
    Variadic,
}

impl Arity {
    /// Convert the signed convention where `-1` means variadic.
    pub fn from_signed(arity: i64) -> Option<Self> {
        match arity {
            -1 => Some(Self::Variadic),
            n if n >= 0 => usize::try_from(n).ok().map(Self::Fixed),
            _ => None,
        }
    }

    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::Fixed(n) => n == count,
            Self::Variadic => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "exactly {n}"),
            Self::Variadic => f.write_str("any number of"),
        }
    }
}

/// A function descriptor: name, declared arity, and the callable itself.
#[derive(Clone)]
pub struct FunctionSpec {
    pub name: String,
    pub arity: Arity,
    invoke: NativeFn,
}

impl FunctionSpec {
    pub fn new<F>(name: impl Into<String>, arity: Arity, invoke: F) -> Self
    where
        F: Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self { name: name.into(), arity, invoke: Arc::new(invoke) }
    }

    /// Call the function. Arity is not checked here; see [`FunctionRegistry::validate_arity`].
    pub fn invoke(&self, args: &[Value]) -> Result<Value, ConfigError> {
        (self.invoke)(args).map_err(|e| ConfigError::function_failed(&self.name, e))
    }
}

impl fmt::Debug for FunctionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionSpec")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Immutable name → function table for one resolution session.
///
/// Built up front with [`FunctionRegistry::register`]; evaluation only reads from it.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionSpec>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a function, replacing any earlier entry with the same name.
    pub fn register<F>(mut self, name: impl Into<String>, arity: Arity, invoke: F) -> Self
    where
        F: Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        let spec = FunctionSpec::new(name, arity, invoke);
        self.functions.insert(spec.name.clone(), spec);
        self
    }

    pub fn lookup(&self, name: &str) -> Result<&FunctionSpec, ConfigError> {
        self.functions
            .get(name)
            .ok_or_else(|| ConfigError::UnknownFunction { name: name.to_string() })
    }

    pub fn validate_arity(spec: &FunctionSpec, arg_count: usize) -> Result<(), ConfigError> {
        if spec.arity.accepts(arg_count) {
            Ok(())
        } else {
            Err(ConfigError::Arity {
                name: spec.name.clone(),
                expected: spec.arity,
                actual: arg_count,
            })
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl FromIterator<FunctionSpec> for FunctionRegistry {
    fn from_iter<I: IntoIterator<Item = FunctionSpec>>(iter: I) -> Self {
        Self {
            functions: iter.into_iter().map(|spec| (spec.name.clone(), spec)).collect(),
        }
    }
}
