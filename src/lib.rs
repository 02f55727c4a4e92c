//! panda-config: hierarchical YAML configuration with function-call expressions
//!
//! A document may name a parent through its top-level `override` key. The chain is
//! loaded root-first and deep-merged, then every scalar of the form `name(args...)`
//! is replaced by calling `name` from a caller-supplied [`FunctionRegistry`].
//!
//! ```no_run
//! use panda_config::{Arity, ConfigAgent, FunctionRegistry};
//! use serde_yaml::Value;
//!
//! let functions = FunctionRegistry::new().register("upper", Arity::Fixed(1), |args| {
//!     Ok(Value::String(panda_config::functions::to_text(&args[0])?.to_uppercase()))
//! });
//! let agent = ConfigAgent::new("config/test.yaml", functions);
//! let config = agent.config()?;
//! println!("{}", serde_yaml::to_string(config)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod expr;
pub mod functions;
pub mod options;

pub use agent::ConfigAgent;
pub use config::{Loader, OverrideChain};
pub use error::ConfigError;
pub use expr::Evaluator;
pub use functions::{Arity, FunctionRegistry, FunctionSpec};
pub use options::ResolveOptions;
