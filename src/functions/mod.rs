//! Function registry for configuration expressions

pub mod builtins;
pub mod registry;

pub use builtins::to_text;
pub use registry::{Arity, FunctionRegistry, FunctionSpec, NativeFn};
