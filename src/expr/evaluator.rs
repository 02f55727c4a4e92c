//! Expression evaluation over a resolved configuration tree

use super::parser::{parse_call_with_limit, Expr};
use crate::error::ConfigError;
use crate::functions::FunctionRegistry;
use crate::options::DEFAULT_MAX_DEPTH;
use serde_yaml::value::TaggedValue;
use serde_yaml::{Mapping, Value};
use tracing::trace;

/// Replaces function-call scalars with the values their functions return.
///
/// Evaluation builds a new tree; the input is never modified, so a failure leaves
/// the caller's tree exactly as it was.
pub struct Evaluator<'r> {
    registry: &'r FunctionRegistry,
    max_depth: usize,
}

impl<'r> Evaluator<'r> {
    pub fn new(registry: &'r FunctionRegistry) -> Self {
        Self { registry, max_depth: DEFAULT_MAX_DEPTH }
    }

    /// Set the combined tree-plus-call nesting limit.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn evaluate(&self, tree: &Value) -> Result<Value, ConfigError> {
        self.walk(tree, 0)
    }

    fn guard(&self, depth: usize) -> Result<(), ConfigError> {
        if depth > self.max_depth {
            return Err(ConfigError::DepthExceeded { limit: self.max_depth, stage: "evaluating expressions" });
        }
        Ok(())
    }

    fn walk(&self, node: &Value, depth: usize) -> Result<Value, ConfigError> {
        self.guard(depth)?;
        match node {
            Value::Mapping(mapping) => {
                let mut out = Mapping::with_capacity(mapping.len());
                for (key, value) in mapping {
                    out.insert(key.clone(), self.walk(value, depth + 1)?);
                }
                Ok(Value::Mapping(out))
            }
            Value::Sequence(items) => items
                .iter()
                .map(|item| self.walk(item, depth + 1))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Sequence),
            Value::Tagged(tagged) => Ok(Value::Tagged(Box::new(TaggedValue {
                tag: tagged.tag.clone(),
                value: self.walk(&tagged.value, depth + 1)?,
            }))),
            Value::String(text) => match parse_call_with_limit(text, self.max_depth)? {
                Some(expr) => self.eval_expr(&expr, depth),
                None => Ok(node.clone()),
            },
            _ => Ok(node.clone()),
        }
    }

    fn eval_expr(&self, expr: &Expr, depth: usize) -> Result<Value, ConfigError> {
        self.guard(depth)?;
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Call { name, args } => {
                let spec = self.registry.lookup(name)?;
                let values = args
                    .iter()
                    .map(|arg| self.eval_expr(arg, depth + 1))
                    .collect::<Result<Vec<_>, _>>()?;
                FunctionRegistry::validate_arity(spec, values.len())?;
                trace!(function = %name, args = values.len(), "Invoking config function");
                spec.invoke(&values)
            }
        }
    }
}

/// Evaluate every expression in `tree` against `registry` with default limits.
pub fn evaluate(tree: &Value, registry: &FunctionRegistry) -> Result<Value, ConfigError> {
    Evaluator::new(registry).evaluate(tree)
}
