//! Standard functions available to the CLI

use super::registry::{Arity, FunctionRegistry};
use anyhow::{bail, Context};
use serde_yaml::Value;

/// Timestamp layout produced by `now()`.
pub const NOW_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

impl FunctionRegistry {
    /// Registry pre-populated with `upper`, `lower`, `join`, `concat`, `add`, `env` and `now`.
    pub fn builtins() -> Self {
        FunctionRegistry::new()
            .register("upper", Arity::Fixed(1), |args| Ok(Value::String(to_text(first(args)?)?.to_uppercase())))
            .register("lower", Arity::Fixed(1), |args| Ok(Value::String(to_text(first(args)?)?.to_lowercase())))
            .register("join", Arity::Variadic, |args| Ok(Value::String(join_text(args, "-")?)))
            .register("concat", Arity::Variadic, |args| Ok(Value::String(join_text(args, "")?)))
            .register("add", Arity::Variadic, add)
            .register("env", Arity::Fixed(1), |args| {
                Ok(std::env::var(to_text(first(args)?)?).map(Value::String).unwrap_or(Value::Null))
            })
            .register("now", Arity::Fixed(0), |_| {
                Ok(Value::String(chrono::Local::now().format(NOW_FORMAT).to_string()))
            })
    }
}

/// Render a value the way it would read inside a string.
///
/// Collections render as compact JSON; mappings with non-string keys have no such
/// form and are an error.
pub fn to_text(value: &Value) -> anyhow::Result<String> {
    Ok(match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Tagged(tagged) => to_text(&tagged.value)?,
        other => serde_json::to_string(other).context("value has no text form")?,
    })
}

fn first(args: &[Value]) -> anyhow::Result<&Value> {
    args.first().context("missing argument")
}

fn join_text(args: &[Value], separator: &str) -> anyhow::Result<String> {
    Ok(args.iter().map(to_text).collect::<anyhow::Result<Vec<_>>>()?.join(separator))
}

/// Integer sum; numeric strings are accepted.
fn add(args: &[Value]) -> anyhow::Result<Value> {
    let mut total: i64 = 0;
    for (index, arg) in args.iter().enumerate() {
        let n = match arg {
            Value::Number(n) => match n.as_i64() {
                Some(n) => n,
                None => bail!("argument {} is not an integer: {n}", index + 1),
            },
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .with_context(|| format!("argument {} is not an integer: {s:?}", index + 1))?,
            other => bail!("argument {} is not an integer: {}", index + 1, to_text(other)?),
        };
        total = total.checked_add(n).context("integer overflow")?;
    }
    Ok(Value::from(total))
}
