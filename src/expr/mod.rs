//! Function-call expressions embedded in scalar values

pub mod evaluator;
pub mod parser;

pub use evaluator::{evaluate, Evaluator};
pub use parser::{parse_call, Expr};
