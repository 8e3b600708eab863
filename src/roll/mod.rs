mod ctx;
mod error;
mod roller;
mod stats;
mod stringify;
mod tree;

use crate::parse::ast::Expression;

pub type RResult<T> = Result<T, RollError>;

pub use ctx::{DefaultRoller, RollContext, MAX_DICE};
pub use error::RollError;
pub use roller::Roller;
pub use stats::Stats;
pub use stringify::SimpleStringifier;
pub use tree::EvaluatedExpression;

/// Evaluates `expr` with the thread-local RNG and the default dice limit.
pub fn evaluate(expr: &Expression) -> RResult<EvaluatedExpression> {
    <RollContext>::default().eval(expr)
}
