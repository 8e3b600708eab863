use super::{stringify::SimpleStringifier, RResult, Stats};
use crate::common::Float;
use crate::parse::ast::Expression;
use serde::Serialize;

/// The outcome of evaluating an [`Expression`]: the resolved tree, its total and its stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedExpression {
    pub expression: Expression,
    pub value: Float,
    pub stats: Stats,
}

impl EvaluatedExpression {
    pub fn new(expression: Expression, value: Float, stats: Stats) -> Self {
        Self {
            expression,
            value,
            stats,
        }
    }

    /// Renders the result as `<tree> > <value> {min: <min>, max: <max>, avg: <avg> }`.
    pub fn render(&self) -> RResult<String> {
        SimpleStringifier::new().stringify(self)
    }
}
