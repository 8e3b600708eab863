use super::{EvaluatedExpression, RResult, RollError};
use crate::common::*;
use crate::parse::{
    ast::Expression,
    visit::{Accept, ExprVisitor},
};

/// Formats resolved trees as plain text, e.g. `[3,17] + 4 > 24 {min: 5, max: 44, avg: 24.5 }`.
#[derive(Default)]
pub struct SimpleStringifier;

impl SimpleStringifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stringify(&mut self, result: &EvaluatedExpression) -> RResult<String> {
        let tree = self.stringify_tree(&result.expression)?;
        let stats = &result.stats;
        Ok(format!(
            "{} > {} {{min: {}, max: {}, avg: {} }}",
            tree,
            fmt_float(result.value),
            fmt_float(stats.min),
            fmt_float(stats.max),
            fmt_float(round_hundredths(stats.avg))
        ))
    }

    pub fn stringify_tree(&mut self, expr: &Expression) -> RResult<String> {
        expr.accept(self)
    }
}

fn round_hundredths(x: Float) -> Float {
    (x * 100.0).round() / 100.0
}

/// Shortest round-trip text, with `Infinity`, `-Infinity` and `NaN` for non-finite values.
fn fmt_float(x: Float) -> String {
    if x.is_nan() {
        "NaN".to_owned()
    } else if x.is_infinite() {
        if x > 0.0 { "Infinity" } else { "-Infinity" }.to_owned()
    } else {
        x.to_string()
    }
}

impl ExprVisitor for SimpleStringifier {
    type Output = RResult<String>;

    fn visit_number(&mut self, n: Float) -> Self::Output {
        Ok(fmt_float(n))
    }

    fn visit_roll(&mut self, _n: Int, _sides: Sides) -> Self::Output {
        Err(RollError::UnresolvedRoll)
    }

    fn visit_advantage(&mut self, _sides: Sides) -> Self::Output {
        Err(RollError::UnresolvedRoll)
    }

    fn visit_disadvantage(&mut self, _sides: Sides) -> Self::Output {
        Err(RollError::UnresolvedRoll)
    }

    fn visit_roll_value(&mut self, _n: Int, _sides: Sides, results: &[Int]) -> Self::Output {
        Ok(serde_json::to_string(results).unwrap_or_default())
    }

    fn visit_math(
        &mut self,
        op: BinaryOperator,
        left: &Expression,
        right: &Expression,
    ) -> Self::Output {
        let l = left.accept(self)?;
        let r = right.accept(self)?;
        Ok(format!("{} {} {}", l, op, r))
    }
}
