use crate::common::*;
use serde::Serialize;
use std::fmt;

/// A dice expression tree.
///
/// Trees produced by [`parse`](crate::parse) never contain [`Expression::RollValue`]; that
/// variant only appears in the resolved tree built by evaluation, where it replaces every
/// [`Expression::Roll`], [`Expression::RollAdvantage`] and [`Expression::RollDisadvantage`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tag", rename_all = "camelCase")]
pub enum Expression {
    Number {
        n: Float,
    },
    /// `n` dice with `sides` faces. A negative `n` rolls `|n|` dice and negates each result.
    Roll {
        n: Int,
        sides: Sides,
    },
    RollAdvantage {
        sides: Sides,
    },
    RollDisadvantage {
        sides: Sides,
    },
    RollValue {
        n: Int,
        sides: Sides,
        results: Vec<Int>,
    },
    Math {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl Expression {
    pub fn number(n: impl Into<Float>) -> Self {
        Self::Number { n: n.into() }
    }

    pub fn roll(n: Int, sides: Sides) -> Self {
        Self::Roll { n, sides }
    }

    pub fn advantage(sides: Sides) -> Self {
        Self::RollAdvantage { sides }
    }

    pub fn disadvantage(sides: Sides) -> Self {
        Self::RollDisadvantage { sides }
    }

    pub fn roll_value(n: Int, sides: Sides, results: Vec<Int>) -> Self {
        Self::RollValue { n, sides, results }
    }

    pub fn math(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Self::Math {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Whether any unresolved roll remains in this tree.
    pub fn is_resolved(&self) -> bool {
        match self {
            Self::Number { .. } | Self::RollValue { .. } => true,
            Self::Roll { .. } | Self::RollAdvantage { .. } | Self::RollDisadvantage { .. } => {
                false
            }
            Self::Math { left, right, .. } => left.is_resolved() && right.is_resolved(),
        }
    }

    fn fmt_operand(
        &self,
        f: &mut fmt::Formatter<'_>,
        parent: BinaryOperator,
        is_right: bool,
    ) -> fmt::Result {
        let needs_parens = match self {
            Self::Math { op, .. } => {
                op.precedence() < parent.precedence()
                    || (is_right && op.precedence() == parent.precedence())
            }
            _ => false,
        };
        if needs_parens {
            write!(f, "({})", self)
        } else {
            fmt::Display::fmt(self, f)
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number { n } => fmt::Display::fmt(n, f),
            Self::Roll { n, sides } => write!(f, "{}d{}", n, sides),
            Self::RollAdvantage { sides } => write!(f, "^d{}", sides),
            Self::RollDisadvantage { sides } => write!(f, "vd{}", sides),
            Self::RollValue { n, sides, results } => {
                let results = results
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{}d{} ({})", n, sides, results)
            }
            Self::Math { op, left, right } => {
                left.fmt_operand(f, *op, false)?;
                write!(f, " {} ", op)?;
                right.fmt_operand(f, *op, true)
            }
        }
    }
}
