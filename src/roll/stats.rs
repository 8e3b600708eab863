use crate::common::*;
use serde::Serialize;

/// Closed-form summary of an expression's outcome.
///
/// Stats of a composite expression combine element-wise under the same operator as its
/// value. That is exact for `+` and `-`, but for `*` and `/` the result is only the
/// algebraic combination of the operands' stats, not a true bound when operand ranges
/// cross zero.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub min: Float,
    pub max: Float,
    pub avg: Float,
}

impl Stats {
    pub const fn new(min: Float, max: Float, avg: Float) -> Self {
        Self { min, max, avg }
    }

    pub const fn constant(x: Float) -> Self {
        Self::new(x, x, x)
    }

    /// Sum of `n` dice. Negative `n` keeps the same linear formulas.
    pub fn dice(n: Int, sides: Sides) -> Self {
        let n = n as Float;
        let sides = Float::from(sides.get());
        Self::new(n, n * sides, n * (1.0 + sides) / 2.0)
    }

    /// Stats recomputed for an already rolled [`RollValue`](crate::Expression::RollValue).
    /// The average deliberately uses `sides / n`, unlike [`Stats::dice`].
    pub fn resolved(n: Int, sides: Sides) -> Self {
        let n = n as Float;
        let sides = Float::from(sides.get());
        Self::new(n, n * sides, sides / n)
    }

    pub fn advantage(sides: Sides) -> Self {
        Self::new(1.0, Float::from(sides.get()), mean_of_highest(sides))
    }

    pub fn disadvantage(sides: Sides) -> Self {
        Self::new(1.0, Float::from(sides.get()), mean_of_lowest(sides))
    }

    pub fn combine(self, op: BinaryOperator, rhs: Self) -> Self {
        Self::new(
            op.apply(self.min, rhs.min),
            op.apply(self.max, rhs.max),
            op.apply(self.avg, rhs.avg),
        )
    }
}

/// `E[max(X, Y)]` for two independent uniform dice, summing `k * P(max = k)` where
/// `P(max <= k) = (k / sides)^2`.
fn mean_of_highest(sides: Sides) -> Float {
    let s = Float::from(sides.get());
    let cdf = |k: Float| (k / s).powi(2);
    (1..=sides.get())
        .map(|k| {
            let k = Float::from(k);
            k * (cdf(k) - cdf(k - 1.0))
        })
        .sum()
}

/// `E[min(X, Y)]` for two independent uniform dice, summing `k * P(min = k)` where
/// `P(min >= k) = ((sides - k + 1) / sides)^2`.
fn mean_of_lowest(sides: Sides) -> Float {
    let s = Float::from(sides.get());
    let tail = |k: Float| ((s - k + 1.0) / s).powi(2);
    (1..=sides.get())
        .map(|k| {
            let k = Float::from(k);
            k * (tail(k) - tail(k + 1.0))
        })
        .sum()
}
