use super::{error::RollError, roller::Roller, EvaluatedExpression, RResult, Stats};
use crate::common::*;
use crate::parse::{
    ast::Expression,
    visit::{Accept, ExprVisitor},
};

pub type DefaultRoller = rand::prelude::ThreadRng;

/// Largest number of dice a single roll may sample.
pub const MAX_DICE: usize = 65_536;

/// Evaluates expression trees, rolling dice with `R`.
pub struct RollContext<R = DefaultRoller> {
    max_dice: usize,
    roller: R,
}

impl<R: Roller> RollContext<R> {
    pub fn new(max_dice: usize, roller: R) -> Self {
        Self { max_dice, roller }
    }

    pub fn with_roller(roller: R) -> Self {
        Self::new(MAX_DICE, roller)
    }

    pub fn max_dice(&self) -> usize {
        self.max_dice
    }

    /// Rolls `|n|` dice, negating each face when `n` is negative.
    pub fn roll(&mut self, n: Int, sides: Sides) -> RResult<Vec<Int>> {
        let count = n.unsigned_abs();
        let max = self.max_dice();
        if count > max as u64 {
            return Err(RollError::TooManyDice { count, max });
        }

        let sign = if n < 0 { -1 } else { 1 };
        let results: Vec<Int> = self
            .roller
            .roll_iter(count as usize, sides)
            .map(|x| sign * Int::from(x))
            .collect();
        log::debug!("rolled {}d{}: {:?}", n, sides, results);
        Ok(results)
    }

    fn roll_pair(&mut self, sides: Sides) -> (Int, Int) {
        let (first, second) = self.roller.roll_pair(sides);
        log::debug!("rolled 2d{}: [{}, {}]", sides, first, second);
        (Int::from(first), Int::from(second))
    }

    /// Evaluates `expr` without touching it, returning a new tree with every roll resolved.
    pub fn eval(&mut self, expr: &Expression) -> RResult<EvaluatedExpression> {
        let result = expr.accept(self)?;
        debug_assert!(result.expression.is_resolved());
        Ok(result)
    }
}

impl Default for RollContext {
    fn default() -> Self {
        Self::new(MAX_DICE, rand::thread_rng())
    }
}

fn sum(results: &[Int]) -> Float {
    results.iter().sum::<Int>() as Float
}

impl<R: Roller> ExprVisitor for RollContext<R> {
    type Output = RResult<EvaluatedExpression>;

    fn visit_number(&mut self, n: Float) -> Self::Output {
        Ok(EvaluatedExpression::new(
            Expression::number(n),
            n,
            Stats::constant(n),
        ))
    }

    fn visit_roll(&mut self, n: Int, sides: Sides) -> Self::Output {
        let results = self.roll(n, sides)?;
        let value = sum(&results);
        Ok(EvaluatedExpression::new(
            Expression::roll_value(n, sides, results),
            value,
            Stats::dice(n, sides),
        ))
    }

    fn visit_advantage(&mut self, sides: Sides) -> Self::Output {
        let (first, second) = self.roll_pair(sides);
        Ok(EvaluatedExpression::new(
            Expression::roll_value(2, sides, vec![first, second]),
            first.max(second) as Float,
            Stats::advantage(sides),
        ))
    }

    fn visit_disadvantage(&mut self, sides: Sides) -> Self::Output {
        let (first, second) = self.roll_pair(sides);
        Ok(EvaluatedExpression::new(
            Expression::roll_value(2, sides, vec![first, second]),
            first.min(second) as Float,
            Stats::disadvantage(sides),
        ))
    }

    fn visit_roll_value(&mut self, n: Int, sides: Sides, results: &[Int]) -> Self::Output {
        Ok(EvaluatedExpression::new(
            Expression::roll_value(n, sides, results.to_vec()),
            sum(results),
            Stats::resolved(n, sides),
        ))
    }

    fn visit_math(
        &mut self,
        op: BinaryOperator,
        left: &Expression,
        right: &Expression,
    ) -> Self::Output {
        let left = left.accept(self)?;
        let right = right.accept(self)?;
        let stats = left.stats.combine(op, right.stats);
        log::trace!("{} {} {} gives {:?}", left.value, op, right.value, stats);
        Ok(EvaluatedExpression::new(
            Expression::math(op, left.expression, right.expression),
            op.apply(left.value, right.value),
            stats,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::roller::StepRoller;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};
    use BinaryOperator::*;

    fn sides(x: UInt) -> Sides {
        Sides::new(x).unwrap()
    }

    fn mock_ctx() -> RollContext<StepRoller> {
        RollContext::with_roller(StepRoller::new(10, 1))
    }

    fn eval(s: &str) -> RResult<EvaluatedExpression> {
        let expr = crate::parse::parse(s).unwrap();
        mock_ctx().eval(&expr)
    }

    fn check(s: &str, expected: Float) {
        assert_eq!(eval(s).unwrap().value, expected);
    }

    fn check_stats(s: &str, expected: Stats) {
        assert_eq!(eval(s).unwrap().stats, expected);
    }

    #[test]
    fn test_eval_number() {
        let result = eval("2").unwrap();
        assert_eq!(result.expression, Expression::number(2));
        assert_eq!(result.value, 2.0);
        assert_eq!(result.stats, Stats::constant(2.0));
        check("-8", -8.0);
        check("2.5", 2.5);
    }

    #[test]
    fn test_eval_binary() {
        check("2 + 3", 5.0);
        check("2 * (1 - 3)", -4.0);
        check("(2 + 2) * 2", 8.0);
        check("7 / 2", 3.5);
        check("1 - 2 - 3", -4.0);
    }

    #[test]
    fn test_eval_divide_by_zero() {
        check("1 / 0", Float::INFINITY);
        assert!(eval("0 / 0").unwrap().value.is_nan());
    }

    #[test]
    fn test_eval_dice() {
        check("1d20 + 4", 10.0 + 4.0);
        check("2d4", 2.0 + 3.0);
        check("8d6", (4 + 5 + 6 + 1 + 2 + 3 + 4 + 5) as Float);
    }

    #[test]
    fn test_eval_dice_results() {
        let result = eval("3d12").unwrap();
        assert_eq!(
            result.expression,
            Expression::roll_value(3, sides(12), vec![10, 11, 12])
        );
        assert_eq!(result.value, 33.0);
    }

    #[test]
    fn test_eval_negative_dice() {
        let result = eval("-2d20").unwrap();
        assert_eq!(
            result.expression,
            Expression::roll_value(-2, sides(20), vec![-10, -11])
        );
        assert_eq!(result.value, -21.0);
        assert_eq!(result.stats, Stats::new(-2.0, -40.0, -21.0));
    }

    #[test]
    fn test_eval_zero_dice() {
        let result = eval("0d6").unwrap();
        assert_eq!(result.expression, Expression::roll_value(0, sides(6), vec![]));
        assert_eq!(result.value, 0.0);
    }

    #[test]
    fn test_eval_advantage() {
        let result = eval("^d20").unwrap();
        assert_eq!(
            result.expression,
            Expression::roll_value(2, sides(20), vec![10, 11])
        );
        assert_eq!(result.value, 11.0);
        assert_eq!(result.stats, Stats::advantage(sides(20)));
    }

    #[test]
    fn test_eval_disadvantage() {
        let result = eval("vd20").unwrap();
        assert_eq!(
            result.expression,
            Expression::roll_value(2, sides(20), vec![10, 11])
        );
        assert_eq!(result.value, 10.0);
        assert_eq!(result.stats, Stats::disadvantage(sides(20)));
    }

    #[test]
    fn test_eval_roll_order() {
        let result = eval("1d20 + 1d20 * 1d20").unwrap();
        assert_eq!(
            result.expression,
            Expression::math(
                Add,
                Expression::roll_value(1, sides(20), vec![10]),
                Expression::math(
                    Mul,
                    Expression::roll_value(1, sides(20), vec![11]),
                    Expression::roll_value(1, sides(20), vec![12]),
                ),
            )
        );
        assert_eq!(result.value, 10.0 + 11.0 * 12.0);
    }

    #[test]
    fn test_eval_stats() {
        check_stats("1d20", Stats::new(1.0, 20.0, 10.5));
        check_stats("(10d20 + 10) * 2", Stats::new(40.0, 420.0, 230.0));
        check_stats("(2 + 2) * 2", Stats::constant(8.0));
        check_stats("2d6 - 1d4", Stats::new(1.0, 8.0, 4.5));
    }

    #[test]
    fn test_eval_roll_value_again() {
        let expr = Expression::roll_value(2, sides(6), vec![3, 4]);
        let result = mock_ctx().eval(&expr).unwrap();
        assert_eq!(result.expression, expr);
        assert_eq!(result.value, 7.0);
        assert_eq!(result.stats, Stats::new(2.0, 12.0, 3.0));
    }

    #[test]
    fn test_eval_does_not_touch_input() {
        let expr = crate::parse::parse("2d6 + ^d8").unwrap();
        let before = expr.clone();
        let result = mock_ctx().eval(&expr).unwrap();
        assert_eq!(expr, before);
        assert!(!expr.is_resolved());
        assert!(result.expression.is_resolved());
    }

    #[test]
    fn test_too_many_dice() {
        let mut ctx = mock_ctx();
        assert_eq!(
            ctx.eval(&Expression::roll(65_537, sides(6))),
            Err(RollError::TooManyDice {
                count: 65_537,
                max: MAX_DICE
            })
        );
        assert_eq!(
            ctx.eval(&Expression::roll(-65_537, sides(6))),
            Err(RollError::TooManyDice {
                count: 65_537,
                max: MAX_DICE
            })
        );

        let result = ctx.eval(&Expression::roll(65_536, sides(6))).unwrap();
        match result.expression {
            Expression::RollValue { results, .. } => assert_eq!(results.len(), 65_536),
            other => panic!("expected a rolled value, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_limit() {
        let mut ctx = RollContext::new(3, StepRoller::new(1, 1));
        assert_eq!(ctx.max_dice(), 3);
        assert!(ctx.eval(&Expression::roll(3, sides(6))).is_ok());
        assert_eq!(
            ctx.eval(&Expression::roll(4, sides(6))),
            Err(RollError::TooManyDice { count: 4, max: 3 })
        );
    }

    proptest! {
        #[test]
        fn prop_roll_in_range(n in 1i64..200, s in 1u32..100, seed in any::<u64>()) {
            let mut ctx = RollContext::with_roller(StdRng::seed_from_u64(seed));
            let result = ctx.eval(&Expression::roll(n, sides(s))).unwrap();

            prop_assert!(result.value >= n as Float);
            prop_assert!(result.value <= (n * Int::from(s)) as Float);
            prop_assert_eq!(result.stats, Stats::dice(n, sides(s)));
            match result.expression {
                Expression::RollValue { results, .. } => {
                    prop_assert_eq!(results.len(), n as usize);
                    prop_assert!(results.iter().all(|&x| x >= 1 && x <= Int::from(s)));
                }
                other => prop_assert!(false, "expected a rolled value, got {:?}", other),
            }
        }

        #[test]
        fn prop_advantage_keeps_highest(s in 1u32..100, seed in any::<u64>()) {
            let mut ctx = RollContext::with_roller(StdRng::seed_from_u64(seed));
            let high = ctx.eval(&Expression::advantage(sides(s))).unwrap();
            let low = ctx.eval(&Expression::disadvantage(sides(s))).unwrap();

            match (&high.expression, &low.expression) {
                (
                    Expression::RollValue { results: h, .. },
                    Expression::RollValue { results: l, .. },
                ) => {
                    prop_assert_eq!(high.value, h[0].max(h[1]) as Float);
                    prop_assert_eq!(low.value, l[0].min(l[1]) as Float);
                }
                _ => prop_assert!(false, "expected rolled values"),
            }
            prop_assert!(high.value >= 1.0 && high.value <= Float::from(s));
            prop_assert_eq!(high.stats, Stats::advantage(sides(s)));
            prop_assert_eq!(low.stats, Stats::disadvantage(sides(s)));
        }

        #[test]
        fn prop_stats_ignore_seed(seed in any::<u64>()) {
            let expr = crate::parse::parse("(10d20 + 10) * 2").unwrap();
            let mut ctx = RollContext::with_roller(StdRng::seed_from_u64(seed));
            let result = ctx.eval(&expr).unwrap();
            prop_assert_eq!(result.stats, Stats::new(40.0, 420.0, 230.0));
        }
    }
}
