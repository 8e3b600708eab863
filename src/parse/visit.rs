use crate::common::*;
use crate::parse::ast::Expression;

pub trait ExprVisitor {
    type Output;

    fn visit<T: ?Sized>(&mut self, node: &T) -> Self::Output
    where
        T: Accept<Self>,
    {
        node.accept(self)
    }

    fn visit_number(&mut self, n: Float) -> Self::Output;

    fn visit_roll(&mut self, n: Int, sides: Sides) -> Self::Output;

    fn visit_advantage(&mut self, sides: Sides) -> Self::Output;

    fn visit_disadvantage(&mut self, sides: Sides) -> Self::Output;

    fn visit_roll_value(&mut self, n: Int, sides: Sides, results: &[Int]) -> Self::Output;

    fn visit_math(
        &mut self,
        op: BinaryOperator,
        left: &Expression,
        right: &Expression,
    ) -> Self::Output;
}

pub trait Accept<V: ExprVisitor + ?Sized> {
    fn accept(&self, v: &mut V) -> V::Output;
}

impl<V: ExprVisitor + ?Sized> Accept<V> for Expression {
    fn accept(&self, v: &mut V) -> V::Output {
        match self {
            Self::Number { n } => v.visit_number(*n),
            Self::Roll { n, sides } => v.visit_roll(*n, *sides),
            Self::RollAdvantage { sides } => v.visit_advantage(*sides),
            Self::RollDisadvantage { sides } => v.visit_disadvantage(*sides),
            Self::RollValue { n, sides, results } => v.visit_roll_value(*n, *sides, results),
            Self::Math { op, left, right } => v.visit_math(*op, left, right),
        }
    }
}
