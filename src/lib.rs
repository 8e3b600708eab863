//! Parses dice notation such as `(10d20 + 10) * 2` or `^d20 + 5`, rolls it, and reports
//! the exact minimum, maximum and average alongside the rolled total.

pub mod common;
mod error;
pub mod parse;
pub mod roll;

pub use error::Error;
pub use parse::{ast::Expression, parse, ParseError, ParseErrorKind};
pub use roll::{
    evaluate, DefaultRoller, EvaluatedExpression, RollContext, RollError, Roller, Stats, MAX_DICE,
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Evaluates `expr` with the rolls and dice limit of `ctx`.
pub fn evaluate_with<R: Roller>(
    expr: &Expression,
    ctx: &mut RollContext<R>,
) -> Result<EvaluatedExpression, RollError> {
    ctx.eval(expr)
}

/// Parses and evaluates `s`.
pub fn exec(s: &str) -> Result<EvaluatedExpression> {
    exec_with(s, &mut <RollContext>::default())
}

pub fn exec_with<R: Roller>(s: &str, ctx: &mut RollContext<R>) -> Result<EvaluatedExpression> {
    let expr = parse(s)?;
    Ok(ctx.eval(&expr)?)
}

/// Parses, evaluates and formats `s`. Failures are reported in the returned text rather
/// than as an error.
pub fn cmd_evaluate(s: &str) -> String {
    cmd_evaluate_with(s, &mut <RollContext>::default())
}

pub fn cmd_evaluate_with<R: Roller>(s: &str, ctx: &mut RollContext<R>) -> String {
    match exec_with(s, ctx).and_then(|result| result.render().map_err(Error::from)) {
        Ok(line) => line,
        Err(why) => why.to_string(),
    }
}
