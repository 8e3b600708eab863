use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum RollError {
    #[error("too many dice rolled: {count} exceeds the limit of {max}")]
    TooManyDice { count: u64, max: usize },
    #[error("cannot format an unresolved roll")]
    UnresolvedRoll,
}
