//! Error Types for the Calculator

use thiserror::Error;

pub type EvalResult<T> = std::result::Result<T, EvalError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("Invalid characters in expression")]
    InvalidCharacters,

    #[error("Empty expression")]
    Empty,

    #[error("Unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("Invalid number literal '{0}'")]
    InvalidNumber(String),

    #[error("Unexpected '{found}' at position {pos}")]
    UnexpectedToken { found: String, pos: usize },

    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    #[error("Unclosed parenthesis opened at position {0}")]
    UnclosedParen(usize),

    #[error("Unmatched ')' at position {0}")]
    UnmatchedParen(usize),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Numeric overflow")]
    Overflow,

    #[error("Integer has more than {0} digits")]
    TooManyDigits(usize),

    #[error("Result is not a real number: {0}")]
    Domain(String),

    #[error("Expression nested deeper than {0} levels")]
    TooDeep(usize),
}
