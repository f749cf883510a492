use thiserror::Error;

/// Errors from numeric evaluation of constant subtrees.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    /// The divisor evaluated to exactly zero.
    #[error("division by zero")]
    DivisionByZero,
    /// The result is not a number, for example the log of a negative value.
    #[error("result is not a number")]
    NotANumber,
    /// The result is too large to be represented.
    #[error("result overflows to infinity")]
    Overflow,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    // Tokenizer.
    /// A character that doesn't start any token.
    #[error("unrecognized character {found:?} at position {position}")]
    Lex { position: usize, found: char },
    /// A run of letters that is neither a known name nor a single letter
    /// variable.
    #[error("unknown identifier {name:?} at position {position}")]
    UnknownIdentifier { position: usize, name: String },

    // Parser.
    /// A required token was not found.
    #[error("expected {expected} but found {found} at position {position}")]
    Syntax {
        expected: &'static str,
        found: String,
        position: usize,
    },
    /// The expression is nested deeper than the allowed limit.
    #[error("expression is nested deeper than {0} levels")]
    TooDeep(usize),
    /// Only expressions of a single variable are supported.
    #[error("expression uses more than one variable: '{0}' and '{1}'")]
    MultipleVariables(char, char),

    // Tree structure.
    /// A constant node contains NaN.
    #[error("a constant in the tree is NaN")]
    ContainsNaN,
    /// A constant node is infinite, which can't be written as text.
    #[error("a constant in the tree is infinite")]
    InfiniteConstant,
    /// A node is inconsistent with the rule it carries.
    #[error("malformed node: {0}")]
    Structural(&'static str),

    // Evaluation and simplification.
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),
    /// Storage for a buffer could not be reserved.
    #[error("failed to allocate {0}")]
    Allocation(&'static str),
}
