use crate::Symbol;
use thiserror::Error;

/// Errors raised while parsing, naming or rewriting expressions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoolsimError {
    /// The expression is invalid
    #[error("Not a valid expression")]
    InvalidExpression,

    /// The name is invalid
    #[error("The name '{0}' is invalid")]
    InvalidName(String),

    /// The name is not part of the symbol space
    #[error("There is no symbol named '{0}'")]
    UnknownName(String),

    /// A substitution found no binding for this symbol
    #[error("No binding for symbol '{0}'")]
    UnboundSymbol(Symbol),

    /// An evaluation found no value for this symbol
    #[error("No value assigned to symbol '{0}'")]
    UnassignedSymbol(Symbol),

    /// A match path does not lead to a node of the expression
    #[error("No sub-expression at the given path")]
    InvalidPath,

    /// The requested minimization algorithm does not exist
    #[error("Unknown algorithm '{0}', expected 'karnaugh' or 'quine'")]
    UnknownAlgorithm(String),
}
