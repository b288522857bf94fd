//! Error type for Sieve query building.
//!
//! Parsing is deliberately infallible (malformed segments are dropped), so the only
//! failures left are caller mistakes detected while resolving fields and operators.

/// Unified error type for all Sieve operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The accessor does not resolve to a plain declared field
    /// (computed expression, method call, indexer, nested path or unknown member).
    #[error("invalid field expression: {0}")]
    InvalidFieldExpression(String),

    /// The symbol is not one of the fixed Sieve operators.
    #[error("unknown sieve operator: {0}")]
    UnknownOperator(String),
}
