//! Error taxonomy for gateway consumers.
//!
//! Upstream-unavailable and malformed-field faults never reach this enum:
//! they are recovered inside the gateway (kind fallback, zero substitution)
//! and logged. What remains is what callers can meaningfully act on.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Rejected before any upstream work (e.g. comparison arity).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Neither market kind resolved the identifier. An upstream that is
    /// down for both kinds reads the same way.
    #[error("not found: {0}")]
    NotFound(String),

    /// Lazy upstream connection could not be established.
    #[error("gateway initialization failed")]
    Init(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, GatewayError>;
