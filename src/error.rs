//! Error types for building, encoding and decoding tokens
//!
//! Every failure is reported through [`Error`]. Callers that sit behind a
//! foreign-function boundary can match on the variant to pick the host-side
//! error convention instead of inspecting message text.

use thiserror::Error;

/// Errors produced by token construction, encoding and decoding
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Claim Errors
    // ============================================================================
    /// The claim is absent, or present with a JSON type the accessor cannot return
    #[error("Grant '{0}' not found or has an incompatible type")]
    GrantNotFound(String),

    #[error("Grant name must not be empty")]
    EmptyGrantName,

    #[error("Malformed JSON: {0}")]
    MalformedJson(String),

    #[error("Header '{0}' is reserved and has a dedicated setter")]
    ReservedHeader(String),

    #[error("Header parameter name must not be empty")]
    EmptyHeaderName,

    // ============================================================================
    // Format Errors
    // ============================================================================
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Allocation failed: {0}")]
    AllocationFailed(String),

    // ============================================================================
    // Algorithm and Key Errors
    // ============================================================================
    #[error("Key is not valid for algorithm '{algorithm}': {reason}")]
    InvalidKeyForAlgorithm { algorithm: String, reason: String },

    #[error("Algorithm '{found}' not allowed. Allowed: {allowed:?}")]
    AlgorithmNotAllowed { found: String, allowed: Vec<String> },

    // ============================================================================
    // Signature Errors
    // ============================================================================
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Signature verification failed")]
    SignatureInvalid,

    /// An `alg: none` token was decoded without opting in to unsigned tokens
    #[error("Unsigned token rejected: call Decoder::danger_accept_unsigned to accept 'alg: none'")]
    UnsignedTokenRejected,

    // ============================================================================
    // Claim Validation Errors
    // ============================================================================
    #[error("Claim validation failed: {0}")]
    ClaimValidationFailed(#[from] ClaimError),
}

impl Error {
    pub(crate) fn invalid_key(algorithm: impl ToString, reason: impl Into<String>) -> Self {
        Error::InvalidKeyForAlgorithm {
            algorithm: algorithm.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedToken(reason.into())
    }
}

/// Registered-claim validation failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClaimError {
    #[error("Token expired at {expired_at} (now: {now}, skew: {skew}s)")]
    Expired {
        expired_at: i64,
        now: i64,
        skew: u64,
    },

    #[error("Token not valid until {not_before} (now: {now}, skew: {skew}s)")]
    NotYetValid {
        not_before: i64,
        now: i64,
        skew: u64,
    },

    #[error("Token issued in future at {issued_at} (now: {now}, skew: {skew}s)")]
    IssuedInFuture { issued_at: i64, now: i64, skew: u64 },

    #[error("Token too old: issued at {issued_at}, max age {max_age}s (now: {now})")]
    TooOld {
        issued_at: i64,
        now: i64,
        max_age: u64,
    },

    #[error("Audience mismatch: expected '{expected}', found {found:?}")]
    AudienceMismatch {
        expected: String,
        found: Vec<String>,
    },

    #[error("Issuer mismatch: expected '{expected}', found '{found}'")]
    IssuerMismatch { expected: String, found: String },

    #[error("Required claim '{0}' is missing")]
    MissingClaim(String),
}

/// Result type alias for jwtkit operations
pub type Result<T> = std::result::Result<T, Error>;
