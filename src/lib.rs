//! # jwtkit - Build, Sign and Verify JSON Web Tokens
//!
//! **jwtkit** gives callers an owned [`Token`] handle holding a JWT header and
//! claim set, typed operations to edit the claims, and a codec between that
//! handle and the compact wire form:
//!
//! ```text
//! base64url(header_json) "." base64url(claims_json) "." base64url(signature)
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use jwtkit::{AlgorithmId, Token};
//!
//! let mut token = Token::new();
//! token.add_grant("sub", "1234567890")?;
//! token.add_grant("name", "Alice")?;
//! token.set_alg(AlgorithmId::HS256, Some(b"secret"))?;
//!
//! let jwt = token.encode()?;
//! assert_eq!(
//!     jwt,
//!     "eyJ0eXAiOiJKV1QiLCJhbGciOiJIUzI1NiJ9.\
//!      eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IkFsaWNlIn0.\
//!      FiUEoNG8wwhD3z47uwqDgOoOOvc_Blp3fcVr3EvoBfg"
//! );
//!
//! let decoded = jwtkit::decode(&jwt, Some(b"secret"))?;
//! assert_eq!(decoded.grant("sub")?, "1234567890");
//! # Ok::<(), jwtkit::Error>(())
//! ```
//!
//! ## Algorithm Support
//!
//! All algorithms implement a common [`Algorithm`](algorithm::Algorithm) trait:
//!
//! - **HMAC**: HS256, HS384, HS512 (any non-empty secret)
//! - **RSA** PKCS#1 v1.5: RS256, RS384, RS512 (2048-bit modulus or larger)
//! - **ECDSA**: ES256 (P-256), ES384 (P-384), ES512 (P-521)
//! - **none**: unsigned; must be set explicitly and accepted explicitly
//!
//! Keys are opaque bytes. Anything that is not a PEM or DER encoded RSA/EC key
//! is an HMAC secret. RSA and ECDSA sign with a private key (PKCS#8, PKCS#1,
//! SEC1) and verify with a public key (SPKI or PKCS#1), so handing a key of
//! the wrong family, curve or direction to an algorithm fails with
//! [`Error::InvalidKeyForAlgorithm`] before any cryptography runs.
//!
//! ## Decoding
//!
//! [`decode`] uses the default [`Decoder`]: every signed algorithm is
//! verified, unsigned tokens are refused with [`Error::UnsignedTokenRejected`]
//! and no registered claims are checked. Configure a [`Decoder`] to pin the
//! accepted algorithms, opt in to `alg: none`, or validate `exp`/`nbf`/`iat`,
//! `aud` and `iss`:
//!
//! ```
//! use jwtkit::{AlgorithmPolicy, ClaimsValidation, Decoder};
//!
//! let decoder = Decoder::new()
//!     .algorithms(AlgorithmPolicy::rs256_only())
//!     .validate(ClaimsValidation::new().require_audience("my-api"));
//! # let _ = decoder;
//! ```
//!
//! ## Security
//!
//! ### Algorithm Confusion Prevention
//!
//! The header chooses the algorithm, so restrict it when the key type is
//! known. Independently, an RSA or EC key is never usable as an HMAC secret.
//!
//! ### "none" Algorithm
//!
//! Unsigned tokens only decode through [`Decoder::danger_accept_unsigned`],
//! never with a key, and never with a non-empty signature segment
//! ([RFC 8725](https://datatracker.ietf.org/doc/html/rfc8725)).
//!
//! ### Timing Attack Protection
//!
//! HMAC signature verification uses constant-time comparison via the
//! [`constant_time_eq`](https://crates.io/crates/constant_time_eq) crate.
//!
//! ## Logging
//!
//! Diagnostics go through the [`tracing`](https://docs.rs/tracing) facade;
//! install a subscriber to see them. Key material and claim values are never
//! logged.
//!
//! ## References
//!
//! - [RFC 7515](https://datatracker.ietf.org/doc/html/rfc7515): JSON Web Signature (JWS)
//! - [RFC 7518](https://datatracker.ietf.org/doc/html/rfc7518): JSON Web Algorithms (JWA)
//! - [RFC 7519](https://datatracker.ietf.org/doc/html/rfc7519): JSON Web Token (JWT)

// Core modules
pub mod error;
pub mod utils;

// Algorithm system
pub mod algorithm;
pub mod keys;

// Claims and validation
pub mod claims;

// Token types
pub mod token;

// Decoder (configured decoding)
pub mod decoder;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use token::ParsedToken;
pub use token::Token;
pub use token::TokenHeader;

pub use decoder::Decoder;

pub use algorithm::{AlgorithmId, AlgorithmPolicy};
pub use claims::{Claims, ClaimsValidation};
pub use error::{ClaimError, Error, Result};
pub use keys::{EcdsaCurve, Key};

/// Decode and verify a compact token with the default [`Decoder`]
///
/// `key` is the HMAC secret or the PEM/DER public key matching the header's
/// algorithm.
pub fn decode(token: &str, key: Option<&[u8]>) -> Result<Token> {
    Decoder::new().decode(token, key)
}
