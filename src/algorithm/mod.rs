mod traits;

pub mod ecdsa;
pub mod hmac;
pub mod rsa;

pub use traits::{get_algorithm, Algorithm, SignatureAlgorithm};

use crate::error::{Error, Result};
use crate::keys::Key;
use std::fmt;
use std::str::FromStr;

/// Algorithm identifier from JWT header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlgorithmId {
    /// Unsigned token; the signature segment is empty
    #[default]
    None,

    /// HMAC with SHA-256
    HS256,

    /// HMAC with SHA-384
    HS384,

    /// HMAC with SHA-512
    HS512,

    /// RSA PKCS#1 v1.5 with SHA-256
    RS256,

    /// RSA PKCS#1 v1.5 with SHA-384
    RS384,

    /// RSA PKCS#1 v1.5 with SHA-512
    RS512,

    /// ECDSA with P-256 and SHA-256
    ES256,

    /// ECDSA with P-384 and SHA-384
    ES384,

    /// ECDSA with P-521 and SHA-512
    ES512,
}

impl AlgorithmId {
    /// Every signed algorithm, in header-name order
    pub const SIGNED: [AlgorithmId; 9] = [
        AlgorithmId::HS256,
        AlgorithmId::HS384,
        AlgorithmId::HS512,
        AlgorithmId::RS256,
        AlgorithmId::RS384,
        AlgorithmId::RS512,
        AlgorithmId::ES256,
        AlgorithmId::ES384,
        AlgorithmId::ES512,
    ];

    /// Parse algorithm string from JWT header
    ///
    /// Names are case-sensitive: `"None"` and `"hs256"` are rejected.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(AlgorithmId::None),

            "HS256" => Ok(AlgorithmId::HS256),
            "HS384" => Ok(AlgorithmId::HS384),
            "HS512" => Ok(AlgorithmId::HS512),

            "RS256" => Ok(AlgorithmId::RS256),
            "RS384" => Ok(AlgorithmId::RS384),
            "RS512" => Ok(AlgorithmId::RS512),

            "ES256" => Ok(AlgorithmId::ES256),
            "ES384" => Ok(AlgorithmId::ES384),
            "ES512" => Ok(AlgorithmId::ES512),

            _ => Err(Error::malformed(format!("unrecognized algorithm '{s}'"))),
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmId::None => "none",
            AlgorithmId::HS256 => "HS256",
            AlgorithmId::HS384 => "HS384",
            AlgorithmId::HS512 => "HS512",
            AlgorithmId::RS256 => "RS256",
            AlgorithmId::RS384 => "RS384",
            AlgorithmId::RS512 => "RS512",
            AlgorithmId::ES256 => "ES256",
            AlgorithmId::ES384 => "ES384",
            AlgorithmId::ES512 => "ES512",
        }
    }

    /// Check if this is the unsigned `none` algorithm
    pub fn is_none(&self) -> bool {
        matches!(self, AlgorithmId::None)
    }

    /// Check if algorithm is HMAC-based (symmetric)
    pub fn is_symmetric(&self) -> bool {
        matches!(
            self,
            AlgorithmId::HS256 | AlgorithmId::HS384 | AlgorithmId::HS512
        )
    }

    /// Check if algorithm is asymmetric (RSA/ECDSA)
    pub fn is_asymmetric(&self) -> bool {
        !self.is_none() && !self.is_symmetric()
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AlgorithmId::from_str(s)
    }
}

/// Compute the raw signature bytes of `data`
///
/// `key` is the opaque key material: an HMAC secret, or a PEM/DER private key
/// for RSA and ECDSA. `none` produces an empty signature and accepts no key.
pub fn sign(alg: AlgorithmId, key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    if alg.is_none() {
        return if key.is_empty() {
            Ok(Vec::new())
        } else {
            Err(Error::invalid_key(alg, "'none' does not take a key"))
        };
    }

    let key = parse_key(alg, key)?;
    get_algorithm(alg).sign(data, &key)
}

/// Check raw signature bytes over `data`
///
/// Returns `Ok(())` when the signature is valid and
/// [`Error::SignatureInvalid`] when it is not. Key problems are reported as
/// [`Error::InvalidKeyForAlgorithm`] before any signature check happens.
pub fn verify(alg: AlgorithmId, key: &[u8], data: &[u8], signature: &[u8]) -> Result<()> {
    if alg.is_none() {
        if !key.is_empty() {
            return Err(Error::invalid_key(alg, "'none' does not take a key"));
        }
        return if signature.is_empty() {
            Ok(())
        } else {
            Err(Error::SignatureInvalid)
        };
    }

    let key = parse_key(alg, key)?;
    get_algorithm(alg).verify(data, signature, &key)
}

/// Classify key bytes for a signed algorithm
pub(crate) fn parse_key(alg: AlgorithmId, key: &[u8]) -> Result<Key> {
    if key.is_empty() {
        return Err(Error::invalid_key(alg, "a key is required"));
    }
    Key::parse(key).map_err(|e| Error::invalid_key(alg, e.to_string()))
}

/// Policy for allowed algorithms
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmPolicy {
    allowed: Vec<AlgorithmId>,
}

impl AlgorithmPolicy {
    /// Create a policy that allows only specific algorithms
    pub fn allow_only(algorithms: Vec<AlgorithmId>) -> Self {
        Self {
            allowed: algorithms,
        }
    }

    /// Create a policy that allows every signed algorithm
    ///
    /// `none` is never part of this set. Unsigned tokens are governed by
    /// [`Decoder::danger_accept_unsigned`](crate::Decoder::danger_accept_unsigned).
    pub fn allow_all() -> Self {
        Self::allow_only(AlgorithmId::SIGNED.to_vec())
    }

    /// Policy that allows only HS256
    pub fn hs256_only() -> Self {
        Self::allow_only(vec![AlgorithmId::HS256])
    }

    /// Policy that allows only HS384
    pub fn hs384_only() -> Self {
        Self::allow_only(vec![AlgorithmId::HS384])
    }

    /// Policy that allows only HS512
    pub fn hs512_only() -> Self {
        Self::allow_only(vec![AlgorithmId::HS512])
    }

    /// Policy that allows any HMAC algorithm (HS256, HS384, HS512)
    pub fn hmac_any() -> Self {
        Self::allow_only(vec![
            AlgorithmId::HS256,
            AlgorithmId::HS384,
            AlgorithmId::HS512,
        ])
    }

    /// Policy that allows only RS256
    pub fn rs256_only() -> Self {
        Self::allow_only(vec![AlgorithmId::RS256])
    }

    /// Policy that allows any RSA algorithm (RS256, RS384, RS512)
    pub fn rsa_any() -> Self {
        Self::allow_only(vec![
            AlgorithmId::RS256,
            AlgorithmId::RS384,
            AlgorithmId::RS512,
        ])
    }

    /// Policy that allows only ES256 (ECDSA with P-256)
    pub fn es256_only() -> Self {
        Self::allow_only(vec![AlgorithmId::ES256])
    }

    /// Policy that allows any ECDSA algorithm (ES256, ES384, ES512)
    pub fn ecdsa_any() -> Self {
        Self::allow_only(vec![
            AlgorithmId::ES256,
            AlgorithmId::ES384,
            AlgorithmId::ES512,
        ])
    }

    /// Check if an algorithm is allowed
    pub fn is_allowed(&self, algorithm: &AlgorithmId) -> bool {
        self.allowed.contains(algorithm)
    }

    /// Validate algorithm against policy
    pub fn validate(&self, algorithm: &AlgorithmId) -> Result<()> {
        if self.is_allowed(algorithm) {
            Ok(())
        } else {
            Err(Error::AlgorithmNotAllowed {
                found: algorithm.to_string(),
                allowed: self.allowed.iter().map(|a| a.to_string()).collect(),
            })
        }
    }

    /// Get list of allowed algorithms
    pub fn allowed_algorithms(&self) -> &[AlgorithmId] {
        &self.allowed
    }
}

impl Default for AlgorithmPolicy {
    fn default() -> Self {
        Self::allow_all()
    }
}
