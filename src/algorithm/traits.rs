use super::AlgorithmId;
use crate::error::Result;
use crate::keys::Key;

/// Core algorithm trait that all JWT signature algorithms implement
///
/// Implementations check that a classified [`Key`] fits the algorithm before
/// doing any cryptography, so a wrong key type or direction surfaces as
/// [`InvalidKeyForAlgorithm`](crate::Error::InvalidKeyForAlgorithm) rather
/// than a signature failure.
pub trait Algorithm {
    /// The algorithm identifier (e.g., HS256, RS256)
    fn id(&self) -> AlgorithmId;

    /// Check that `key` can be used to sign with this algorithm
    fn check_signing_key(&self, key: &Key) -> Result<()>;

    /// Sign `signing_input` (header.payload), returning raw signature bytes
    fn sign(&self, signing_input: &[u8], key: &Key) -> Result<Vec<u8>>;

    /// Verify raw signature bytes over `signing_input`
    fn verify(&self, signing_input: &[u8], signature: &[u8], key: &Key) -> Result<()>;
}

/// Type alias for the static algorithm implementations
pub type SignatureAlgorithm = &'static (dyn Algorithm + Send + Sync);

/// Get the implementation for a signed algorithm
///
/// `none` maps to [`Unsigned`], which rejects every key.
pub fn get_algorithm(algorithm: AlgorithmId) -> SignatureAlgorithm {
    match algorithm {
        AlgorithmId::None => &Unsigned,

        AlgorithmId::HS256 => &super::hmac::HS256,
        AlgorithmId::HS384 => &super::hmac::HS384,
        AlgorithmId::HS512 => &super::hmac::HS512,

        AlgorithmId::RS256 => &super::rsa::RS256,
        AlgorithmId::RS384 => &super::rsa::RS384,
        AlgorithmId::RS512 => &super::rsa::RS512,

        AlgorithmId::ES256 => &super::ecdsa::ES256,
        AlgorithmId::ES384 => &super::ecdsa::ES384,
        AlgorithmId::ES512 => &super::ecdsa::ES512,
    }
}

/// The `none` algorithm
pub struct Unsigned;

impl Algorithm for Unsigned {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::None
    }

    fn check_signing_key(&self, key: &Key) -> Result<()> {
        Err(crate::Error::invalid_key(
            AlgorithmId::None,
            format!("'none' does not take a key, got {}", key.key_type()),
        ))
    }

    fn sign(&self, _signing_input: &[u8], key: &Key) -> Result<Vec<u8>> {
        self.check_signing_key(key).map(|_| Vec::new())
    }

    fn verify(&self, _signing_input: &[u8], _signature: &[u8], key: &Key) -> Result<()> {
        self.check_signing_key(key)
    }
}
