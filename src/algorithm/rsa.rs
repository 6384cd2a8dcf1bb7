use crate::algorithm::{Algorithm, AlgorithmId};
use crate::error::{Error, Result};
use crate::keys::{Key, KeyFormat, RsaKey};

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{self, RsaEncoding, RsaKeyPair, UnparsedPublicKey};

/// Smallest modulus accepted for signing, in bytes (2048 bits)
const MIN_MODULUS_LEN: usize = 256;

/// RS256 algorithm (RSA with SHA-256)
pub struct RS256;

/// RS384 algorithm (RSA with SHA-384)
pub struct RS384;

/// RS512 algorithm (RSA with SHA-512)
pub struct RS512;

macro_rules! impl_rsa {
    ($name:ident, $padding:expr, $verification:expr) => {
        impl Algorithm for $name {
            fn id(&self) -> AlgorithmId {
                AlgorithmId::$name
            }

            fn check_signing_key(&self, key: &Key) -> Result<()> {
                key_pair(AlgorithmId::$name, key).map(|_| ())
            }

            fn sign(&self, signing_input: &[u8], key: &Key) -> Result<Vec<u8>> {
                let key_pair = key_pair(AlgorithmId::$name, key)?;
                sign_rsa(signing_input, &key_pair, $padding)
            }

            fn verify(&self, signing_input: &[u8], signature: &[u8], key: &Key) -> Result<()> {
                let public_key = public_key(AlgorithmId::$name, key)?;
                verify_rsa(signing_input, signature, public_key.as_der(), $verification)
            }
        }
    };
}

impl_rsa!(
    RS256,
    &signature::RSA_PKCS1_SHA256,
    &signature::RSA_PKCS1_2048_8192_SHA256
);
impl_rsa!(
    RS384,
    &signature::RSA_PKCS1_SHA384,
    &signature::RSA_PKCS1_2048_8192_SHA384
);
impl_rsa!(
    RS512,
    &signature::RSA_PKCS1_SHA512,
    &signature::RSA_PKCS1_2048_8192_SHA512
);

fn rsa_key(alg: AlgorithmId, key: &Key) -> Result<&RsaKey> {
    match key {
        Key::Rsa(rsa) => Ok(rsa),
        other => Err(Error::invalid_key(
            alg,
            format!("expected an RSA key, got {}", other.key_type()),
        )),
    }
}

/// Load a private key pair and enforce the minimum modulus size
fn key_pair(alg: AlgorithmId, key: &Key) -> Result<RsaKeyPair> {
    let rsa = rsa_key(alg, key)?;

    let key_pair = match rsa.format() {
        KeyFormat::Pkcs8 => RsaKeyPair::from_pkcs8(rsa.as_der()),
        KeyFormat::Pkcs1 => RsaKeyPair::from_der(rsa.as_der()),
        _ => {
            return Err(Error::invalid_key(
                alg,
                "signing requires an RSA private key, got a public key",
            ))
        }
    }
    .map_err(|e| Error::invalid_key(alg, format!("RSA private key rejected: {e}")))?;

    if key_pair.public_modulus_len() < MIN_MODULUS_LEN {
        return Err(Error::invalid_key(
            alg,
            format!(
                "RSA modulus is {} bits, at least {} required",
                key_pair.public_modulus_len() * 8,
                MIN_MODULUS_LEN * 8
            ),
        ));
    }

    Ok(key_pair)
}

fn public_key(alg: AlgorithmId, key: &Key) -> Result<&RsaKey> {
    let rsa = rsa_key(alg, key)?;
    if rsa.is_private() {
        return Err(Error::invalid_key(
            alg,
            "verification requires an RSA public key, got a private key",
        ));
    }
    Ok(rsa)
}

fn sign_rsa(
    signing_input: &[u8],
    key_pair: &RsaKeyPair,
    padding: &'static dyn RsaEncoding,
) -> Result<Vec<u8>> {
    let rng = SystemRandom::new();
    let mut signature = vec![0u8; key_pair.public_modulus_len()];

    key_pair
        .sign(padding, &rng, signing_input, &mut signature)
        .map_err(|_| Error::SigningFailed("RSA signing operation failed".to_string()))?;

    Ok(signature)
}

/// Generic RSA signature verification
fn verify_rsa(
    signing_input: &[u8],
    signature: &[u8],
    public_key_der: &[u8],
    algorithm: &'static dyn signature::VerificationAlgorithm,
) -> Result<()> {
    let public_key = UnparsedPublicKey::new(algorithm, public_key_der);

    public_key
        .verify(signing_input, signature)
        .map_err(|_| Error::SignatureInvalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNING_INPUT: &[u8] =
        b"eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiIxMjM0NTY3ODkwIn0";

    fn fixture(bytes: &[u8]) -> Key {
        Key::parse(bytes).unwrap()
    }

    fn private_key() -> Key {
        fixture(include_bytes!("../../tests/fixtures/rsa_private.pem"))
    }

    fn public_key() -> Key {
        fixture(include_bytes!("../../tests/fixtures/rsa_public.pem"))
    }

    #[test]
    fn test_rs256_valid_signature() {
        let signature = RS256.sign(SIGNING_INPUT, &private_key()).unwrap();
        assert_eq!(signature.len(), 256);
        assert!(RS256.verify(SIGNING_INPUT, &signature, &public_key()).is_ok());
    }

    #[test]
    fn test_rs384_and_rs512_valid_signature() {
        let signature = RS384.sign(SIGNING_INPUT, &private_key()).unwrap();
        assert!(RS384.verify(SIGNING_INPUT, &signature, &public_key()).is_ok());

        let signature = RS512.sign(SIGNING_INPUT, &private_key()).unwrap();
        assert!(RS512.verify(SIGNING_INPUT, &signature, &public_key()).is_ok());
    }

    #[test]
    fn test_pkcs1_private_key_signs() {
        let key = fixture(include_bytes!("../../tests/fixtures/rsa_private_pkcs1.pem"));
        let signature = RS256.sign(SIGNING_INPUT, &key).unwrap();
        assert!(RS256.verify(SIGNING_INPUT, &signature, &public_key()).is_ok());
    }

    #[test]
    fn test_rs256_invalid_signature() {
        let result = RS256.verify(SIGNING_INPUT, b"wrong_signature", &public_key());
        assert!(matches!(result, Err(Error::SignatureInvalid)));
    }

    #[test]
    fn test_rs256_wrong_key() {
        let signature = RS256.sign(SIGNING_INPUT, &private_key()).unwrap();
        let other = fixture(include_bytes!("../../tests/fixtures/rsa_other_public.pem"));
        assert!(matches!(
            RS256.verify(SIGNING_INPUT, &signature, &other),
            Err(Error::SignatureInvalid)
        ));
    }

    #[test]
    fn test_hash_mismatch_rejected() {
        let signature = RS256.sign(SIGNING_INPUT, &private_key()).unwrap();
        assert!(matches!(
            RS512.verify(SIGNING_INPUT, &signature, &public_key()),
            Err(Error::SignatureInvalid)
        ));
    }

    #[test]
    fn test_key_direction_enforced() {
        assert!(matches!(
            RS256.sign(SIGNING_INPUT, &public_key()),
            Err(Error::InvalidKeyForAlgorithm { .. })
        ));
        assert!(matches!(
            RS256.verify(SIGNING_INPUT, b"signature", &private_key()),
            Err(Error::InvalidKeyForAlgorithm { .. })
        ));
    }

    #[test]
    fn test_small_modulus_rejected() {
        let pem = include_bytes!("../../tests/fixtures/rsa1024_private.pem");
        let result = crate::algorithm::sign(AlgorithmId::RS256, pem, SIGNING_INPUT);
        assert!(matches!(result, Err(Error::InvalidKeyForAlgorithm { .. })));
    }

    #[test]
    fn test_wrong_key_type() {
        let sym_key = Key::symmetric(b"secret".to_vec());
        assert!(matches!(
            RS256.verify(SIGNING_INPUT, b"signature", &sym_key),
            Err(Error::InvalidKeyForAlgorithm { .. })
        ));

        let ec_key = fixture(include_bytes!("../../tests/fixtures/ec256_public.pem"));
        assert!(matches!(
            RS256.verify(SIGNING_INPUT, b"signature", &ec_key),
            Err(Error::InvalidKeyForAlgorithm { .. })
        ));
    }
}
