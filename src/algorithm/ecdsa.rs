use crate::algorithm::{Algorithm, AlgorithmId};
use crate::error::{Error, Result};
use crate::keys::{EcdsaCurve, EcdsaKey, Key, KeyFormat};

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{self, EcdsaKeyPair, UnparsedPublicKey};

/// ES256 algorithm (ECDSA with P-256 and SHA-256)
pub struct ES256;

/// ES384 algorithm (ECDSA with P-384 and SHA-384)
pub struct ES384;

/// ES512 algorithm (ECDSA with P-521 and SHA-512)
pub struct ES512;

// JWS carries ECDSA signatures as fixed-width R || S, not ASN.1
macro_rules! impl_ecdsa {
    ($name:ident, $curve:expr, $verification:expr) => {
        impl Algorithm for $name {
            fn id(&self) -> AlgorithmId {
                AlgorithmId::$name
            }

            fn check_signing_key(&self, key: &Key) -> Result<()> {
                key_pair(AlgorithmId::$name, $curve, key).map(|_| ())
            }

            fn sign(&self, signing_input: &[u8], key: &Key) -> Result<Vec<u8>> {
                let key_pair = key_pair(AlgorithmId::$name, $curve, key)?;
                let rng = SystemRandom::new();
                let signature = key_pair
                    .sign(&rng, signing_input)
                    .map_err(|_| Error::SigningFailed("ECDSA signing operation failed".into()))?;
                Ok(signature.as_ref().to_vec())
            }

            fn verify(&self, signing_input: &[u8], signature: &[u8], key: &Key) -> Result<()> {
                let public_key = public_key(AlgorithmId::$name, $curve, key)?;
                verify_ecdsa(signing_input, signature, public_key.as_der(), $verification)
            }
        }
    };
}

impl_ecdsa!(ES256, EcdsaCurve::P256, &signature::ECDSA_P256_SHA256_FIXED);
impl_ecdsa!(ES384, EcdsaCurve::P384, &signature::ECDSA_P384_SHA384_FIXED);
impl_ecdsa!(ES512, EcdsaCurve::P521, &signature::ECDSA_P521_SHA512_FIXED);

/// Extract an ECDSA key and check that its curve matches the algorithm
fn ecdsa_key(alg: AlgorithmId, curve: EcdsaCurve, key: &Key) -> Result<&EcdsaKey> {
    let ecdsa = match key {
        Key::Ecdsa(ecdsa) => ecdsa,
        other => {
            return Err(Error::invalid_key(
                alg,
                format!("expected an ECDSA {curve} key, got {}", other.key_type()),
            ))
        }
    };

    if ecdsa.curve() != curve {
        return Err(Error::invalid_key(
            alg,
            format!("expected curve {curve}, got {}", ecdsa.curve()),
        ));
    }

    Ok(ecdsa)
}

fn key_pair(alg: AlgorithmId, curve: EcdsaCurve, key: &Key) -> Result<EcdsaKeyPair> {
    let ecdsa = ecdsa_key(alg, curve, key)?;
    let signing = curve.signing_algorithm();

    match ecdsa.format() {
        KeyFormat::Pkcs8 => EcdsaKeyPair::from_pkcs8(signing, ecdsa.as_der()),
        KeyFormat::Sec1 => EcdsaKeyPair::from_private_key_der(signing, ecdsa.as_der()),
        _ => {
            return Err(Error::invalid_key(
                alg,
                "signing requires an ECDSA private key, got a public key",
            ))
        }
    }
    .map_err(|e| Error::invalid_key(alg, format!("ECDSA private key rejected: {e}")))
}

fn public_key(alg: AlgorithmId, curve: EcdsaCurve, key: &Key) -> Result<&EcdsaKey> {
    let ecdsa = ecdsa_key(alg, curve, key)?;
    if ecdsa.is_private() {
        return Err(Error::invalid_key(
            alg,
            "verification requires an ECDSA public key, got a private key",
        ));
    }
    Ok(ecdsa)
}

/// Generic ECDSA signature verification
fn verify_ecdsa(
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
