use crate::algorithm::{Algorithm, AlgorithmId};
use crate::error::{Error, Result};
use crate::keys::{Key, SymmetricKey};

use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

/// HS256 algorithm (HMAC with SHA-256)
pub struct HS256;

/// HS384 algorithm (HMAC with SHA-384)
pub struct HS384;

/// HS512 algorithm (HMAC with SHA-512)
pub struct HS512;

macro_rules! impl_hmac {
    ($name:ident, $hash:ty) => {
        impl $name {
            fn compute(&self, signing_input: &[u8], secret: &SymmetricKey) -> Result<Vec<u8>> {
                let mut mac = Hmac::<$hash>::new_from_slice(secret.as_bytes())
                    .map_err(|e| Error::invalid_key(AlgorithmId::$name, e.to_string()))?;
                mac.update(signing_input);
                Ok(mac.finalize().into_bytes().to_vec())
            }
        }

        impl Algorithm for $name {
            fn id(&self) -> AlgorithmId {
                AlgorithmId::$name
            }

            fn check_signing_key(&self, key: &Key) -> Result<()> {
                secret(AlgorithmId::$name, key).map(|_| ())
            }

            fn sign(&self, signing_input: &[u8], key: &Key) -> Result<Vec<u8>> {
                let secret = secret(AlgorithmId::$name, key)?;
                self.compute(signing_input, secret)
            }

            fn verify(&self, signing_input: &[u8], signature: &[u8], key: &Key) -> Result<()> {
                let secret = secret(AlgorithmId::$name, key)?;
                let expected = self.compute(signing_input, secret)?;
                compare(signature, &expected)
            }
        }
    };
}

impl_hmac!(HS256, Sha256);
impl_hmac!(HS384, Sha384);
impl_hmac!(HS512, Sha512);

fn secret(alg: AlgorithmId, key: &Key) -> Result<&SymmetricKey> {
    match key {
        Key::Symmetric(secret) if secret.is_empty() => {
            Err(Error::invalid_key(alg, "HMAC secret must not be empty"))
        }
        Key::Symmetric(secret) => Ok(secret),
        other => Err(Error::invalid_key(
            alg,
            format!("expected an HMAC secret, got {}", other.key_type()),
        )),
    }
}

/// Constant-time signature comparison
fn compare(provided: &[u8], expected: &[u8]) -> Result<()> {
    if provided.len() != expected.len() {
        return Err(Error::SignatureInvalid);
    }

    if constant_time_eq(provided, expected) {
        Ok(())
    } else {
        Err(Error::SignatureInvalid)
    }
}
