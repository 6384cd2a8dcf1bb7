//! Key material classification
//!
//! Callers hand the crate opaque key bytes: an HMAC secret, or a PEM/DER
//! encoded RSA or ECDSA key. [`Key::parse`] works out which one it is so
//! that each algorithm family can reject key material of the wrong type or
//! direction before touching any cryptography.
//!
//! Recognised encodings:
//! - PEM: `PUBLIC KEY`, `RSA PUBLIC KEY`, `PRIVATE KEY`, `RSA PRIVATE KEY`, `EC PRIVATE KEY`
//! - DER: SubjectPublicKeyInfo, PKCS#8, PKCS#1 (public and private), SEC1
//!
//! Everything else is treated as a symmetric secret.

use crate::utils::der::{self, SpkiAlgorithm};
use aws_lc_rs::signature::{
    EcdsaKeyPair, EcdsaSigningAlgorithm, RsaKeyPair, ECDSA_P256_SHA256_FIXED_SIGNING,
    ECDSA_P384_SHA384_FIXED_SIGNING, ECDSA_P521_SHA512_FIXED_SIGNING,
};
use std::fmt;
use thiserror::Error;
use zeroize::Zeroizing;

const PEM_PREFIX: &[u8] = b"-----BEGIN ";

/// Key bytes that look like an asymmetric key but cannot be used as one
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct KeyRejected(String);

/// Classified key material
#[derive(Clone)]
pub enum Key {
    /// Shared secret for HMAC algorithms
    Symmetric(SymmetricKey),

    /// RSA key, private or public
    Rsa(RsaKey),

    /// ECDSA key on a named curve, private or public
    Ecdsa(EcdsaKey),
}

impl Key {
    /// Create a symmetric key from bytes without classification
    pub fn symmetric(secret: impl Into<Vec<u8>>) -> Self {
        Key::Symmetric(SymmetricKey::new(secret.into()))
    }

    /// Classify opaque key bytes
    pub fn parse(bytes: &[u8]) -> Result<Self, KeyRejected> {
        let key = if looks_like_pem(bytes) {
            Self::from_pem(bytes)?
        } else {
            Self::from_der(bytes).unwrap_or_else(|| Key::symmetric(bytes))
        };

        tracing::trace!(key_type = key.key_type(), "classified key material");
        Ok(key)
    }

    fn from_pem(bytes: &[u8]) -> Result<Self, KeyRejected> {
        let pem = pem::parse(bytes).map_err(|e| KeyRejected(format!("invalid PEM: {e}")))?;
        let der = pem.contents();

        let key = match pem.tag() {
            "PUBLIC KEY" => Self::from_spki(der),
            "RSA PUBLIC KEY" => der::rsa_spki_from_pkcs1(der)
                .ok()
                .map(|spki| Key::Rsa(RsaKey::new(spki, KeyFormat::Spki))),
            "PRIVATE KEY" => Self::from_pkcs8(der),
            "RSA PRIVATE KEY" => Self::from_pkcs1_private(der),
            "EC PRIVATE KEY" => Self::from_sec1(der),
            other => return Err(KeyRejected(format!("unsupported PEM label '{other}'"))),
        };

        key.ok_or_else(|| {
            KeyRejected(format!(
                "PEM block '{}' does not contain a supported RSA or ECDSA key",
                pem.tag()
            ))
        })
    }

    /// Try every DER encoding in turn; `None` means "not an asymmetric key"
    fn from_der(bytes: &[u8]) -> Option<Self> {
        // Every supported encoding is an ASN.1 SEQUENCE
        if bytes.first() != Some(&0x30) {
            return None;
        }

        Self::from_spki(bytes)
            .or_else(|| Self::from_pkcs8(bytes))
            .or_else(|| Self::from_pkcs1_private(bytes))
            .or_else(|| Self::from_sec1(bytes))
            .or_else(|| {
                der::is_rsa_pkcs1_public(bytes)
                    .then(|| der::rsa_spki_from_pkcs1(bytes).ok())
                    .flatten()
                    .map(|spki| Key::Rsa(RsaKey::new(spki, KeyFormat::Spki)))
            })
    }

    fn from_spki(der: &[u8]) -> Option<Self> {
        match der::classify_spki(der)? {
            SpkiAlgorithm::Rsa => Some(Key::Rsa(RsaKey::new(der.to_vec(), KeyFormat::Spki))),
            SpkiAlgorithm::Ecdsa(curve) => Some(Key::Ecdsa(EcdsaKey::new(
                der.to_vec(),
                KeyFormat::Spki,
                curve,
            ))),
            SpkiAlgorithm::Other => None,
        }
    }

    fn from_pkcs8(der: &[u8]) -> Option<Self> {
        if RsaKeyPair::from_pkcs8(der).is_ok() {
            return Some(Key::Rsa(RsaKey::new(der.to_vec(), KeyFormat::Pkcs8)));
        }

        EcdsaCurve::ALL
            .into_iter()
            .find(|curve| EcdsaKeyPair::from_pkcs8(curve.signing_algorithm(), der).is_ok())
            .map(|curve| Key::Ecdsa(EcdsaKey::new(der.to_vec(), KeyFormat::Pkcs8, curve)))
    }

    fn from_pkcs1_private(der: &[u8]) -> Option<Self> {
        RsaKeyPair::from_der(der)
            .ok()
            .map(|_| Key::Rsa(RsaKey::new(der.to_vec(), KeyFormat::Pkcs1)))
    }

    fn from_sec1(der: &[u8]) -> Option<Self> {
        EcdsaCurve::ALL
            .into_iter()
            .find(|curve| {
                EcdsaKeyPair::from_private_key_der(curve.signing_algorithm(), der).is_ok()
            })
            .map(|curve| Key::Ecdsa(EcdsaKey::new(der.to_vec(), KeyFormat::Sec1, curve)))
    }

    /// Get key type name for error messages
    pub fn key_type(&self) -> &'static str {
        match self {
            Key::Symmetric(_) => "symmetric secret",
            Key::Rsa(key) if key.is_private() => "RSA private key",
            Key::Rsa(_) => "RSA public key",
            Key::Ecdsa(key) => match (key.curve(), key.is_private()) {
                (EcdsaCurve::P256, true) => "ECDSA P-256 private key",
                (EcdsaCurve::P256, false) => "ECDSA P-256 public key",
                (EcdsaCurve::P384, true) => "ECDSA P-384 private key",
                (EcdsaCurve::P384, false) => "ECDSA P-384 public key",
                (EcdsaCurve::P521, true) => "ECDSA P-521 private key",
                (EcdsaCurve::P521, false) => "ECDSA P-521 public key",
            },
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Key").field(&self.key_type()).finish()
    }
}

fn looks_like_pem(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    bytes[start..].starts_with(PEM_PREFIX)
}

/// Symmetric key for HMAC algorithms; zeroized on drop
#[derive(Clone)]
pub struct SymmetricKey {
    secret: Zeroizing<Vec<u8>>,
}

impl SymmetricKey {
    pub fn new(secret: Vec<u8>) -> Self {
        Self {
            secret: Zeroizing::new(secret),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.secret
    }

    pub fn is_empty(&self) -> bool {
        self.secret.is_empty()
    }
}

/// DER encoding an asymmetric key was supplied in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFormat {
    /// SubjectPublicKeyInfo (public)
    Spki,
    /// PKCS#8 PrivateKeyInfo
    Pkcs8,
    /// PKCS#1 RSAPrivateKey
    Pkcs1,
    /// SEC1 ECPrivateKey
    Sec1,
}

impl KeyFormat {
    pub fn is_private(self) -> bool {
        !matches!(self, KeyFormat::Spki)
    }
}

/// RSA key; public keys are always held as SubjectPublicKeyInfo
#[derive(Clone)]
pub struct RsaKey {
    der: Zeroizing<Vec<u8>>,
    format: KeyFormat,
}

impl RsaKey {
    fn new(der: Vec<u8>, format: KeyFormat) -> Self {
        Self {
            der: Zeroizing::new(der),
            format,
        }
    }

    pub fn as_der(&self) -> &[u8] {
        &self.der
    }

    pub fn format(&self) -> KeyFormat {
        self.format
    }

    pub fn is_private(&self) -> bool {
        self.format.is_private()
    }
}

/// ECDSA curve identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcdsaCurve {
    /// P-256 (secp256r1)
    P256,
    /// P-384 (secp384r1)
    P384,
    /// P-521 (secp521r1)
    P521,
}

impl EcdsaCurve {
    const ALL: [EcdsaCurve; 3] = [EcdsaCurve::P256, EcdsaCurve::P384, EcdsaCurve::P521];

    pub(crate) fn signing_algorithm(self) -> &'static EcdsaSigningAlgorithm {
        match self {
            EcdsaCurve::P256 => &ECDSA_P256_SHA256_FIXED_SIGNING,
            EcdsaCurve::P384 => &ECDSA_P384_SHA384_FIXED_SIGNING,
            EcdsaCurve::P521 => &ECDSA_P521_SHA512_FIXED_SIGNING,
        }
    }
}

impl fmt::Display for EcdsaCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcdsaCurve::P256 => write!(f, "P-256"),
            EcdsaCurve::P384 => write!(f, "P-384"),
            EcdsaCurve::P521 => write!(f, "P-521"),
        }
    }
}

/// ECDSA key on a named curve
#[derive(Clone)]
pub struct EcdsaKey {
    der: Zeroizing<Vec<u8>>,
    format: KeyFormat,
    curve: EcdsaCurve,
}

impl EcdsaKey {
    fn new(der: Vec<u8>, format: KeyFormat, curve: EcdsaCurve) -> Self {
        Self {
            der: Zeroizing::new(der),
            format,
            curve,
        }
    }

    pub fn as_der(&self) -> &[u8] {
        &self.der
    }

    pub fn format(&self) -> KeyFormat {
        self.format
    }

    pub fn curve(&self) -> EcdsaCurve {
        self.curve
    }

    pub fn is_private(&self) -> bool {
        self.format.is_private()
    }
}
