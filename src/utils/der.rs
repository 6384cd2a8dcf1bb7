//! DER helpers for public key classification
//!
//! Uses the RustCrypto `spki` and `der` crates to read the algorithm of a
//! SubjectPublicKeyInfo and to rewrap bare PKCS#1 RSA public keys as SPKI,
//! which is the form handed to aws-lc-rs.

use crate::keys::EcdsaCurve;
use der::{asn1::UintRef, Decode, Encode, Sequence};
use spki::{
    AlgorithmIdentifierOwned, ObjectIdentifier, SubjectPublicKeyInfoOwned, SubjectPublicKeyInfoRef,
};

const RSA_ENCRYPTION_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
const EC_PUBLIC_KEY_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
const P256_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
const P384_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");
const P521_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.35");

/// RSAPublicKey as defined in RFC 8017:
///
/// RSAPublicKey ::= SEQUENCE {
///     modulus           INTEGER,  -- n
///     publicExponent    INTEGER   -- e
/// }
#[derive(Sequence)]
struct RsaPublicKey<'a> {
    modulus: UintRef<'a>,
    public_exponent: UintRef<'a>,
}

/// Public key algorithm read from a SubjectPublicKeyInfo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpkiAlgorithm {
    Rsa,
    Ecdsa(EcdsaCurve),
    /// Well-formed SPKI for an algorithm this crate does not sign with
    Other,
}

/// Classify DER bytes as a SubjectPublicKeyInfo, or `None` if they are not one
pub(crate) fn classify_spki(der: &[u8]) -> Option<SpkiAlgorithm> {
    let spki = SubjectPublicKeyInfoRef::from_der(der).ok()?;

    if spki.algorithm.oid == RSA_ENCRYPTION_OID {
        return Some(SpkiAlgorithm::Rsa);
    }

    if spki.algorithm.oid == EC_PUBLIC_KEY_OID {
        let curve = match spki.algorithm.parameters_oid().ok()? {
            oid if oid == P256_OID => EcdsaCurve::P256,
            oid if oid == P384_OID => EcdsaCurve::P384,
            oid if oid == P521_OID => EcdsaCurve::P521,
            _ => return Some(SpkiAlgorithm::Other),
        };
        return Some(SpkiAlgorithm::Ecdsa(curve));
    }

    Some(SpkiAlgorithm::Other)
}

/// Check whether DER bytes are a bare PKCS#1 RSAPublicKey
pub(crate) fn is_rsa_pkcs1_public(der: &[u8]) -> bool {
    RsaPublicKey::from_der(der).is_ok()
}

/// Wrap a PKCS#1 RSAPublicKey in a SubjectPublicKeyInfo
pub(crate) fn rsa_spki_from_pkcs1(pkcs1: &[u8]) -> Result<Vec<u8>, String> {
    use der::asn1::BitString;

    RsaPublicKey::from_der(pkcs1).map_err(|e| format!("invalid PKCS#1 RSA public key: {e}"))?;

    let algorithm = AlgorithmIdentifierOwned {
        oid: RSA_ENCRYPTION_OID,
        parameters: Some(der::asn1::AnyRef::NULL.into()),
    };

    let subject_public_key =
        BitString::new(0, pkcs1.to_vec()).map_err(|e| format!("failed to create bit string: {e}"))?;

    let spki = SubjectPublicKeyInfoOwned {
        algorithm,
        subject_public_key,
    };

    spki.to_der().map_err(|e| format!("failed to encode SPKI: {e}"))
}
