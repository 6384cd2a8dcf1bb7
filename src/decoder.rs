//! Configured decoding of compact tokens
//!
//! A [`Decoder`] collects the decoding policy upfront (which algorithms are
//! acceptable, whether unsigned tokens may pass, which registered claims to
//! check) and applies it atomically in [`Decoder::decode`]. Steps run in a
//! fixed order:
//!
//! 1. Split and decode header and claims
//! 2. Reject keys handed to `alg: none` and signatures attached to it
//! 3. Check the declared algorithm against the [`AlgorithmPolicy`]
//! 4. Verify the signature over the received `header.payload` bytes
//! 5. Validate registered claims, if configured
//!
//! The default decoder verifies every signed algorithm, rejects unsigned
//! tokens and skips claim validation.

use crate::algorithm::{self, AlgorithmId, AlgorithmPolicy};
use crate::claims::ClaimsValidation;
use crate::error::{Error, Result};
use crate::token::{ParsedToken, Token};

/// JWT decoder with builder pattern
///
/// # Example
///
/// ```
/// use jwtkit::{AlgorithmId, AlgorithmPolicy, ClaimsValidation, Decoder, Token};
///
/// let mut token = Token::new();
/// token.add_grant("iss", "https://issuer.example")?;
/// token.set_alg(AlgorithmId::HS256, Some(b"secret"))?;
/// let jwt = token.encode()?;
///
/// let decoded = Decoder::new()
///     .algorithms(AlgorithmPolicy::hs256_only())
///     .validate(ClaimsValidation::new().require_issuer("https://issuer.example"))
///     .decode(&jwt, Some(b"secret"))?;
///
/// assert_eq!(decoded.claims().issuer(), Some("https://issuer.example"));
/// # Ok::<(), jwtkit::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoder {
    policy: AlgorithmPolicy,
    accept_unsigned: bool,
    validation: Option<ClaimsValidation>,
}

impl Decoder {
    /// Create a decoder with the default policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict which signed algorithms are accepted
    ///
    /// Pinning the expected algorithm prevents a token from choosing how it
    /// is verified, e.g. an `HS256` token checked with an RSA public key
    /// used as an HMAC secret.
    pub fn algorithms(mut self, policy: AlgorithmPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Accept `alg: none` tokens without any signature check
    ///
    /// Anyone can forge such a token. Only enable this when the token's
    /// integrity is established some other way.
    pub fn danger_accept_unsigned(mut self) -> Self {
        self.accept_unsigned = true;
        self
    }

    /// Validate registered claims after the signature check
    pub fn validate(mut self, validation: ClaimsValidation) -> Self {
        self.validation = Some(validation);
        self
    }

    /// Decode a compact token and verify it with `key`
    ///
    /// `key` is the HMAC secret or the PEM/DER public key. An empty slice is
    /// treated the same as `None`.
    pub fn decode(&self, token: &str, key: Option<&[u8]>) -> Result<Token> {
        let key = key.filter(|k| !k.is_empty());
        let parsed = ParsedToken::from_string(token)?;
        let alg = parsed.algorithm();

        if alg.is_none() {
            self.check_unsigned(&parsed, key)?;
        } else {
            self.verify_signed(&parsed, alg, key)?;
        }

        if let Some(validation) = &self.validation {
            validation.validate(parsed.claims())?;
        }

        tracing::debug!(alg = %alg, "decoded token");

        let (header, claims) = parsed.into_parts();
        Ok(Token::from_parts(header, claims))
    }

    fn check_unsigned(&self, parsed: &ParsedToken<'_>, key: Option<&[u8]>) -> Result<()> {
        if !parsed.signature().is_empty() {
            return Err(Error::malformed("unsigned token carries a signature"));
        }

        if key.is_some() {
            return Err(Error::invalid_key(
                AlgorithmId::None,
                "a key was supplied for an unsigned token",
            ));
        }

        if !self.accept_unsigned {
            tracing::debug!("rejected unsigned token");
            return Err(Error::UnsignedTokenRejected);
        }

        tracing::warn!("accepting unsigned token without signature verification");
        Ok(())
    }

    fn verify_signed(
        &self,
        parsed: &ParsedToken<'_>,
        alg: AlgorithmId,
        key: Option<&[u8]>,
    ) -> Result<()> {
        if !parsed.has_signature_segment() {
            return Err(Error::malformed(format!(
                "{alg} token is missing its signature segment"
            )));
        }

        self.policy.validate(&alg)?;

        let key = key.ok_or_else(|| {
            Error::invalid_key(alg, "a verification key is required for signed tokens")
        })?;

        algorithm::verify(
            alg,
            key,
            parsed.signing_input().as_bytes(),
            parsed.signature(),
        )
        .inspect_err(|e| tracing::debug!(alg = %alg, error = %e, "signature check failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClaimError;
    use crate::utils::base64url;

    fn signed_token(alg: AlgorithmId, key: &[u8]) -> String {
        let mut token = Token::new();
        token.add_grant("sub", "user").unwrap();
        token.set_alg(alg, Some(key)).unwrap();
        token.encode().unwrap()
    }

    fn unsigned_token() -> String {
        let mut token = Token::new();
        token.add_grant("sub", "user").unwrap();
        token.encode().unwrap()
    }

    #[test]
    fn test_decode_signed() {
        let jwt = signed_token(AlgorithmId::HS256, b"secret");
        let token = Decoder::new().decode(&jwt, Some(b"secret")).unwrap();
        assert_eq!(token.grant("sub").unwrap(), "user");
        assert_eq!(token.alg(), AlgorithmId::HS256);
    }

    #[test]
    fn test_signed_without_key() {
        let jwt = signed_token(AlgorithmId::HS256, b"secret");
        assert!(matches!(
            Decoder::new().decode(&jwt, None),
            Err(Error::InvalidKeyForAlgorithm { .. })
        ));
    }

    #[test]
    fn test_signed_missing_signature_segment() {
        let jwt = signed_token(AlgorithmId::HS256, b"secret");
        let two_segments = jwt.rsplit_once('.').unwrap().0;
        assert!(matches!(
            Decoder::new().decode(two_segments, Some(b"secret")),
            Err(Error::MalformedToken(_))
        ));
    }

    #[test]
    fn test_signed_empty_signature() {
        let jwt = signed_token(AlgorithmId::HS256, b"secret");
        let stripped = format!("{}.", jwt.rsplit_once('.').unwrap().0);
        assert!(matches!(
            Decoder::new().decode(&stripped, Some(b"secret")),
            Err(Error::SignatureInvalid)
        ));
    }

    #[test]
    fn test_unsigned_requires_opt_in() {
        let jwt = unsigned_token();
        assert!(matches!(
            Decoder::new().decode(&jwt, None),
            Err(Error::UnsignedTokenRejected)
        ));

        let token = Decoder::new()
            .danger_accept_unsigned()
            .decode(&jwt, None)
            .unwrap();
        assert_eq!(token.alg(), AlgorithmId::None);

        let two_segments = jwt.trim_end_matches('.');
        assert!(Decoder::new()
            .danger_accept_unsigned()
            .decode(two_segments, None)
            .is_ok());
    }

    #[test]
    fn test_unsigned_with_key_rejected() {
        let jwt = unsigned_token();
        assert!(matches!(
            Decoder::new()
                .danger_accept_unsigned()
                .decode(&jwt, Some(b"secret")),
            Err(Error::InvalidKeyForAlgorithm { .. })
        ));
    }

    #[test]
    fn test_unsigned_with_signature_rejected() {
        let jwt = format!("{}{}", unsigned_token(), base64url::encode("sig"));
        assert!(matches!(
            Decoder::new().danger_accept_unsigned().decode(&jwt, None),
            Err(Error::MalformedToken(_))
        ));

        // The signature is checked before the key
        for decoder in [Decoder::new(), Decoder::new().danger_accept_unsigned()] {
            assert!(matches!(
                decoder.decode(&jwt, Some(b"secret")),
                Err(Error::MalformedToken(_))
            ));
        }
    }

    #[test]
    fn test_algorithm_policy() {
        let jwt = signed_token(AlgorithmId::HS384, b"secret");
        let result = Decoder::new()
            .algorithms(AlgorithmPolicy::hs256_only())
            .decode(&jwt, Some(b"secret"));
        assert!(matches!(result, Err(Error::AlgorithmNotAllowed { .. })));
    }

    #[test]
    fn test_claims_validation() {
        let mut token = Token::new();
        token.add_grant_int("exp", 1).unwrap();
        token.set_alg(AlgorithmId::HS256, Some(b"secret")).unwrap();
        let jwt = token.encode().unwrap();

        // No claim checks by default
        assert!(Decoder::new().decode(&jwt, Some(b"secret")).is_ok());

        let result = Decoder::new()
            .validate(ClaimsValidation::default())
            .decode(&jwt, Some(b"secret"));
        assert!(matches!(
            result,
            Err(Error::ClaimValidationFailed(ClaimError::Expired { .. }))
        ));
    }
}
