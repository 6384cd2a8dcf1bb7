use crate::claims::Claims;
use crate::error::{ClaimError, Result};
use std::time::{SystemTime, UNIX_EPOCH};

/// Registered-claim checks applied during decoding
///
/// Nothing is checked unless a `ClaimsValidation` is handed to
/// [`Decoder::validate`](crate::Decoder::validate). Time checks only apply
/// to claims that are present; use [`require`](Self::require) to make a
/// claim mandatory.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimsValidation {
    /// Validate expiration time (exp claim)
    pub validate_exp: bool,

    /// Validate not-before time (nbf claim)
    pub validate_nbf: bool,

    /// Validate issued-at time (iat claim)
    pub validate_iat: bool,

    /// Clock skew tolerance in seconds (default: 60)
    pub clock_skew_seconds: u64,

    /// Maximum age of token in seconds, measured from `iat`
    pub max_age_seconds: Option<u64>,

    /// Required audience value
    pub required_audience: Option<String>,

    /// Required issuer value
    pub required_issuer: Option<String>,

    /// Claims that must be present
    pub required_claims: Vec<String>,
}

impl Default for ClaimsValidation {
    fn default() -> Self {
        Self {
            validate_exp: true,
            validate_nbf: true,
            validate_iat: true,
            clock_skew_seconds: 60,
            max_age_seconds: None,
            required_audience: None,
            required_issuer: None,
            required_claims: Vec::new(),
        }
    }
}

impl ClaimsValidation {
    /// Create a new validation config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set clock skew tolerance
    pub fn clock_skew(mut self, seconds: u64) -> Self {
        self.clock_skew_seconds = seconds;
        self
    }

    /// Set maximum token age
    pub fn max_age(mut self, seconds: u64) -> Self {
        self.max_age_seconds = Some(seconds);
        self
    }

    /// Require a specific audience
    pub fn require_audience(mut self, audience: impl Into<String>) -> Self {
        self.required_audience = Some(audience.into());
        self
    }

    /// Require a specific issuer
    pub fn require_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.required_issuer = Some(issuer.into());
        self
    }

    /// Require a claim to be present
    pub fn require(mut self, claim: impl Into<String>) -> Self {
        self.required_claims.push(claim.into());
        self
    }

    /// Disable expiration validation
    pub fn no_exp_validation(mut self) -> Self {
        self.validate_exp = false;
        self
    }

    /// Disable not-before validation
    pub fn no_nbf_validation(mut self) -> Self {
        self.validate_nbf = false;
        self
    }

    /// Disable issued-at validation
    pub fn no_iat_validation(mut self) -> Self {
        self.validate_iat = false;
        self
    }

    /// Validate claims against the current system time
    pub fn validate(&self, claims: &Claims) -> Result<()> {
        self.validate_at(claims, current_timestamp())
    }

    /// Validate claims against a fixed Unix timestamp
    pub fn validate_at(&self, claims: &Claims, now: i64) -> Result<()> {
        let skew = i64::try_from(self.clock_skew_seconds).unwrap_or(i64::MAX);

        for name in &self.required_claims {
            if !claims.contains(name) {
                return Err(ClaimError::MissingClaim(name.clone()).into());
            }
        }

        if self.validate_exp {
            if let Some(exp) = claims.expiration() {
                if now > exp.saturating_add(skew) {
                    return Err(ClaimError::Expired {
                        expired_at: exp,
                        now,
                        skew: self.clock_skew_seconds,
                    }
                    .into());
                }
            }
        }

        if self.validate_nbf {
            if let Some(nbf) = claims.not_before() {
                if now < nbf.saturating_sub(skew) {
                    return Err(ClaimError::NotYetValid {
                        not_before: nbf,
                        now,
                        skew: self.clock_skew_seconds,
                    }
                    .into());
                }
            }
        }

        if self.validate_iat {
            if let Some(iat) = claims.issued_at() {
                if iat > now.saturating_add(skew) {
                    return Err(ClaimError::IssuedInFuture {
                        issued_at: iat,
                        now,
                        skew: self.clock_skew_seconds,
                    }
                    .into());
                }

                if let Some(max_age) = self.max_age_seconds {
                    let max_age_secs = i64::try_from(max_age).unwrap_or(i64::MAX);
                    if now > iat.saturating_add(max_age_secs) {
                        return Err(ClaimError::TooOld {
                            issued_at: iat,
                            now,
                            max_age,
                        }
                        .into());
                    }
                }
            }
        }

        if let Some(required) = &self.required_audience {
            let audience = claims
                .audience()
                .ok_or_else(|| ClaimError::MissingClaim("aud".to_string()))?;

            if !audience.iter().any(|aud| aud == required) {
                return Err(ClaimError::AudienceMismatch {
                    expected: required.clone(),
                    found: audience.iter().map(|aud| aud.to_string()).collect(),
                }
                .into());
            }
        }

        if let Some(required) = &self.required_issuer {
            let issuer = claims
                .issuer()
                .ok_or_else(|| ClaimError::MissingClaim("iss".to_string()))?;

            if issuer != required {
                return Err(ClaimError::IssuerMismatch {
                    expected: required.clone(),
                    found: issuer.to_string(),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// Get current Unix timestamp; a clock before the epoch reads as 0
fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
