use crate::algorithm::AlgorithmId;
use crate::claims::{json_type, Claims};
use crate::error::{Error, Result};
use crate::token::TokenHeader;
use crate::utils::base64url;
use serde_json::Value;

/// A compact JWT that has been split and decoded but not verified
///
/// Holds the decoded header and claims together with the exact signing
/// input and raw signature bytes, so verification never re-encodes JSON.
/// Nothing in here should be trusted until the signature is checked.
#[derive(Debug)]
pub struct ParsedToken<'a> {
    header: TokenHeader,
    claims: Claims,
    signing_input: &'a str,
    signature: Vec<u8>,
    has_signature_segment: bool,
}

impl<'a> ParsedToken<'a> {
    /// Parse a compact JWT: `header.payload[.signature]`
    pub fn from_string(token: &'a str) -> Result<Self> {
        let mut parts = token.split('.');
        let (header_b64, payload_b64) = match (parts.next(), parts.next()) {
            (Some(header), Some(payload)) => (header, payload),
            _ => return Err(Error::malformed("expected 2 or 3 dot-separated segments")),
        };
        let signature_b64 = parts.next();
        if parts.next().is_some() {
            return Err(Error::malformed("expected 2 or 3 dot-separated segments"));
        }

        let header_json = base64url::decode(header_b64)?;
        let header = TokenHeader::from_json(&header_json)?;

        let payload_json = base64url::decode(payload_b64)?;
        let claims = parse_claims(&payload_json)?;

        let signature = match signature_b64 {
            Some(sig) => base64url::decode_bytes(sig)?,
            None => Vec::new(),
        };

        let signing_input = &token[..header_b64.len() + 1 + payload_b64.len()];

        Ok(Self {
            header,
            claims,
            signing_input,
            signature,
            has_signature_segment: signature_b64.is_some(),
        })
    }

    /// Get the token header
    pub fn header(&self) -> &TokenHeader {
        &self.header
    }

    /// Get the algorithm from the header
    pub fn algorithm(&self) -> AlgorithmId {
        self.header.algorithm
    }

    /// Get the unverified claims
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Get the signing input (header.payload) exactly as received
    pub fn signing_input(&self) -> &str {
        self.signing_input
    }

    /// Get the decoded signature bytes; empty when there was no third segment
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Whether the token had a third segment, even an empty one
    pub fn has_signature_segment(&self) -> bool {
        self.has_signature_segment
    }

    pub(crate) fn into_parts(self) -> (TokenHeader, Claims) {
        (self.header, self.claims)
    }
}

fn parse_claims(json: &str) -> Result<Claims> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| Error::malformed(format!("Failed to parse payload: {e}")))?;

    match value {
        Value::Object(map) => Ok(Claims::from_map(map)),
        other => Err(Error::malformed(format!(
            "payload must be a JSON object, found {}",
            json_type(&other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compact(header: &str, payload: &str, signature: Option<&[u8]>) -> String {
        let mut token = format!("{}.{}", base64url::encode(header), base64url::encode(payload));
        if let Some(sig) = signature {
            token.push('.');
            token.push_str(&base64url::encode_bytes(sig));
        }
        token
    }

    #[test]
    fn test_parse_valid_token() {
        let token_str = compact(
            r#"{"alg":"HS256","typ":"JWT"}"#,
            r#"{"iss":"test","sub":"user"}"#,
            Some(b"signature"),
        );
        let token = ParsedToken::from_string(&token_str).unwrap();

        assert_eq!(token.algorithm(), AlgorithmId::HS256);
        assert_eq!(token.header().token_type.as_deref(), Some("JWT"));
        assert_eq!(token.claims().issuer(), Some("test"));
        assert_eq!(token.signature(), b"signature");
        assert!(token.has_signature_segment());

        let (header_b64, rest) = token_str.split_once('.').unwrap();
        let payload_b64 = rest.split('.').next().unwrap();
        assert_eq!(token.signing_input(), format!("{header_b64}.{payload_b64}"));
    }

    #[test]
    fn test_parse_two_segments() {
        let token_str = compact(r#"{"alg":"none"}"#, r#"{"sub":"user"}"#, None);
        let token = ParsedToken::from_string(&token_str).unwrap();
        assert_eq!(token.algorithm(), AlgorithmId::None);
        assert!(!token.has_signature_segment());
        assert!(token.signature().is_empty());
    }

    #[test]
    fn test_parse_invalid_format() {
        for input in ["", "single", "too.many.parts.here", "a.b.c.d.e"] {
            assert!(
                matches!(ParsedToken::from_string(input), Err(Error::MalformedToken(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_invalid_base64() {
        let result = ParsedToken::from_string("!!!.abc.def");
        assert!(matches!(result, Err(Error::MalformedToken(_))));

        let token_str = compact(r#"{"alg":"HS256"}"#, "{}", None) + ".!!";
        assert!(matches!(
            ParsedToken::from_string(&token_str),
            Err(Error::MalformedToken(_))
        ));
    }

    #[test]
    fn test_parse_invalid_json() {
        let token_str = compact("not json", r#"{"iss":"test"}"#, Some(b"sig"));
        let result = ParsedToken::from_string(&token_str);
        assert!(matches!(result, Err(Error::MalformedToken(_))));

        let token_str = compact(r#"{"alg":"HS256"}"#, "[1,2]", Some(b"sig"));
        let result = ParsedToken::from_string(&token_str);
        assert!(matches!(result, Err(Error::MalformedToken(_))));
    }
}
