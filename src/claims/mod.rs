mod validator;

pub use validator::ClaimsValidation;

use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// A token's claim set
///
/// An insertion-ordered mapping of claim name to JSON value. Writing an
/// existing name replaces its value in place; there is no duplicate-key error.
///
/// The typed getters return [`Error::GrantNotFound`] both when a claim is
/// absent and when it holds a different JSON type, so `get_i64` on a string
/// claim fails the same way as on a missing one.
///
/// Registered claims from
/// [RFC 7519 Section 4.1](https://datatracker.ietf.org/doc/html/rfc7519#section-4.1)
/// have dedicated read accessors ([`issuer`](Self::issuer),
/// [`expiration`](Self::expiration), ...). They return `None` when the claim
/// is absent or has the wrong type.
///
/// # Examples
///
/// ```
/// use jwtkit::Claims;
///
/// let mut claims = Claims::new();
/// claims.insert("sub", "1234567890")?;
/// claims.insert("admin", true)?;
/// claims.insert("sub", "42")?;
///
/// assert_eq!(claims.get_str("sub")?, "42");
/// assert!(claims.get_i64("sub").is_err());
/// assert_eq!(claims.to_json(None)?, r#"{"sub":"42","admin":true}"#);
/// # Ok::<(), jwtkit::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Claims {
    inner: Map<String, Value>,
}

impl Claims {
    /// Create an empty claim set
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing JSON object
    pub fn from_map(inner: Map<String, Value>) -> Self {
        Self { inner }
    }

    /// Borrow the underlying JSON object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.inner
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Claim names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    /// Set a claim, replacing any existing value under the same name
    pub fn insert(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        if name.is_empty() {
            return Err(Error::EmptyGrantName);
        }
        self.inner.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Remove one claim, returning its previous value
    ///
    /// Remaining claims keep their relative order.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.inner.shift_remove(name)
    }

    /// Remove every claim
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    fn get(&self, name: &str) -> Result<&Value> {
        self.inner
            .get(name)
            .ok_or_else(|| Error::GrantNotFound(name.to_string()))
    }

    /// Get a string claim
    pub fn get_str(&self, name: &str) -> Result<&str> {
        self.get(name)?
            .as_str()
            .ok_or_else(|| Error::GrantNotFound(name.to_string()))
    }

    /// Get an integer claim
    ///
    /// Floating-point numbers and integers outside `i64` are a type mismatch.
    pub fn get_i64(&self, name: &str) -> Result<i64> {
        self.get(name)?
            .as_i64()
            .ok_or_else(|| Error::GrantNotFound(name.to_string()))
    }

    /// Get a boolean claim
    pub fn get_bool(&self, name: &str) -> Result<bool> {
        self.get(name)?
            .as_bool()
            .ok_or_else(|| Error::GrantNotFound(name.to_string()))
    }

    /// Get a claim of any JSON type
    pub fn get_value(&self, name: &str) -> Result<&Value> {
        self.get(name)
    }

    /// Merge the top-level members of a JSON object, overwriting on conflict
    ///
    /// Nested objects and arrays are stored as-is. A top-level array or
    /// scalar is rejected with [`Error::MalformedJson`], and nothing is merged
    /// when parsing fails.
    pub fn merge_json(&mut self, json: &str) -> Result<()> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| Error::MalformedJson(e.to_string()))?;

        let Value::Object(members) = value else {
            return Err(Error::MalformedJson(format!(
                "expected a JSON object, found {}",
                json_type(&value)
            )));
        };

        if members.contains_key("") {
            return Err(Error::EmptyGrantName);
        }

        for (name, value) in members {
            self.inner.insert(name, value);
        }
        Ok(())
    }

    /// Serialize one claim, or the whole set when `name` is `None`
    ///
    /// A single claim is serialized as its JSON value: a string claim comes
    /// back quoted, an object claim as an object.
    pub fn to_json(&self, name: Option<&str>) -> Result<String> {
        let result = match name {
            Some(name) => serde_json::to_string(self.get(name)?),
            None => serde_json::to_string(&self.inner),
        };
        result.map_err(|e| Error::EncodingFailed(e.to_string()))
    }

    pub(crate) fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.inner).map_err(|e| Error::EncodingFailed(e.to_string()))
    }

    // ------------------------------------------------------------------------
    // Registered claims
    // ------------------------------------------------------------------------

    /// Issuer (`iss`)
    pub fn issuer(&self) -> Option<&str> {
        self.inner.get("iss").and_then(Value::as_str)
    }

    /// Subject (`sub`)
    pub fn subject(&self) -> Option<&str> {
        self.inner.get("sub").and_then(Value::as_str)
    }

    /// Audience (`aud`), which may be a single string or an array of strings
    ///
    /// Non-string array members are skipped.
    pub fn audience(&self) -> Option<Vec<&str>> {
        match self.inner.get("aud")? {
            Value::String(aud) => Some(vec![aud.as_str()]),
            Value::Array(items) => Some(items.iter().filter_map(Value::as_str).collect()),
            _ => None,
        }
    }

    /// Expiration Time (`exp`), seconds since the Unix epoch
    pub fn expiration(&self) -> Option<i64> {
        self.inner.get("exp").and_then(Value::as_i64)
    }

    /// Not Before (`nbf`), seconds since the Unix epoch
    pub fn not_before(&self) -> Option<i64> {
        self.inner.get("nbf").and_then(Value::as_i64)
    }

    /// Issued At (`iat`), seconds since the Unix epoch
    pub fn issued_at(&self) -> Option<i64> {
        self.inner.get("iat").and_then(Value::as_i64)
    }

    /// JWT ID (`jti`)
    pub fn jwt_id(&self) -> Option<&str> {
        self.inner.get("jti").and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(inner: Map<String, Value>) -> Self {
        Self::from_map(inner)
    }
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
