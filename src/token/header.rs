use crate::algorithm::AlgorithmId;
use crate::claims::json_type;
use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// Header parameters with dedicated fields; the generic API refuses them
const RESERVED: [&str; 3] = ["alg", "typ", "kid"];

/// JWT header structure
#[derive(Debug, Clone, PartialEq)]
pub struct TokenHeader {
    /// Algorithm used for signing
    pub algorithm: AlgorithmId,

    /// Token type (typically "JWT")
    pub token_type: Option<String>,

    /// Key ID
    pub key_id: Option<String>,

    /// Additional header parameters, in insertion order
    extra: Map<String, Value>,
}

impl Default for TokenHeader {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmId::None,
            token_type: Some("JWT".to_string()),
            key_id: None,
            extra: Map::new(),
        }
    }
}

impl TokenHeader {
    /// Get key ID if present
    pub fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    /// Get an additional header parameter
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    /// Set an additional header parameter
    pub fn insert(&mut self, name: &str, value: Value) -> Result<()> {
        check_name(name)?;
        self.extra.insert(name.to_string(), value);
        Ok(())
    }

    /// Remove an additional header parameter
    pub fn remove(&mut self, name: &str) -> Result<Option<Value>> {
        check_name(name)?;
        Ok(self.extra.shift_remove(name))
    }

    /// Remove every additional header parameter
    pub fn clear_extra(&mut self) {
        self.extra.clear();
    }

    /// Header as a JSON object: `typ`, `alg`, `kid`, then additional parameters
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::with_capacity(self.extra.len() + 3);
        if let Some(typ) = &self.token_type {
            map.insert("typ".to_string(), Value::String(typ.clone()));
        }
        map.insert(
            "alg".to_string(),
            Value::String(self.algorithm.as_str().to_string()),
        );
        if let Some(kid) = &self.key_id {
            map.insert("kid".to_string(), Value::String(kid.clone()));
        }
        for (name, value) in &self.extra {
            map.insert(name.clone(), value.clone());
        }
        map
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.to_map()).map_err(|e| Error::EncodingFailed(e.to_string()))
    }

    pub(crate) fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_map())
            .map_err(|e| Error::EncodingFailed(e.to_string()))
    }

    /// Parse decoded header JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| Error::malformed(format!("Failed to parse header: {e}")))?;

        let Value::Object(mut extra) = value else {
            return Err(Error::malformed(format!(
                "header must be a JSON object, found {}",
                json_type(&value)
            )));
        };

        let algorithm = match extra.shift_remove("alg") {
            Some(Value::String(alg)) => AlgorithmId::from_str(&alg)?,
            Some(other) => {
                return Err(Error::malformed(format!(
                    "header 'alg' must be a string, found {}",
                    json_type(&other)
                )))
            }
            None => return Err(Error::malformed("header is missing 'alg'")),
        };

        let token_type = optional_string(&mut extra, "typ")?;
        let key_id = optional_string(&mut extra, "kid")?;

        Ok(Self {
            algorithm,
            token_type,
            key_id,
            extra,
        })
    }
}

fn check_name(name: &str) -> Result<()> {
    if RESERVED.contains(&name) {
        return Err(Error::ReservedHeader(name.to_string()));
    }
    if name.is_empty() {
        return Err(Error::EmptyHeaderName);
    }
    Ok(())
}

fn optional_string(map: &mut Map<String, Value>, name: &str) -> Result<Option<String>> {
    match map.shift_remove(name) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(Error::malformed(format!(
            "header '{name}' must be a string, found {}",
            json_type(&other)
        ))),
    }
}
