use canonical_json::to_string;
use serde_json::Value;
use std::fmt;

/// Largest integer an RFC 8785 consumer can represent exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// An integer outside the IEEE-754 safe range would be rounded by readers.
    #[error("integer outside the safe range at {0}")]
    UnsafeInteger(String),
    /// Non-finite number (NaN/Infinity) detected.
    #[error("non-finite number detected at {0}")]
    NonFiniteNumber(String),
    /// Generic failure.
    #[error("other error: {0}")]
    Other(String),
}

/// Helper for building JSON paths during validation.
#[derive(Debug, Clone)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", index));
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

/// Produces RFC 8785 canonical bytes for a JSON value.
///
/// Object keys are sorted, insignificant whitespace is dropped and numbers use
/// the shortest round-trip form. Integers must lie within ±(2^53 - 1).
pub fn canonical_json_bytes(value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
    validate(value, Path::root())?;
    let canonical =
        to_string(value).map_err(|err| CanonicalizationError::Other(err.to_string()))?;
    Ok(canonical.into_bytes())
}

fn validate(value: &Value, path: Path) -> Result<(), CanonicalizationError> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                validate(child, path.push_field(key))?;
            }
            Ok(())
        }
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                validate(item, path.push_index(idx))?;
            }
            Ok(())
        }
        Value::Number(num) => {
            if let Some(u) = num.as_u64() {
                if u > MAX_SAFE_INTEGER {
                    return Err(CanonicalizationError::UnsafeInteger(path.to_string()));
                }
            } else if let Some(i) = num.as_i64() {
                if i.unsigned_abs() > MAX_SAFE_INTEGER {
                    return Err(CanonicalizationError::UnsafeInteger(path.to_string()));
                }
            } else if num.as_f64().map_or(true, |f| !f.is_finite()) {
                return Err(CanonicalizationError::NonFiniteNumber(path.to_string()));
            }
            Ok(())
        }
        Value::String(_) | Value::Bool(_) | Value::Null => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sorts_keys_and_strips_whitespace() {
        let value = json!({"b": 1, "a": {"nested": [2, "x"]}});
        assert_eq!(
            canonical_json_bytes(&value).unwrap(),
            br#"{"a":{"nested":[2,"x"]},"b":1}"#.to_vec()
        );
    }

    #[test]
    fn rejects_integers_beyond_safe_range() {
        let value = json!({"log": [{"time": MAX_SAFE_INTEGER + 1}]});
        let err = canonical_json_bytes(&value).unwrap_err();
        assert!(err.to_string().contains("log.[0].time"), "{}", err);
        assert!(canonical_json_bytes(&json!({"time": MAX_SAFE_INTEGER})).is_ok());
    }
}
