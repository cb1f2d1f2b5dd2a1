use serde_json::{Map, Value};

/// Payload returned by the venue-owner, claim-accept and claim-reject
/// endpoints.
///
/// The backend reports success with an empty payload and puts error details
/// in it otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    pub payload: Value,
}

impl MutationResult {
    /// Wrap a raw response body. A blank body counts as an empty object.
    pub fn from_body(body: &str) -> serde_json::Result<Self> {
        if body.trim().is_empty() {
            return Ok(Self::empty());
        }
        Ok(Self {
            payload: serde_json::from_str(body)?,
        })
    }

    pub fn empty() -> Self {
        Self {
            payload: Value::Object(Map::new()),
        }
    }

    /// True when the payload carries no keys.
    ///
    /// `null` is not a keyed value at all and counts as an error payload.
    pub fn is_empty(&self) -> bool {
        match &self.payload {
            Value::Object(m) => m.is_empty(),
            Value::Array(a) => a.is_empty(),
            Value::String(s) => s.is_empty(),
            Value::Number(_) | Value::Bool(_) => true,
            Value::Null => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_body_is_empty() {
        assert!(MutationResult::from_body("").unwrap().is_empty());
        assert!(MutationResult::from_body("  \n").unwrap().is_empty());
    }

    #[test]
    fn test_empty_containers_are_empty() {
        assert!(MutationResult::from_body("{}").unwrap().is_empty());
        assert!(MutationResult::from_body("[]").unwrap().is_empty());
        assert!(MutationResult::from_body("\"\"").unwrap().is_empty());
    }

    #[test]
    fn test_error_details_are_not_empty() {
        let result = MutationResult::from_body(r#"{"error": "venue locked"}"#).unwrap();
        assert!(!result.is_empty());
        assert_eq!(result.payload, json!({"error": "venue locked"}));
    }

    #[test]
    fn test_null_is_not_empty() {
        assert!(!MutationResult::from_body("null").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(MutationResult::from_body("{oops").is_err());
    }
}
