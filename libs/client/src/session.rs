use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An authenticated principal: database login, server-assigned user id, and
/// the secret replayed on every object-service call
///
/// The record is always replaced as a whole, never field-by-field; a missing
/// record means no authenticated session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub login: String,
    pub uid: Value,
    pub secret: String,
}

impl Session {
    pub fn new(login: impl Into<String>, uid: Value, secret: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            uid,
            secret: secret.into(),
        }
    }
}

/// Truthiness of a server-returned identifier, following the wire convention:
/// `null`, `false`, `0` and `""` signal failed authentication
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_identifiers() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
    }

    #[test]
    fn truthy_identifiers() {
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!(7)));
        assert!(is_truthy(&json!("admin")));
        assert!(is_truthy(&json!({})));
    }
}
