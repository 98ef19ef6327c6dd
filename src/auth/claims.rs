/// JWT Claims structure
///
/// The caller's payload is flattened next to the registered claims
/// (RFC 7519) `iat`, `exp` and `iss`, so a decoded token hands back exactly
/// the payload it was issued with.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AuthError;

/// Caller-supplied claims, e.g. `{"userId": 1234}`
pub type Payload = Map<String, Value>;

/// Claim names managed by the issuer; a payload may not set them
pub const RESERVED_CLAIMS: [&str; 3] = ["iat", "exp", "iss"];

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    #[serde(flatten)]
    pub payload: Payload,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl Claims {
    /// Wrap a payload with issue and expiry timestamps
    ///
    /// # Arguments
    /// * `payload` - Caller claims, already checked with `check_payload`
    /// * `expiry` - Token lifetime from now
    /// * `issuer` - Issuer identifier
    pub fn new(payload: Payload, expiry: Duration, issuer: String) -> Self {
        let now = chrono::Utc::now().timestamp();
        let lifetime = i64::try_from(expiry.as_secs()).unwrap_or(i64::MAX);
        Self {
            payload,
            exp: now.saturating_add(lifetime),
            iat: now,
            iss: issuer,
        }
    }

    /// A token is expired from the second its `exp` is reached
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        self.exp <= now
    }

    pub fn into_payload(self) -> Payload {
        self.payload
    }
}

/// Reject payloads that cannot round-trip through a token
///
/// # Errors
/// Returns `InvalidInput` for an empty payload or one using a reserved claim
pub fn check_payload(payload: &Payload) -> Result<(), AuthError> {
    if payload.is_empty() {
        return Err(AuthError::InvalidInput("Payload must not be empty".to_string()));
    }
    if let Some(name) = RESERVED_CLAIMS.iter().find(|name| payload.contains_key(**name)) {
        return Err(AuthError::InvalidInput(format!(
            "Payload must not set the reserved claim '{}'",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        value.as_object().cloned().expect("payload must be an object")
    }

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new(
            payload(json!({"userId": 1234})),
            Duration::from_secs(3600),
            "test".to_string(),
        );

        assert_eq!(claims.payload["userId"], 1234);
        assert_eq!(claims.iss, "test");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_zero_expiry_is_expired() {
        let claims = Claims::new(payload(json!({"userId": 1})), Duration::ZERO, "test".to_string());
        assert!(claims.is_expired());
    }

    #[test]
    fn test_payload_is_flattened() {
        let claims = Claims::new(
            payload(json!({"userId": "12345", "email": "test@example.com"})),
            Duration::from_secs(60),
            "test".to_string(),
        );

        let encoded = serde_json::to_value(&claims).unwrap();
        assert_eq!(encoded["userId"], "12345");
        assert_eq!(encoded["email"], "test@example.com");
        assert_eq!(encoded["iss"], "test");

        let decoded: Claims = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded.into_payload(), payload(json!({"userId": "12345", "email": "test@example.com"})));
    }

    #[test]
    fn test_empty_payload_rejected() {
        assert!(matches!(check_payload(&Payload::new()), Err(AuthError::InvalidInput(_))));
    }

    #[test]
    fn test_reserved_claims_rejected() {
        for name in RESERVED_CLAIMS {
            let mut claims = payload(json!({"userId": 1}));
            claims.insert(name.to_string(), json!(0));
            assert!(check_payload(&claims).is_err(), "{} should be reserved", name);
        }
    }

    #[test]
    fn test_ordinary_payload_accepted() {
        assert!(check_payload(&payload(json!({"userId": 123, "role": "user"}))).is_ok());
    }
}
