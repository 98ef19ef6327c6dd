/// JWT Token Signing and Decoding
///
/// HS256 primitives shared by access and refresh tokens. Which secret and
/// expiry apply to which kind of token is decided by the `Authenticator`.

use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::Claims;
use crate::error::AuthError;

/// Sign claims with an HMAC secret
///
/// # Errors
/// Returns `Internal` if the claims cannot be serialized or signed
pub fn encode_token(claims: &Claims, secret: &str) -> Result<String, AuthError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))
}

/// Validate signature, issuer and expiry, then extract the claims
///
/// There is no leeway: a token is rejected from the second its `exp` is
/// reached, so a token minted with a zero lifetime never verifies.
///
/// # Errors
/// Returns the underlying `jsonwebtoken` error; callers collapse it into
/// their own token error kind.
pub fn decode_token(token: &str, secret: &str, issuer: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    // `aud` may be an ordinary payload claim here
    validation.validate_aud = false;
    validation.set_issuer(&[issuer]);
    validation.set_required_spec_claims(&["exp", "iat", "iss"]);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?
    .claims;

    // jsonwebtoken only rejects once `exp < now`
    if claims.is_expired() {
        return Err(ErrorKind::ExpiredSignature.into());
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::Payload;
    use serde_json::json;
    use std::time::Duration;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";
    const ISSUER: &str = "test";

    fn test_claims(expiry: Duration) -> Claims {
        let payload: Payload = json!({"userId": 1234}).as_object().cloned().unwrap();
        Claims::new(payload, expiry, ISSUER.to_string())
    }

    #[test]
    fn test_encode_and_decode_token() {
        let token = encode_token(&test_claims(Duration::from_secs(3600)), SECRET)
            .expect("Failed to generate token");
        let claims = decode_token(&token, SECRET, ISSUER).expect("Failed to validate token");

        assert_eq!(claims.payload["userId"], 1234);
        assert_eq!(claims.iss, ISSUER);
    }

    #[test]
    fn test_invalid_token() {
        assert!(decode_token("invalid.token.here", SECRET, ISSUER).is_err());
        assert!(decode_token("invalidToken", SECRET, ISSUER).is_err());
        assert!(decode_token("", SECRET, ISSUER).is_err());
    }

    #[test]
    fn test_tampered_token() {
        let token = encode_token(&test_claims(Duration::from_secs(3600)), SECRET).unwrap();

        let tampered = format!("{}X", token);
        assert!(decode_token(&tampered, SECRET, ISSUER).is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let token = encode_token(&test_claims(Duration::from_secs(3600)), SECRET).unwrap();
        assert!(decode_token(&token, "a-different-secret", ISSUER).is_err());
    }

    #[test]
    fn test_wrong_issuer() {
        let token = encode_token(&test_claims(Duration::from_secs(3600)), SECRET).unwrap();
        assert!(decode_token(&token, SECRET, "wrong-issuer").is_err());
    }

    #[test]
    fn test_expired_token() {
        let token = encode_token(&test_claims(Duration::ZERO), SECRET).unwrap();

        let err = decode_token(&token, SECRET, ISSUER).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ExpiredSignature));
    }
}
