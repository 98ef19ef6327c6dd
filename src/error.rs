/// Error handling
///
/// Every fallible operation returns a `Result<_, AuthError>`. The variants
/// are deliberately coarse: token failures never reveal *why* a token was
/// rejected (expired, tampered, revoked), only which kind of token it was.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::error::Error as StdError;
use std::fmt;

/// Configuration errors, raised eagerly when an `Authenticator` is built
#[derive(Debug)]
pub enum ConfigError {
    MissingRequired(String),
    InvalidValue(String),
    ParseError(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingRequired(msg) => write!(f, "Missing required config: {}", msg),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid config value: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "Config parse error: {}", msg),
        }
    }
}

impl StdError for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Central error type for the library
#[derive(Debug)]
pub enum AuthError {
    /// Empty password, empty payload, malformed hash, reserved claim names
    InvalidInput(String),
    /// Access token failed signature, issuer or expiry checks
    InvalidToken,
    /// Refresh token failed signature, issuer or expiry checks, or was revoked
    InvalidRefreshToken,
    /// No bearer token on the request
    MissingToken,
    Config(ConfigError),
    /// Signing or hashing backend failure
    Internal(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AuthError::InvalidToken => write!(f, "Invalid token"),
            AuthError::InvalidRefreshToken => write!(f, "Invalid refresh token"),
            AuthError::MissingToken => write!(f, "No token provided"),
            AuthError::Config(e) => write!(f, "{}", e),
            AuthError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl StdError for AuthError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            AuthError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for AuthError {
    fn from(err: ConfigError) -> Self {
        AuthError::Config(err)
    }
}

impl AuthError {
    /// Message safe to show to the client
    pub fn public_message(&self) -> String {
        match self {
            AuthError::InvalidInput(msg) => msg.clone(),
            AuthError::InvalidToken => "Invalid token.".to_string(),
            AuthError::InvalidRefreshToken => "Invalid refresh token.".to_string(),
            AuthError::MissingToken => "No token provided.".to_string(),
            AuthError::Config(_) | AuthError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

/// JSON body returned for every rejected request: `{"error": "..."}`
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AuthError::Config(_) | AuthError::Internal(_) => {
                tracing::error!(error = %self, "Authentication backend error");
            }
            _ => {
                tracing::warn!(error = %self, "Authentication error");
            }
        }

        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.public_message()))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidToken | AuthError::InvalidRefreshToken | AuthError::MissingToken => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Config(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_errors_map_to_unauthorized() {
        assert_eq!(AuthError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidRefreshToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_input_error_maps_to_bad_request() {
        let err = AuthError::InvalidInput("Please provide a valid password!".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "Please provide a valid password!");
    }

    #[test]
    fn test_internal_details_are_not_public() {
        let err = AuthError::Internal("hmac key rejected".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.public_message().contains("hmac"));
    }

    #[test]
    fn test_gate_messages() {
        assert_eq!(AuthError::MissingToken.public_message(), "No token provided.");
        assert_eq!(AuthError::InvalidToken.public_message(), "Invalid token.");
    }

    #[test]
    fn test_config_error_conversion() {
        let err: AuthError = ConfigError::MissingRequired("auth.access_secret".to_string()).into();
        match err {
            AuthError::Config(ConfigError::MissingRequired(field)) => {
                assert_eq!(field, "auth.access_secret")
            }
            _ => panic!("Expected Config error"),
        }
    }
}
