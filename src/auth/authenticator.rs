/// Token lifecycle
///
/// `Authenticator` owns the settings and the refresh registry and drives every
/// token through issue → verify → refresh → invalidate:
///
/// - access tokens are signed with the access secret and are stateless;
/// - refresh tokens are signed with the refresh secret and are only accepted
///   while registered, so `invalidate_refresh_token` revokes them;
/// - refreshing does not rotate the refresh token.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auth::claims::{check_payload, Claims, Payload};
use crate::auth::jwt::{decode_token, encode_token};
use crate::auth::password;
use crate::auth::refresh_token::{hash_token, InMemoryRefreshTokenStore, RefreshTokenStore};
use crate::configuration::AuthSettings;
use crate::error::AuthError;
use crate::middleware::JwtMiddleware;

/// Access and refresh token returned on login and refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Cheap to clone; clones share the same refresh registry
#[derive(Clone)]
pub struct Authenticator {
    settings: Arc<AuthSettings>,
    store: Arc<dyn RefreshTokenStore>,
}

impl Authenticator {
    /// Build an authenticator with a process-local refresh registry
    ///
    /// # Errors
    /// Returns `Config` if the settings fail validation
    pub fn new(settings: AuthSettings) -> Result<Self, AuthError> {
        Self::with_store(settings, Arc::new(InMemoryRefreshTokenStore::new()))
    }

    /// Build an authenticator backed by a custom refresh registry
    ///
    /// # Errors
    /// Returns `Config` if the settings fail validation
    pub fn with_store(
        settings: AuthSettings,
        store: Arc<dyn RefreshTokenStore>,
    ) -> Result<Self, AuthError> {
        settings.validate()?;
        Ok(Self {
            settings: Arc::new(settings),
            store,
        })
    }

    /// # Errors
    /// Returns `InvalidInput` for an empty or over-long password
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        password::hash_password(password, self.settings.hash_cost)
    }

    /// # Errors
    /// Returns `InvalidInput` for a malformed hash; a wrong password is `Ok(false)`
    pub fn verify_password(&self, candidate: &str, hash: &str) -> Result<bool, AuthError> {
        password::verify_password(candidate, hash)
    }

    /// Issue a single access token; nothing is registered
    ///
    /// # Errors
    /// Returns `InvalidInput` for an empty payload or a reserved claim name
    pub fn generate_token(&self, payload: &Payload) -> Result<String, AuthError> {
        check_payload(payload)?;
        self.sign_access(payload.clone())
    }

    /// Issue an access/refresh pair and register the refresh token
    ///
    /// Two calls with the same payload in the same second yield the same
    /// refresh token; the second registration simply overwrites the first.
    ///
    /// # Errors
    /// Returns `InvalidInput` for an empty payload or a reserved claim name
    pub fn generate_tokens(&self, payload: &Payload) -> Result<TokenPair, AuthError> {
        check_payload(payload)?;

        let access_token = self.sign_access(payload.clone())?;
        let refresh_claims = Claims::new(
            payload.clone(),
            self.settings.refresh_token_expiry,
            self.settings.issuer.clone(),
        );
        let refresh_token = encode_token(&refresh_claims, &self.settings.refresh_secret)?;

        self.store.put(hash_token(&refresh_token), payload.clone());
        tracing::debug!("Issued token pair");

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Verify an access token and return its payload
    ///
    /// # Errors
    /// Returns `InvalidToken` for a malformed, tampered, foreign or expired token
    pub fn verify_token(&self, token: &str) -> Result<Payload, AuthError> {
        decode_token(token, &self.settings.access_secret, &self.settings.issuer)
            .map(Claims::into_payload)
            .map_err(|e| {
                tracing::debug!(error = %e, "Access token rejected");
                AuthError::InvalidToken
            })
    }

    /// Verify a refresh token and return the payload it was registered with
    ///
    /// The signature and expiry are checked before the registry is consulted.
    ///
    /// # Errors
    /// Returns `InvalidRefreshToken` for any failure, including revocation
    pub fn verify_refresh_token(&self, token: &str) -> Result<Payload, AuthError> {
        decode_token(token, &self.settings.refresh_secret, &self.settings.issuer).map_err(|e| {
            tracing::debug!(error = %e, "Refresh token rejected");
            AuthError::InvalidRefreshToken
        })?;

        self.store.get(&hash_token(token)).ok_or_else(|| {
            tracing::debug!("Refresh token not registered");
            AuthError::InvalidRefreshToken
        })
    }

    /// Mint a new access token from an active refresh token
    ///
    /// The refresh token itself is returned unchanged and stays active.
    ///
    /// # Errors
    /// Returns `InvalidRefreshToken` if the refresh token is not active
    pub fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let payload = self.verify_refresh_token(refresh_token)?;
        let access_token = self.sign_access(payload)?;
        tracing::debug!("Access token refreshed");

        Ok(TokenPair {
            access_token,
            refresh_token: refresh_token.to_string(),
        })
    }

    /// Revoke a refresh token; unknown or already revoked tokens are ignored
    pub fn invalidate_refresh_token(&self, refresh_token: &str) {
        self.store.delete(&hash_token(refresh_token));
        tracing::debug!("Refresh token invalidated");
    }

    /// Resolve an `Authorization` header value to the caller's payload
    ///
    /// # Errors
    /// Returns `MissingToken` if there is no bearer token and `InvalidToken`
    /// if the token does not verify
    pub fn authenticate_header(&self, header: Option<&str>) -> Result<Payload, AuthError> {
        let token = header.and_then(bearer_token).ok_or(AuthError::MissingToken)?;
        self.verify_token(token)
    }

    /// Middleware that rejects requests without a valid access token
    pub fn authenticate(&self) -> JwtMiddleware {
        JwtMiddleware::new(self.clone())
    }

    fn sign_access(&self, payload: Payload) -> Result<String, AuthError> {
        let claims = Claims::new(
            payload,
            self.settings.access_token_expiry,
            self.settings.issuer.clone(),
        );
        encode_token(&claims, &self.settings.access_secret)
    }
}

/// Extract the token from a `Bearer <token>` header value
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
