/// Demo authentication routes
///
/// Sign-up, login, token refresh and logout over an in-memory user directory.
/// Real services keep users in their own storage; only the `Authenticator`
/// calls here are the library's concern.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{Authenticator, Payload};
use crate::error::{AuthError, ErrorResponse};
use crate::middleware::AuthenticatedUser;

/// Username → password hash
#[derive(Default)]
pub struct UserDirectory {
    users: RwLock<HashMap<String, String>>,
}

impl UserDirectory {
    fn insert(&self, username: String, password_hash: String) {
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(username, password_hash);
    }

    fn password_hash(&self, username: &str) -> Option<String> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(username)
            .cloned()
    }
}

#[derive(Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// POST /signup
pub async fn signup(
    form: web::Json<Credentials>,
    users: web::Data<UserDirectory>,
    auth: web::Data<Authenticator>,
) -> Result<HttpResponse, AuthError> {
    if form.username.is_empty() || form.password.is_empty() {
        return Ok(HttpResponse::BadRequest()
            .json(ErrorResponse::new("Username and password required.")));
    }

    let password_hash = auth.hash_password(&form.password)?;
    users.insert(form.username.clone(), password_hash);

    tracing::info!(username = %form.username, "User registered");
    Ok(HttpResponse::Ok().json(json!({ "message": "User registered successfully!" })))
}

/// POST /login
///
/// Unknown user and wrong password get the same answer.
pub async fn login(
    form: web::Json<Credentials>,
    users: web::Data<UserDirectory>,
    auth: web::Data<Authenticator>,
) -> Result<HttpResponse, AuthError> {
    let invalid = || HttpResponse::BadRequest().json(ErrorResponse::new("Invalid credentials."));

    let Some(password_hash) = users.password_hash(&form.username) else {
        return Ok(invalid());
    };
    if !auth.verify_password(&form.password, &password_hash)? {
        return Ok(invalid());
    }

    let mut payload = Payload::new();
    payload.insert("userId".to_string(), json!(form.username));
    let tokens = auth.generate_tokens(&payload)?;

    tracing::info!(username = %form.username, "User logged in");
    Ok(HttpResponse::Ok().json(tokens))
}

/// GET /protected
pub async fn protected(user: web::ReqData<AuthenticatedUser>) -> HttpResponse {
    let user_id = match user.user.get("userId") {
        Some(serde_json::Value::String(id)) => id.clone(),
        Some(other) => other.to_string(),
        None => "unknown".to_string(),
    };
    HttpResponse::Ok().json(json!({ "message": format!("Hello, {}!", user_id) }))
}

/// POST /refresh-token
pub async fn refresh(
    form: web::Json<RefreshRequest>,
    auth: web::Data<Authenticator>,
) -> Result<HttpResponse, AuthError> {
    let tokens = auth.refresh_access_token(&form.refresh_token)?;
    Ok(HttpResponse::Ok().json(tokens))
}

/// POST /logout
pub async fn logout(
    form: web::Json<RefreshRequest>,
    auth: web::Data<Authenticator>,
) -> HttpResponse {
    auth.invalidate_refresh_token(&form.refresh_token);
    HttpResponse::Ok().json(json!({ "message": "Logged out successfully." }))
}
