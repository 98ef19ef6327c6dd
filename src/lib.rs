//! Password hashing and JWT access/refresh token lifecycle, with an
//! actix-web middleware that guards routes behind a bearer token.

pub mod auth;
pub mod configuration;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod startup;
pub mod telemetry;

pub use auth::{Authenticator, Payload, TokenPair};
pub use error::AuthError;
