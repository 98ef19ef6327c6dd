/// Authentication module
///
/// Password hashing, JWT access/refresh token issuance and verification,
/// and the refresh token registry.

mod authenticator;
mod claims;
mod jwt;
mod password;
mod refresh_token;

pub use authenticator::bearer_token;
pub use authenticator::Authenticator;
pub use authenticator::TokenPair;
pub use claims::Claims;
pub use claims::Payload;
pub use password::hash_password;
pub use password::verify_password;
pub use refresh_token::InMemoryRefreshTokenStore;
pub use refresh_token::RefreshTokenStore;
