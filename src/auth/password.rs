/// Password Hashing and Verification
///
/// Salted bcrypt hashes. Two hashes of the same password never compare equal,
/// so equality must always go through `verify_password`.

use bcrypt::{hash, verify};

use crate::error::AuthError;

/// bcrypt ignores everything past the first 72 bytes
const MAX_PASSWORD_BYTES: usize = 72;

/// Hash a password using bcrypt at the given cost
///
/// # Errors
/// Returns `InvalidInput` if the password is empty or longer than 72 bytes,
/// `Internal` if bcrypt fails
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    if password.is_empty() {
        return Err(AuthError::InvalidInput(
            "Please provide a valid password!".to_string(),
        ));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AuthError::InvalidInput(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }

    hash(password, cost)
        .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its hash
///
/// A mismatch is `Ok(false)`, never an error. Candidates longer than 72 bytes
/// can never match, since `hash_password` refuses to hash them.
///
/// # Errors
/// Returns `InvalidInput` if the hash is empty or not a bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    if hash.is_empty() {
        return Err(AuthError::InvalidInput("Password hash is empty".to_string()));
    }

    let matched = verify(password, hash)
        .map_err(|e| AuthError::InvalidInput(format!("Malformed password hash: {}", e)))?;

    // bcrypt would compare only the first 72 bytes
    Ok(matched && password.len() <= MAX_PASSWORD_BYTES)
}
