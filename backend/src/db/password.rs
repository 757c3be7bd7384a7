//! Password hashing for stored user accounts (bcrypt).

use super::repository::{RepositoryError, RepositoryResult};

/// bcrypt work factor for new hashes.
pub const HASH_COST: u32 = bcrypt::DEFAULT_COST;

/// Hash a password with a fresh salt.
pub fn hash_password(password: &str) -> RepositoryResult<String> {
    bcrypt::hash(password, HASH_COST).map_err(|e| hashing_error("hash_password", e))
}

/// Check a password against a stored bcrypt hash.
///
/// # Errors
/// `InternalError` when the stored value is not a bcrypt hash.
pub fn verify_password(password: &str, stored: &str) -> RepositoryResult<bool> {
    bcrypt::verify(password, stored).map_err(|e| hashing_error("verify_password", e))
}

fn hashing_error(operation: &str, err: bcrypt::BcryptError) -> RepositoryError {
    RepositoryError::internal(format!("Password hashing failed: {}", err))
        .with_operation(operation)
}
