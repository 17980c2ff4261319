//! bcrypt password hashing.
//!
//! Hashing is synchronous and CPU bound; callers run it inline on the
//! request task.

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    Ok(hash(password, DEFAULT_COST)?)
}

/// Returns `Ok(false)` on mismatch and also when the stored hash is not a
/// bcrypt string, so a corrupt row reads as bad credentials.
pub fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    match verify(password, hashed) {
        Ok(valid) => Ok(valid),
        Err(bcrypt::BcryptError::InvalidHash(_)) | Err(bcrypt::BcryptError::InvalidPrefix(_)) => {
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("Secret123").unwrap();
        assert_ne!(hashed, "Secret123");
        assert!(verify_password("Secret123", &hashed).unwrap());
        assert!(!verify_password("secret123", &hashed).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_is_a_mismatch() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash").unwrap());
    }
}
