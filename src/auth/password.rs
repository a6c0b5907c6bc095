use crate::error::AppError;
use bcrypt::{hash, verify};

const DUMMY_PASSWORD: &str = "guilt-tracker-timing-equalizer";

/// bcrypt-backed credential hasher.
///
/// Holds a hash of a throwaway password at the configured cost. Verifications that cannot
/// run against a real hash (unknown email, unreadable stored hash) are run against it
/// instead, so every rejected login costs the same bcrypt work.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: String,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, AppError> {
        let dummy_hash = hash(DUMMY_PASSWORD, cost).map_err(|e| {
            AppError::InternalServerError(format!("Failed to initialise password hasher: {}", e))
        })?;
        Ok(Self { cost, dummy_hash })
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash(password, self.cost)
            .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
    }

    /// Returns true iff `password` matches `hashed_password`.
    ///
    /// A malformed stored hash is reported as a mismatch after the same amount of work.
    pub fn verify(&self, password: &str, hashed_password: &str) -> bool {
        match verify(password, hashed_password) {
            Ok(matches) => matches,
            Err(e) => {
                log::warn!("Stored password hash could not be read: {}", e);
                self.verify_dummy(password);
                false
            }
        }
    }

    /// Burns one verification against the dummy hash.
    pub fn verify_dummy(&self, password: &str) {
        let _ = verify(password, &self.dummy_hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4).unwrap()
    }

    #[test]
    fn test_password_hashing_and_verification() {
        let hasher = hasher();
        let password = "test_password123";
        let hashed = hasher.hash(password).unwrap();

        assert_ne!(hashed, password);
        assert!(hashed.starts_with("$2"));
        assert!(hasher.verify(password, &hashed));
        assert!(!hasher.verify("wrong_password", &hashed));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = hasher();
        let first = hasher.hash("same password").unwrap();
        let second = hasher.hash("same password").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("same password", &first));
        assert!(hasher.verify("same password", &second));
    }

    #[test]
    fn test_verify_with_invalid_hash() {
        assert!(!hasher().verify("test_password123", "invalidhashformat"));
        assert!(!hasher().verify("test_password123", ""));
    }

    #[test]
    fn test_rejects_invalid_cost() {
        assert!(PasswordHasher::new(2).is_err());
    }
}
