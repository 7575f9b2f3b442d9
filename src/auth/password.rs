use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

/// Hash a password with bcrypt. Salted per call, so the same password
/// never produces the same hash twice.
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Check a password against a stored hash. A malformed hash counts as a
/// mismatch rather than an error; callers only care whether the
/// credentials are good.
pub fn verify_password(password: &str, hash: &str) -> bool {
    verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("hunter2!").unwrap();
        assert!(verify_password("hunter2!", &hashed));
    }

    #[test]
    fn test_wrong_password_fails() {
        let hashed = hash_password("hunter2!").unwrap();
        assert!(!verify_password("hunter3!", &hashed));
    }

    #[test]
    fn test_malformed_hash_fails_closed() {
        assert!(!verify_password("hunter2!", "not-a-bcrypt-hash"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("hunter2!").unwrap();
        let b = hash_password("hunter2!").unwrap();
        assert_ne!(a, b);
    }
}
