use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

/// Salted one-way hash. Two calls on the same input produce different
/// strings; the cost factor is bcrypt's default work factor.
pub fn hash_password(plaintext: &str) -> Result<String, BcryptError> {
    hash(plaintext, DEFAULT_COST)
}

pub fn verify_password(plaintext: &str, hashed: &str) -> Result<bool, BcryptError> {
    verify(plaintext, hashed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_verifies() {
        let hashed = hash_password("hunter2-but-longer").unwrap();
        assert!(verify_password("hunter2-but-longer", &hashed).unwrap());
        assert!(!verify_password("wrong password", &hashed).unwrap());
    }

    #[test]
    fn hashing_is_salted() {
        let first = hash_password("same input").unwrap();
        let second = hash_password("same input").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-bcrypt-hash").is_err());
    }
}
