use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            tracing::error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!("hash password: {e}")
        })?
        .to_string();
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    use super::*;

    #[test]
    fn hash_verifies_against_original() {
        let hash = hash_password("greaterthaneight").unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();

        assert!(Argon2::default()
            .verify_password(b"greaterthaneight", &parsed)
            .is_ok());
        assert!(Argon2::default()
            .verify_password(b"somethingdifferent", &parsed)
            .is_err());
    }

    #[test]
    fn salts_differ() {
        let a = hash_password("greaterthaneight").unwrap();
        let b = hash_password("greaterthaneight").unwrap();
        assert_ne!(a, b);
        assert!(!a.contains("greaterthaneight"));
    }
}
