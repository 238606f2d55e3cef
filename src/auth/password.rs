use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::config::HashConfig;

/// Hashes `plain` with Argon2id using the configured cost. Output is a PHC string.
pub fn hash_password(plain: &str, cfg: &HashConfig) -> anyhow::Result<String> {
    let params = Params::new(cfg.memory_kib, cfg.work_factor, Params::DEFAULT_P_COST, None)
        .map_err(|e| {
            error!(error = %e, "argon2 params rejected");
            anyhow::anyhow!(e.to_string())
        })?;
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Cost parameters are read back from the stored hash.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
pub(crate) fn cheap_config() -> HashConfig {
    HashConfig {
        work_factor: 1,
        memory_kib: 1024,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password, &cheap_config()).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("password", &cheap_config()).expect("hashing should succeed");
        assert!(!verify_password("wrongpass", &hash).expect("verify should not error"));
    }

    #[test]
    fn hash_never_contains_the_plaintext_and_is_salted() {
        let a = hash_password("password", &cheap_config()).unwrap();
        let b = hash_password("password", &cheap_config()).unwrap();
        assert_ne!(a, "password");
        assert!(!a.contains("password"));
        assert_ne!(a, b);
    }

    #[test]
    fn work_factor_is_recorded_in_the_hash() {
        let cfg = HashConfig {
            work_factor: 3,
            memory_kib: 1024,
        };
        let hash = hash_password("pw", &cfg).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("t=3"));
        assert!(hash.contains("m=1024"));
    }

    #[test]
    fn zero_work_factor_is_an_error() {
        let cfg = HashConfig {
            work_factor: 0,
            memory_kib: 1024,
        };
        assert!(hash_password("pw", &cfg).is_err());
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
