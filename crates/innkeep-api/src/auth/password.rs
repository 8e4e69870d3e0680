// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Password hashing and verification.
//!
//! Hashes are Argon2id PHC strings with a random per-password salt. The cost
//! parameters are fixed; verification reads them back from the stored string.

use std::sync::OnceLock;

use argon2::{Algorithm, Argon2, Params, Version};
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::error::{ApiError, ApiResult};

/// Memory cost in KiB (19 MiB).
pub const MEMORY_COST_KIB: u32 = 19 * 1024;

/// Number of passes.
pub const TIME_COST: u32 = 2;

/// Degree of parallelism.
pub const PARALLELISM: u32 = 1;

fn hasher() -> ApiResult<Argon2<'static>> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
        .map_err(|e| ApiError::internal(format!("invalid argon2 parameters: {}", e)))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes `password` into a PHC string.
pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::internal(format!("password hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

/// Checks `candidate` against a stored PHC string.
///
/// A stored hash that does not parse is treated like a wrong password.
pub fn verify_password(stored_hash: &str, candidate: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        tracing::debug!("stored password hash is malformed");
        return false;
    };
    match hasher() {
        Ok(argon) => argon.verify_password(candidate.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

/// A hash of a throwaway password, made once with the same parameters.
fn decoy_hash() -> Option<&'static str> {
    static DECOY: OnceLock<Option<String>> = OnceLock::new();
    DECOY
        .get_or_init(|| hash_password("innkeep-decoy-password").ok())
        .as_deref()
}

/// Runs one full verification whose result is discarded.
///
/// Used when no stored hash exists for a login, so the rejection costs the
/// same as a wrong password.
pub fn verify_decoy(candidate: &str) {
    if let Some(hash) = decoy_hash() {
        let _ = verify_password(hash, candidate);
    }
}

/// [`hash_password`] on the blocking pool.
pub async fn hash_password_blocking(password: String) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::internal(format!("hashing task failed: {}", e)))?
}

/// [`verify_password`] on the blocking pool.
pub async fn verify_password_blocking(stored_hash: String, candidate: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&stored_hash, &candidate))
        .await
        .unwrap_or(false)
}

/// [`verify_decoy`] on the blocking pool.
pub async fn verify_decoy_blocking(candidate: String) {
    let _ = tokio::task::spawn_blocking(move || verify_decoy(&candidate)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("supersecret").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(&hash, "supersecret"));
        assert!(!verify_password(&hash, "supersecret!"));
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
        assert!(verify_password(&a, "same-password"));
        assert!(verify_password(&b, "same-password"));
    }

    #[test]
    fn test_malformed_hash_is_rejected() {
        assert!(!verify_password("not-a-phc-string", "anything"));
        assert!(!verify_password("", ""));
    }

    #[test]
    fn test_hash_does_not_contain_plaintext() {
        let hash = hash_password("plaintext-marker").unwrap();
        assert!(!hash.contains("plaintext-marker"));
    }

    #[tokio::test]
    async fn test_blocking_wrappers() {
        let hash = hash_password_blocking("async-secret".to_string()).await.unwrap();
        assert!(verify_password_blocking(hash.clone(), "async-secret".to_string()).await);
        assert!(!verify_password_blocking(hash, "other".to_string()).await);
    }

    #[test]
    fn test_decoy_uses_login_parameters() {
        verify_decoy("anything");
        let hash = decoy_hash().unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("m=19456,t=2,p=1"));
        assert_eq!(decoy_hash(), Some(hash));
    }
}
