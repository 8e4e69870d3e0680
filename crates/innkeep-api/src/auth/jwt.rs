// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! JWT token issuance and validation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use innkeep_core::User;

use super::{AuthError, AuthResult, Claims};

/// Default token validity, four hours.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 4 * 60 * 60;

/// The only accepted signing algorithm.
pub const ALGORITHM: Algorithm = Algorithm::HS256;

// =============================================================================
// JwtConfig
// =============================================================================

/// Signing secret and token validity.
#[derive(Clone)]
pub struct JwtConfig {
    /// HMAC secret.
    pub secret: String,
    /// Token validity in seconds.
    pub token_ttl_secs: i64,
}

impl JwtConfig {
    /// Creates a configuration with the default validity.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    /// Sets the token validity.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AuthResult<()> {
        if self.secret.trim().is_empty() {
            return Err(AuthError::configuration("JWT secret is not configured"));
        }
        if self.token_ttl_secs <= 0 {
            return Err(AuthError::configuration("token validity must be positive"));
        }
        if self.secret.len() < 32 {
            tracing::warn!("JWT secret is shorter than recommended (32 bytes)");
        }
        Ok(())
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"***")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

// =============================================================================
// JwtManager
// =============================================================================

/// Issues and validates HS256 access tokens.
///
/// Keys are derived once at construction and shared behind `Arc`, so clones
/// are cheap and the manager can live in application state.
#[derive(Clone)]
pub struct JwtManager {
    token_ttl_secs: i64,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl JwtManager {
    /// Creates a manager. Fails on an empty secret.
    pub fn new(config: JwtConfig) -> AuthResult<Self> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        // Expiry is checked against an explicit clock in `validate_at`.
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            token_ttl_secs: config.token_ttl_secs,
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
        })
    }

    /// Token validity in seconds.
    pub fn token_ttl_secs(&self) -> i64 {
        self.token_ttl_secs
    }

    /// Issues a token for `user` at the current time.
    pub fn issue(&self, user: &User) -> AuthResult<String> {
        self.issue_at(user, Utc::now())
    }

    /// Issues a token for `user` as if the clock read `now`.
    pub fn issue_at(&self, user: &User, now: DateTime<Utc>) -> AuthResult<String> {
        let claims = Claims::for_user(user, now, self.token_ttl_secs);
        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthError::configuration(format!("failed to sign token: {}", e)))
    }

    /// Validates a token at the current time.
    pub fn validate(&self, token: &str) -> AuthResult<Claims> {
        self.validate_at(token, Utc::now())
    }

    /// Validates a token as if the clock read `now`.
    ///
    /// Signature and algorithm failures yield [`AuthError::InvalidCredential`];
    /// a verified token at or past `exp` yields [`AuthError::ExpiredCredential`].
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!(kind = ?e.kind(), "token rejected");
            AuthError::InvalidCredential
        })?;

        if data.claims.is_expired_at(now) {
            return Err(AuthError::ExpiredCredential);
        }

        Ok(data.claims)
    }
}

impl fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtManager")
            .field("algorithm", &ALGORITHM)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use innkeep_core::UserId;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn manager(secret: &str) -> JwtManager {
        JwtManager::new(JwtConfig::new(secret)).unwrap()
    }

    fn user() -> User {
        User {
            id: UserId::new(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
            is_admin: false,
            password_hash: String::new(),
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_issue_and_validate() {
        let manager = manager(SECRET);
        let user = user();

        let token = manager.issue(&user).unwrap();
        let claims = manager.validate(&token).unwrap();

        assert_eq!(claims.id, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_TTL_SECS);
    }

    #[test]
    fn test_validity_window() {
        let manager = manager(SECRET);
        let token = manager.issue_at(&user(), t0()).unwrap();
        let window = chrono::Duration::seconds(DEFAULT_TOKEN_TTL_SECS);

        assert!(manager.validate_at(&token, t0()).is_ok());
        assert!(manager
            .validate_at(&token, t0() + window - chrono::Duration::seconds(1))
            .is_ok());
        assert_eq!(
            manager.validate_at(&token, t0() + window),
            Err(AuthError::ExpiredCredential)
        );
        assert_eq!(
            manager.validate_at(&token, t0() + window + chrono::Duration::days(1)),
            Err(AuthError::ExpiredCredential)
        );
    }

    #[test]
    fn test_custom_ttl() {
        let manager =
            JwtManager::new(JwtConfig::new(SECRET).with_ttl(Duration::from_secs(60))).unwrap();
        let token = manager.issue_at(&user(), t0()).unwrap();

        assert!(manager.validate_at(&token, t0() + chrono::Duration::seconds(59)).is_ok());
        assert_eq!(
            manager.validate_at(&token, t0() + chrono::Duration::seconds(60)),
            Err(AuthError::ExpiredCredential)
        );
    }

    #[test]
    fn test_invalid_token() {
        let manager = manager(SECRET);
        assert_eq!(
            manager.validate("invalid.token.here"),
            Err(AuthError::InvalidCredential)
        );
        assert_eq!(manager.validate(""), Err(AuthError::InvalidCredential));
    }

    #[test]
    fn test_wrong_secret() {
        let issuer = manager(SECRET);
        let other = manager("another-secret-key-at-least-32-bytes");

        let token = issuer.issue(&user()).unwrap();
        assert_eq!(other.validate(&token), Err(AuthError::InvalidCredential));
    }

    #[test]
    fn test_tampered_segments_rejected() {
        let manager = manager(SECRET);
        let token = manager.issue(&user()).unwrap();
        let segments: Vec<&str> = token.split('.').collect();
        assert_eq!(segments.len(), 3);

        for target in 1..3 {
            let mut parts: Vec<String> = segments.iter().map(|s| s.to_string()).collect();
            let seg = &mut parts[target];
            let idx = seg.len() / 2;
            let original = seg.as_bytes()[idx];
            let replacement = if original == b'A' { "B" } else { "A" };
            seg.replace_range(idx..idx + 1, replacement);

            let tampered = parts.join(".");
            assert_eq!(
                manager.validate(&tampered),
                Err(AuthError::InvalidCredential),
                "segment {} accepted after tampering",
                target
            );
        }
    }

    #[test]
    fn test_algorithm_substitution_rejected() {
        let manager = manager(SECRET);
        let user = user();

        // Same secret, stronger HMAC: still not HS256.
        let claims = Claims::for_user(&user, Utc::now(), 60);
        let hs512 = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert_eq!(manager.validate(&hs512), Err(AuthError::InvalidCredential));

        // Unsigned token reusing a genuine payload.
        let genuine = manager.issue(&user).unwrap();
        let payload = genuine.split('.').nth(1).unwrap();
        let unsigned = format!("eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.{}.", payload);
        assert_eq!(manager.validate(&unsigned), Err(AuthError::InvalidCredential));
    }

    #[test]
    fn test_empty_secret_is_configuration_error() {
        assert!(matches!(
            JwtManager::new(JwtConfig::new("")),
            Err(AuthError::Configuration { .. })
        ));
        assert!(matches!(
            JwtManager::new(JwtConfig::new("   ")),
            Err(AuthError::Configuration { .. })
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", JwtConfig::new(SECRET));
        assert!(!rendered.contains(SECRET));
    }
}
