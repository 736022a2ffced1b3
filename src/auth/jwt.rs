//! # JWT Verification
//!
//! Stateless HS256 bearer tokens.
//!
//! ## Invariants
//! - Validation needs no lookup: the signature, `exp`, `iss` and `aud`
//!   claims are enough to accept or reject a token
//! - Tokens carry only the caller id and role

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::errors::{AuthError, AuthResult};
use super::{Caller, Role};

/// JWT claims for access tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (caller ID)
    pub sub: String,

    /// Caller role
    pub role: Role,

    /// Issued at timestamp (Unix epoch seconds)
    pub iat: i64,

    /// Expiration timestamp (Unix epoch seconds)
    pub exp: i64,

    /// Audience
    pub aud: String,

    /// Issuer
    pub iss: String,
}

/// JWT configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Shared HS256 secret
    #[serde(default = "default_secret")]
    pub secret: String,

    /// Lifetime of issued tokens, in minutes
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,

    /// Issuer identifier
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Audience identifier
    #[serde(default = "default_audience")]
    pub audience: String,
}

fn default_secret() -> String {
    "CHANGE_THIS_SECRET_IN_PRODUCTION".to_string()
}

fn default_token_ttl_minutes() -> i64 {
    15
}

fn default_issuer() -> String {
    "datapoint-api".to_string()
}

fn default_audience() -> String {
    "datapoint-api".to_string()
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: default_secret(),
            token_ttl_minutes: default_token_ttl_minutes(),
            issuer: default_issuer(),
            audience: default_audience(),
        }
    }
}

impl JwtConfig {
    /// Whether the built-in development secret is still in use
    pub fn uses_default_secret(&self) -> bool {
        self.secret == default_secret()
    }
}

/// JWT manager for token generation and validation
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    /// Create a new JWT manager with the given configuration
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue a token for `subject` with `role`
    pub fn generate_token(&self, subject: &str, role: Role) -> AuthResult<String> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.config.token_ttl_minutes);

        let claims = JwtClaims {
            sub: subject.to_string(),
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            aud: self.config.audience.clone(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenGenerationFailed)
    }

    /// Validate a token and extract its claims
    pub fn validate_token(&self, token: &str) -> AuthResult<JwtClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);

        let token_data =
            decode::<JwtClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AuthError::InvalidSignature
                    }
                    _ => AuthError::MalformedToken,
                }
            })?;

        Ok(token_data.claims)
    }

    /// Resolve a token to the caller it identifies
    pub fn authenticate(&self, token: &str) -> AuthResult<Caller> {
        let claims = self.validate_token(token)?;
        Ok(Caller {
            id: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_manager() -> JwtManager {
        JwtManager::new(JwtConfig {
            secret: "test_secret_key_for_testing_only".to_string(),
            token_ttl_minutes: 15,
            issuer: "test".to_string(),
            audience: "test".to_string(),
        })
    }

    #[test]
    fn test_token_round_trip() {
        let manager = create_test_manager();
        let token = manager.generate_token("station-7", Role::Admin).unwrap();

        assert_eq!(token.split('.').count(), 3);

        let caller = manager.authenticate(&token).unwrap();
        assert_eq!(caller.id, "station-7");
        assert_eq!(caller.role, Role::Admin);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let manager = create_test_manager();

        let result = manager.validate_token("invalid.token.here");
        assert!(matches!(
            result,
            Err(AuthError::MalformedToken) | Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let manager1 = JwtManager::new(JwtConfig {
            secret: "secret_one".to_string(),
            ..JwtConfig::default()
        });
        let manager2 = JwtManager::new(JwtConfig {
            secret: "secret_two".to_string(),
            ..JwtConfig::default()
        });

        let token = manager1.generate_token("u1", Role::User).unwrap();
        assert_eq!(
            manager2.validate_token(&token),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let issuer = create_test_manager();
        let verifier = JwtManager::new(JwtConfig {
            secret: "test_secret_key_for_testing_only".to_string(),
            audience: "someone-else".to_string(),
            ..JwtConfig::default()
        });

        let token = issuer.generate_token("u1", Role::User).unwrap();
        assert_eq!(
            verifier.validate_token(&token),
            Err(AuthError::MalformedToken)
        );
    }

    #[test]
    fn test_expired_token_rejected() {
        let secret = "test_secret_key_for_testing_only";
        let now = Utc::now();
        let claims = JwtClaims {
            sub: "u1".to_string(),
            role: Role::User,
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
            aud: "test".to_string(),
            iss: "test".to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        let manager = create_test_manager();
        assert_eq!(manager.validate_token(&token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn test_config_defaults_from_partial_json() {
        let config: JwtConfig = serde_json::from_str(r#"{"secret": "s3cret"}"#).unwrap();
        assert_eq!(config.secret, "s3cret");
        assert_eq!(config.token_ttl_minutes, 15);
        assert!(!config.uses_default_secret());
        assert!(JwtConfig::default().uses_default_secret());
    }
}
