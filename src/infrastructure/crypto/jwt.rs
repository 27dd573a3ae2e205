//! JWT token handling

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::principal::{Principal, UserRole};

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: i64,
    /// Issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            expiration_hours: 24,
            issuer: "car-rental".to_string(),
        }
    }
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    pub role: String,
    /// Linked customer record, for customer accounts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i32>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub iss: String,
}

impl TokenClaims {
    pub fn new(principal: &Principal, email: &str, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(config.expiration_hours);

        Self {
            sub: principal.user_id.to_string(),
            email: email.to_string(),
            role: principal.role.as_str().to_string(),
            customer_id: principal.customer_id,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// The caller these claims describe, if they are well formed.
    pub fn principal(&self) -> Option<Principal> {
        let user_id = self.sub.parse().ok()?;
        let role = UserRole::from_str(&self.role)?;
        Some(Principal::new(user_id, role, self.customer_id))
    }
}

/// Create a JWT token for a principal
pub fn create_token(
    principal: &Principal,
    email: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = TokenClaims::new(principal, email, config);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify and decode a JWT token
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".into(),
            expiration_hours: 1,
            issuer: "car-rental-test".into(),
        }
    }

    #[test]
    fn token_carries_principal() {
        let p = Principal::new(12, UserRole::Customer, Some(5));
        let token = create_token(&p, "amina@example.com", &config()).unwrap();
        let claims = verify_token(&token, &config()).unwrap();
        assert_eq!(claims.email, "amina@example.com");
        assert_eq!(claims.principal(), Some(p));
        assert!(!claims.is_expired());
    }

    #[test]
    fn staff_token_has_no_customer() {
        let p = Principal::new(1, UserRole::Admin, None);
        let token = create_token(&p, "admin@example.com", &config()).unwrap();
        let claims = verify_token(&token, &config()).unwrap();
        assert_eq!(claims.customer_id, None);
        assert_eq!(claims.principal().unwrap().role, UserRole::Admin);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let p = Principal::new(1, UserRole::Employee, None);
        let token = create_token(&p, "e@example.com", &config()).unwrap();
        let other = JwtConfig {
            secret: "other".into(),
            ..config()
        };
        assert!(verify_token(&token, &other).is_err());
    }
}
