//! HS256 access and refresh tokens.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
    pub jti: Uuid,
    pub token_type: TokenType,
    pub role: String,
    pub email: String,
    pub username: String,
}

/// A freshly minted token and the bookkeeping needed to track it.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub jti: Uuid,
    pub expires_at: DateTime<Utc>,
}

pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn issue(
        &self,
        user: &User,
        token_type: TokenType,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
        let ttl = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };
        let expires_at = now + ttl;
        let claims = Claims {
            sub: user.id,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4(),
            token_type,
            role: user.role.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(IssuedToken {
            token,
            jti: claims.jti,
            expires_at,
        })
    }

    /// Verify signature and expiry, and that the token is of the expected type.
    pub fn decode(&self, token: &str, expected: TokenType) -> Option<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .ok()?
            .claims;
        (claims.token_type == expected).then_some(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: "cook@example.com".into(),
            username: "cook".into(),
            password_hash: "x".into(),
            bio: String::new(),
            profile_picture: None,
            role: "user".into(),
            is_active: true,
            date_joined: now,
            last_login: None,
            updated_at: now,
        }
    }

    fn keys() -> JwtKeys {
        JwtKeys::new("secret", Duration::minutes(60), Duration::days(7))
    }

    #[test]
    fn test_access_token_carries_identity() {
        let user = user();
        let issued = keys().issue(&user, TokenType::Access, Utc::now()).unwrap();
        let claims = keys().decode(&issued.token, TokenType::Access).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.jti, issued.jti);
        assert_eq!(claims.username, "cook");
        assert_eq!(claims.role, "user");
    }

    #[test]
    fn test_token_type_enforced() {
        let issued = keys().issue(&user(), TokenType::Refresh, Utc::now()).unwrap();
        assert!(keys().decode(&issued.token, TokenType::Access).is_none());
        assert!(keys().decode(&issued.token, TokenType::Refresh).is_some());
    }

    #[test]
    fn test_expired_token_rejected() {
        let issued = keys()
            .issue(&user(), TokenType::Access, Utc::now() - Duration::hours(2))
            .unwrap();
        assert!(keys().decode(&issued.token, TokenType::Access).is_none());
    }

    #[test]
    fn test_other_secret_rejected() {
        let issued = keys().issue(&user(), TokenType::Access, Utc::now()).unwrap();
        let other = JwtKeys::new("other", Duration::minutes(60), Duration::days(7));
        assert!(other.decode(&issued.token, TokenType::Access).is_none());
        assert!(keys().decode("not.a.jwt", TokenType::Access).is_none());
    }
}
