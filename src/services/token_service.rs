use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
    Reset,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
            TokenKind::Reset => "reset",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims carry identity and kind only. Roles are looked up per request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is malformed")]
    Malformed,

    #[error("Expected a {expected} token, got a {actual} token")]
    WrongKind {
        expected: TokenKind,
        actual: TokenKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedToken {
    pub user_id: Uuid,
    pub kind: TokenKind,
}

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
    reset_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration, reset_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl,
            refresh_ttl,
            reset_ttl,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            Duration::minutes(config.access_token_ttl_minutes),
            Duration::days(config.refresh_token_ttl_days),
            Duration::minutes(config.reset_token_ttl_minutes),
        )
    }

    pub fn reset_ttl(&self) -> Duration {
        self.reset_ttl
    }

    pub fn issue_access(&self, user_id: Uuid) -> AppResult<String> {
        self.issue(user_id, TokenKind::Access, self.access_ttl)
    }

    pub fn issue_refresh(&self, user_id: Uuid) -> AppResult<String> {
        self.issue(user_id, TokenKind::Refresh, self.refresh_ttl)
    }

    pub fn issue_reset(&self, user_id: Uuid, ttl: Duration) -> AppResult<String> {
        self.issue(user_id, TokenKind::Reset, ttl)
    }

    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            }
        })?;
        let user_id = Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::Malformed)?;
        Ok(VerifiedToken {
            user_id,
            kind: data.claims.kind,
        })
    }

    pub fn verify_kind(&self, token: &str, expected: TokenKind) -> Result<Uuid, TokenError> {
        let verified = self.verify(token)?;
        if verified.kind != expected {
            return Err(TokenError::WrongKind {
                expected,
                actual: verified.kind,
            });
        }
        Ok(verified.user_id)
    }

    /// Mint a fresh access token from a refresh token.
    pub fn refresh_access(&self, refresh_token: &str) -> AppResult<String> {
        let user_id = self.verify_kind(refresh_token, TokenKind::Refresh)?;
        self.issue_access(user_id)
    }

    fn issue(&self, user_id: Uuid, kind: TokenKind, ttl: Duration) -> AppResult<String> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

        let claims = Claims {
            sub: user_id.to_string(),
            kind,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(
            secret,
            Duration::minutes(30),
            Duration::days(7),
            Duration::minutes(15),
        )
    }

    #[test]
    fn access_token_round_trips_identity_and_kind() {
        let svc = service("secret");
        let user_id = Uuid::new_v4();
        let token = svc.issue_access(user_id).unwrap();
        let verified = svc.verify(&token).unwrap();
        assert_eq!(verified.user_id, user_id);
        assert_eq!(verified.kind, TokenKind::Access);
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = service("secret");
        let token = svc
            .issue_reset(Uuid::new_v4(), Duration::seconds(-60))
            .unwrap();
        assert_eq!(svc.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn token_signed_with_other_key_has_invalid_signature() {
        let token = service("one").issue_access(Uuid::new_v4()).unwrap();
        assert_eq!(
            service("two").verify(&token),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn swapped_payload_breaks_signature() {
        let svc = service("secret");
        let victim = svc.issue_access(Uuid::new_v4()).unwrap();
        let attacker = svc.issue_refresh(Uuid::new_v4()).unwrap();
        let victim_parts: Vec<&str> = victim.split('.').collect();
        let attacker_parts: Vec<&str> = attacker.split('.').collect();
        let forged = format!(
            "{}.{}.{}",
            victim_parts[0], attacker_parts[1], victim_parts[2]
        );
        assert_eq!(svc.verify(&forged), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn garbage_is_malformed() {
        let svc = service("secret");
        assert_eq!(svc.verify("abc"), Err(TokenError::Malformed));
        assert_eq!(svc.verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn non_uuid_subject_is_malformed() {
        let svc = service("secret");
        let claims = Claims {
            sub: "not-a-uuid".into(),
            kind: TokenKind::Access,
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::minutes(5)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        assert_eq!(svc.verify(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn refresh_requires_refresh_kind() {
        let svc = service("secret");
        let user_id = Uuid::new_v4();

        let access = svc.issue_access(user_id).unwrap();
        let err = svc.refresh_access(&access).unwrap_err();
        assert!(matches!(
            err,
            AppError::Token(TokenError::WrongKind {
                expected: TokenKind::Refresh,
                actual: TokenKind::Access
            })
        ));

        let refresh = svc.issue_refresh(user_id).unwrap();
        let minted = svc.refresh_access(&refresh).unwrap();
        assert_eq!(
            svc.verify_kind(&minted, TokenKind::Access).unwrap(),
            user_id
        );
    }

    #[test]
    fn reset_token_is_not_an_access_token() {
        let svc = service("secret");
        let token = svc
            .issue_reset(Uuid::new_v4(), svc.reset_ttl())
            .unwrap();
        assert!(matches!(
            svc.verify_kind(&token, TokenKind::Access),
            Err(TokenError::WrongKind { .. })
        ));
    }
}
