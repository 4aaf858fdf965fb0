use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::{
    entity::users::Model as UserModel,
    error::{AppError, AppResult},
    models::Role,
    services::{token_service::TokenKind, user_store},
    state::AppState,
};

/// Caller identity proven by a valid access token. The record itself is not
/// loaded here; services resolve it when they need it.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

/// Caller whose stored role is `admin` at the time of the request.
#[derive(Debug, Clone, Copy)]
pub struct AdminUser {
    pub user_id: Uuid,
}

pub fn bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthenticated("Missing Authorization header".into()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthenticated("Invalid Authorization header".into()))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthenticated("Invalid Authorization scheme".into()))?;

    Ok(token)
}

/// Load the user and check its role against live storage.
pub async fn require_role<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    role: Role,
) -> AppResult<UserModel> {
    let user = user_store::require_by_id(db, user_id).await?;
    if user.role != role {
        tracing::warn!(user_id = %user_id, required = role.as_str(), "role check failed");
        return Err(AppError::Forbidden);
    }
    Ok(user)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let user_id = state.tokens.verify_kind(token, TokenKind::Access)?;
        Ok(AuthUser { user_id })
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser { user_id } = AuthUser::from_request_parts(parts, state).await?;
        require_role(&state.orm, user_id, Role::Admin).await?;
        Ok(AdminUser { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        let h = headers("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&h).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_header_is_unauthenticated() {
        let err = bearer_token(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
    }

    #[test]
    fn other_schemes_are_rejected() {
        assert!(matches!(
            bearer_token(&headers("Basic dXNlcjpwYXNz")),
            Err(AppError::Unauthenticated(_))
        ));
        assert!(matches!(
            bearer_token(&headers("Bearer   ")),
            Err(AppError::Unauthenticated(_))
        ));
    }
}
