use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::{
    dto::auth::{
        AccessTokenResponse, AuthResponse, LoginRequest, RegisterRequest, ResetPasswordRequest,
        ResetRequest, ResetTokenResponse,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Role, UserProfile},
    response::ApiResponse,
    services::{
        token_service::TokenKind,
        user_store::{self, NewUser},
    },
    state::AppState,
};

pub const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.-]+@[\w.-]+\.\w+$").expect("email pattern compiles"));

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> AppResult<()> {
    if !EMAIL_RE.is_match(email) {
        return Err(AppError::Validation("Invalid email format".into()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_username(raw: &str) -> AppResult<String> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(AppError::Validation("Username is required".into()));
    }
    Ok(username.to_string())
}

/// Validate, check uniqueness, hash and store a new account.
pub async fn create_account(
    state: &AppState,
    username: &str,
    email: &str,
    password: &str,
    role: Role,
) -> AppResult<UserProfile> {
    let username = validate_username(username)?;
    let email = normalize_email(email);
    validate_email(&email)?;
    validate_password(password)?;

    if user_store::identity_taken(&state.orm, Some(&email), Some(&username), None).await? {
        return Err(AppError::Conflict(
            "Username or email already registered".into(),
        ));
    }

    let password_hash = state.passwords.hash(password)?;
    let user = user_store::insert(
        &state.orm,
        NewUser {
            username,
            email,
            password_hash,
            role,
        },
    )
    .await?;

    Ok(user.into())
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<AuthResponse>> {
    let RegisterRequest {
        username,
        email,
        password,
    } = payload;
    let user = create_account(state, &username, &email, &password, Role::User).await?;

    let access_token = state.tokens.issue_access(user.id)?;
    let refresh_token = state.tokens.issue_refresh(user.id)?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok(ApiResponse::success(
        "User created",
        AuthResponse {
            user_id: user.id,
            access_token,
            refresh_token,
            user,
        },
        None,
    ))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<AuthResponse>> {
    let LoginRequest { email, password } = payload;
    let email = normalize_email(&email);

    let user = match user_store::find_by_email(&state.orm, &email).await? {
        Some(u) => u,
        None => {
            state.passwords.verify_dummy(&password);
            tracing::info!("login rejected");
            return Err(AppError::InvalidCredentials);
        }
    };

    if !state.passwords.verify(&password, &user.password_hash) {
        tracing::info!(user_id = %user.id, "login rejected");
        return Err(AppError::InvalidCredentials);
    }

    let access_token = state.tokens.issue_access(user.id)?;
    let refresh_token = state.tokens.issue_refresh(user.id)?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(ApiResponse::success(
        "Logged in",
        AuthResponse {
            user_id: user.id,
            access_token,
            refresh_token,
            user: user.into(),
        },
        None,
    ))
}

pub fn refresh_access(
    state: &AppState,
    refresh_token: &str,
) -> AppResult<ApiResponse<AccessTokenResponse>> {
    let access_token = state.tokens.refresh_access(refresh_token)?;
    Ok(ApiResponse::success(
        "Token refreshed",
        AccessTokenResponse { access_token },
        None,
    ))
}

/// Tokens are stateless, so logging out only acknowledges the call.
pub fn logout_user() -> ApiResponse<serde_json::Value> {
    ApiResponse::success("Logged out", serde_json::json!({}), None)
}

pub async fn request_password_reset(
    state: &AppState,
    payload: ResetRequest,
) -> AppResult<ApiResponse<ResetTokenResponse>> {
    let email = normalize_email(&payload.email);
    if email.is_empty() {
        return Err(AppError::Validation("Email is required".into()));
    }

    let user = user_store::find_by_email(&state.orm, &email)
        .await?
        .ok_or(AppError::NotFound("Account"))?;

    let ttl = state.tokens.reset_ttl();
    let token = state.tokens.issue_reset(user.id, ttl)?;

    tracing::info!(user_id = %user.id, ttl_minutes = ttl.num_minutes(), "password reset token issued");

    Ok(ApiResponse::success(
        "Reset token issued",
        ResetTokenResponse {
            token,
            expires_in_seconds: ttl.num_seconds(),
        },
        None,
    ))
}

/// Overwrite the password of the token's subject. The token stays valid until
/// it expires, so it can be presented again within its window.
pub async fn complete_password_reset(
    state: &AppState,
    payload: ResetPasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let ResetPasswordRequest { token, password } = payload;
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::Validation("Token is required".into()));
    }
    validate_password(&password)?;

    let user_id: Uuid = state.tokens.verify_kind(token, TokenKind::Reset)?;
    let password_hash = state.passwords.hash(&password)?;
    user_store::set_password_hash(&state.orm, user_id, password_hash).await?;

    tracing::info!(user_id = %user_id, "password reset completed");

    Ok(ApiResponse::success(
        "Password updated",
        serde_json::json!({}),
        None,
    ))
}

pub async fn dashboard(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<UserProfile>> {
    let user = user_store::require_by_id(&state.orm, user.user_id).await?;
    Ok(ApiResponse::success("Profile", user.into(), None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Jane.Doe@Example.COM "), "jane.doe@example.com");
    }

    #[test]
    fn email_format() {
        assert!(validate_email("jane.doe@example.com").is_ok());
        assert!(validate_email("jane_doe-1@mail.example.co").is_ok());
        assert!(validate_email("jane").is_err());
        assert!(validate_email("jane@example").is_err());
        assert!(validate_email("jane doe@example.com").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn password_length_counts_characters() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("ñandú1").is_ok());
    }

    #[test]
    fn username_must_not_be_blank() {
        assert!(validate_username("   ").is_err());
        assert_eq!(validate_username("  ferris ").unwrap(), "ferris");
    }
}
