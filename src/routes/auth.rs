use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};

use crate::{
    dto::auth::{
        AccessTokenResponse, AuthResponse, LoginRequest, RegisterRequest, ResetPasswordRequest,
        ResetRequest, ResetTokenResponse,
    },
    error::AppResult,
    middleware::{
        auth::{AuthUser, bearer_token},
        json::AppJson,
    },
    models::UserProfile,
    response::{ApiResponse, ErrorResponse},
    services::auth_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/request-reset", post(request_reset))
        .route("/reset-password", post(reset_password))
}

pub fn dashboard_router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Register user", body = ApiResponse<AuthResponse>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Username or email taken", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    let resp = auth_service::register_user(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let resp = auth_service::login_user(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "New access token", body = ApiResponse<AccessTokenResponse>),
        (status = 401, description = "Missing or invalid refresh token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<ApiResponse<AccessTokenResponse>>> {
    let token = bearer_token(&headers)?;
    let resp = auth_service::refresh_access(&state, token)?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = ApiResponse<serde_json::Value>)
    ),
    tag = "Auth"
)]
pub async fn logout() -> Json<ApiResponse<serde_json::Value>> {
    Json(auth_service::logout_user())
}

#[utoipa::path(
    post,
    path = "/auth/request-reset",
    request_body = ResetRequest,
    responses(
        (status = 200, description = "Reset token issued", body = ApiResponse<ResetTokenResponse>),
        (status = 400, description = "Email missing", body = ErrorResponse),
        (status = 404, description = "No account for this email", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn request_reset(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ResetRequest>,
) -> AppResult<Json<ApiResponse<ResetTokenResponse>>> {
    let resp = auth_service::request_password_reset(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Token or password missing", body = ErrorResponse),
        (status = 401, description = "Invalid or expired reset token", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn reset_password(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ResetPasswordRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = auth_service::complete_password_reset(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Caller profile", body = ApiResponse<UserProfile>),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let resp = auth_service::dashboard(&state, &user).await?;
    Ok(Json(resp))
}
