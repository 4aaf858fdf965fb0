use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::UserProfile;

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserProfile,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccessTokenResponse {
    pub access_token: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct ResetRequest {
    #[serde(default)]
    pub email: String,
}

/// The token is handed back directly instead of being mailed.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResetTokenResponse {
    pub token: String,
    pub expires_in_seconds: i64,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub password: String,
}
