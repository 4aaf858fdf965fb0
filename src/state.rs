use sea_orm::DatabaseConnection;

use crate::services::{password_service::PasswordService, token_service::TokenService};

/// Process-wide state, built once at startup and shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub tokens: TokenService,
    pub passwords: PasswordService,
}
