mod common;

use storefront_api::{
    dto::auth::{LoginRequest, RegisterRequest, ResetPasswordRequest, ResetRequest},
    error::AppError,
    middleware::auth::AuthUser,
    models::Role,
    services::{
        auth_service,
        token_service::{TokenError, TokenKind},
        user_store::{self, NewUser},
    },
};

fn register_request(username: &str, email: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        email: email.to_string(),
        password: "s3cret-pass".to_string(),
    }
}

fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn register_then_login_round_trip() -> anyhow::Result<()> {
    let state = common::setup_state().await?;

    let registered = auth_service::register_user(&state, register_request("ana", "ana@example.com"))
        .await?
        .data
        .expect("auth data");
    assert_eq!(registered.user.role, Role::User);
    assert_eq!(
        state.tokens.verify_kind(&registered.access_token, TokenKind::Access)?,
        registered.user_id
    );
    assert_eq!(
        state.tokens.verify_kind(&registered.refresh_token, TokenKind::Refresh)?,
        registered.user_id
    );

    let logged_in = auth_service::login_user(&state, login_request("ana@example.com", "s3cret-pass"))
        .await?
        .data
        .expect("auth data");
    assert_eq!(logged_in.user_id, registered.user_id);

    let profile = auth_service::dashboard(&state, &AuthUser { user_id: registered.user_id })
        .await?
        .data
        .expect("profile");
    assert_eq!(profile.username, "ana");
    assert_eq!(profile.email, "ana@example.com");

    let rendered = serde_json::to_value(&profile)?;
    assert!(rendered.get("password_hash").is_none());
    assert!(!rendered.to_string().contains("$argon2"));
    Ok(())
}

#[tokio::test]
async fn email_is_normalized_and_duplicates_conflict() -> anyhow::Result<()> {
    let state = common::setup_state().await?;

    let first = auth_service::register_user(&state, register_request("bo", "  Bo@Example.COM "))
        .await?
        .data
        .expect("auth data");
    assert_eq!(first.user.email, "bo@example.com");

    let err = auth_service::register_user(&state, register_request("bo2", "bo@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = auth_service::register_user(&state, register_request("bo", "other@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // case differences do not create a second account either
    let err = auth_service::register_user(&state, register_request("bo3", "BO@EXAMPLE.COM"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let logged_in = auth_service::login_user(&state, login_request("BO@example.com", "s3cret-pass")).await;
    assert!(logged_in.is_ok());
    Ok(())
}

#[tokio::test]
async fn registration_validates_input() -> anyhow::Result<()> {
    let state = common::setup_state().await?;

    let mut short = register_request("cy", "cy@example.com");
    short.password = "12345".into();
    assert!(matches!(
        auth_service::register_user(&state, short).await,
        Err(AppError::Validation(_))
    ));

    assert!(matches!(
        auth_service::register_user(&state, register_request("cy", "not-an-email")).await,
        Err(AppError::Validation(_))
    ));

    assert!(matches!(
        auth_service::register_user(&state, register_request("   ", "cy@example.com")).await,
        Err(AppError::Validation(_))
    ));
    Ok(())
}

#[tokio::test]
async fn login_failures_are_indistinguishable() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    auth_service::register_user(&state, register_request("di", "di@example.com")).await?;

    let wrong_password = auth_service::login_user(&state, login_request("di@example.com", "nope-nope"))
        .await
        .unwrap_err();
    let unknown_email = auth_service::login_user(&state, login_request("ghost@example.com", "s3cret-pass"))
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, AppError::InvalidCredentials));
    assert!(matches!(unknown_email, AppError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    Ok(())
}

#[tokio::test]
async fn refresh_mints_access_token_only_from_refresh_tokens() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let pair = auth_service::register_user(&state, register_request("ed", "ed@example.com"))
        .await?
        .data
        .expect("auth data");

    let refreshed = auth_service::refresh_access(&state, &pair.refresh_token)?
        .data
        .expect("access token");
    assert_eq!(
        state.tokens.verify_kind(&refreshed.access_token, TokenKind::Access)?,
        pair.user_id
    );

    let err = auth_service::refresh_access(&state, &pair.access_token).unwrap_err();
    assert!(matches!(
        err,
        AppError::Token(TokenError::WrongKind {
            expected: TokenKind::Refresh,
            actual: TokenKind::Access
        })
    ));
    Ok(())
}

#[tokio::test]
async fn password_reset_changes_password_and_token_can_be_replayed() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    auth_service::register_user(&state, register_request("fay", "fay@example.com")).await?;

    let issued = auth_service::request_password_reset(
        &state,
        ResetRequest {
            email: "Fay@Example.com".into(),
        },
    )
    .await?
    .data
    .expect("reset token");
    assert_eq!(issued.expires_in_seconds, 15 * 60);

    auth_service::complete_password_reset(
        &state,
        ResetPasswordRequest {
            token: issued.token.clone(),
            password: "brand-new-pass".into(),
        },
    )
    .await?;

    assert!(matches!(
        auth_service::login_user(&state, login_request("fay@example.com", "s3cret-pass")).await,
        Err(AppError::InvalidCredentials)
    ));
    assert!(
        auth_service::login_user(&state, login_request("fay@example.com", "brand-new-pass"))
            .await
            .is_ok()
    );

    // Tokens are stateless, so the same reset token still works inside its window.
    auth_service::complete_password_reset(
        &state,
        ResetPasswordRequest {
            token: issued.token,
            password: "third-password".into(),
        },
    )
    .await?;
    assert!(
        auth_service::login_user(&state, login_request("fay@example.com", "third-password"))
            .await
            .is_ok()
    );
    Ok(())
}

#[tokio::test]
async fn password_reset_rejects_bad_input() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let pair = auth_service::register_user(&state, register_request("gus", "gus@example.com"))
        .await?
        .data
        .expect("auth data");

    assert!(matches!(
        auth_service::request_password_reset(&state, ResetRequest { email: "  ".into() }).await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        auth_service::request_password_reset(
            &state,
            ResetRequest {
                email: "nobody@example.com".into()
            }
        )
        .await,
        Err(AppError::NotFound(_))
    ));

    assert!(matches!(
        auth_service::complete_password_reset(
            &state,
            ResetPasswordRequest {
                token: String::new(),
                password: "long-enough".into()
            }
        )
        .await,
        Err(AppError::Validation(_))
    ));

    // an access token is not a reset token
    assert!(matches!(
        auth_service::complete_password_reset(
            &state,
            ResetPasswordRequest {
                token: pair.access_token,
                password: "long-enough".into()
            }
        )
        .await,
        Err(AppError::Token(TokenError::WrongKind { .. }))
    ));

    let token = state
        .tokens
        .issue_reset(pair.user_id, state.tokens.reset_ttl())?;
    assert!(matches!(
        auth_service::complete_password_reset(
            &state,
            ResetPasswordRequest {
                token,
                password: "short".into()
            }
        )
        .await,
        Err(AppError::Validation(_))
    ));
    Ok(())
}

#[tokio::test]
async fn reset_for_deleted_account_is_not_found() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let ghost = uuid::Uuid::new_v4();
    let token = state.tokens.issue_reset(ghost, state.tokens.reset_ttl())?;

    let err = auth_service::complete_password_reset(
        &state,
        ResetPasswordRequest {
            token,
            password: "long-enough".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn storage_unique_violations_surface_as_conflicts() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    common::create_user(&state, "dup", Role::User).await?;

    let duplicate = NewUser {
        username: "dup".to_string(),
        email: "other@example.com".to_string(),
        password_hash: state.passwords.hash(common::PASSWORD)?,
        role: Role::User,
    };
    let err = user_store::insert(&state.orm, duplicate).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Resource already exists"));
    Ok(())
}
