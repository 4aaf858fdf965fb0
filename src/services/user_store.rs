//! Persistent access to user records.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::{
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    models::Role,
};

pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<UserModel>> {
    Ok(Users::find_by_id(id).one(db).await?)
}

/// Load a user or fail with `NotFound`. Tokens can outlive their subject, so
/// every authenticated operation resolves the caller through here.
pub async fn require_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<UserModel> {
    find_by_id(db, id).await?.ok_or(AppError::NotFound("User"))
}

pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> AppResult<Option<UserModel>> {
    Ok(Users::find()
        .filter(UserCol::Email.eq(email))
        .one(db)
        .await?)
}

/// Whether another account already holds `email` or `username`.
pub async fn identity_taken<C: ConnectionTrait>(
    db: &C,
    email: Option<&str>,
    username: Option<&str>,
    except: Option<Uuid>,
) -> AppResult<bool> {
    let mut any = Condition::any();
    if let Some(email) = email {
        any = any.add(UserCol::Email.eq(email));
    }
    if let Some(username) = username {
        any = any.add(UserCol::Username.eq(username));
    }
    if any.is_empty() {
        return Ok(false);
    }

    let mut condition = Condition::all().add(any);
    if let Some(id) = except {
        condition = condition.add(UserCol::Id.ne(id));
    }

    let existing = Users::find().filter(condition).one(db).await?;
    Ok(existing.is_some())
}

pub async fn insert<C: ConnectionTrait>(db: &C, new_user: NewUser) -> AppResult<UserModel> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        username: Set(new_user.username),
        email: Set(new_user.email),
        password_hash: Set(new_user.password_hash),
        role: Set(new_user.role),
        address: Set(None),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await?;
    Ok(user)
}

pub async fn set_password_hash<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    password_hash: String,
) -> AppResult<()> {
    let result = Users::update_many()
        .col_expr(UserCol::PasswordHash, Expr::value(password_hash))
        .filter(UserCol::Id.eq(id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("User"));
    }
    Ok(())
}
