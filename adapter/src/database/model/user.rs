use kernel::model::{id::UserId, role::Role, user::User};
use shared::error::AppError;
use sqlx::FromRow;

#[derive(FromRow)]
pub struct UserRow {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub pending_approval: bool,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(value: UserRow) -> Result<Self, Self::Error> {
        let UserRow {
            user_id,
            name,
            email,
            role,
            pending_approval,
        } = value;
        let role = role
            .parse::<Role>()
            .map_err(|e| AppError::ConversionEntityError(format!("role {role}: {e}")))?;
        Ok(User {
            user_id,
            name,
            email,
            role,
            pending_approval,
        })
    }
}

// Only used to check the password on login and password change
#[derive(FromRow)]
pub struct UserCredentialRow {
    pub user_id: UserId,
    pub password_hash: String,
}
