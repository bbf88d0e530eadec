use garde::Validate;
use kernel::model::{id::UserId, role::Role, user::event::CreateUser};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};

use super::user::{not_blank, RoleName};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 1))]
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub user_id: UserId,
    pub access_token: String,
    pub role: RoleName,
}

/// Self-service registration. The account waits for an admin before it can sign in.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[garde(custom(not_blank))]
    name: String,
    #[garde(email)]
    email: String,
    #[garde(length(min = 6))]
    password: String,
    #[garde(skip)]
    role: RoleName,
}

impl TryFrom<SignupRequest> for CreateUser {
    type Error = AppError;

    fn try_from(value: SignupRequest) -> AppResult<Self> {
        let SignupRequest {
            name,
            email,
            password,
            role,
        } = value;
        let role = Role::from(role);
        if role.is_admin() {
            return Err(AppError::ForbiddenOperation(
                "admin accounts cannot be requested through signup".into(),
            ));
        }
        Ok(CreateUser::new(
            name.trim().to_string(),
            email.trim().to_lowercase(),
            password,
            role,
            true,
        ))
    }
}
