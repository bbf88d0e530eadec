use crate::model::{id::UserId, role::Role};
use derive_new::new;

#[derive(new)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub pending_approval: bool,
}

#[derive(new)]
pub struct UpdateUserPassword {
    pub user_id: UserId,
    pub current_password: String,
    pub new_password: String,
}

#[derive(new)]
pub struct UpdateUserRole {
    pub user_id: UserId,
    pub role: Role,
}

#[derive(new)]
pub struct ApproveUser {
    pub user_id: UserId,
}

#[derive(new)]
pub struct DeleteUser {
    pub user_id: UserId,
}
