use crate::model::{
    id::UserId,
    user::{
        event::{ApproveUser, CreateUser, DeleteUser, UpdateUserPassword, UpdateUserRole},
        User, UserDirectory,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_current_user(&self, current_user_id: UserId) -> AppResult<Option<User>>;
    async fn find_all(&self) -> AppResult<UserDirectory>;
    async fn create(&self, event: CreateUser) -> AppResult<User>;
    // Returns false when the email is already registered
    async fn create_if_absent(&self, event: CreateUser) -> AppResult<bool>;
    async fn update_password(&self, event: UpdateUserPassword) -> AppResult<()>;
    async fn update_role(&self, event: UpdateUserRole) -> AppResult<()>;
    async fn approve(&self, event: ApproveUser) -> AppResult<()>;
    // Deletes an account that is still waiting for approval
    async fn reject(&self, event: DeleteUser) -> AppResult<()>;
    async fn delete(&self, event: DeleteUser) -> AppResult<()>;
}
