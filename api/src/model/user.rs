use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::UserId,
    role::Role,
    user::{
        event::{CreateUser, UpdateUserPassword, UpdateUserRole},
        User, UserDirectory,
    },
};
use serde::{Deserialize, Serialize};
use strum::VariantNames;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, VariantNames)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RoleName {
    Admin,
    Staff,
    Student,
}

impl From<Role> for RoleName {
    fn from(value: Role) -> Self {
        match value {
            Role::Admin => Self::Admin,
            Role::Staff => Self::Staff,
            Role::Student => Self::Student,
        }
    }
}

impl From<RoleName> for Role {
    fn from(value: RoleName) -> Self {
        match value {
            RoleName::Admin => Self::Admin,
            RoleName::Staff => Self::Staff,
            RoleName::Student => Self::Student,
        }
    }
}

pub(crate) fn not_blank(value: &str, _: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("must not be blank"));
    }
    Ok(())
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersResponse {
    pub pending: Vec<UserResponse>,
    pub approved: Vec<UserResponse>,
}

impl From<UserDirectory> for UsersResponse {
    fn from(value: UserDirectory) -> Self {
        let UserDirectory { pending, approved } = value;
        Self {
            pending: pending.into_iter().map(UserResponse::from).collect(),
            approved: approved.into_iter().map(UserResponse::from).collect(),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub role: RoleName,
    pub pending_approval: bool,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        let User {
            user_id,
            name,
            email,
            role,
            pending_approval,
        } = value;
        Self {
            user_id,
            name,
            email,
            role: RoleName::from(role),
            pending_approval,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPasswordRequest {
    #[garde(length(min = 1))]
    current_password: String,
    #[garde(length(min = 6))]
    new_password: String,
}

#[derive(new)]
pub struct UpdateUserPasswordRequestWithUserId(UserId, UpdateUserPasswordRequest);
impl From<UpdateUserPasswordRequestWithUserId> for UpdateUserPassword {
    fn from(value: UpdateUserPasswordRequestWithUserId) -> Self {
        let UpdateUserPasswordRequestWithUserId(
            user_id,
            UpdateUserPasswordRequest {
                current_password,
                new_password,
            },
        ) = value;
        UpdateUserPassword {
            user_id,
            current_password,
            new_password,
        }
    }
}

/// Account created directly by an admin; it skips the approval queue.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[garde(custom(not_blank))]
    name: String,
    #[garde(email)]
    email: String,
    #[garde(length(min = 6))]
    password: String,
    #[garde(skip)]
    role: RoleName,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(value: CreateUserRequest) -> Self {
        let CreateUserRequest {
            name,
            email,
            password,
            role,
        } = value;
        CreateUser::new(
            name.trim().to_string(),
            email.trim().to_lowercase(),
            password,
            Role::from(role),
            false,
        )
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRoleRequest {
    role: RoleName,
}

#[derive(new)]
pub struct UpdateUserRoleRequestWithUserId(UserId, UpdateUserRoleRequest);
impl From<UpdateUserRoleRequestWithUserId> for UpdateUserRole {
    fn from(value: UpdateUserRoleRequestWithUserId) -> Self {
        let UpdateUserRoleRequestWithUserId(user_id, UpdateUserRoleRequest { role }) = value;
        Self {
            user_id,
            role: Role::from(role),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_follow_the_wire_format() {
        assert_eq!(RoleName::VARIANTS, &["admin", "staff", "student"]);
        let role: RoleName = serde_json::from_str(r#""staff""#).unwrap();
        assert_eq!(Role::from(role), Role::Staff);
        assert!(serde_json::from_str::<RoleName>(r#""guest""#).is_err());
    }

    #[test]
    fn admin_created_users_are_approved() {
        let req: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "name": "  Ravi Kumar ",
            "email": "Ravi@Example.com",
            "password": "secret1",
            "role": "staff",
        }))
        .unwrap();
        req.validate(&()).unwrap();

        let event = CreateUser::from(req);
        assert_eq!(event.name, "Ravi Kumar");
        assert_eq!(event.email, "ravi@example.com");
        assert_eq!(event.role, Role::Staff);
        assert!(!event.pending_approval);
    }

    #[test]
    fn blank_names_and_short_passwords_are_rejected() {
        let req: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "name": "   ",
            "email": "a@example.com",
            "password": "secret1",
            "role": "student",
        }))
        .unwrap();
        assert!(req.validate(&()).is_err());

        let req: UpdateUserPasswordRequest = serde_json::from_value(serde_json::json!({
            "currentPassword": "secret1",
            "newPassword": "12345",
        }))
        .unwrap();
        assert!(req.validate(&()).is_err());
    }

    #[test]
    fn user_directory_is_split_in_the_response() {
        let user = |pending_approval| User {
            user_id: UserId::new(),
            name: "A".into(),
            email: "a@example.com".into(),
            role: Role::Student,
            pending_approval,
        };
        let dir: UserDirectory = vec![user(true), user(false), user(false)]
            .into_iter()
            .collect();
        let res = UsersResponse::from(dir);
        assert_eq!(res.pending.len(), 1);
        assert_eq!(res.approved.len(), 2);

        let json = serde_json::to_value(&res.pending[0]).unwrap();
        assert_eq!(json["role"], "student");
        assert_eq!(json["pendingApproval"], true);
    }
}
