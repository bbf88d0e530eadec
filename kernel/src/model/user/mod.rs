use crate::model::{id::UserId, role::Role};

pub mod event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub pending_approval: bool,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// All accounts split the way the admin's staff-management screen shows them.
#[derive(Debug, Default)]
pub struct UserDirectory {
    pub pending: Vec<User>,
    pub approved: Vec<User>,
}

impl FromIterator<User> for UserDirectory {
    fn from_iter<I: IntoIterator<Item = User>>(iter: I) -> Self {
        let (pending, approved) = iter.into_iter().partition(|u| u.pending_approval);
        Self { pending, approved }
    }
}
