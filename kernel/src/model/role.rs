use strum::{AsRefStr, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    Student,
}

impl Role {
    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }

    /// Roles that reserve lab time for themselves.
    pub fn can_book(self) -> bool {
        matches!(self, Role::Staff | Role::Student)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn role_text_round_trip() {
        for role in Role::iter() {
            assert_eq!(role.as_ref().parse::<Role>().unwrap(), role);
        }
        assert_eq!("staff".parse::<Role>().unwrap(), Role::Staff);
        assert!("faculty".parse::<Role>().is_err());
    }

    #[test]
    fn only_staff_and_students_book() {
        assert!(!Role::Admin.can_book());
        assert!(Role::Staff.can_book());
        assert!(Role::Student.can_book());
    }
}
