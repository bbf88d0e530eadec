use std::collections::HashMap;

use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        id::{LabId, UserId},
        user::{
            event::{ApproveUser, CreateUser, DeleteUser, UpdateUserPassword, UpdateUserRole},
            User, UserDirectory,
        },
    },
    repository::user::UserRepository,
};
use shared::error::{AppError, AppResult};

use crate::database::{
    model::user::{UserCredentialRow, UserRow},
    ConnectionPool,
};

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_current_user(&self, current_user_id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(
            r#"
                SELECT user_id, name, email, role, pending_approval
                FROM users
                WHERE user_id = $1
            "#,
        )
        .bind(current_user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(User::try_from)
        .transpose()
    }

    async fn find_all(&self) -> AppResult<UserDirectory> {
        sqlx::query_as::<_, UserRow>(
            r#"
                SELECT user_id, name, email, role, pending_approval
                FROM users
                ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(User::try_from)
        .collect()
    }

    async fn create(&self, event: CreateUser) -> AppResult<User> {
        let user_id = UserId::new();
        let hashed_password = hash_password(&event.password)?;
        sqlx::query(
            r#"
                INSERT INTO users (user_id, name, email, password_hash, role, pending_approval)
                VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user_id)
        .bind(&event.name)
        .bind(&event.email)
        .bind(hashed_password)
        .bind(event.role.as_ref())
        .bind(event.pending_approval)
        .execute(self.db.inner_ref())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("{} is already registered", event.email))
            }
            e => AppError::SpecificOperationError(e),
        })?;

        Ok(User {
            user_id,
            name: event.name,
            email: event.email,
            role: event.role,
            pending_approval: event.pending_approval,
        })
    }

    async fn create_if_absent(&self, event: CreateUser) -> AppResult<bool> {
        let hashed_password = hash_password(&event.password)?;
        let res = sqlx::query(
            r#"
                INSERT INTO users (user_id, name, email, password_hash, role, pending_approval)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(UserId::new())
        .bind(&event.name)
        .bind(&event.email)
        .bind(hashed_password)
        .bind(event.role.as_ref())
        .bind(event.pending_approval)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(res.rows_affected() == 1)
    }

    async fn update_password(&self, event: UpdateUserPassword) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let stored = sqlx::query_as::<_, UserCredentialRow>(
            r#"
                SELECT user_id, password_hash FROM users WHERE user_id = $1;
            "#,
        )
        .bind(event.user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| AppError::EntityNotFound("specified user not found".into()))?;

        if !bcrypt::verify(&event.current_password, &stored.password_hash)? {
            return Err(AppError::UnauthenticatedError);
        }

        let new_password_hash = hash_password(&event.new_password)?;
        sqlx::query(
            r#"
                UPDATE users SET password_hash = $2 WHERE user_id = $1;
            "#,
        )
        .bind(event.user_id)
        .bind(new_password_hash)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn update_role(&self, event: UpdateUserRole) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                UPDATE users SET role = $2 WHERE user_id = $1
            "#,
        )
        .bind(event.user_id)
        .bind(event.role.as_ref())
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("specified user not found".into()));
        }

        Ok(())
    }

    async fn approve(&self, event: ApproveUser) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                UPDATE users SET pending_approval = FALSE
                WHERE user_id = $1 AND pending_approval
            "#,
        )
        .bind(event.user_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(
                "no pending user with this id".into(),
            ));
        }

        Ok(())
    }

    async fn reject(&self, event: DeleteUser) -> AppResult<()> {
        self.delete_where(event.user_id, true).await
    }

    async fn delete(&self, event: DeleteUser) -> AppResult<()> {
        self.delete_where(event.user_id, false).await
    }
}

impl UserRepositoryImpl {
    // Deletes the user and gives the seats of their active bookings back to the labs.
    // With pending_only, approved accounts are left alone.
    async fn delete_where(&self, user_id: UserId, pending_only: bool) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        // Lock order is users -> bookings -> labs. Holding the user row keeps
        // new bookings out; holding the bookings makes a concurrent status
        // change finish first, or find the booking gone.
        let pending = sqlx::query_scalar::<_, bool>(
            r#"
                SELECT pending_approval FROM users WHERE user_id = $1 FOR UPDATE
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        match pending {
            Some(pending) if pending || !pending_only => {}
            _ => {
                let what = if pending_only { "pending user" } else { "user" };
                return Err(AppError::EntityNotFound(format!("no {what} with this id")));
            }
        }

        let held = sqlx::query_scalar::<_, LabId>(
            r#"
                SELECT lab_id FROM bookings
                WHERE user_id = $1 AND status IN ('pending', 'approved')
                FOR UPDATE
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let mut seats: HashMap<LabId, i32> = HashMap::new();
        for lab_id in held {
            *seats.entry(lab_id).or_default() += 1;
        }
        for (lab_id, count) in seats {
            sqlx::query(
                r#"
                    UPDATE labs SET capacity = capacity + $2 WHERE lab_id = $1
                "#,
            )
            .bind(lab_id)
            .bind(count)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        }

        let res = sqlx::query(
            r#"
                DELETE FROM users WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No user record has been deleted".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }
}

fn hash_password(password: &str) -> AppResult<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::role::Role;

    fn student(email: &str) -> CreateUser {
        CreateUser::new(
            "Test Student".into(),
            email.into(),
            "secret1".into(),
            Role::Student,
            true,
        )
    }

    #[ignore = "needs a PostgreSQL instance in DATABASE_URL"]
    #[sqlx::test]
    async fn test_signup_and_approval(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = UserRepositoryImpl::new(ConnectionPool::new(pool));

        let user = repo.create(student("student@example.com")).await?;
        assert!(user.pending_approval);

        let dir = repo.find_all().await?;
        assert_eq!(dir.pending.len(), 1);
        assert!(dir.approved.is_empty());

        repo.approve(ApproveUser::new(user.user_id)).await?;
        let found = repo.find_current_user(user.user_id).await?.unwrap();
        assert!(!found.pending_approval);

        // approving twice finds no pending user
        assert!(repo.approve(ApproveUser::new(user.user_id)).await.is_err());
        // an approved user cannot be rejected, only deleted
        assert!(repo.reject(DeleteUser::new(user.user_id)).await.is_err());
        repo.delete(DeleteUser::new(user.user_id)).await?;
        assert!(repo.find_current_user(user.user_id).await?.is_none());
        Ok(())
    }

    #[ignore = "needs a PostgreSQL instance in DATABASE_URL"]
    #[sqlx::test]
    async fn test_duplicate_email(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = UserRepositoryImpl::new(ConnectionPool::new(pool));

        repo.create(student("dup@example.com")).await?;
        let res = repo.create(student("dup@example.com")).await;
        assert!(matches!(res, Err(AppError::Conflict(_))));

        assert!(!repo.create_if_absent(student("dup@example.com")).await?);
        assert!(repo.create_if_absent(student("new@example.com")).await?);
        Ok(())
    }

    #[ignore = "needs a PostgreSQL instance in DATABASE_URL"]
    #[sqlx::test]
    async fn test_password_change_of_unknown_user(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = UserRepositoryImpl::new(ConnectionPool::new(pool));

        let res = repo
            .update_password(UpdateUserPassword::new(
                UserId::new(),
                "secret1".into(),
                "secret2".into(),
            ))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
        Ok(())
    }

    #[ignore = "needs a PostgreSQL instance in DATABASE_URL"]
    #[sqlx::test]
    async fn test_delete_racing_a_cancel_returns_the_seat_once(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        use crate::repository::{booking::BookingRepositoryImpl, lab::LabRepositoryImpl};
        use chrono::Local;
        use kernel::{
            model::{
                booking::{
                    event::{CreateBooking, UpdateBookingStatus},
                    slot::TimeSlot,
                    BookingStatus,
                },
                lab::{event::CreateLab, LabStatus},
            },
            repository::{booking::BookingRepository, lab::LabRepository},
        };

        let db = ConnectionPool::new(pool);
        let users = UserRepositoryImpl::new(db.clone());
        let labs = LabRepositoryImpl::new(db.clone());
        let bookings = BookingRepositoryImpl::new(db);
        let today = Local::now().date_naive();

        for run in 0..10 {
            let user = users
                .create(CreateUser::new(
                    "Staff Member".into(),
                    format!("staff{run}@example.com"),
                    "secret1".into(),
                    Role::Staff,
                    false,
                ))
                .await?;
            let lab_id = labs
                .create(CreateLab {
                    name: format!("Lab {run}"),
                    location: "Block A".into(),
                    capacity: 3,
                    equipment: vec![],
                    description: None,
                    status: LabStatus::Available,
                })
                .await?;
            let booking_id = bookings
                .create(CreateBooking::new(
                    user.user_id,
                    Role::Staff,
                    lab_id,
                    today,
                    "10:45-13:15".parse::<TimeSlot>()?,
                    None,
                    today,
                ))
                .await?;

            let (cancelled, deleted) = tokio::join!(
                bookings.update_status(UpdateBookingStatus::new(
                    booking_id,
                    BookingStatus::Cancelled,
                    user.user_id,
                    Role::Staff,
                )),
                users.delete(DeleteUser::new(user.user_id)),
            );
            deleted?;
            // the cancel either wins or finds the booking already gone
            assert!(matches!(cancelled, Ok(()) | Err(AppError::EntityNotFound(_))));
            assert_eq!(labs.find_by_id(lab_id).await?.unwrap().capacity, 3);
        }
        Ok(())
    }
}
