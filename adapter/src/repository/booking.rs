use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        booking::{
            event::{CreateBooking, UpdateBookingStatus},
            Booking, BookingListOptions,
        },
        id::{BookingId, LabId, UserId},
        lab::LabStatus,
    },
    repository::booking::BookingRepository,
};
use shared::error::{AppError, AppResult};

use crate::database::{
    model::{
        booking::{BookingRow, BookingStateRow},
        lab::LabStateRow,
    },
    violates, ConnectionPool,
};

const ONE_ACTIVE_BOOKING_INDEX: &str = "bookings_one_active_per_user_lab";
const ALREADY_BOOKED: &str = "You already have an active booking for this lab.";
const LAB_FULL: &str = "No available systems in this lab.";

const SELECT_BOOKINGS: &str = r#"
    SELECT
        b.booking_id,
        b.user_id,
        b.lab_id,
        l.name AS lab_name,
        l.location AS lab_location,
        b.booking_date,
        b.start_time,
        b.end_time,
        b.purpose,
        b.status,
        b.booked_at
    FROM bookings AS b
    INNER JOIN labs AS l ON b.lab_id = l.lab_id
"#;

#[derive(new)]
pub struct BookingRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl BookingRepository for BookingRepositoryImpl {
    async fn create(&self, event: CreateBooking) -> AppResult<BookingId> {
        event.check()?;

        let mut tx = self.db.begin().await?;

        // Locks are taken users -> labs, the same order user deletion uses,
        // and the lab row lock queues concurrent bookings of one lab.
        // Before inserting, check that
        // - the user still exists
        // - the lab exists and is open for bookings
        // - the user does not already hold an active booking on it
        // - a seat is left, taking it in the same statement
        {
            let user = sqlx::query_scalar::<_, UserId>(
                r#"
                    SELECT user_id FROM users WHERE user_id = $1 FOR KEY SHARE
                "#,
            )
            .bind(event.user_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            if user.is_none() {
                return Err(AppError::EntityNotFound(format!(
                    "user ({}) not found",
                    event.user_id
                )));
            }

            let lab = sqlx::query_as::<_, LabStateRow>(
                r#"
                    SELECT status, capacity FROM labs WHERE lab_id = $1 FOR UPDATE
                "#,
            )
            .bind(event.lab_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            let Some(lab) = lab else {
                return Err(AppError::EntityNotFound(format!(
                    "lab ({}) not found",
                    event.lab_id
                )));
            };

            if lab.status != LabStatus::Available.as_ref() {
                return Err(AppError::UnprocessableEntity(format!(
                    "lab ({}) is not available for booking ({})",
                    event.lab_id, lab.status
                )));
            }

            let already_booked: bool = sqlx::query_scalar(
                r#"
                    SELECT EXISTS (
                        SELECT 1 FROM bookings
                        WHERE user_id = $1 AND lab_id = $2
                          AND status IN ('pending', 'approved')
                    )
                "#,
            )
            .bind(event.user_id)
            .bind(event.lab_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            if already_booked {
                return Err(AppError::UnprocessableEntity(ALREADY_BOOKED.into()));
            }

            let res = sqlx::query(
                r#"
                    UPDATE labs SET capacity = capacity - 1
                    WHERE lab_id = $1 AND capacity > 0
                "#,
            )
            .bind(event.lab_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            if res.rows_affected() < 1 {
                tracing::debug!(lab_id = %event.lab_id, capacity = lab.capacity, "lab is full");
                return Err(AppError::UnprocessableEntity(LAB_FULL.into()));
            }
        }

        let booking_id = BookingId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO bookings
                (booking_id, user_id, lab_id, booking_date, start_time, end_time, purpose, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(booking_id)
        .bind(event.user_id)
        .bind(event.lab_id)
        .bind(event.booking_date)
        .bind(event.slot.start())
        .bind(event.slot.end())
        .bind(event.purpose())
        .bind(event.initial_status().as_ref())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if violates(&e, ONE_ACTIVE_BOOKING_INDEX) {
                AppError::UnprocessableEntity(ALREADY_BOOKED.into())
            } else {
                AppError::SpecificOperationError(e)
            }
        })?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No booking record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(booking_id)
    }

    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, BookingRow>(&format!("{SELECT_BOOKINGS} WHERE b.booking_id = $1"))
            .bind(booking_id)
            .fetch_optional(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?
            .map(Booking::try_from)
            .transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, BookingRow>(&format!("{SELECT_BOOKINGS} ORDER BY b.booked_at DESC"))
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?
            .into_iter()
            .map(Booking::try_from)
            .collect()
    }

    async fn find_by_user_id(
        &self,
        user_id: UserId,
        options: BookingListOptions,
    ) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, BookingRow>(&format!(
            "{SELECT_BOOKINGS}
            WHERE b.user_id = $1
              AND (NOT $2 OR b.status IN ('pending', 'approved'))
            ORDER BY b.booking_date DESC, b.start_time DESC"
        ))
        .bind(user_id)
        .bind(options.active_only)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Booking::try_from)
        .collect()
    }

    async fn find_by_lab_id(&self, lab_id: LabId) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, BookingRow>(&format!(
            "{SELECT_BOOKINGS}
            WHERE b.lab_id = $1
            ORDER BY b.booking_date ASC, b.start_time ASC"
        ))
        .bind(lab_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Booking::try_from)
        .collect()
    }

    async fn has_active_booking(&self, user_id: UserId, lab_id: LabId) -> AppResult<bool> {
        sqlx::query_scalar(
            r#"
                SELECT EXISTS (
                    SELECT 1 FROM bookings
                    WHERE user_id = $1 AND lab_id = $2
                      AND status IN ('pending', 'approved')
                )
            "#,
        )
        .bind(user_id)
        .bind(lab_id)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)
    }

    async fn update_status(&self, event: UpdateBookingStatus) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        // The row lock makes a concurrent cancel or user deletion wait, so a
        // seat is returned at most once.
        let state = sqlx::query_as::<_, BookingStateRow>(
            r#"
                SELECT user_id, lab_id, status FROM bookings
                WHERE booking_id = $1
                FOR UPDATE
            "#,
        )
        .bind(event.booking_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(state) = state else {
            return Err(AppError::EntityNotFound(format!(
                "booking ({}) not found",
                event.booking_id
            )));
        };

        event.authorize(state.user_id)?;

        let current = state.status()?;
        if !current.can_transition_to(event.status) {
            return Err(AppError::UnprocessableEntity(format!(
                "booking ({}) is {} and cannot become {}",
                event.booking_id,
                current.as_ref(),
                event.status.as_ref()
            )));
        }

        sqlx::query(
            r#"
                UPDATE bookings SET status = $2 WHERE booking_id = $1
            "#,
        )
        .bind(event.booking_id)
        .bind(event.status.as_ref())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        // the seat goes back to the lab once the booking stops being active
        if current.is_active() && !event.status.is_active() {
            let res = sqlx::query(
                r#"
                    UPDATE labs SET capacity = capacity + 1 WHERE lab_id = $1
                "#,
            )
            .bind(state.lab_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            if res.rows_affected() < 1 {
                return Err(AppError::NoRowsAffectedError(
                    "No lab capacity has been released".into(),
                ));
            }
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }
}
