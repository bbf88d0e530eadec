use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        id::UtilizationId,
        utilization::{
            event::CreateUtilization, Utilization, UtilizationQuery, UtilizationSummary,
        },
    },
    repository::utilization::UtilizationRepository,
};
use shared::error::{AppError, AppResult};

use crate::database::{
    model::utilization::{DailyBookingsRow, DailyHoursRow, UtilizationRow},
    ConnectionPool,
};

#[derive(new)]
pub struct UtilizationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UtilizationRepository for UtilizationRepositoryImpl {
    async fn create(&self, event: CreateUtilization) -> AppResult<UtilizationId> {
        event.check()?;

        let utilization_id = UtilizationId::new();
        sqlx::query(
            r#"
                INSERT INTO lab_utilization (utilization_id, lab_id, date, hours_used)
                VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(utilization_id)
        .bind(event.lab_id)
        .bind(event.date)
        .bind(event.hours_used)
        .execute(self.db.inner_ref())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                AppError::EntityNotFound(format!("lab ({}) not found", event.lab_id))
            }
            e => AppError::SpecificOperationError(e),
        })?;

        Ok(utilization_id)
    }

    async fn find_all(&self, query: UtilizationQuery) -> AppResult<Vec<Utilization>> {
        let rows = sqlx::query_as::<_, UtilizationRow>(
            r#"
                SELECT utilization_id, lab_id, date, hours_used
                FROM lab_utilization
                WHERE ($1::UUID IS NULL OR lab_id = $1)
                  AND ($2::DATE IS NULL OR date >= $2)
                  AND ($3::DATE IS NULL OR date <= $3)
                ORDER BY date ASC
            "#,
        )
        .bind(query.lab_id)
        .bind(query.from)
        .bind(query.to)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Utilization::from).collect())
    }

    async fn summary(&self, query: UtilizationQuery) -> AppResult<UtilizationSummary> {
        let hours = sqlx::query_as::<_, DailyHoursRow>(
            r#"
                SELECT date, SUM(hours_used) AS hours
                FROM lab_utilization
                WHERE ($1::UUID IS NULL OR lab_id = $1)
                  AND ($2::DATE IS NULL OR date >= $2)
                  AND ($3::DATE IS NULL OR date <= $3)
                GROUP BY date
            "#,
        )
        .bind(query.lab_id)
        .bind(query.from)
        .bind(query.to)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        // every booking counts towards demand, whatever its final status
        let bookings = sqlx::query_as::<_, DailyBookingsRow>(
            r#"
                SELECT booking_date AS date, COUNT(*) AS bookings
                FROM bookings
                WHERE ($1::UUID IS NULL OR lab_id = $1)
                  AND ($2::DATE IS NULL OR booking_date >= $2)
                  AND ($3::DATE IS NULL OR booking_date <= $3)
                GROUP BY booking_date
            "#,
        )
        .bind(query.lab_id)
        .bind(query.from)
        .bind(query.to)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(UtilizationSummary::new(
            hours.into_iter().map(|r| (r.date, r.hours)),
            bookings.into_iter().map(|r| (r.date, r.bookings)),
        ))
    }
}
