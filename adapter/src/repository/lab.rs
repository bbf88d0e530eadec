use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        id::LabId,
        lab::{
            event::{CreateLab, DeleteLab, UpdateLab},
            Lab, LabListOptions,
        },
    },
    repository::lab::LabRepository,
};
use shared::error::{AppError, AppResult};
use sqlx::types::Json;

use crate::database::{model::lab::LabRow, ConnectionPool};

#[derive(new)]
pub struct LabRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl LabRepository for LabRepositoryImpl {
    async fn create(&self, event: CreateLab) -> AppResult<LabId> {
        let lab_id = LabId::new();
        sqlx::query(
            r#"
                INSERT INTO labs (lab_id, name, location, capacity, equipment, description, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(lab_id)
        .bind(event.name)
        .bind(event.location)
        .bind(event.capacity)
        .bind(Json(event.equipment))
        .bind(event.description)
        .bind(event.status.as_ref())
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(lab_id)
    }

    async fn find_all(&self, options: LabListOptions) -> AppResult<Vec<Lab>> {
        sqlx::query_as::<_, LabRow>(
            r#"
                SELECT lab_id, name, location, capacity, equipment, description, status
                FROM labs
                WHERE name ILIKE $1
                ORDER BY name ASC
            "#,
        )
        .bind(options.name_pattern())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Lab::try_from)
        .collect()
    }

    async fn find_by_id(&self, lab_id: LabId) -> AppResult<Option<Lab>> {
        sqlx::query_as::<_, LabRow>(
            r#"
                SELECT lab_id, name, location, capacity, equipment, description, status
                FROM labs
                WHERE lab_id = $1
            "#,
        )
        .bind(lab_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(Lab::try_from)
        .transpose()
    }

    async fn update(&self, event: UpdateLab) -> AppResult<()> {
        // fields left as None keep their stored value
        let res = sqlx::query(
            r#"
                UPDATE labs
                SET
                    name = COALESCE($2, name),
                    location = COALESCE($3, location),
                    capacity = COALESCE($4, capacity),
                    equipment = COALESCE($5, equipment),
                    description = COALESCE($6, description),
                    status = COALESCE($7, status)
                WHERE lab_id = $1
            "#,
        )
        .bind(event.lab_id)
        .bind(event.name)
        .bind(event.location)
        .bind(event.capacity)
        .bind(event.equipment.map(Json))
        .bind(event.description)
        .bind(event.status.map(|s| s.as_ref().to_owned()))
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("specified lab not found".into()));
        }

        Ok(())
    }

    async fn delete(&self, event: DeleteLab) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        // holding the lab row makes in-flight bookings commit before the count
        let lab = sqlx::query_scalar::<_, LabId>(
            r#"
                SELECT lab_id FROM labs WHERE lab_id = $1 FOR UPDATE
            "#,
        )
        .bind(event.lab_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if lab.is_none() {
            return Err(AppError::EntityNotFound("specified lab not found".into()));
        }

        // a lab with people still booked on it cannot disappear under them
        let active: i64 = sqlx::query_scalar(
            r#"
                SELECT COUNT(*) FROM bookings
                WHERE lab_id = $1 AND status IN ('pending', 'approved')
            "#,
        )
        .bind(event.lab_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if active > 0 {
            return Err(AppError::UnprocessableEntity(format!(
                "lab {} still has {active} active booking(s)",
                event.lab_id
            )));
        }

        let res = sqlx::query(
            r#"
                DELETE FROM labs WHERE lab_id = $1
            "#,
        )
        .bind(event.lab_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("specified lab not found".into()));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }
}
