use kernel::model::{
    id::LabId,
    lab::{Equipment, Lab, LabStatus},
};
use shared::error::AppError;
use sqlx::{types::Json, FromRow};

#[derive(FromRow)]
pub struct LabRow {
    pub lab_id: LabId,
    pub name: String,
    pub location: String,
    pub capacity: i32,
    pub equipment: Json<Vec<Equipment>>,
    pub description: Option<String>,
    pub status: String,
}

impl TryFrom<LabRow> for Lab {
    type Error = AppError;

    fn try_from(value: LabRow) -> Result<Self, Self::Error> {
        let LabRow {
            lab_id,
            name,
            location,
            capacity,
            equipment: Json(equipment),
            description,
            status,
        } = value;
        let status = status
            .parse::<LabStatus>()
            .map_err(|e| AppError::ConversionEntityError(format!("lab status {status}: {e}")))?;
        Ok(Lab {
            lab_id,
            name,
            location,
            capacity,
            equipment,
            description,
            status,
        })
    }
}

// Status and free seats of a lab, read inside the booking transaction
#[derive(FromRow)]
pub struct LabStateRow {
    pub status: String,
    pub capacity: i32,
}
