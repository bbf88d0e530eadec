use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use kernel::model::{
    booking::{slot::TimeSlot, Booking, BookingLab, BookingStatus},
    id::{BookingId, LabId, UserId},
};
use shared::error::AppError;
use sqlx::FromRow;

// Booking joined with the lab it belongs to
#[derive(FromRow)]
pub struct BookingRow {
    pub booking_id: BookingId,
    pub user_id: UserId,
    pub lab_id: LabId,
    pub lab_name: String,
    pub lab_location: String,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub purpose: String,
    pub status: String,
    pub booked_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = AppError;

    fn try_from(value: BookingRow) -> Result<Self, Self::Error> {
        let BookingRow {
            booking_id,
            user_id,
            lab_id,
            lab_name,
            lab_location,
            booking_date,
            start_time,
            end_time,
            purpose,
            status,
            booked_at,
        } = value;
        let status = status.parse::<BookingStatus>().map_err(|e| {
            AppError::ConversionEntityError(format!("booking status {status}: {e}"))
        })?;
        // the table has CHECK (start_time < end_time), so this only fails on corrupted rows
        let slot = TimeSlot::new(start_time, end_time)
            .map_err(|e| AppError::ConversionEntityError(e.to_string()))?;
        Ok(Booking {
            booking_id,
            user_id,
            lab: BookingLab {
                lab_id,
                name: lab_name,
                location: lab_location,
            },
            booking_date,
            slot,
            purpose,
            status,
            booked_at,
        })
    }
}

// The columns needed to validate a status change
#[derive(FromRow)]
pub struct BookingStateRow {
    pub user_id: UserId,
    pub lab_id: LabId,
    pub status: String,
}

impl BookingStateRow {
    pub fn status(&self) -> Result<BookingStatus, AppError> {
        self.status.parse::<BookingStatus>().map_err(|e| {
            AppError::ConversionEntityError(format!("booking status {}: {e}", self.status))
        })
    }
}
