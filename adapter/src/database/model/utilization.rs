use chrono::NaiveDate;
use kernel::model::{
    id::{LabId, UtilizationId},
    utilization::Utilization,
};
use sqlx::FromRow;

#[derive(FromRow)]
pub struct UtilizationRow {
    pub utilization_id: UtilizationId,
    pub lab_id: LabId,
    pub date: NaiveDate,
    pub hours_used: f64,
}

impl From<UtilizationRow> for Utilization {
    fn from(value: UtilizationRow) -> Self {
        let UtilizationRow {
            utilization_id,
            lab_id,
            date,
            hours_used,
        } = value;
        Utilization {
            utilization_id,
            lab_id,
            date,
            hours_used,
        }
    }
}

#[derive(FromRow)]
pub struct DailyHoursRow {
    pub date: NaiveDate,
    pub hours: f64,
}

#[derive(FromRow)]
pub struct DailyBookingsRow {
    pub date: NaiveDate,
    pub bookings: i64,
}
