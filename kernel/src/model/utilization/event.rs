use super::MAX_HOURS_PER_DAY;
use crate::model::id::LabId;
use chrono::NaiveDate;
use derive_new::new;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct CreateUtilization {
    pub lab_id: LabId,
    pub date: NaiveDate,
    pub hours_used: f64,
}

impl CreateUtilization {
    pub fn check(&self) -> AppResult<()> {
        if !(self.hours_used > 0.0 && self.hours_used <= MAX_HOURS_PER_DAY) {
            return Err(AppError::UnprocessableEntity(format!(
                "hours used must be within (0, {MAX_HOURS_PER_DAY}], got {}",
                self.hours_used
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_must_fit_in_a_day() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert!(CreateUtilization::new(LabId::new(), date, 6.0).check().is_ok());
        assert!(CreateUtilization::new(LabId::new(), date, 24.0).check().is_ok());
        assert!(CreateUtilization::new(LabId::new(), date, 0.0).check().is_err());
        assert!(CreateUtilization::new(LabId::new(), date, 24.5).check().is_err());
        assert!(CreateUtilization::new(LabId::new(), date, f64::NAN).check().is_err());
    }
}
