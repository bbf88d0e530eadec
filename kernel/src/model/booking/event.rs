use super::{slot::TimeSlot, BookingStatus, DEFAULT_PURPOSE};
use crate::model::{
    id::{BookingId, LabId, UserId},
    role::Role,
};
use chrono::NaiveDate;
use derive_new::new;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct CreateBooking {
    pub user_id: UserId,
    pub role: Role,
    pub lab_id: LabId,
    pub booking_date: NaiveDate,
    pub slot: TimeSlot,
    pub purpose: Option<String>,
    pub today: NaiveDate,
}

impl CreateBooking {
    /// Checks that need no stored state: who may book, when, and which slot.
    pub fn check(&self) -> AppResult<()> {
        if !self.role.can_book() {
            return Err(AppError::ForbiddenOperation(
                "only staff and students can book labs".into(),
            ));
        }
        if self.booking_date < self.today {
            return Err(AppError::UnprocessableEntity(format!(
                "cannot book a lab for a past date ({})",
                self.booking_date
            )));
        }
        if !self.slot.is_offered(self.role, self.booking_date) {
            return Err(AppError::UnprocessableEntity(format!(
                "{} is not a bookable slot on {}",
                self.slot, self.booking_date
            )));
        }
        Ok(())
    }

    pub fn initial_status(&self) -> BookingStatus {
        BookingStatus::initial_for(self.role)
    }

    pub fn purpose(&self) -> &str {
        match self.purpose.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => p,
            _ => DEFAULT_PURPOSE,
        }
    }
}

#[derive(new)]
pub struct UpdateBookingStatus {
    pub booking_id: BookingId,
    pub status: BookingStatus,
    pub requested_by: UserId,
    pub requested_role: Role,
}

impl UpdateBookingStatus {
    /// Owners may cancel their own bookings; every other change is an admin's.
    pub fn authorize(&self, owner: UserId) -> AppResult<()> {
        let allowed = match self.status {
            BookingStatus::Cancelled => {
                self.requested_role.is_admin() || self.requested_by == owner
            }
            _ => self.requested_role.is_admin(),
        };
        if allowed {
            Ok(())
        } else {
            Err(AppError::ForbiddenOperation(format!(
                "not allowed to mark booking {} as {}",
                self.booking_id,
                self.status.as_ref()
            )))
        }
    }
}
