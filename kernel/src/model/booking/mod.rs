use crate::model::{
    id::{BookingId, LabId, UserId},
    role::Role,
};
use chrono::{DateTime, NaiveDate, Utc};
use strum::{AsRefStr, EnumString};

pub mod event;
pub mod slot;

use slot::TimeSlot;

pub const DEFAULT_PURPOSE: &str = "Project Work";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    /// Status a new booking starts in. Student bookings are confirmed
    /// immediately, staff bookings wait for an admin.
    pub fn initial_for(role: Role) -> Self {
        match role {
            Role::Student => BookingStatus::Approved,
            Role::Staff | Role::Admin => BookingStatus::Pending,
        }
    }

    /// Active bookings hold one seat of the lab's capacity.
    pub fn is_active(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Approved)
    }

    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Approved) | (Pending, Rejected) | (Pending, Cancelled) | (Approved, Cancelled)
        )
    }
}

#[derive(Debug, Clone)]
pub struct Booking {
    pub booking_id: BookingId,
    pub user_id: UserId,
    pub lab: BookingLab,
    pub booking_date: NaiveDate,
    pub slot: TimeSlot,
    pub purpose: String,
    pub status: BookingStatus,
    pub booked_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BookingLab {
    pub lab_id: LabId,
    pub name: String,
    pub location: String,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BookingListOptions {
    pub active_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAvailability {
    pub slot: TimeSlot,
    pub available: bool,
}

impl SlotAvailability {
    /// Slot schedule of `role` on `date`, each flagged with whether a new
    /// booking would be accepted.
    pub fn for_day(
        role: Role,
        date: NaiveDate,
        today: NaiveDate,
        lab_bookable: bool,
        holds_active_booking: bool,
    ) -> Vec<Self> {
        let available = lab_bookable && !holds_active_booking && date >= today;
        TimeSlot::schedule(role, date)
            .into_iter()
            .map(|slot| Self { slot, available })
            .collect()
    }
}
