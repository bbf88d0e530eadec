use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use garde::Validate;
use kernel::model::{
    booking::{Booking, BookingLab, BookingListOptions, BookingStatus},
    id::{BookingId, LabId, UserId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatusName {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl From<BookingStatus> for BookingStatusName {
    fn from(value: BookingStatus) -> Self {
        match value {
            BookingStatus::Pending => Self::Pending,
            BookingStatus::Approved => Self::Approved,
            BookingStatus::Rejected => Self::Rejected,
            BookingStatus::Cancelled => Self::Cancelled,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[garde(skip)]
    pub lab_id: LabId,
    #[garde(skip)]
    pub booking_date: NaiveDate,
    /// "HH:MM-HH:MM", one of the slots offered to the caller's role.
    #[garde(length(min = 1))]
    pub slot: String,
    #[garde(length(max = 200))]
    pub purpose: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreatedResponse {
    pub booking_id: BookingId,
    pub status: BookingStatusName,
}

/// Outcome an admin can give to a pending booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl From<ReviewDecision> for BookingStatus {
    fn from(value: ReviewDecision) -> Self {
        match value {
            ReviewDecision::Approved => Self::Approved,
            ReviewDecision::Rejected => Self::Rejected,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewBookingRequest {
    pub status: ReviewDecision,
}

#[derive(Debug, Default, Deserialize)]
pub struct MyBookingsQuery {
    #[serde(default)]
    pub active: bool,
}

impl From<MyBookingsQuery> for BookingListOptions {
    fn from(value: MyBookingsQuery) -> Self {
        Self {
            active_only: value.active,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsResponse {
    pub items: Vec<BookingResponse>,
}

impl From<Vec<Booking>> for BookingsResponse {
    fn from(value: Vec<Booking>) -> Self {
        Self {
            items: value.into_iter().map(BookingResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub booking_id: BookingId,
    pub user_id: UserId,
    pub lab: BookingLabResponse,
    pub booking_date: NaiveDate,
    pub slot: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub purpose: String,
    pub status: BookingStatusName,
    pub booked_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(value: Booking) -> Self {
        let Booking {
            booking_id,
            user_id,
            lab,
            booking_date,
            slot,
            purpose,
            status,
            booked_at,
        } = value;
        Self {
            booking_id,
            user_id,
            lab: lab.into(),
            booking_date,
            slot: slot.to_string(),
            start_time: slot.start(),
            end_time: slot.end(),
            purpose,
            status: status.into(),
            booked_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingLabResponse {
    pub lab_id: LabId,
    pub name: String,
    pub location: String,
}

impl From<BookingLab> for BookingLabResponse {
    fn from(value: BookingLab) -> Self {
        let BookingLab {
            lab_id,
            name,
            location,
        } = value;
        Self {
            lab_id,
            name,
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::booking::slot::TimeSlot;

    #[test]
    fn booking_response_carries_the_slot_label() {
        let booking = Booking {
            booking_id: BookingId::new(),
            user_id: UserId::new(),
            lab: BookingLab {
                lab_id: LabId::new(),
                name: "Networks Lab".into(),
                location: "Block B".into(),
            },
            booking_date: NaiveDate::from_ymd_opt(2025, 3, 8).unwrap(),
            slot: "08:00-09:00".parse::<TimeSlot>().unwrap(),
            purpose: "Project Work".into(),
            status: BookingStatus::Approved,
            booked_at: Utc::now(),
        };
        let json = serde_json::to_value(BookingResponse::from(booking)).unwrap();
        assert_eq!(json["slot"], "08:00-09:00");
        assert_eq!(json["startTime"], "08:00:00");
        assert_eq!(json["bookingDate"], "2025-03-08");
        assert_eq!(json["status"], "approved");
        assert_eq!(json["lab"]["name"], "Networks Lab");
    }

    #[test]
    fn review_accepts_only_final_decisions() {
        let req: ReviewBookingRequest =
            serde_json::from_str(r#"{"status":"rejected"}"#).unwrap();
        assert_eq!(BookingStatus::from(req.status), BookingStatus::Rejected);
        assert!(serde_json::from_str::<ReviewBookingRequest>(r#"{"status":"cancelled"}"#).is_err());
    }

    #[test]
    fn overlong_purpose_is_rejected() {
        let req: CreateBookingRequest = serde_json::from_value(serde_json::json!({
            "labId": LabId::new(),
            "bookingDate": "2025-03-08",
            "slot": "08:00-09:00",
            "purpose": "x".repeat(201),
        }))
        .unwrap();
        assert!(req.validate(&()).is_err());
    }
}
