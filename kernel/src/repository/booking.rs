use crate::model::{
    booking::{
        event::{CreateBooking, UpdateBookingStatus},
        Booking, BookingListOptions,
    },
    id::{BookingId, LabId, UserId},
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    // Books a slot and takes one seat from the lab
    async fn create(&self, event: CreateBooking) -> AppResult<BookingId>;
    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>>;
    // Every booking, newest first
    async fn find_all(&self) -> AppResult<Vec<Booking>>;
    async fn find_by_user_id(
        &self,
        user_id: UserId,
        options: BookingListOptions,
    ) -> AppResult<Vec<Booking>>;
    // Bookings of one lab ordered by date
    async fn find_by_lab_id(&self, lab_id: LabId) -> AppResult<Vec<Booking>>;
    async fn has_active_booking(&self, user_id: UserId, lab_id: LabId) -> AppResult<bool>;
    // Moves a booking to a new status, giving the seat back when it stops being active
    async fn update_status(&self, event: UpdateBookingStatus) -> AppResult<()>;
}
