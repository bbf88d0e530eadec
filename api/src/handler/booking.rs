use crate::{
    extractor::AuthorizedUser,
    model::booking::{
        BookingCreatedResponse, BookingResponse, BookingsResponse, CreateBookingRequest,
        MyBookingsQuery, ReviewBookingRequest,
    },
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use chrono::Local;
use garde::Validate;
use kernel::model::{
    booking::{
        event::{CreateBooking, UpdateBookingStatus},
        slot::TimeSlot,
        BookingStatus,
    },
    id::BookingId,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn book_lab(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<BookingCreatedResponse>)> {
    req.validate(&())?;

    let slot: TimeSlot = req.slot.parse()?;
    let event = CreateBooking::new(
        user.id(),
        user.role(),
        req.lab_id,
        req.booking_date,
        slot,
        req.purpose,
        Local::now().date_naive(),
    );
    let status = event.initial_status();

    let booking_id = registry.booking_repository().create(event).await?;
    tracing::info!(%booking_id, lab_id = %req.lab_id, status = status.as_ref(), "lab booked");

    Ok((
        StatusCode::CREATED,
        Json(BookingCreatedResponse {
            booking_id,
            status: status.into(),
        }),
    ))
}

pub async fn show_booking_list(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    user.require_admin()?;

    registry
        .booking_repository()
        .find_all()
        .await
        .map(BookingsResponse::from)
        .map(Json)
}

pub async fn show_my_bookings(
    user: AuthorizedUser,
    WithRejection(Query(query), _): WithRejection<Query<MyBookingsQuery>, AppError>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    registry
        .booking_repository()
        .find_by_user_id(user.id(), query.into())
        .await
        .map(BookingsResponse::from)
        .map(Json)
}

pub async fn show_booking(
    user: AuthorizedUser,
    WithRejection(Path(booking_id), _): WithRejection<Path<BookingId>, AppError>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingResponse>> {
    let booking = registry
        .booking_repository()
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound("booking not found".into()))?;

    if booking.user_id != user.id() && !user.is_admin() {
        return Err(AppError::ForbiddenOperation(
            "this booking belongs to another user".into(),
        ));
    }

    Ok(Json(booking.into()))
}

pub async fn cancel_booking(
    user: AuthorizedUser,
    WithRejection(Path(booking_id), _): WithRejection<Path<BookingId>, AppError>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    let event = UpdateBookingStatus::new(
        booking_id,
        BookingStatus::Cancelled,
        user.id(),
        user.role(),
    );
    registry
        .booking_repository()
        .update_status(event)
        .await
        .map(|_| StatusCode::OK)
}

pub async fn review_booking(
    user: AuthorizedUser,
    WithRejection(Path(booking_id), _): WithRejection<Path<BookingId>, AppError>,
    State(registry): State<AppRegistry>,
    Json(req): Json<ReviewBookingRequest>,
) -> AppResult<StatusCode> {
    user.require_admin()?;

    let event = UpdateBookingStatus::new(booking_id, req.status.into(), user.id(), user.role());
    registry
        .booking_repository()
        .update_status(event)
        .await
        .map(|_| StatusCode::OK)
}
