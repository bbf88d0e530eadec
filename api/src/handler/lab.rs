use crate::{
    extractor::AuthorizedUser,
    model::{
        booking::BookingsResponse,
        lab::{
            CreateLabRequest, LabListQuery, LabResponse, LabsResponse, SlotQuery, SlotResponse,
            SlotsResponse, UpdateLabRequest, UpdateLabRequestWithId,
        },
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
use kernel::model::{booking::SlotAvailability, id::LabId, lab::event::DeleteLab};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_lab(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateLabRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    user.require_admin()?;
    req.validate(&())?;

    let lab_id = registry.lab_repository().create(req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "labId": lab_id })),
    ))
}

pub async fn show_lab_list(
    _user: AuthorizedUser,
    WithRejection(Query(query), _): WithRejection<Query<LabListQuery>, AppError>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<LabsResponse>> {
    registry
        .lab_repository()
        .find_all(query.into())
        .await
        .map(LabsResponse::from)
        .map(Json)
}

pub async fn show_lab(
    _user: AuthorizedUser,
    WithRejection(Path(lab_id), _): WithRejection<Path<LabId>, AppError>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<LabResponse>> {
    registry
        .lab_repository()
        .find_by_id(lab_id)
        .await
        .and_then(|lab| match lab {
            Some(lab) => Ok(Json(lab.into())),
            None => Err(AppError::EntityNotFound("lab not found".into())),
        })
}

pub async fn update_lab(
    user: AuthorizedUser,
    WithRejection(Path(lab_id), _): WithRejection<Path<LabId>, AppError>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateLabRequest>,
) -> AppResult<StatusCode> {
    user.require_admin()?;
    req.validate(&())?;

    registry
        .lab_repository()
        .update(UpdateLabRequestWithId::new(lab_id, req).into())
        .await
        .map(|_| StatusCode::OK)
}

pub async fn delete_lab(
    user: AuthorizedUser,
    WithRejection(Path(lab_id), _): WithRejection<Path<LabId>, AppError>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    user.require_admin()?;

    registry
        .lab_repository()
        .delete(DeleteLab { lab_id })
        .await
        .map(|_| StatusCode::OK)
}

/// Slots the caller could pick on `date`, with availability already resolved.
pub async fn show_lab_slots(
    user: AuthorizedUser,
    WithRejection(Path(lab_id), _): WithRejection<Path<LabId>, AppError>,
    WithRejection(Query(SlotQuery { date }), _): WithRejection<Query<SlotQuery>, AppError>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<SlotsResponse>> {
    if !user.role().can_book() {
        return Err(AppError::ForbiddenOperation(
            "admins do not book labs".into(),
        ));
    }

    let lab = registry
        .lab_repository()
        .find_by_id(lab_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound("lab not found".into()))?;
    let holds_active_booking = registry
        .booking_repository()
        .has_active_booking(user.id(), lab_id)
        .await?;

    let today = Local::now().date_naive();
    let items = SlotAvailability::for_day(
        user.role(),
        date,
        today,
        lab.is_bookable(),
        holds_active_booking,
    )
    .into_iter()
    .map(SlotResponse::from)
    .collect();

    Ok(Json(SlotsResponse {
        lab_id,
        date,
        items,
    }))
}

pub async fn show_lab_bookings(
    user: AuthorizedUser,
    WithRejection(Path(lab_id), _): WithRejection<Path<LabId>, AppError>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    user.require_admin()?;

    registry
        .booking_repository()
        .find_by_lab_id(lab_id)
        .await
        .map(BookingsResponse::from)
        .map(Json)
}
