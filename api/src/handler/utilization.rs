use crate::{
    extractor::AuthorizedUser,
    model::utilization::{
        CreateUtilizationRequest, UtilizationQueryParams, UtilizationSummaryResponse,
        UtilizationsResponse,
    },
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use garde::Validate;
use kernel::model::role::Role;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn record_utilization(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateUtilizationRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    if user.role() == Role::Student {
        return Err(AppError::ForbiddenOperation(
            "only staff and admins record lab usage".into(),
        ));
    }
    req.validate(&())?;

    let utilization_id = registry.utilization_repository().create(req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "utilizationId": utilization_id })),
    ))
}

pub async fn show_utilization(
    user: AuthorizedUser,
    WithRejection(Query(query), _): WithRejection<Query<UtilizationQueryParams>, AppError>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UtilizationsResponse>> {
    user.require_admin()?;

    registry
        .utilization_repository()
        .find_all(query.into())
        .await
        .map(UtilizationsResponse::from)
        .map(Json)
}

pub async fn show_utilization_summary(
    user: AuthorizedUser,
    WithRejection(Query(query), _): WithRejection<Query<UtilizationQueryParams>, AppError>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UtilizationSummaryResponse>> {
    user.require_admin()?;

    registry
        .utilization_repository()
        .summary(query.into())
        .await
        .map(UtilizationSummaryResponse::from)
        .map(Json)
}
