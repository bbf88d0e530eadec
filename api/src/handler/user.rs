use crate::{
    extractor::AuthorizedUser,
    model::user::{
        CreateUserRequest, UpdateUserPasswordRequest, UpdateUserPasswordRequestWithUserId,
        UpdateUserRoleRequest, UpdateUserRoleRequestWithUserId, UserResponse, UsersResponse,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use garde::Validate;
use kernel::model::{
    id::UserId,
    user::event::{ApproveUser, DeleteUser},
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn get_current_user(user: AuthorizedUser) -> Json<UserResponse> {
    Json(UserResponse::from(user.user))
}

pub async fn change_password(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateUserPasswordRequest>,
) -> AppResult<StatusCode> {
    req.validate(&())?;

    registry
        .user_repository()
        .update_password(UpdateUserPasswordRequestWithUserId::new(user.id(), req).into())
        .await
        .map(|_| StatusCode::OK)
}

pub async fn list_users(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UsersResponse>> {
    user.require_admin()?;

    registry
        .user_repository()
        .find_all()
        .await
        .map(UsersResponse::from)
        .map(Json)
}

pub async fn register_user(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    user.require_admin()?;
    req.validate(&())?;

    let created = registry.user_repository().create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn approve_user(
    user: AuthorizedUser,
    WithRejection(Path(user_id), _): WithRejection<Path<UserId>, AppError>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    user.require_admin()?;

    registry
        .user_repository()
        .approve(ApproveUser::new(user_id))
        .await
        .map(|_| StatusCode::OK)
}

pub async fn reject_user(
    user: AuthorizedUser,
    WithRejection(Path(user_id), _): WithRejection<Path<UserId>, AppError>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    user.require_admin()?;

    registry
        .user_repository()
        .reject(DeleteUser::new(user_id))
        .await
        .map(|_| StatusCode::OK)
}

pub async fn change_role(
    user: AuthorizedUser,
    WithRejection(Path(user_id), _): WithRejection<Path<UserId>, AppError>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateUserRoleRequest>,
) -> AppResult<StatusCode> {
    user.require_admin()?;
    if user_id == user.id() {
        return Err(AppError::ForbiddenOperation(
            "admins cannot change their own role".into(),
        ));
    }

    registry
        .user_repository()
        .update_role(UpdateUserRoleRequestWithUserId::new(user_id, req).into())
        .await
        .map(|_| StatusCode::OK)
}

pub async fn delete_user(
    user: AuthorizedUser,
    WithRejection(Path(user_id), _): WithRejection<Path<UserId>, AppError>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    user.require_admin()?;
    if user_id == user.id() {
        return Err(AppError::ForbiddenOperation(
            "admins cannot delete their own account".into(),
        ));
    }

    registry
        .user_repository()
        .delete(DeleteUser::new(user_id))
        .await
        .map(|_| StatusCode::OK)
}
