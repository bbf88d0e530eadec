use crate::{
    extractor::AuthorizedUser,
    model::{
        auth::{AccessTokenResponse, LoginRequest, SignupRequest},
        user::{RoleName, UserResponse},
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use garde::Validate;
use kernel::model::{auth::event::CreateToken, role::Role, user::event::CreateUser};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn signup(
    State(registry): State<AppRegistry>,
    Json(req): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    req.validate(&())?;

    let event = CreateUser::try_from(req)?;
    let user = registry.user_repository().create(event).await?;
    tracing::info!(user_id = %user.user_id, role = user.role.as_ref(), "signup awaiting approval");
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn login(
    State(registry): State<AppRegistry>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AccessTokenResponse>> {
    issue_token(&registry, req, None).await
}

/// Sign-in through a role specific entrance; accounts of any other role are turned away.
pub async fn login_as(
    WithRejection(Path(role), _): WithRejection<Path<RoleName>, AppError>,
    State(registry): State<AppRegistry>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AccessTokenResponse>> {
    issue_token(&registry, req, Some(role.into())).await
}

pub async fn logout(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .auth_repository()
        .delete_token(user.access_token)
        .await
        .map(|_| StatusCode::NO_CONTENT)
}

async fn issue_token(
    registry: &AppRegistry,
    req: LoginRequest,
    expected_role: Option<Role>,
) -> AppResult<Json<AccessTokenResponse>> {
    req.validate(&())?;

    let email = req.email.trim().to_lowercase();
    let user_id = registry
        .auth_repository()
        .verify_user(&email, &req.password)
        .await?;
    let user = registry
        .user_repository()
        .find_current_user(user_id)
        .await?
        .ok_or(AppError::UnauthenticatedError)?;

    if user.pending_approval {
        return Err(AppError::ForbiddenOperation(
            "account is waiting for admin approval".into(),
        ));
    }
    if let Some(role) = expected_role {
        if user.role != role {
            return Err(AppError::ForbiddenOperation(format!(
                "only {} accounts can sign in here",
                role.as_ref()
            )));
        }
    }

    let access_token = registry
        .auth_repository()
        .create_token(CreateToken::new(user_id))
        .await?;

    Ok(Json(AccessTokenResponse {
        user_id,
        access_token: access_token.0,
        role: user.role.into(),
    }))
}
