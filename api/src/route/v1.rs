use super::{
    auth::build_auth_routers, booking::build_booking_routers, lab::build_lab_routers,
    user::build_user_routers, utilization::build_utilization_routers,
};
use axum::Router;
use registry::AppRegistry;

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_auth_routers())
        .merge(build_user_routers())
        .merge(build_lab_routers())
        .merge(build_booking_routers())
        .merge(build_utilization_routers());
    Router::new().nest("/api/v1", router)
}
