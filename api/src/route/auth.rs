use axum::{routing::post, Router};
use registry::AppRegistry;

use crate::handler::auth::{login, login_as, logout, signup};

pub fn build_auth_routers() -> Router<AppRegistry> {
    let auth_routers = Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/login/:role", post(login_as))
        .route("/logout", post(logout));

    Router::new().nest("/auth", auth_routers)
}
