use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::utilization::{
    record_utilization, show_utilization, show_utilization_summary,
};

pub fn build_utilization_routers() -> Router<AppRegistry> {
    let utilization_routers = Router::new()
        .route("/", post(record_utilization))
        .route("/", get(show_utilization))
        .route("/summary", get(show_utilization_summary));

    Router::new().nest("/utilization", utilization_routers)
}
