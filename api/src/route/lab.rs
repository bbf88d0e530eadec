use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::lab::{
    delete_lab, register_lab, show_lab, show_lab_bookings, show_lab_list, show_lab_slots,
    update_lab,
};

pub fn build_lab_routers() -> Router<AppRegistry> {
    let labs_routers = Router::new()
        .route("/", post(register_lab))
        .route("/", get(show_lab_list))
        .route("/:lab_id", get(show_lab))
        .route("/:lab_id", put(update_lab))
        .route("/:lab_id", delete(delete_lab))
        .route("/:lab_id/slots", get(show_lab_slots))
        .route("/:lab_id/bookings", get(show_lab_bookings));

    Router::new().nest("/labs", labs_routers)
}
