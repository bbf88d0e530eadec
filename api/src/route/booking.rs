use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::booking::{
    book_lab, cancel_booking, review_booking, show_booking, show_booking_list, show_my_bookings,
};

pub fn build_booking_routers() -> Router<AppRegistry> {
    let bookings_routers = Router::new()
        .route("/", post(book_lab))
        .route("/", get(show_booking_list))
        .route("/me", get(show_my_bookings))
        .route("/:booking_id", get(show_booking))
        .route("/:booking_id/cancel", put(cancel_booking))
        .route("/:booking_id/status", put(review_booking));

    Router::new().nest("/bookings", bookings_routers)
}
