use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::handler::booking_handler::{
    create_booking_handler, list_garage_bookings_handler, slot_availability_handler,
    update_booking_status_handler,
};
use crate::middlewares::auth_middleware::{garage_auth, AuthState};
use crate::service::booking_service::BookingServiceImpl;

pub fn booking_router(service: Arc<BookingServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    // Public routes: customer checkout and the availability display
    let public = Router::new()
        .route("/bookings", post(create_booking_handler))
        .route("/bookings/slot-availability", get(slot_availability_handler));

    // Garage-protected routes
    let garage = Router::new()
        .route("/garage/bookings", get(list_garage_bookings_handler))
        .route("/garage/bookings/{id}/status", put(update_booking_status_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, garage_auth));

    public.merge(garage).with_state(service)
}
