use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::handler::garage_handler::{
    garage_profile_handler, list_garages_handler, register_garage_handler,
    update_garage_linkage_handler, update_garage_status_handler,
};
use crate::middlewares::auth_middleware::{admin_auth, garage_auth, AuthState};
use crate::service::garage_service::GarageServiceImpl;

pub fn garage_router(service: Arc<GarageServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    // Garage-protected routes: onboarding and own profile
    let garage = Router::new()
        .route("/garage/register", post(register_garage_handler))
        .route("/garage/profile", get(garage_profile_handler))
        .route_layer(middleware::from_fn_with_state(auth_state.clone(), garage_auth));

    // Admin-protected routes: approval and linkage management
    let admin = Router::new()
        .route("/admin/garages", get(list_garages_handler))
        .route("/admin/garages/{id}/status", put(update_garage_status_handler))
        .route("/admin/garages/{id}/linkage", put(update_garage_linkage_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, admin_auth));

    garage.merge(admin).with_state(service)
}
