use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handler::quote_handler::{
    create_quote_request_handler, list_quote_requests_handler, submit_quote_handler,
};
use crate::middlewares::auth_middleware::{garage_auth, AuthState};
use crate::service::quote_service::QuoteServiceImpl;

pub fn quote_router(service: Arc<QuoteServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    // Public route: customers open quote requests without an account
    let public = Router::new().route("/quote-requests", post(create_quote_request_handler));

    // Garage-protected routes
    let garage = Router::new()
        .route("/garage/quote-requests", get(list_quote_requests_handler))
        .route("/garage/quotes/submit", post(submit_quote_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, garage_auth));

    public.merge(garage).with_state(service)
}
