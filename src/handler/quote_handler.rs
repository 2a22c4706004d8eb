use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;

use crate::dto::quote_dto::{
    CreateQuoteRequestRequest, QuoteRequestListQuery, QuoteRequestListResponse, SubmitQuoteRequest,
};
use crate::handler::{parse_object_id, user_id_from_claims};
use crate::service::quote_service::{QuoteService, QuoteServiceImpl};
use crate::util::error::HandlerError;
use crate::util::jwt::Claims;

/// POST /quote-requests — public, customer opens a request.
pub async fn create_quote_request_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Json(payload): Json<CreateQuoteRequestRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let created = service.create_request(payload).await?;
    Ok(Json(created))
}

/// GET /garage/quote-requests?category=&urgency=&id= — garage role.
///
/// With `id` the response is a single request plus the caller's existing
/// quote, otherwise a filtered listing of open requests.
pub async fn list_quote_requests_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<QuoteRequestListQuery>,
) -> Result<axum::response::Response, HandlerError> {
    let user_id = user_id_from_claims(&claims)?;

    if let Some(id) = params.id.as_deref().filter(|s| !s.is_empty()) {
        let request_id = parse_object_id(id, "quote request")?;
        let detail = service.get_request_for_garage(user_id, request_id).await?;
        return Ok(Json(detail).into_response());
    }

    let requests = service.list_requests_for_garage(user_id, params).await?;
    Ok(Json(QuoteRequestListResponse { requests }).into_response())
}

/// POST /garage/quotes/submit — garage role.
pub async fn submit_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SubmitQuoteRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let user_id = user_id_from_claims(&claims)?;
    let response = service.submit_quote(user_id, payload).await?;
    Ok(Json(response))
}
