use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::dto::booking_dto::{
    BookingListQuery, CreateBookingRequest, UpdateBookingStatusRequest,
};
use crate::dto::slot_dto::SlotAvailabilityQuery;
use crate::handler::{parse_object_id, user_id_from_claims};
use crate::service::booking_service::{BookingService, BookingServiceImpl};
use crate::util::error::HandlerError;
use crate::util::jwt::Claims;

/// POST /bookings — public customer checkout.
pub async fn create_booking_handler(
    State(service): State<Arc<BookingServiceImpl>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let created = service.create_booking(payload).await?;
    Ok(Json(created))
}

/// GET /bookings/slot-availability?date=YYYY-MM-DD — public.
pub async fn slot_availability_handler(
    State(service): State<Arc<BookingServiceImpl>>,
    Query(params): Query<SlotAvailabilityQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let availability = service.slot_availability(&params.date).await?;
    Ok(Json(availability))
}

/// GET /garage/bookings?status=&limit=&offset= — garage role.
pub async fn list_garage_bookings_handler(
    State(service): State<Arc<BookingServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<BookingListQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let user_id = user_id_from_claims(&claims)?;
    let page = service.list_for_garage(user_id, params).await?;
    Ok(Json(page))
}

/// PUT /garage/bookings/{id}/status — garage role, claim or advance.
pub async fn update_booking_status_handler(
    State(service): State<Arc<BookingServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let user_id = user_id_from_claims(&claims)?;
    let booking_id = parse_object_id(&id, "booking")?;
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let updated = service
        .update_status_for_garage(user_id, booking_id, &payload.status)
        .await?;
    Ok(Json(updated))
}
