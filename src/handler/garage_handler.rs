use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::dto::garage_dto::{
    GarageListQuery, RegisterGarageRequest, UpdateGarageLinkageRequest, UpdateGarageStatusRequest,
};
use crate::handler::{parse_object_id, user_id_from_claims};
use crate::service::garage_service::{GarageService, GarageServiceImpl};
use crate::util::error::HandlerError;
use crate::util::jwt::Claims;

/// POST /garage/register — garage role, create own profile.
pub async fn register_garage_handler(
    State(service): State<Arc<GarageServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<RegisterGarageRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let user_id = user_id_from_claims(&claims)?;
    let created = service.register(user_id, payload).await?;
    Ok(Json(created))
}

/// GET /garage/profile — garage role.
pub async fn garage_profile_handler(
    State(service): State<Arc<GarageServiceImpl>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, HandlerError> {
    let user_id = user_id_from_claims(&claims)?;
    let garage = service.profile(user_id).await?;
    Ok(Json(garage))
}

/// GET /admin/garages?limit=&offset= — admin role.
pub async fn list_garages_handler(
    State(service): State<Arc<GarageServiceImpl>>,
    Query(params): Query<GarageListQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let page = service.list(params).await?;
    Ok(Json(page))
}

/// PUT /admin/garages/{id}/status — admin role, approve/reject.
pub async fn update_garage_status_handler(
    State(service): State<Arc<GarageServiceImpl>>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<UpdateGarageStatusRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let garage_id = parse_object_id(&id, "garage")?;
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let updated = service.update_status(garage_id, &payload.status).await?;
    Ok(Json(updated))
}

/// PUT /admin/garages/{id}/linkage — admin role, set matching identity keys.
pub async fn update_garage_linkage_handler(
    State(service): State<Arc<GarageServiceImpl>>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<UpdateGarageLinkageRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let garage_id = parse_object_id(&id, "garage")?;
    let updated = service.update_linkage(garage_id, payload).await?;
    Ok(Json(updated))
}
