use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::garage::Garage;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterGarageRequest {
    #[validate(length(min = 2, max = 100, message = "Garage name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 6, max = 20, message = "Invalid phone number"))]
    pub phone: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GarageListQuery {
    pub limit: Option<i64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GarageListResponse {
    pub garages: Vec<Garage>,
    pub total: u64,
    pub limit: i64,
    pub offset: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateGarageStatusRequest {
    #[validate(length(min = 2, max = 50, message = "Status is required"))]
    pub status: String,
}

/// Staff-set identity keys used by the matching resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGarageLinkageRequest {
    pub linked_garage_place_id: Option<String>,
    pub linked_garage_name: Option<String>,
}
