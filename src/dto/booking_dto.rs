use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::booking::Booking;

/// Customer checkout payload. The `price` field carries the display-currency
/// amount; it is converted to minor units exactly once, on the way in.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[validate(length(min = 2, max = 100, message = "Customer name is required"))]
    pub customer_name: String,

    #[validate(email(message = "Invalid email address"))]
    pub customer_email: String,

    #[validate(length(min = 6, max = 20, message = "Invalid phone number"))]
    pub customer_phone: String,

    #[validate(length(min = 2, max = 12, message = "Invalid vehicle registration"))]
    pub vehicle_reg: String,

    pub service_type: String,

    pub service_date: String,

    pub pickup_slot: String,

    pub dropoff_slot: String,

    pub garage_place_id: Option<String>,

    pub garage_name: Option<String>,

    #[validate(length(min = 1, message = "Price is required"))]
    pub price: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingListQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingListResponse {
    pub bookings: Vec<Booking>,
    /// Absent for unapproved garages, which get an empty list only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    pub limit: i64,
    pub offset: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateBookingStatusRequest {
    #[validate(length(min = 2, max = 50, message = "Status is required"))]
    pub status: String,
}
