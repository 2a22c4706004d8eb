use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::quote::{Quote, QuoteRequest};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuoteRequestRequest {
    #[validate(length(min = 2, max = 100, message = "Customer name is required"))]
    pub customer_name: String,

    #[validate(email(message = "Invalid email address"))]
    pub customer_email: String,

    #[validate(length(min = 6, max = 20, message = "Invalid phone number"))]
    pub customer_phone: String,

    #[validate(length(min = 2, max = 50, message = "Category is required"))]
    pub category: String,

    #[validate(length(min = 2, max = 50, message = "Urgency is required"))]
    pub urgency: String,

    #[validate(length(min = 10, max = 2000, message = "Please describe the work needed"))]
    pub description: String,

    #[validate(length(min = 1, max = 50, message = "Vehicle make is required"))]
    pub vehicle_make: String,

    #[validate(length(min = 1, max = 50, message = "Vehicle model is required"))]
    pub vehicle_model: String,

    #[validate(range(min = 1950, max = 2100, message = "Invalid vehicle year"))]
    pub vehicle_year: u32,

    pub garage_place_id: Option<String>,

    pub garage_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequestListQuery {
    pub category: Option<String>,
    pub urgency: Option<String>,
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuoteRequestListResponse {
    pub requests: Vec<QuoteRequest>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequestDetailResponse {
    pub request: QuoteRequest,
    /// Present when this garage already submitted a quote; the UI renders a
    /// read-only view instead of the form.
    pub existing_quote: Option<Quote>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuoteRequest {
    pub quote_request_id: String,
    /// Quoted amount in currency minor units.
    pub quoted_amount: i64,
    pub estimated_duration: String,
    pub included_services: Vec<String>,
    pub warranty_offered: Option<bool>,
    pub additional_notes: Option<String>,
    pub available_from: String, // YYYY-MM-DD
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuoteResponse {
    pub quote: Quote,
    pub already_submitted: bool,
}
