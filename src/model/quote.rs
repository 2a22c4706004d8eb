use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A customer's ad-hoc request for pricing, open to multiple garage
/// responses until `expiresAt` passes.
///
/// The optional `garagePlaceId`/`garageName` pair is a preferred-garage
/// target; untargeted requests are visible to every approved garage.
#[allow(non_snake_case)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub customerName: String,
    pub customerEmail: String,
    pub customerPhone: String,
    pub category: String,
    pub urgency: String,
    pub description: String,
    pub vehicleMake: String,
    pub vehicleModel: String,
    pub vehicleYear: u32,
    pub garagePlaceId: Option<String>,
    pub garageName: Option<String>,
    /// Number of quotes received so far, incremented on each submission.
    pub quotesReceived: u32,
    pub expiresAt: String,
    pub createdAt: Option<String>,
    pub updatedAt: Option<String>,
}

/// One garage's priced response to a quote request.
///
/// Unique per (garage, request) pair; `validUntil` is independent of the
/// request's own expiry.
#[allow(non_snake_case)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub quoteRequestId: ObjectId,
    pub garageId: ObjectId,
    /// Quoted amount in currency minor units.
    pub quotedAmount: i64,
    pub estimatedDuration: String,
    pub includedServices: Vec<String>,
    pub warrantyOffered: Option<bool>,
    pub additionalNotes: Option<String>,
    pub availableFrom: String, // YYYY-MM-DD
    pub validUntil: String,
    pub createdAt: Option<String>,
    pub updatedAt: Option<String>,
}

/// How long a new quote request stays open for responses.
pub const QUOTE_REQUEST_EXPIRY_DAYS: i64 = 7;

/// How long a submitted quote remains valid.
pub const QUOTE_VALIDITY_DAYS: i64 = 14;
