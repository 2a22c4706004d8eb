use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A pickup/dropoff service job created at customer checkout.
///
/// `garagePlaceId`/`garageName` hold the customer-entered target garage and
/// may both be unset. `assignedGarageId` is set once a garage accepts the
/// job; until then `garageStatus` stays `"new"`.
#[allow(non_snake_case)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub customerName: String,
    pub customerEmail: String,
    pub customerPhone: String,
    pub vehicleReg: String,
    pub serviceType: String,
    pub serviceDate: String, // YYYY-MM-DD
    pub pickupSlot: String,  // slot id, "HH:MM"
    pub dropoffSlot: String, // slot id, "HH:MM"
    pub garagePlaceId: Option<String>,
    pub garageName: Option<String>,
    pub assignedGarageId: Option<ObjectId>,
    pub garageStatus: String,
    /// Checkout price in currency minor units.
    pub amountMinor: i64,
    pub createdAt: Option<String>,
    pub updatedAt: Option<String>,
}

pub const BOOKING_STATUS_NEW: &str = "new";
pub const BOOKING_STATUS_ACCEPTED: &str = "accepted";
pub const BOOKING_STATUS_IN_PROGRESS: &str = "in_progress";
pub const BOOKING_STATUS_COMPLETED: &str = "completed";
pub const BOOKING_STATUS_DECLINED: &str = "declined";

pub const BOOKING_STATUSES: &[&str] = &[
    BOOKING_STATUS_NEW,
    BOOKING_STATUS_ACCEPTED,
    BOOKING_STATUS_IN_PROGRESS,
    BOOKING_STATUS_COMPLETED,
    BOOKING_STATUS_DECLINED,
];

pub fn is_valid_booking_status(status: &str) -> bool {
    BOOKING_STATUSES.contains(&status)
}
