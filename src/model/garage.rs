use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A service-provider account that can claim bookings and submit quotes.
///
/// `linked_garage_place_id` and `linked_garage_name` are the identity keys
/// used to match unassigned customer-submitted business to this account.
/// They are set by staff through the admin API, not at registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Garage {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: String, // "pending", "approved", "rejected"
    pub linked_garage_place_id: Option<String>,
    pub linked_garage_name: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

pub const GARAGE_STATUS_PENDING: &str = "pending";
pub const GARAGE_STATUS_APPROVED: &str = "approved";
pub const GARAGE_STATUS_REJECTED: &str = "rejected";

pub const GARAGE_STATUSES: &[&str] = &[
    GARAGE_STATUS_PENDING,
    GARAGE_STATUS_APPROVED,
    GARAGE_STATUS_REJECTED,
];

impl Garage {
    pub fn is_approved(&self) -> bool {
        self.status == GARAGE_STATUS_APPROVED
    }
}
