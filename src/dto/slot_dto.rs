use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct SlotAvailabilityQuery {
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlotStatusDto {
    pub slot: String,
    pub booked: u32,
    pub capacity: u32,
    pub available: u32,
    pub is_full: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotAvailabilityResponse {
    pub date: String,
    pub pickup: Vec<SlotStatusDto>,
    pub dropoff: Vec<SlotStatusDto>,
    pub min_gap_minutes: u16,
}
