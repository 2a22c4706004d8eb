use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument, warn};

use crate::dto::booking_dto::{BookingListQuery, BookingListResponse, CreateBookingRequest};
use crate::dto::slot_dto::{SlotAvailabilityResponse, SlotStatusDto};
use crate::dto::validation_errors_to_map;
use crate::model::booking::{
    is_valid_booking_status, Booking, BOOKING_STATUS_ACCEPTED, BOOKING_STATUS_NEW,
};
use crate::model::garage::Garage;
use crate::model::slots::{
    self, SlotKind, MIN_PICKUP_DROPOFF_GAP_MIN,
};
use crate::repository::booking_repo::{BookingRepository, MongoBookingRepository};
use crate::repository::garage_repo::{GarageRepository, MongoGarageRepository};
use crate::service::matching::GarageMatcher;
use crate::util::error::ServiceError;
use crate::util::money::display_to_minor_units;
use crate::util::time::{parse_date, today};
use validator::Validate;

const DEFAULT_PAGE_LIMIT: i64 = 50;
const MAX_PAGE_LIMIT: i64 = 200;

#[async_trait]
pub trait BookingService: Send + Sync {
    /// Customer checkout: validate and persist a new unassigned booking.
    async fn create_booking(&self, dto: CreateBookingRequest) -> Result<Booking, ServiceError>;
    /// Per-slot occupancy for a calendar date.
    async fn slot_availability(&self, date: &str) -> Result<SlotAvailabilityResponse, ServiceError>;
    /// The garage-facing booking list, filtered and paginated.
    async fn list_for_garage(
        &self,
        user_id: ObjectId,
        query: BookingListQuery,
    ) -> Result<BookingListResponse, ServiceError>;
    /// Claim an unassigned booking or advance an assigned one.
    async fn update_status_for_garage(
        &self,
        user_id: ObjectId,
        booking_id: ObjectId,
        status: &str,
    ) -> Result<Booking, ServiceError>;
}

pub struct BookingServiceImpl {
    pub booking_repo: MongoBookingRepository,
    pub garage_repo: Arc<MongoGarageRepository>,
}

impl BookingServiceImpl {
    pub fn new(
        booking_repo: MongoBookingRepository,
        garage_repo: Arc<MongoGarageRepository>,
    ) -> Self {
        BookingServiceImpl {
            booking_repo,
            garage_repo,
        }
    }

    async fn garage_for_user(&self, user_id: ObjectId) -> Result<(Garage, ObjectId), ServiceError> {
        let garage = self
            .garage_repo
            .find_by_user_id(user_id)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::NotFound("No garage profile for this account".to_string()))?;
        let garage_id = garage
            .id
            .ok_or_else(|| ServiceError::InternalError("Garage record has no id".to_string()))?;
        Ok((garage, garage_id))
    }

    /// Validate the checkout payload; returns the price in minor units.
    fn validate_create(&self, dto: &CreateBookingRequest) -> Result<i64, ServiceError> {
        let mut errors: BTreeMap<String, String> = match dto.validate() {
            Ok(()) => BTreeMap::new(),
            Err(e) => validation_errors_to_map(&e),
        };

        if slots::estimated_duration_minutes(&dto.service_type).is_none() {
            errors.insert(
                "serviceType".to_string(),
                format!("Unknown service type: {}", dto.service_type),
            );
        }

        match parse_date(&dto.service_date) {
            None => {
                errors.insert(
                    "serviceDate".to_string(),
                    "Invalid date, expected YYYY-MM-DD".to_string(),
                );
            }
            Some(date) if date < today() => {
                errors.insert(
                    "serviceDate".to_string(),
                    "Service date must not be in the past".to_string(),
                );
            }
            Some(_) => {}
        }

        let pickup = slots::find_slot(SlotKind::Pickup, &dto.pickup_slot);
        if pickup.is_none() {
            errors.insert(
                "pickupSlot".to_string(),
                format!("Unknown pickup slot: {}", dto.pickup_slot),
            );
        }
        let dropoff = slots::find_slot(SlotKind::Dropoff, &dto.dropoff_slot);
        if dropoff.is_none() {
            errors.insert(
                "dropoffSlot".to_string(),
                format!("Unknown dropoff slot: {}", dto.dropoff_slot),
            );
        }
        if let (Some(pickup), Some(dropoff)) = (pickup, dropoff) {
            if !slots::gap_is_legal(pickup, dropoff) {
                errors.insert(
                    "dropoffSlot".to_string(),
                    format!(
                        "Dropoff must be at least {} minutes after pickup",
                        MIN_PICKUP_DROPOFF_GAP_MIN
                    ),
                );
            }
        }

        let amount_minor = match display_to_minor_units(&dto.price) {
            Ok(amount) => Some(amount),
            Err(e) => {
                errors.insert("price".to_string(), e.to_string());
                None
            }
        };

        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }
        // amount_minor is always Some here
        Ok(amount_minor.unwrap_or_default())
    }
}

/// Count per-slot occupancy for one date's bookings against a catalog.
/// A slot is full once its booked count reaches the configured capacity.
fn occupancy(bookings: &[Booking], kind: SlotKind) -> Vec<SlotStatusDto> {
    slots::catalog(kind)
        .iter()
        .map(|slot| {
            let booked = bookings
                .iter()
                .filter(|b| match kind {
                    SlotKind::Pickup => b.pickupSlot == slot.id,
                    SlotKind::Dropoff => b.dropoffSlot == slot.id,
                })
                .count() as u32;
            SlotStatusDto {
                slot: slot.id.to_string(),
                booked,
                capacity: slot.capacity,
                available: slot.capacity.saturating_sub(booked),
                is_full: booked >= slot.capacity,
            }
        })
        .collect()
}

#[async_trait]
impl BookingService for BookingServiceImpl {
    #[instrument(skip(self, dto), fields(service_date = %dto.service_date))]
    async fn create_booking(&self, dto: CreateBookingRequest) -> Result<Booking, ServiceError> {
        info!("Creating booking from checkout");
        let amount_minor = self.validate_create(&dto)?;

        // Re-validate occupancy at write time: the availability the client
        // saw may be stale. Not transactional with the insert, so a narrow
        // race window remains.
        let existing = self
            .booking_repo
            .find_by_service_date(&dto.service_date)
            .await
            .map_err(ServiceError::from)?;
        for (kind, chosen) in [
            (SlotKind::Pickup, dto.pickup_slot.as_str()),
            (SlotKind::Dropoff, dto.dropoff_slot.as_str()),
        ] {
            let statuses = occupancy(&existing, kind);
            if let Some(status) = statuses.iter().find(|s| s.slot == chosen) {
                if status.is_full {
                    warn!(slot = chosen, "Slot filled up between display and submit");
                    return Err(ServiceError::Conflict(format!(
                        "Slot {} on {} is fully booked",
                        chosen, dto.service_date
                    )));
                }
            }
        }

        let booking = Booking {
            id: None,
            customerName: dto.customer_name,
            customerEmail: dto.customer_email,
            customerPhone: dto.customer_phone,
            vehicleReg: dto.vehicle_reg,
            serviceType: dto.service_type,
            serviceDate: dto.service_date,
            pickupSlot: dto.pickup_slot,
            dropoffSlot: dto.dropoff_slot,
            garagePlaceId: dto.garage_place_id,
            garageName: dto.garage_name,
            assignedGarageId: None,
            garageStatus: BOOKING_STATUS_NEW.to_string(),
            amountMinor: amount_minor,
            createdAt: None,
            updatedAt: None,
        };
        self.booking_repo
            .create(booking)
            .await
            .map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(date = %date))]
    async fn slot_availability(&self, date: &str) -> Result<SlotAvailabilityResponse, ServiceError> {
        if parse_date(date).is_none() {
            return Err(ServiceError::InvalidInput(
                "Invalid date, expected YYYY-MM-DD".to_string(),
            ));
        }
        let bookings = self
            .booking_repo
            .find_by_service_date(date)
            .await
            .map_err(ServiceError::from)?;
        Ok(SlotAvailabilityResponse {
            date: date.to_string(),
            pickup: occupancy(&bookings, SlotKind::Pickup),
            dropoff: occupancy(&bookings, SlotKind::Dropoff),
            min_gap_minutes: MIN_PICKUP_DROPOFF_GAP_MIN,
        })
    }

    #[instrument(skip(self, query), fields(user_id = %user_id))]
    async fn list_for_garage(
        &self,
        user_id: ObjectId,
        query: BookingListQuery,
    ) -> Result<BookingListResponse, ServiceError> {
        let (garage, garage_id) = self.garage_for_user(user_id).await?;
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
        let offset = query.offset.unwrap_or(0);

        if !garage.is_approved() {
            info!("Garage not approved, returning empty booking list");
            return Ok(BookingListResponse {
                bookings: Vec::new(),
                total: None,
                limit,
                offset,
            });
        }

        let status = query.status.as_deref().filter(|s| !s.is_empty());
        if let Some(s) = status {
            if s != "all" && !is_valid_booking_status(s) {
                return Err(ServiceError::InvalidInput(format!(
                    "Unknown status filter: {}",
                    s
                )));
            }
        }

        let matcher = GarageMatcher::new(&garage, garage_id);
        let filter = match matcher.booking_filter(status) {
            Some(filter) => filter,
            None => {
                // "new" with no linkage: nothing can match, skip the query
                info!("Garage has no linkage, returning empty new-business list");
                return Ok(BookingListResponse {
                    bookings: Vec::new(),
                    total: Some(0),
                    limit,
                    offset,
                });
            }
        };

        let total = self
            .booking_repo
            .count(filter.clone())
            .await
            .map_err(ServiceError::from)?;
        let bookings = self
            .booking_repo
            .find(filter, limit, offset)
            .await
            .map_err(ServiceError::from)?;

        Ok(BookingListResponse {
            bookings,
            total: Some(total),
            limit,
            offset,
        })
    }

    #[instrument(skip(self), fields(user_id = %user_id, booking_id = %booking_id, status = %status))]
    async fn update_status_for_garage(
        &self,
        user_id: ObjectId,
        booking_id: ObjectId,
        status: &str,
    ) -> Result<Booking, ServiceError> {
        let (garage, garage_id) = self.garage_for_user(user_id).await?;
        if !garage.is_approved() {
            return Err(ServiceError::Forbidden(
                "Garage account is not approved".to_string(),
            ));
        }
        if !is_valid_booking_status(status) || status == BOOKING_STATUS_NEW {
            return Err(ServiceError::InvalidInput(format!(
                "Invalid booking status: {}",
                status
            )));
        }

        let booking = self
            .booking_repo
            .get_by_id(booking_id)
            .await
            .map_err(ServiceError::from)?;

        match booking.assignedGarageId {
            Some(owner) if owner == garage_id => self
                .booking_repo
                .update_status(booking_id, status)
                .await
                .map_err(ServiceError::from),
            Some(_) => Err(ServiceError::Conflict(
                "Booking is already assigned to another garage".to_string(),
            )),
            None => {
                // Claiming: only an accept may take ownership, and only of
                // a new booking this garage actually matches.
                if status != BOOKING_STATUS_ACCEPTED {
                    return Err(ServiceError::Conflict(
                        "Booking must be accepted before it can be updated".to_string(),
                    ));
                }
                let matcher = GarageMatcher::new(&garage, garage_id);
                let visible = booking.garageStatus == BOOKING_STATUS_NEW
                    && matcher.matches_record(
                        booking.garagePlaceId.as_deref(),
                        booking.garageName.as_deref(),
                    );
                if !visible {
                    return Err(ServiceError::NotFound(format!(
                        "Booking not found for ID: {}",
                        booking_id
                    )));
                }
                self.booking_repo
                    .assign(booking_id, garage_id, BOOKING_STATUS_ACCEPTED)
                    .await
                    .map_err(ServiceError::from)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(pickup: &str, dropoff: &str) -> Booking {
        Booking {
            id: Some(ObjectId::new()),
            customerName: "Sam Driver".to_string(),
            customerEmail: "sam@example.com".to_string(),
            customerPhone: "0123456789".to_string(),
            vehicleReg: "AB12 CDE".to_string(),
            serviceType: "mot".to_string(),
            serviceDate: "2025-06-10".to_string(),
            pickupSlot: pickup.to_string(),
            dropoffSlot: dropoff.to_string(),
            garagePlaceId: None,
            garageName: None,
            assignedGarageId: None,
            garageStatus: BOOKING_STATUS_NEW.to_string(),
            amountMinor: 15000,
            createdAt: None,
            updatedAt: None,
        }
    }

    #[test]
    fn test_occupancy_marks_full_slots() {
        // Capacity is 2: two bookings at 09:00 fill the slot
        let bookings = vec![booking("09:00", "14:00"), booking("09:00", "16:30")];
        let pickup = occupancy(&bookings, SlotKind::Pickup);
        let nine = pickup.iter().find(|s| s.slot == "09:00").unwrap();
        assert_eq!(nine.booked, 2);
        assert_eq!(nine.available, 0);
        assert!(nine.is_full);

        let half_nine = pickup.iter().find(|s| s.slot == "09:30").unwrap();
        assert_eq!(half_nine.booked, 0);
        assert!(!half_nine.is_full);
    }

    #[test]
    fn test_occupancy_counts_dropoffs_independently() {
        let bookings = vec![booking("09:00", "14:00"), booking("09:30", "14:00")];
        let dropoff = occupancy(&bookings, SlotKind::Dropoff);
        let two = dropoff.iter().find(|s| s.slot == "14:00").unwrap();
        assert!(two.is_full);
        let pickup = occupancy(&bookings, SlotKind::Pickup);
        assert!(pickup.iter().all(|s| !s.is_full));
    }

    #[test]
    fn test_occupancy_covers_whole_catalog() {
        let statuses = occupancy(&[], SlotKind::Pickup);
        assert_eq!(statuses.len(), slots::PICKUP_SLOTS.len());
        assert!(statuses.iter().all(|s| s.booked == 0 && !s.is_full));
    }
}
