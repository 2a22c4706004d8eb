use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use tracing::{error, info};

use crate::config::mongo_conf::MongoConfig;
use crate::model::booking::Booking;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use crate::util::time::now_rfc3339;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: Booking) -> RepositoryResult<Booking>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Booking>;
    /// Page through bookings matching a caller-composed filter, newest
    /// created first.
    async fn find(&self, filter: Document, limit: i64, offset: u64) -> RepositoryResult<Vec<Booking>>;
    /// Count all bookings matching a filter, independent of the page window.
    async fn count(&self, filter: Document) -> RepositoryResult<u64>;
    async fn find_by_service_date(&self, date: &str) -> RepositoryResult<Vec<Booking>>;
    async fn assign(&self, id: ObjectId, garage_id: ObjectId, status: &str) -> RepositoryResult<Booking>;
    async fn update_status(&self, id: ObjectId, status: &str) -> RepositoryResult<Booking>;
}

pub struct MongoBookingRepository {
    collection: mongodb::Collection<Booking>,
}

impl MongoBookingRepository {
    pub async fn new(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        let collection = super::collection(config, config.get_booking_collection()).await?;
        Ok(MongoBookingRepository { collection })
    }

    async fn drain(
        &self,
        cursor: mongodb::Cursor<Booking>,
    ) -> RepositoryResult<Vec<Booking>> {
        let mut cursor = cursor;
        let mut bookings = Vec::new();
        while let Some(booking) = cursor.next().await {
            bookings.push(booking.map_err(|e| {
                RepositoryError::serialization(format!("Failed to deserialize booking: {}", e))
            })?);
        }
        Ok(bookings)
    }
}

#[async_trait]
impl BookingRepository for MongoBookingRepository {
    #[tracing::instrument(skip(self, booking), fields(service_date = %booking.serviceDate))]
    async fn create(&self, booking: Booking) -> RepositoryResult<Booking> {
        info!("Creating new booking");
        let mut new_booking = booking;
        new_booking.id = Some(ObjectId::new());
        let now = now_rfc3339();
        new_booking.createdAt = Some(now.clone());
        new_booking.updatedAt = Some(now);

        match self.collection.insert_one(new_booking.clone(), None).await {
            Ok(_) => {
                info!("Booking created successfully");
                Ok(new_booking)
            }
            Err(e) => {
                error!("Failed to create booking: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Booking> {
        let filter = doc! { "_id": id };
        match self.collection.find_one(filter, None).await {
            Ok(Some(booking)) => Ok(booking),
            Ok(None) => Err(RepositoryError::not_found(format!(
                "Booking not found for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to fetch booking by ID: {}", e);
                Err(RepositoryError::database(format!(
                    "Failed to fetch booking by ID: {}",
                    e
                )))
            }
        }
    }

    #[tracing::instrument(skip(self, filter), fields(limit = limit, offset = offset))]
    async fn find(&self, filter: Document, limit: i64, offset: u64) -> RepositoryResult<Vec<Booking>> {
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .skip(offset)
            .limit(limit)
            .build();
        let cursor = self
            .collection
            .find(filter, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list bookings: {}", e)))?;
        let bookings = self.drain(cursor).await?;
        info!("Fetched {} bookings", bookings.len());
        Ok(bookings)
    }

    #[tracing::instrument(skip(self, filter))]
    async fn count(&self, filter: Document) -> RepositoryResult<u64> {
        self.collection
            .count_documents(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to count bookings: {}", e)))
    }

    #[tracing::instrument(skip(self), fields(date = %date))]
    async fn find_by_service_date(&self, date: &str) -> RepositoryResult<Vec<Booking>> {
        let cursor = self
            .collection
            .find(doc! { "serviceDate": date }, None)
            .await
            .map_err(|e| {
                RepositoryError::database(format!("Failed to fetch bookings for date: {}", e))
            })?;
        self.drain(cursor).await
    }

    #[tracing::instrument(skip(self), fields(id = %id, garage_id = %garage_id, status = %status))]
    async fn assign(&self, id: ObjectId, garage_id: ObjectId, status: &str) -> RepositoryResult<Booking> {
        info!(booking_id = %id, "Assigning booking to garage");
        let filter = doc! { "_id": id };
        let update = doc! { "$set": {
            "assignedGarageId": garage_id,
            "garageStatus": status,
            "updatedAt": now_rfc3339(),
        } };
        let result = self.collection.update_one(filter, update, None).await;
        match result {
            Ok(update_result) if update_result.matched_count > 0 => self.get_by_id(id).await,
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No booking found to assign for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to assign booking: {}", e);
                Err(RepositoryError::database(format!(
                    "Failed to assign booking: {}",
                    e
                )))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id, status = %status))]
    async fn update_status(&self, id: ObjectId, status: &str) -> RepositoryResult<Booking> {
        info!(booking_id = %id, status = %status, "Updating booking status");
        let filter = doc! { "_id": id };
        let update = doc! { "$set": { "garageStatus": status, "updatedAt": now_rfc3339() } };
        let result = self.collection.update_one(filter, update, None).await;
        match result {
            Ok(update_result) if update_result.matched_count > 0 => self.get_by_id(id).await,
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No booking found to update status for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to update booking status: {}", e);
                Err(RepositoryError::database(format!(
                    "Failed to update booking status: {}",
                    e
                )))
            }
        }
    }
}
