use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument};

use crate::dto::garage_dto::{
    GarageListQuery, GarageListResponse, RegisterGarageRequest, UpdateGarageLinkageRequest,
};
use crate::dto::validation_errors_to_map;
use crate::model::garage::{Garage, GARAGE_STATUSES, GARAGE_STATUS_PENDING};
use crate::repository::garage_repo::{GarageRepository, MongoGarageRepository};
use crate::util::error::ServiceError;
use validator::Validate;

const DEFAULT_PAGE_LIMIT: i64 = 50;
const MAX_PAGE_LIMIT: i64 = 200;

#[async_trait]
pub trait GarageService: Send + Sync {
    /// Create the caller's garage profile in pending status.
    async fn register(
        &self,
        user_id: ObjectId,
        dto: RegisterGarageRequest,
    ) -> Result<Garage, ServiceError>;
    async fn profile(&self, user_id: ObjectId) -> Result<Garage, ServiceError>;
    /// Staff: paginated listing of all garages.
    async fn list(&self, query: GarageListQuery) -> Result<GarageListResponse, ServiceError>;
    /// Staff: approve or reject a garage.
    async fn update_status(&self, id: ObjectId, status: &str) -> Result<Garage, ServiceError>;
    /// Staff: set the identity keys used by the matching resolver.
    async fn update_linkage(
        &self,
        id: ObjectId,
        dto: UpdateGarageLinkageRequest,
    ) -> Result<Garage, ServiceError>;
}

pub struct GarageServiceImpl {
    pub garage_repo: Arc<MongoGarageRepository>,
}

impl GarageServiceImpl {
    pub fn new(garage_repo: Arc<MongoGarageRepository>) -> Self {
        GarageServiceImpl { garage_repo }
    }
}

#[async_trait]
impl GarageService for GarageServiceImpl {
    #[instrument(skip(self, dto), fields(user_id = %user_id))]
    async fn register(
        &self,
        user_id: ObjectId,
        dto: RegisterGarageRequest,
    ) -> Result<Garage, ServiceError> {
        if let Err(e) = dto.validate() {
            return Err(ServiceError::Validation(validation_errors_to_map(&e)));
        }

        if self
            .garage_repo
            .find_by_user_id(user_id)
            .await
            .map_err(ServiceError::from)?
            .is_some()
        {
            return Err(ServiceError::Conflict(
                "A garage profile already exists for this account".to_string(),
            ));
        }

        let garage = Garage {
            id: None,
            user_id,
            name: dto.name,
            email: dto.email,
            phone: dto.phone,
            status: GARAGE_STATUS_PENDING.to_string(),
            linked_garage_place_id: None,
            linked_garage_name: None,
            created_at: None,
            updated_at: None,
        };
        let created = self
            .garage_repo
            .create(garage)
            .await
            .map_err(ServiceError::from)?;
        info!("Garage registered, awaiting approval");
        Ok(created)
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn profile(&self, user_id: ObjectId) -> Result<Garage, ServiceError> {
        self.garage_repo
            .find_by_user_id(user_id)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::NotFound("No garage profile for this account".to_string()))
    }

    #[instrument(skip(self, query))]
    async fn list(&self, query: GarageListQuery) -> Result<GarageListResponse, ServiceError> {
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
        let offset = query.offset.unwrap_or(0);
        let total = self.garage_repo.count().await.map_err(ServiceError::from)?;
        let garages = self
            .garage_repo
            .list(limit, offset)
            .await
            .map_err(ServiceError::from)?;
        Ok(GarageListResponse {
            garages,
            total,
            limit,
            offset,
        })
    }

    #[instrument(skip(self), fields(id = %id, status = %status))]
    async fn update_status(&self, id: ObjectId, status: &str) -> Result<Garage, ServiceError> {
        if !GARAGE_STATUSES.contains(&status) {
            return Err(ServiceError::InvalidInput(format!(
                "Unknown garage status: {}",
                status
            )));
        }
        self.garage_repo
            .update_status(id, status)
            .await
            .map_err(ServiceError::from)
    }

    #[instrument(skip(self, dto), fields(id = %id))]
    async fn update_linkage(
        &self,
        id: ObjectId,
        dto: UpdateGarageLinkageRequest,
    ) -> Result<Garage, ServiceError> {
        // Normalize empty strings to unset so the matcher never sees them.
        let place_id = dto
            .linked_garage_place_id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let name = dto
            .linked_garage_name
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self.garage_repo
            .update_linkage(id, place_id, name)
            .await
            .map_err(ServiceError::from)
    }
}
