use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use tracing::{error, info};

use crate::config::mongo_conf::MongoConfig;
use crate::model::garage::Garage;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use crate::util::time::now_rfc3339;

#[async_trait]
pub trait GarageRepository: Send + Sync {
    async fn create(&self, garage: Garage) -> RepositoryResult<Garage>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Garage>;
    async fn find_by_user_id(&self, user_id: ObjectId) -> RepositoryResult<Option<Garage>>;
    async fn update_status(&self, id: ObjectId, status: &str) -> RepositoryResult<Garage>;
    async fn update_linkage(
        &self,
        id: ObjectId,
        place_id: Option<String>,
        name: Option<String>,
    ) -> RepositoryResult<Garage>;
    async fn list(&self, limit: i64, offset: u64) -> RepositoryResult<Vec<Garage>>;
    async fn count(&self) -> RepositoryResult<u64>;
}

pub struct MongoGarageRepository {
    collection: mongodb::Collection<Garage>,
}

impl MongoGarageRepository {
    pub async fn new(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        let collection = super::collection(config, config.get_garage_collection()).await?;
        Ok(MongoGarageRepository { collection })
    }
}

#[async_trait]
impl GarageRepository for MongoGarageRepository {
    #[tracing::instrument(skip(self, garage), fields(user_id = %garage.user_id))]
    async fn create(&self, garage: Garage) -> RepositoryResult<Garage> {
        info!("Creating new garage profile");
        let mut new_garage = garage;
        new_garage.id = Some(ObjectId::new());
        let now = now_rfc3339();
        new_garage.created_at = Some(now.clone());
        new_garage.updated_at = Some(now);

        match self.collection.insert_one(new_garage.clone(), None).await {
            Ok(_) => {
                info!("Garage profile created successfully");
                Ok(new_garage)
            }
            Err(e) => {
                error!("Failed to create garage: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Garage> {
        let filter = doc! { "_id": id };
        match self.collection.find_one(filter, None).await {
            Ok(Some(garage)) => Ok(garage),
            Ok(None) => Err(RepositoryError::not_found(format!(
                "Garage not found for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to fetch garage by ID: {}", e);
                Err(RepositoryError::database(format!(
                    "Failed to fetch garage by ID: {}",
                    e
                )))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn find_by_user_id(&self, user_id: ObjectId) -> RepositoryResult<Option<Garage>> {
        let filter = doc! { "user_id": user_id };
        self.collection
            .find_one(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find garage by user: {}", e)))
    }

    #[tracing::instrument(skip(self), fields(id = %id, status = %status))]
    async fn update_status(&self, id: ObjectId, status: &str) -> RepositoryResult<Garage> {
        info!(garage_id = %id, status = %status, "Updating garage status");
        let filter = doc! { "_id": id };
        let update = doc! { "$set": { "status": status, "updated_at": now_rfc3339() } };
        let result = self.collection.update_one(filter, update, None).await;
        match result {
            Ok(update_result) if update_result.matched_count > 0 => self.get_by_id(id).await,
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No garage found to update status for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to update garage status: {}", e);
                Err(RepositoryError::database(format!(
                    "Failed to update garage status: {}",
                    e
                )))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn update_linkage(
        &self,
        id: ObjectId,
        place_id: Option<String>,
        name: Option<String>,
    ) -> RepositoryResult<Garage> {
        info!(garage_id = %id, "Updating garage linkage");
        let filter = doc! { "_id": id };
        let update = doc! { "$set": {
            "linked_garage_place_id": place_id,
            "linked_garage_name": name,
            "updated_at": now_rfc3339(),
        } };
        let result = self.collection.update_one(filter, update, None).await;
        match result {
            Ok(update_result) if update_result.matched_count > 0 => self.get_by_id(id).await,
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No garage found to update linkage for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to update garage linkage: {}", e);
                Err(RepositoryError::database(format!(
                    "Failed to update garage linkage: {}",
                    e
                )))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(limit = limit, offset = offset))]
    async fn list(&self, limit: i64, offset: u64) -> RepositoryResult<Vec<Garage>> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .skip(offset)
            .limit(limit)
            .build();
        let mut cursor = self
            .collection
            .find(None, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list garages: {}", e)))?;

        let mut garages = Vec::new();
        while let Some(garage) = cursor.next().await {
            garages.push(garage.map_err(|e| {
                RepositoryError::serialization(format!("Failed to deserialize garage: {}", e))
            })?);
        }
        Ok(garages)
    }

    #[tracing::instrument(skip(self))]
    async fn count(&self) -> RepositoryResult<u64> {
        self.collection
            .count_documents(None, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to count garages: {}", e)))
    }
}
