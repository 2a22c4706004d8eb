use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use tracing::{error, info};

use crate::config::mongo_conf::MongoConfig;
use crate::model::quote::QuoteRequest;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use crate::util::time::now_rfc3339;

#[async_trait]
pub trait QuoteRequestRepository: Send + Sync {
    async fn create(&self, request: QuoteRequest) -> RepositoryResult<QuoteRequest>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<QuoteRequest>;
    async fn find(
        &self,
        filter: Document,
        limit: i64,
        offset: u64,
    ) -> RepositoryResult<Vec<QuoteRequest>>;
    /// Bump the received-quote counter after a successful submission.
    async fn increment_quotes_received(&self, id: ObjectId) -> RepositoryResult<()>;
}

pub struct MongoQuoteRequestRepository {
    collection: mongodb::Collection<QuoteRequest>,
}

impl MongoQuoteRequestRepository {
    pub async fn new(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        let collection = super::collection(config, config.get_quote_request_collection()).await?;
        Ok(MongoQuoteRequestRepository { collection })
    }
}

#[async_trait]
impl QuoteRequestRepository for MongoQuoteRequestRepository {
    #[tracing::instrument(skip(self, request), fields(category = %request.category))]
    async fn create(&self, request: QuoteRequest) -> RepositoryResult<QuoteRequest> {
        info!("Creating new quote request");
        let mut new_request = request;
        new_request.id = Some(ObjectId::new());
        new_request.quotesReceived = 0;
        let now = now_rfc3339();
        new_request.createdAt = Some(now.clone());
        new_request.updatedAt = Some(now);

        match self.collection.insert_one(new_request.clone(), None).await {
            Ok(_) => {
                info!("Quote request created successfully");
                Ok(new_request)
            }
            Err(e) => {
                error!("Failed to create quote request: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<QuoteRequest> {
        let filter = doc! { "_id": id };
        match self.collection.find_one(filter, None).await {
            Ok(Some(request)) => Ok(request),
            Ok(None) => Err(RepositoryError::not_found(format!(
                "Quote request not found for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to fetch quote request by ID: {}", e);
                Err(RepositoryError::database(format!(
                    "Failed to fetch quote request by ID: {}",
                    e
                )))
            }
        }
    }

    #[tracing::instrument(skip(self, filter), fields(limit = limit, offset = offset))]
    async fn find(
        &self,
        filter: Document,
        limit: i64,
        offset: u64,
    ) -> RepositoryResult<Vec<QuoteRequest>> {
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .skip(offset)
            .limit(limit)
            .build();
        let mut cursor = self
            .collection
            .find(filter, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list quote requests: {}", e)))?;

        let mut requests = Vec::new();
        while let Some(request) = cursor.next().await {
            requests.push(request.map_err(|e| {
                RepositoryError::serialization(format!(
                    "Failed to deserialize quote request: {}",
                    e
                ))
            })?);
        }
        info!("Fetched {} quote requests", requests.len());
        Ok(requests)
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn increment_quotes_received(&self, id: ObjectId) -> RepositoryResult<()> {
        let filter = doc! { "_id": id };
        let update = doc! {
            "$inc": { "quotesReceived": 1 },
            "$set": { "updatedAt": now_rfc3339() },
        };
        let result = self.collection.update_one(filter, update, None).await;
        match result {
            Ok(update_result) if update_result.matched_count > 0 => Ok(()),
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No quote request found to increment for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to increment quote counter: {}", e);
                Err(RepositoryError::database(format!(
                    "Failed to increment quote counter: {}",
                    e
                )))
            }
        }
    }
}
