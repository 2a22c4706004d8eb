use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use mongodb::{options::IndexOptions, IndexModel};
use tracing::{error, info};

use crate::config::mongo_conf::MongoConfig;
use crate::model::quote::Quote;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use crate::util::time::now_rfc3339;

#[async_trait]
pub trait QuoteRepository: Send + Sync {
    /// Insert a quote. The unique (garageId, quoteRequestId) index makes a
    /// duplicate submission surface as `RepositoryError::AlreadyExists`.
    async fn create(&self, quote: Quote) -> RepositoryResult<Quote>;
    async fn find_by_garage_and_request(
        &self,
        garage_id: ObjectId,
        request_id: ObjectId,
    ) -> RepositoryResult<Option<Quote>>;
}

pub struct MongoQuoteRepository {
    collection: mongodb::Collection<Quote>,
}

impl MongoQuoteRepository {
    pub async fn new(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        let collection = super::collection(config, config.get_quote_collection()).await?;
        Ok(MongoQuoteRepository { collection })
    }

    /// Create the unique compound index that enforces one quote per
    /// (garage, request) pair at the database level. Called once at startup.
    pub async fn ensure_indexes(&self) -> RepositoryResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "garageId": 1, "quoteRequestId": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection
            .create_index(index, None)
            .await
            .map_err(|e| {
                RepositoryError::database(format!("Failed to create quote index: {}", e))
            })?;
        info!("Quote uniqueness index ensured");
        Ok(())
    }
}

#[async_trait]
impl QuoteRepository for MongoQuoteRepository {
    #[tracing::instrument(skip(self, quote), fields(garage_id = %quote.garageId, request_id = %quote.quoteRequestId))]
    async fn create(&self, quote: Quote) -> RepositoryResult<Quote> {
        info!("Creating new quote");
        let mut new_quote = quote;
        new_quote.id = Some(ObjectId::new());
        let now = now_rfc3339();
        new_quote.createdAt = Some(now.clone());
        new_quote.updatedAt = Some(now);

        match self.collection.insert_one(new_quote.clone(), None).await {
            Ok(_) => {
                info!("Quote created successfully");
                Ok(new_quote)
            }
            Err(e) => {
                // E11000 duplicate key maps to AlreadyExists
                let repo_err = RepositoryError::from(e);
                if !matches!(repo_err, RepositoryError::AlreadyExists(_)) {
                    error!("Failed to create quote: {}", repo_err);
                }
                Err(repo_err)
            }
        }
    }

    #[tracing::instrument(skip(self), fields(garage_id = %garage_id, request_id = %request_id))]
    async fn find_by_garage_and_request(
        &self,
        garage_id: ObjectId,
        request_id: ObjectId,
    ) -> RepositoryResult<Option<Quote>> {
        let filter = doc! { "garageId": garage_id, "quoteRequestId": request_id };
        self.collection
            .find_one(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find quote: {}", e)))
    }
}
