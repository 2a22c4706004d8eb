use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use tracing::{info, instrument, warn};

use crate::dto::quote_dto::{
    CreateQuoteRequestRequest, QuoteRequestDetailResponse, QuoteRequestListQuery,
    SubmitQuoteRequest, SubmitQuoteResponse,
};
use crate::dto::validation_errors_to_map;
use crate::model::garage::Garage;
use crate::model::quote::{Quote, QuoteRequest, QUOTE_REQUEST_EXPIRY_DAYS, QUOTE_VALIDITY_DAYS};
use crate::repository::garage_repo::{GarageRepository, MongoGarageRepository};
use crate::repository::quote_repo::{MongoQuoteRepository, QuoteRepository};
use crate::repository::quote_request_repo::{MongoQuoteRequestRepository, QuoteRequestRepository};
use crate::repository::repository_error::RepositoryError;
use crate::service::matching::GarageMatcher;
use crate::util::error::ServiceError;
use crate::util::time::{now_rfc3339, parse_date, rfc3339_in_days, today};
use validator::Validate;

const LIST_LIMIT: i64 = 50;

#[async_trait]
pub trait QuoteService: Send + Sync {
    /// Customer-facing: open a new quote request.
    async fn create_request(
        &self,
        dto: CreateQuoteRequestRequest,
    ) -> Result<QuoteRequest, ServiceError>;
    /// Garage-facing: list open, unexpired requests visible to this garage.
    async fn list_requests_for_garage(
        &self,
        user_id: ObjectId,
        query: QuoteRequestListQuery,
    ) -> Result<Vec<QuoteRequest>, ServiceError>;
    /// Garage-facing: one request plus this garage's quote if present.
    async fn get_request_for_garage(
        &self,
        user_id: ObjectId,
        request_id: ObjectId,
    ) -> Result<QuoteRequestDetailResponse, ServiceError>;
    /// Garage-facing: submit a quote; idempotent per (garage, request).
    async fn submit_quote(
        &self,
        user_id: ObjectId,
        dto: SubmitQuoteRequest,
    ) -> Result<SubmitQuoteResponse, ServiceError>;
}

pub struct QuoteServiceImpl {
    pub request_repo: MongoQuoteRequestRepository,
    pub quote_repo: MongoQuoteRepository,
    pub garage_repo: Arc<MongoGarageRepository>,
}

impl QuoteServiceImpl {
    pub fn new(
        request_repo: MongoQuoteRequestRepository,
        quote_repo: MongoQuoteRepository,
        garage_repo: Arc<MongoGarageRepository>,
    ) -> Self {
        QuoteServiceImpl {
            request_repo,
            quote_repo,
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

    fn validate_submission(dto: &SubmitQuoteRequest) -> Result<(), ServiceError> {
        let mut errors: BTreeMap<String, String> = BTreeMap::new();

        if dto.quoted_amount <= 0 {
            errors.insert(
                "quotedAmount".to_string(),
                "Quoted amount must be greater than zero".to_string(),
            );
        }
        if dto.estimated_duration.trim().is_empty() {
            errors.insert(
                "estimatedDuration".to_string(),
                "Estimated duration is required".to_string(),
            );
        }
        if dto.included_services.iter().all(|s| s.trim().is_empty()) {
            errors.insert(
                "includedServices".to_string(),
                "At least one included service is required".to_string(),
            );
        }
        match parse_date(&dto.available_from) {
            None => {
                errors.insert(
                    "availableFrom".to_string(),
                    "Invalid date, expected YYYY-MM-DD".to_string(),
                );
            }
            Some(date) if date < today() => {
                errors.insert(
                    "availableFrom".to_string(),
                    "Availability date must not be in the past".to_string(),
                );
            }
            Some(_) => {}
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(errors))
        }
    }
}

#[async_trait]
impl QuoteService for QuoteServiceImpl {
    #[instrument(skip(self, dto), fields(category = %dto.category))]
    async fn create_request(
        &self,
        dto: CreateQuoteRequestRequest,
    ) -> Result<QuoteRequest, ServiceError> {
        if let Err(e) = dto.validate() {
            return Err(ServiceError::Validation(validation_errors_to_map(&e)));
        }

        let request = QuoteRequest {
            id: None,
            customerName: dto.customer_name,
            customerEmail: dto.customer_email,
            customerPhone: dto.customer_phone,
            category: dto.category,
            urgency: dto.urgency,
            description: dto.description,
            vehicleMake: dto.vehicle_make,
            vehicleModel: dto.vehicle_model,
            vehicleYear: dto.vehicle_year,
            garagePlaceId: dto.garage_place_id,
            garageName: dto.garage_name,
            quotesReceived: 0,
            expiresAt: rfc3339_in_days(QUOTE_REQUEST_EXPIRY_DAYS),
            createdAt: None,
            updatedAt: None,
        };
        self.request_repo
            .create(request)
            .await
            .map_err(ServiceError::from)
    }

    #[instrument(skip(self, query), fields(user_id = %user_id))]
    async fn list_requests_for_garage(
        &self,
        user_id: ObjectId,
        query: QuoteRequestListQuery,
    ) -> Result<Vec<QuoteRequest>, ServiceError> {
        let (garage, garage_id) = self.garage_for_user(user_id).await?;
        if !garage.is_approved() {
            info!("Garage not approved, returning empty quote request list");
            return Ok(Vec::new());
        }

        let matcher = GarageMatcher::new(&garage, garage_id);
        let mut filter = matcher.quote_request_filter();
        filter.insert("expiresAt", doc! { "$gt": now_rfc3339() });
        if let Some(category) = query.category.as_deref().filter(|s| !s.is_empty()) {
            filter.insert("category", category);
        }
        if let Some(urgency) = query.urgency.as_deref().filter(|s| !s.is_empty()) {
            filter.insert("urgency", urgency);
        }

        self.request_repo
            .find(filter, LIST_LIMIT, 0)
            .await
            .map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(user_id = %user_id, request_id = %request_id))]
    async fn get_request_for_garage(
        &self,
        user_id: ObjectId,
        request_id: ObjectId,
    ) -> Result<QuoteRequestDetailResponse, ServiceError> {
        let (_garage, garage_id) = self.garage_for_user(user_id).await?;
        let request = self
            .request_repo
            .get_by_id(request_id)
            .await
            .map_err(ServiceError::from)?;
        let existing_quote = self
            .quote_repo
            .find_by_garage_and_request(garage_id, request_id)
            .await
            .map_err(ServiceError::from)?;
        Ok(QuoteRequestDetailResponse {
            request,
            existing_quote,
        })
    }

    #[instrument(skip(self, dto), fields(user_id = %user_id))]
    async fn submit_quote(
        &self,
        user_id: ObjectId,
        dto: SubmitQuoteRequest,
    ) -> Result<SubmitQuoteResponse, ServiceError> {
        let (garage, garage_id) = self.garage_for_user(user_id).await?;
        if !garage.is_approved() {
            return Err(ServiceError::Forbidden(
                "Garage account is not approved".to_string(),
            ));
        }

        let request_id = ObjectId::parse_str(&dto.quote_request_id)
            .map_err(|_| ServiceError::InvalidInput("Invalid quote request id".to_string()))?;
        let request = self
            .request_repo
            .get_by_id(request_id)
            .await
            .map_err(ServiceError::from)?;

        if request.expiresAt <= now_rfc3339() {
            return Err(ServiceError::Conflict(
                "Quote request has expired".to_string(),
            ));
        }

        Self::validate_submission(&dto)?;

        let quote = Quote {
            id: None,
            quoteRequestId: request_id,
            garageId: garage_id,
            quotedAmount: dto.quoted_amount,
            estimatedDuration: dto.estimated_duration,
            includedServices: dto
                .included_services
                .into_iter()
                .filter(|s| !s.trim().is_empty())
                .collect(),
            warrantyOffered: dto.warranty_offered,
            additionalNotes: dto.additional_notes,
            availableFrom: dto.available_from,
            validUntil: rfc3339_in_days(QUOTE_VALIDITY_DAYS),
            createdAt: None,
            updatedAt: None,
        };

        match self.quote_repo.create(quote).await {
            Ok(created) => {
                self.request_repo
                    .increment_quotes_received(request_id)
                    .await
                    .map_err(ServiceError::from)?;
                info!("Quote submitted successfully");
                Ok(SubmitQuoteResponse {
                    quote: created,
                    already_submitted: false,
                })
            }
            // The unique index is the source of truth: a duplicate insert
            // means this garage already quoted, so return the record on file.
            Err(RepositoryError::AlreadyExists(_)) => {
                warn!("Duplicate quote submission, returning existing quote");
                let existing = self
                    .quote_repo
                    .find_by_garage_and_request(garage_id, request_id)
                    .await
                    .map_err(ServiceError::from)?
                    .ok_or_else(|| {
                        ServiceError::InternalError(
                            "Duplicate quote reported but none found".to_string(),
                        )
                    })?;
                Ok(SubmitQuoteResponse {
                    quote: existing,
                    already_submitted: true,
                })
            }
            Err(e) => Err(ServiceError::from(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> SubmitQuoteRequest {
        SubmitQuoteRequest {
            quote_request_id: "65f1a2b3c4d5e6f7a8b9c0d1".to_string(),
            quoted_amount: 15000,
            estimated_duration: "2 days".to_string(),
            included_services: vec!["Brake pads".to_string(), "Labour".to_string()],
            warranty_offered: Some(true),
            additional_notes: None,
            available_from: "2099-01-01".to_string(),
        }
    }

    #[test]
    fn test_valid_submission_passes() {
        assert!(QuoteServiceImpl::validate_submission(&submission()).is_ok());
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let mut dto = submission();
        dto.quoted_amount = 0;
        let err = QuoteServiceImpl::validate_submission(&dto).unwrap_err();
        match err {
            ServiceError::Validation(map) => assert!(map.contains_key("quotedAmount")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_services_rejected() {
        let mut dto = submission();
        dto.included_services = vec!["  ".to_string()];
        let err = QuoteServiceImpl::validate_submission(&dto).unwrap_err();
        match err {
            ServiceError::Validation(map) => assert!(map.contains_key("includedServices")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_past_availability_rejected() {
        let mut dto = submission();
        dto.available_from = "2020-01-01".to_string();
        let err = QuoteServiceImpl::validate_submission(&dto).unwrap_err();
        match err {
            ServiceError::Validation(map) => assert!(map.contains_key("availableFrom")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_multiple_failures_collected_per_field() {
        let mut dto = submission();
        dto.quoted_amount = -5;
        dto.estimated_duration = "".to_string();
        dto.available_from = "soon".to_string();
        let err = QuoteServiceImpl::validate_submission(&dto).unwrap_err();
        match err {
            ServiceError::Validation(map) => {
                assert_eq!(map.len(), 3);
                assert!(map.contains_key("quotedAmount"));
                assert!(map.contains_key("estimatedDuration"));
                assert!(map.contains_key("availableFrom"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
