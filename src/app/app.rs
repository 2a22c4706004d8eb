use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::app_conf::AppConfig;
use crate::config::jwt_conf::JwtConfig;
use crate::config::mongo_conf::MongoConfig;
use crate::middlewares::auth_middleware::AuthState;
use crate::repository::booking_repo::MongoBookingRepository;
use crate::repository::garage_repo::MongoGarageRepository;
use crate::repository::quote_repo::MongoQuoteRepository;
use crate::repository::quote_request_repo::MongoQuoteRequestRepository;
use crate::router::booking_router::booking_router;
use crate::router::garage_router::garage_router;
use crate::router::quote_router::quote_router;
use crate::service::booking_service::BookingServiceImpl;
use crate::service::garage_service::GarageServiceImpl;
use crate::service::quote_service::QuoteServiceImpl;
use crate::util::jwt::JwtTokenUtilsImpl;

pub struct App {
    config: AppConfig,
    router: Router,
    pub garage_service: Arc<GarageServiceImpl>,
    pub booking_service: Arc<BookingServiceImpl>,
    pub quote_service: Arc<QuoteServiceImpl>,
}

impl App {
    pub async fn new() -> Self {
        let config = AppConfig::from_env();
        let jwt_config = JwtConfig::from_env().expect("JWT config error");
        let mongo_config = MongoConfig::from_env().expect("Mongo config error");

        let garage_repo = Arc::new(
            MongoGarageRepository::new(&mongo_config)
                .await
                .expect("Garage repo error"),
        );
        let booking_repo = MongoBookingRepository::new(&mongo_config)
            .await
            .expect("Booking repo error");
        let request_repo = MongoQuoteRequestRepository::new(&mongo_config)
            .await
            .expect("Quote request repo error");
        let quote_repo = MongoQuoteRepository::new(&mongo_config)
            .await
            .expect("Quote repo error");

        // The unique (garageId, quoteRequestId) index backs the
        // one-quote-per-request guarantee.
        if let Err(e) = quote_repo.ensure_indexes().await {
            error!("Failed to ensure quote indexes: {e}");
        }

        let garage_service = Arc::new(GarageServiceImpl::new(garage_repo.clone()));
        let booking_service = Arc::new(BookingServiceImpl::new(booking_repo, garage_repo.clone()));
        let quote_service = Arc::new(QuoteServiceImpl::new(
            request_repo,
            quote_repo,
            garage_repo,
        ));

        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(jwt_config));
        let auth_state = Arc::new(AuthState { jwt_utils });

        let mut app = App {
            config,
            router: Router::new(),
            garage_service,
            booking_service,
            quote_service,
        };
        app.router = app.create_router(auth_state);
        app
    }

    fn create_router(&self, auth_state: Arc<AuthState>) -> Router {
        Router::new()
            .merge(booking_router(self.booking_service.clone(), auth_state.clone()))
            .merge(quote_router(self.quote_service.clone(), auth_state.clone()))
            .merge(garage_router(self.garage_service.clone(), auth_state))
            .route("/health", get(|| async { "OK" }))
    }

    pub async fn start(self) {
        let addr = SocketAddr::new(self.config.host.parse().expect("Invalid host"), self.config.port);
        info!("🚀 Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .expect("Failed to bind address");
        axum::serve(listener, self.router).await.expect("Failed to start server");
    }
}
