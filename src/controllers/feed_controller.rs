use crate::config::EnvironmentConfig;
use crate::dto::feed_dto::FeedResponse;
use crate::repositories::dealer_repository::DealerRepository;
use crate::repositories::listing_repository::ListingRepository;
use crate::services::feed_service::FeedService;
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct FeedController {
    dealers: DealerRepository,
    service: FeedService,
}

impl FeedController {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            dealers: DealerRepository::new(pool.clone()),
            service: FeedService::new(ListingRepository::new(pool), config),
        }
    }

    /// Generar el feed de sindicación de un dealer. Lectura pura.
    pub async fn generate(&self, dealer_id: Uuid) -> Result<FeedResponse, AppError> {
        self.dealers
            .find_by_id(dealer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Dealer not found".to_string()))?;

        self.service.generate(dealer_id).await
    }
}
