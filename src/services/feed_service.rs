//! Generador del feed de sindicación
//! 
//! Proyecta los listings aprobados de un dealer al schema externo del canal
//! de advertising y particiona el resto en un resumen de exclusiones.
//! Operación de lectura pura: no muta nada y es seguro llamarla con
//! cualquier frecuencia.

use uuid::Uuid;

use crate::config::EnvironmentConfig;
use crate::dto::feed_dto::{FeedEntry, FeedErrorEntry, FeedLocation, FeedMileage, FeedResponse};
use crate::models::listing::{Listing, ListingStatus};
use crate::repositories::listing_repository::ListingRepository;
use crate::utils::errors::AppError;

/// Proyectar un listing aprobado a una entrada del feed
fn project_entry(listing: &Listing, config: &EnvironmentConfig) -> FeedEntry {
    FeedEntry {
        id: listing.id,
        title: format!("{} {} {}", listing.year, listing.make, listing.model),
        link: config.listing_url(&listing.slug),
        price: format!("{} INR", listing.price),
        image_link: listing.primary_image_url.clone(),
        condition: listing.condition.clone(),
        availability: "in stock".to_string(),
        vehicle_identification_number: listing.vin.clone(),
        make: listing.make.clone(),
        model: listing.model.clone(),
        year: listing.year,
        mileage: FeedMileage {
            value: listing.mileage_km,
            unit: "km".to_string(),
        },
        fuel_type: listing.fuel_type.clone(),
        transmission: listing.transmission.clone(),
        color: listing.color.clone(),
        body_style: listing.body_style.clone(),
        additional_image_links: listing.image_urls.clone(),
        seller_name: listing.seller_name.clone(),
        seller_phone: listing.seller_phone.clone(),
        location: FeedLocation {
            address: listing.seller_address.clone(),
            city: listing.city.clone(),
            region: listing.state.clone(),
            country: "IN".to_string(),
        },
    }
}

/// Particionar los listings de un dealer en feed y resumen de exclusiones
pub fn build_feed(
    listings: &[Listing],
    config: &EnvironmentConfig,
) -> (Vec<FeedEntry>, Vec<FeedErrorEntry>) {
    let mut feed = Vec::new();
    let mut errors = Vec::new();

    for listing in listings {
        if listing.status == ListingStatus::Approved {
            feed.push(project_entry(listing, config));
        } else {
            errors.push(FeedErrorEntry {
                listing_id: listing.id,
                vin: listing.vin.clone(),
                status: listing.status,
                errors: listing.validation_errors.clone(),
                warnings: listing.validation_warnings.clone(),
            });
        }
    }

    (feed, errors)
}

pub struct FeedService {
    repository: ListingRepository,
    config: EnvironmentConfig,
}

impl FeedService {
    pub fn new(repository: ListingRepository, config: EnvironmentConfig) -> Self {
        Self { repository, config }
    }

    pub async fn generate(&self, dealer_id: Uuid) -> Result<FeedResponse, AppError> {
        let listings = self.repository.find_by_dealer(dealer_id).await?;
        let (feed, errors) = build_feed(&listings, &self.config);

        Ok(FeedResponse {
            dealer_id,
            feed,
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn test_listing(status: ListingStatus) -> Listing {
        Listing {
            id: Uuid::new_v4(),
            dealer_id: Uuid::new_v4(),
            vin: "MA3ERLF4S00123456".to_string(),
            make: "Maruti Suzuki".to_string(),
            model: "Swift".to_string(),
            year: 2020,
            price: Decimal::from(650_000),
            mileage_km: 35_000,
            condition: "used".to_string(),
            fuel_type: "petrol".to_string(),
            transmission: "manual".to_string(),
            color: "white".to_string(),
            body_style: "hatchback".to_string(),
            description: None,
            primary_image_url: "http://cdn.example.in/a/0.jpg".to_string(),
            image_urls: vec![
                "http://cdn.example.in/a/1.jpg".to_string(),
                "http://cdn.example.in/a/2.jpg".to_string(),
            ],
            slug: "dlx01-maruti-suzuki-swift-a1b2c3d4".to_string(),
            status,
            validation_errors: Vec::new(),
            validation_warnings: vec!["Insufficient data for price comparison".to_string()],
            is_price_outlier: false,
            median_price: None,
            is_duplicate: false,
            duplicate_of_vin: None,
            seller_name: "Swift Motors".to_string(),
            seller_phone: "+919876543210".to_string(),
            seller_address: "12 MG Road".to_string(),
            city: "Pune".to_string(),
            state: "Maharashtra".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_partition_approved_vs_on_hold() {
        let listings = vec![
            test_listing(ListingStatus::Approved),
            test_listing(ListingStatus::Approved),
            test_listing(ListingStatus::OnHold),
        ];
        let (feed, errors) = build_feed(&listings, &EnvironmentConfig::default());
        assert_eq!(feed.len(), 2);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].status, ListingStatus::OnHold);
        assert!(!errors[0].warnings.is_empty());
    }

    #[test]
    fn test_entry_matches_syndication_schema() {
        let mut config = EnvironmentConfig::default();
        config.public_base_url = "https://market.example.in".to_string();

        let listings = vec![test_listing(ListingStatus::Approved)];
        let (feed, _) = build_feed(&listings, &config);
        let entry = &feed[0];

        assert_eq!(entry.title, "2020 Maruti Suzuki Swift");
        assert_eq!(entry.price, "650000 INR");
        assert_eq!(entry.availability, "in stock");
        assert_eq!(
            entry.link,
            "https://market.example.in/listings/dlx01-maruti-suzuki-swift-a1b2c3d4"
        );
        assert_eq!(entry.mileage, FeedMileage { value: 35_000, unit: "km".to_string() });
        assert_eq!(entry.location.country, "IN");
        assert_eq!(entry.location.region, "Maharashtra");
        assert_eq!(entry.additional_image_links.len(), 2);
    }

    #[test]
    fn test_empty_input_yields_empty_feed() {
        let (feed, errors) = build_feed(&[], &EnvironmentConfig::default());
        assert!(feed.is_empty());
        assert!(errors.is_empty());
    }
}
