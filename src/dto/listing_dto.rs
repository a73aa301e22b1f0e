//! DTOs de submissions de listings
//! 
//! El "quick add" recibe el vehículo completo en un solo JSON, con las
//! imágenes como payloads base64 o como URLs remotas. El batch recibe una
//! lista de submissions y devuelve un resultado por ítem.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use rust_decimal::Decimal;

use crate::models::listing::{Listing, ListingStatus};

/// Payload de imagen: buffer en base64 o URL remota (exactamente uno)
#[derive(Debug, Clone, Deserialize)]
pub struct ImagePayload {
    pub file_name: Option<String>,
    /// Contenido binario codificado en base64
    pub data: Option<String>,
    /// URL remota desde la que descargar la imagen
    pub url: Option<String>,
}

// Request de submission individual (quick add)
#[derive(Debug, Deserialize)]
pub struct SubmitListingRequest {
    pub dealer_id: Uuid,
    pub vin: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: Decimal,
    pub mileage_km: i32,
    pub condition: String,
    pub fuel_type: String,
    pub transmission: String,
    pub color: String,
    pub body_style: String,
    pub city: String,
    pub state: String,
    pub description: Option<String>,
    pub primary_image: ImagePayload,
    #[serde(default)]
    pub additional_images: Vec<ImagePayload>,
}

impl SubmitListingRequest {
    /// Total de imágenes de la submission (primaria + adicionales)
    pub fn image_count(&self) -> usize {
        1 + self.additional_images.len()
    }
}

// Request de submission por lotes
#[derive(Debug, Deserialize)]
pub struct BatchSubmitRequest {
    pub submissions: Vec<SubmitListingRequest>,
}

// Response de una submission aceptada
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub listing_id: Uuid,
    pub slug: String,
    pub status: ListingStatus,
    pub warnings: Vec<String>,
}

// Resultado por ítem de un batch: o bien aceptado, o bien la lista de
// errores estructurales de ese ítem (el batch continúa con el resto)
#[derive(Debug, Serialize)]
pub struct BatchItemResult {
    pub index: usize,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ListingStatus>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchSubmitResponse {
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub results: Vec<BatchItemResult>,
}

// Request de moderación para transicionar el estado de un listing
#[derive(Debug, Deserialize)]
pub struct UpdateListingStatusRequest {
    pub status: ListingStatus,
    pub notes: Option<String>,
}

// Response de listing para la API
#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub id: Uuid,
    pub dealer_id: Uuid,
    pub vin: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: Decimal,
    pub mileage_km: i32,
    pub condition: String,
    pub fuel_type: String,
    pub transmission: String,
    pub color: String,
    pub body_style: String,
    pub description: Option<String>,
    pub primary_image_url: String,
    pub image_urls: Vec<String>,
    pub slug: String,
    pub status: ListingStatus,
    pub is_price_outlier: bool,
    pub median_price: Option<Decimal>,
    pub is_duplicate: bool,
    pub duplicate_of_vin: Option<String>,
    pub warnings: Vec<String>,
    pub city: String,
    pub state: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Listing> for ListingResponse {
    fn from(listing: Listing) -> Self {
        Self {
            id: listing.id,
            dealer_id: listing.dealer_id,
            vin: listing.vin,
            make: listing.make,
            model: listing.model,
            year: listing.year,
            price: listing.price,
            mileage_km: listing.mileage_km,
            condition: listing.condition,
            fuel_type: listing.fuel_type,
            transmission: listing.transmission,
            color: listing.color,
            body_style: listing.body_style,
            description: listing.description,
            primary_image_url: listing.primary_image_url,
            image_urls: listing.image_urls,
            slug: listing.slug,
            status: listing.status,
            is_price_outlier: listing.is_price_outlier,
            median_price: listing.median_price,
            is_duplicate: listing.is_duplicate,
            duplicate_of_vin: listing.duplicate_of_vin,
            warnings: listing.validation_warnings,
            city: listing.city,
            state: listing.state,
            created_at: listing.created_at,
        }
    }
}
