//! DTOs del feed de sindicación
//! 
//! El schema del feed es un contrato externo con el canal de advertising:
//! los nombres y formatos de campo son fijos (precio "{price} INR",
//! mileage en km, country "IN", availability "in stock").

use serde::Serialize;
use uuid::Uuid;

use crate::models::listing::ListingStatus;

#[derive(Debug, Serialize, PartialEq)]
pub struct FeedMileage {
    pub value: i32,
    pub unit: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct FeedLocation {
    pub address: String,
    pub city: String,
    pub region: String,
    pub country: String,
}

/// Una entrada del feed por cada listing aprobado
#[derive(Debug, Serialize)]
pub struct FeedEntry {
    pub id: Uuid,
    pub title: String,
    pub link: String,
    pub price: String,
    pub image_link: String,
    pub condition: String,
    pub availability: String,
    pub vehicle_identification_number: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub mileage: FeedMileage,
    pub fuel_type: String,
    pub transmission: String,
    pub color: String,
    pub body_style: String,
    pub additional_image_links: Vec<String>,
    pub seller_name: String,
    pub seller_phone: String,
    pub location: FeedLocation,
}

/// Resumen de exclusión para cada listing no aprobado, para que el dealer
/// vea exactamente por qué un vehículo quedó fuera de la sindicación
#[derive(Debug, Serialize)]
pub struct FeedErrorEntry {
    pub listing_id: Uuid,
    pub vin: String,
    pub status: ListingStatus,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub dealer_id: Uuid,
    pub feed: Vec<FeedEntry>,
    pub errors: Vec<FeedErrorEntry>,
}
