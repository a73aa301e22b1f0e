//! Modelo de Listing
//! 
//! Este módulo contiene el struct Listing (vehicle record) con sus campos
//! identificativos, comerciales, de assets y de metadata de validación.
//! Mapea exactamente a la tabla listings.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use rust_decimal::Decimal;

/// Estado de ciclo de vida de un listing - mapea al ENUM listing_status
///
/// El pipeline de ingesta sólo escribe `approved` y `on_hold`;
/// `rejected` queda reservado para transiciones aplicadas por moderación.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "listing_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Pending,
    Approved,
    OnHold,
    Rejected,
}

impl ListingStatus {
    /// Transiciones válidas fuera del pipeline de ingesta (moderación)
    pub fn can_transition_to(self, target: ListingStatus) -> bool {
        use ListingStatus::*;
        match (self, target) {
            (_, t) if self == t => false,
            (Rejected, _) => false,
            (Pending, Approved) | (Pending, OnHold) | (Pending, Rejected) => true,
            (Approved, OnHold) | (Approved, Rejected) => true,
            (OnHold, Approved) | (OnHold, Rejected) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Pending => "pending",
            ListingStatus::Approved => "approved",
            ListingStatus::OnHold => "on_hold",
            ListingStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for ListingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ListingStatus::Pending),
            "approved" => Ok(ListingStatus::Approved),
            "on_hold" => Ok(ListingStatus::OnHold),
            "rejected" => Ok(ListingStatus::Rejected),
            other => Err(format!("unknown listing status '{}'", other)),
        }
    }
}

/// Listing principal - mapea exactamente a la tabla listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Listing {
    pub id: Uuid,
    pub dealer_id: Uuid,
    // Campos identificativos
    pub vin: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    // Campos comerciales
    pub price: Decimal,
    pub mileage_km: i32,
    pub condition: String,
    pub fuel_type: String,
    pub transmission: String,
    pub color: String,
    pub body_style: String,
    pub description: Option<String>,
    // Assets
    pub primary_image_url: String,
    pub image_urls: Vec<String>,
    // Campos generados
    pub slug: String,
    pub status: ListingStatus,
    // Metadata de validación
    pub validation_errors: Vec<String>,
    pub validation_warnings: Vec<String>,
    pub is_price_outlier: bool,
    pub median_price: Option<Decimal>,
    pub is_duplicate: bool,
    pub duplicate_of_vin: Option<String>,
    // Contacto/ubicación copiados del dealer al momento de la submission
    pub seller_name: String,
    pub seller_phone: String,
    pub seller_address: String,
    pub city: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_is_terminal() {
        assert!(!ListingStatus::Rejected.can_transition_to(ListingStatus::Approved));
        assert!(!ListingStatus::Rejected.can_transition_to(ListingStatus::OnHold));
    }

    #[test]
    fn test_on_hold_can_be_approved_or_rejected() {
        assert!(ListingStatus::OnHold.can_transition_to(ListingStatus::Approved));
        assert!(ListingStatus::OnHold.can_transition_to(ListingStatus::Rejected));
        assert!(!ListingStatus::OnHold.can_transition_to(ListingStatus::OnHold));
    }

    #[test]
    fn test_status_round_trip() {
        for s in ["pending", "approved", "on_hold", "rejected"] {
            let parsed: ListingStatus = s.parse().unwrap();
            assert_eq!(parsed.as_str(), s);
        }
        assert!("published".parse::<ListingStatus>().is_err());
    }
}
