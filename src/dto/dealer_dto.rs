use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

// Request para registrar un dealer
#[derive(Debug, Deserialize)]
pub struct RegisterDealerRequest {
    pub name: String,
    pub store_code: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub monthly_upload_limit: Option<i32>,
}

// Response de dealer
#[derive(Debug, Serialize)]
pub struct DealerResponse {
    pub id: Uuid,
    pub name: String,
    pub store_code: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub is_active: bool,
    pub monthly_upload_count: i32,
    pub monthly_upload_limit: i32,
    pub quota_reset_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<crate::models::dealer::Dealer> for DealerResponse {
    fn from(dealer: crate::models::dealer::Dealer) -> Self {
        Self {
            id: dealer.id,
            name: dealer.name,
            store_code: dealer.store_code,
            email: dealer.email,
            phone: dealer.phone,
            address: dealer.address,
            city: dealer.city,
            state: dealer.state,
            is_active: dealer.is_active,
            monthly_upload_count: dealer.monthly_upload_count,
            monthly_upload_limit: dealer.monthly_upload_limit,
            quota_reset_at: dealer.quota_reset_at,
            created_at: dealer.created_at,
        }
    }
}

// Conteo de listings por estado para el dashboard del dealer
#[derive(Debug, Default, Serialize)]
pub struct ListingStatusCounts {
    pub pending: i64,
    pub approved: i64,
    pub on_hold: i64,
    pub rejected: i64,
}

// Response del endpoint de cuota
#[derive(Debug, Serialize)]
pub struct QuotaResponse {
    pub dealer_id: Uuid,
    pub monthly_upload_limit: i32,
    pub monthly_upload_count: i32,
    pub remaining: i32,
    pub quota_reset_at: DateTime<Utc>,
    pub listings: ListingStatusCounts,
}

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            data: None,
        }
    }
}
