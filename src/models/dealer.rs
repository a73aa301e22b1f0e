//! Modelo de Dealer
//! 
//! Este módulo contiene el struct Dealer y sus variantes.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.
//! El dealer lleva el contador mensual de uploads y su límite;
//! el contador sólo se incrementa junto con la persistencia de un listing.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use uuid::Uuid;

/// Dealer principal - mapea exactamente a la tabla dealers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Dealer {
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

impl Dealer {
    pub fn new(
        name: String,
        store_code: String,
        email: String,
        phone: String,
        address: String,
        city: String,
        state: String,
        monthly_upload_limit: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            store_code,
            email,
            phone,
            address,
            city,
            state,
            is_active: true,
            monthly_upload_count: 0,
            monthly_upload_limit,
            quota_reset_at: next_month_start(now),
            created_at: now,
        }
    }

    /// Cuota restante del mes en curso
    pub fn remaining_quota(&self) -> i32 {
        (self.monthly_upload_limit - self.monthly_upload_count).max(0)
    }
}

/// Primer instante del mes siguiente, en UTC
pub fn next_month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let (year, month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_month_start_rolls_over_december() {
        let dec = Utc.with_ymd_and_hms(2025, 12, 15, 10, 30, 0).unwrap();
        assert_eq!(next_month_start(dec), Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_next_month_start_mid_year() {
        let aug = Utc.with_ymd_and_hms(2026, 8, 7, 0, 0, 0).unwrap();
        assert_eq!(next_month_start(aug), Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_remaining_quota_never_negative() {
        let mut dealer = Dealer::new(
            "Swift Motors".into(), "DLX01".into(), "s@m.in".into(),
            "+919876543210".into(), "12 MG Road".into(), "Pune".into(),
            "Maharashtra".into(), 100,
        );
        dealer.monthly_upload_count = 120;
        assert_eq!(dealer.remaining_quota(), 0);
    }
}
