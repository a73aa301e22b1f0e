//! Detección de outliers de precio
//! 
//! Compara el precio propuesto contra la mediana de los comparables
//! aprobados (misma marca, modelo y año exactos). Este detector sólo
//! agrega warnings: nunca aborta una submission.

use rust_decimal::Decimal;

use crate::repositories::listing_repository::ListingRepository;
use crate::utils::errors::AppError;

/// Mínimo de comparables aprobados para calcular una mediana
pub const MIN_COMPARABLES: usize = 3;

/// Ratio precio/mediana por encima del cual el precio se marca como outlier.
/// La desigualdad es estricta: un ratio de exactamente 1.5 no marca.
pub fn outlier_ratio() -> Decimal {
    Decimal::new(15, 1)
}

/// Ratio por debajo del cual se sugiere un posible error de precio
/// (warning no bloqueante, sin marcar el flag de outlier)
pub fn underprice_ratio() -> Decimal {
    Decimal::new(5, 1)
}

/// Resultado de la evaluación de precio de una submission
#[derive(Debug, Clone)]
pub struct PriceCheck {
    pub median_price: Option<Decimal>,
    pub ratio: Option<Decimal>,
    pub is_outlier: bool,
    pub comparables_count: usize,
    pub warnings: Vec<String>,
}

/// Mediana estándar: promedio de los dos valores centrales con cuenta par,
/// el valor central con cuenta impar. Precondición: `prices` no vacío.
pub fn median_price(prices: &[Decimal]) -> Decimal {
    let mut sorted = prices.to_vec();
    sorted.sort();

    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / Decimal::from(2)
    }
}

/// Evaluar un precio contra un conjunto de precios comparables
pub fn assess_price(price: Decimal, comparables: &[Decimal]) -> PriceCheck {
    if comparables.len() < MIN_COMPARABLES {
        return PriceCheck {
            median_price: None,
            ratio: None,
            is_outlier: false,
            comparables_count: comparables.len(),
            warnings: vec![
                "Insufficient data for price comparison - flagged for review".to_string(),
            ],
        };
    }

    let median = median_price(comparables);
    let ratio = price / median;
    let mut warnings = Vec::new();
    let mut is_outlier = false;

    if ratio > outlier_ratio() {
        is_outlier = true;
        let percent_above = ((ratio - Decimal::ONE) * Decimal::from(100)).round_dp(1);
        warnings.push(format!(
            "Price is {}% above the median of {} comparable approved listings",
            percent_above,
            comparables.len()
        ));
    } else if ratio < underprice_ratio() {
        warnings.push(
            "Price is less than half the comparable median - possible pricing error".to_string(),
        );
    }

    PriceCheck {
        median_price: Some(median),
        ratio: Some(ratio),
        is_outlier,
        comparables_count: comparables.len(),
        warnings,
    }
}

pub struct PriceService {
    repository: ListingRepository,
}

impl PriceService {
    pub fn new(repository: ListingRepository) -> Self {
        Self { repository }
    }

    pub async fn evaluate(
        &self,
        make: &str,
        model: &str,
        year: i32,
        price: Decimal,
    ) -> Result<PriceCheck, AppError> {
        let comparables = self
            .repository
            .approved_comparable_prices(make, model, year)
            .await?;

        Ok(assess_price(price, &comparables))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn test_median_odd_count() {
        let prices = vec![dec(500_000), dec(700_000), dec(600_000)];
        assert_eq!(median_price(&prices), dec(600_000));
    }

    #[test]
    fn test_median_even_count() {
        let prices = vec![dec(400_000), dec(800_000), dec(500_000), dec(700_000)];
        assert_eq!(median_price(&prices), dec(600_000));
    }

    #[test]
    fn test_insufficient_comparables_degrades_to_warning() {
        let check = assess_price(dec(650_000), &[dec(600_000), dec(620_000)]);
        assert!(check.median_price.is_none());
        assert!(check.ratio.is_none());
        assert!(!check.is_outlier);
        assert_eq!(check.warnings.len(), 1);
        assert!(check.warnings[0].contains("Insufficient data"));
    }

    #[test]
    fn test_ratio_above_threshold_is_outlier() {
        let comparables = vec![dec(600_000), dec(600_000), dec(600_000)];
        let check = assess_price(dec(950_000), &comparables);
        assert!(check.is_outlier);
        assert!(check.warnings[0].contains("above the median"));
    }

    #[test]
    fn test_ratio_exactly_threshold_is_not_outlier() {
        // 900000 / 600000 = 1.5 exacto: la desigualdad es estricta
        let comparables = vec![dec(600_000), dec(600_000), dec(600_000)];
        let check = assess_price(dec(900_000), &comparables);
        assert!(!check.is_outlier);
        assert!(check.warnings.is_empty());
    }

    #[test]
    fn test_underpriced_warns_without_outlier_flag() {
        let comparables = vec![dec(600_000), dec(600_000), dec(600_000)];
        let check = assess_price(dec(250_000), &comparables);
        assert!(!check.is_outlier);
        assert_eq!(check.warnings.len(), 1);
        assert!(check.warnings[0].contains("possible pricing error"));
    }

    #[test]
    fn test_swift_scenario_no_outlier() {
        // 5 comparables con mediana 600000, precio 650000 -> ratio 1.083
        let comparables = vec![
            dec(580_000),
            dec(590_000),
            dec(600_000),
            dec(610_000),
            dec(650_000),
        ];
        let check = assess_price(dec(650_000), &comparables);
        assert_eq!(check.median_price, Some(dec(600_000)));
        assert!(!check.is_outlier);
        assert!(check.warnings.is_empty());
    }
}
