//! Orquestador de ingesta de listings
//! 
//! Secuencia los validadores (VIN -> precio -> imágenes), y sólo cuando la
//! submission pasa estructuralmente sube los assets, asigna el estado de
//! ciclo de vida y persiste el listing, el incremento de cuota y el reporte
//! de validación en una misma transacción. Cualquier fallo estructural
//! aborta ANTES de cualquier efecto: nada se escribe, nada se sube.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::listing_dto::{
    BatchItemResult, BatchSubmitRequest, BatchSubmitResponse, SubmissionResponse,
    SubmitListingRequest,
};
use crate::models::dealer::Dealer;
use crate::models::listing::{Listing, ListingStatus};
use crate::models::validation_report::ValidationReport;
use crate::repositories::dealer_repository::DealerRepository;
use crate::repositories::listing_repository::ListingRepository;
use crate::repositories::report_repository::ReportRepository;
use crate::services::image_service::{ImageCheck, ImagePolicy, ImageService};
use crate::services::price_service::{PriceCheck, PriceService};
use crate::services::vin_service::{VinCheck, VinPolicy, VinService};
use crate::storage::{listing_image_path, AssetStorage};
use crate::utils::errors::AppError;
use crate::utils::slug::listing_slug;
use crate::utils::validation as field;

/// Mínimo de imágenes (primaria + adicionales) por submission
pub const MIN_IMAGES: usize = 3;

/// Umbral de warnings por encima del cual un listing pasa a revisión manual.
/// Todas las categorías de warning cuentan igual contra este umbral.
pub const REVIEW_WARNING_THRESHOLD: usize = 2;

/// Asignación del estado de ciclo de vida tras pasar la validación
/// estructural. Llegar aquí con errores es imposible por construcción:
/// un error fatal ya habría abortado la submission.
pub fn determine_status(
    is_price_outlier: bool,
    is_duplicate: bool,
    warning_count: usize,
) -> ListingStatus {
    if is_price_outlier || is_duplicate || warning_count > REVIEW_WARNING_THRESHOLD {
        ListingStatus::OnHold
    } else {
        ListingStatus::Approved
    }
}

pub struct IngestionService {
    pool: PgPool,
    storage: Arc<dyn AssetStorage>,
    vin_service: VinService,
    price_service: PriceService,
    image_service: ImageService,
}

impl IngestionService {
    pub fn new(
        pool: PgPool,
        storage: Arc<dyn AssetStorage>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            vin_service: VinService::new(ListingRepository::new(pool.clone()), VinPolicy::default()),
            price_service: PriceService::new(ListingRepository::new(pool.clone())),
            image_service: ImageService::new(http_client, ImagePolicy::default()),
            pool,
            storage,
        }
    }

    /// Quick add: ingesta de una submission individual
    pub async fn submit(
        &self,
        request: SubmitListingRequest,
    ) -> Result<SubmissionResponse, AppError> {
        // Campos requeridos y mínimo de imágenes, antes de tocar nada
        let structural_errors = check_required_fields(&request);
        if !structural_errors.is_empty() {
            return Err(AppError::SubmissionRejected(structural_errors));
        }

        let dealer = self.load_active_dealer(request.dealer_id).await?;

        // Check de cuota previo; la garantía real es el incremento
        // condicional dentro de la transacción de persistencia
        if dealer.remaining_quota() == 0 {
            return Err(AppError::QuotaExceeded);
        }

        // Paso 1: VIN. Un fallo estructural aborta sin persistir ni subir.
        let vin_check = self.vin_service.validate(dealer.id, &request.vin).await?;
        if !vin_check.is_valid {
            return Err(AppError::SubmissionRejected(vin_check.errors));
        }

        // Paso 2: precio. No fatal por contrato, sólo agrega warnings.
        let price_check = self
            .price_service
            .evaluate(&request.make, &request.model, request.year, request.price)
            .await?;

        // Paso 3: imágenes. Los errores fatales se acumulan y cualquiera
        // aborta la submission completa: no hay aceptación parcial.
        let mut image_errors = Vec::new();
        let mut images = Vec::new();

        match self.image_service.validate_payload(&request.primary_image).await {
            Ok(validated) => images.push(validated),
            Err(e) => image_errors.push(format!("primary image: {}", e)),
        }
        for (i, payload) in request.additional_images.iter().enumerate() {
            match self.image_service.validate_payload(payload).await {
                Ok(validated) => images.push(validated),
                Err(e) => image_errors.push(format!("additional image {}: {}", i + 1, e)),
            }
        }
        if !image_errors.is_empty() {
            return Err(AppError::SubmissionRejected(image_errors));
        }

        // Paso 4: sólo con todo estructuralmente válido se genera la
        // identidad y se suben los assets. Los paths son deterministas
        // respecto al id, así que un reintento sobrescribe sin duplicar.
        let listing_id = Uuid::new_v4();
        let mut image_urls = Vec::with_capacity(images.len());
        for (index, (bytes, check)) in images.iter().enumerate() {
            let path = listing_image_path(dealer.id, listing_id, index, &check.extension);
            let url = self
                .storage
                .store(bytes.clone(), &path)
                .await
                .map_err(|e| AppError::StorageError(e.to_string()))?;
            image_urls.push(url);
        }
        let primary_image_url = image_urls[0].clone();
        let additional_image_urls = image_urls[1..].to_vec();

        let slug = listing_slug(&dealer.store_code, &request.make, &request.model, listing_id);

        // Paso 5: estado de ciclo de vida a partir de los hallazgos
        let mut warnings = Vec::new();
        warnings.extend(vin_check.warnings.iter().cloned());
        warnings.extend(price_check.warnings.iter().cloned());
        for (_, check) in &images {
            warnings.extend(check.warnings.iter().cloned());
        }
        let status = determine_status(
            price_check.is_outlier,
            vin_check.is_duplicate,
            warnings.len(),
        );

        let listing = Listing {
            id: listing_id,
            dealer_id: dealer.id,
            vin: vin_check.normalized_vin.clone(),
            make: request.make.clone(),
            model: request.model.clone(),
            year: request.year,
            price: request.price,
            mileage_km: request.mileage_km,
            condition: request.condition.clone(),
            fuel_type: request.fuel_type.clone(),
            transmission: request.transmission.clone(),
            color: request.color.clone(),
            body_style: request.body_style.clone(),
            description: request.description.clone(),
            primary_image_url,
            image_urls: additional_image_urls,
            slug: slug.clone(),
            status,
            validation_errors: Vec::new(),
            validation_warnings: warnings.clone(),
            is_price_outlier: price_check.is_outlier,
            median_price: price_check.median_price,
            is_duplicate: vin_check.is_duplicate,
            duplicate_of_vin: vin_check.duplicate_of_vin.clone(),
            seller_name: dealer.name.clone(),
            seller_phone: dealer.phone.clone(),
            seller_address: dealer.address.clone(),
            city: request.city.clone(),
            state: request.state.clone(),
            created_at: chrono::Utc::now(),
        };

        let image_checks: Vec<&ImageCheck> = images.iter().map(|(_, c)| c).collect();
        let report = ValidationReport::new(
            listing_id,
            dealer.id,
            (2 + images.len()) as i32,
            warnings.len() as i32,
            report_detail(&vin_check, &price_check, &image_checks),
            status == ListingStatus::OnHold,
        );

        // Pasos 6-7: listing, incremento condicional de cuota y reporte en
        // una sola transacción. Cuota llena aquí revierte el insert.
        self.persist(&listing, &report, dealer.id).await?;

        info!(
            "📥 Listing {} ingresado para dealer {} con estado {:?} ({} warnings)",
            listing_id,
            dealer.store_code,
            status,
            warnings.len()
        );

        Ok(SubmissionResponse {
            listing_id,
            slug,
            status,
            warnings,
        })
    }

    /// Batch: procesa cada submission por el mismo pipeline; el fallo
    /// estructural de un ítem no aborta el resto del lote
    pub async fn submit_batch(&self, request: BatchSubmitRequest) -> BatchSubmitResponse {
        let total = request.submissions.len();
        let mut results = Vec::with_capacity(total);
        let mut accepted = 0;

        for (index, submission) in request.submissions.into_iter().enumerate() {
            match self.submit(submission).await {
                Ok(response) => {
                    accepted += 1;
                    results.push(BatchItemResult {
                        index,
                        success: true,
                        listing_id: Some(response.listing_id),
                        slug: Some(response.slug),
                        status: Some(response.status),
                        errors: Vec::new(),
                        warnings: response.warnings,
                    });
                }
                Err(AppError::SubmissionRejected(errors)) => {
                    results.push(BatchItemResult {
                        index,
                        success: false,
                        listing_id: None,
                        slug: None,
                        status: None,
                        errors,
                        warnings: Vec::new(),
                    });
                }
                Err(other) => {
                    warn!("Batch item {} failed: {}", index, other);
                    results.push(BatchItemResult {
                        index,
                        success: false,
                        listing_id: None,
                        slug: None,
                        status: None,
                        errors: vec![other.to_string()],
                        warnings: Vec::new(),
                    });
                }
            }
        }

        BatchSubmitResponse {
            total,
            accepted,
            rejected: total - accepted,
            results,
        }
    }

    async fn load_active_dealer(&self, dealer_id: Uuid) -> Result<Dealer, AppError> {
        let repository = DealerRepository::new(self.pool.clone());
        let dealer = repository
            .find_by_id(dealer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Dealer not found".to_string()))?;

        if !dealer.is_active {
            return Err(AppError::Forbidden(
                "Dealer account is not active".to_string(),
            ));
        }

        repository.roll_quota_window(dealer).await
    }

    async fn persist(
        &self,
        listing: &Listing,
        report: &ValidationReport,
        dealer_id: Uuid,
    ) -> Result<(), AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::IngestionFailed(format!("could not open transaction: {}", e)))?;

        ListingRepository::insert_in(&mut *tx, listing)
            .await
            .map_err(as_ingestion_failure)?;

        let incremented = DealerRepository::increment_quota_in(&mut *tx, dealer_id)
            .await
            .map_err(as_ingestion_failure)?;
        if !incremented {
            // rollback implícito al soltar la transacción sin commit
            return Err(AppError::QuotaExceeded);
        }

        ReportRepository::insert_in(&mut *tx, report)
            .await
            .map_err(as_ingestion_failure)?;

        tx.commit()
            .await
            .map_err(|e| AppError::IngestionFailed(format!("could not commit ingestion: {}", e)))?;

        Ok(())
    }
}

/// En los pasos de persistencia, un error de base de datos se reporta como
/// fallo genérico de ingesta: los datos eran válidos, el sistema falló
fn as_ingestion_failure(e: AppError) -> AppError {
    match e {
        AppError::DatabaseError(msg) => AppError::IngestionFailed(msg),
        other => other,
    }
}

fn check_required_fields(request: &SubmitListingRequest) -> Vec<String> {
    let mut errors = Vec::new();

    let required = [
        ("vin", &request.vin),
        ("make", &request.make),
        ("model", &request.model),
        ("condition", &request.condition),
        ("fuel_type", &request.fuel_type),
        ("transmission", &request.transmission),
        ("color", &request.color),
        ("body_style", &request.body_style),
        ("city", &request.city),
        ("state", &request.state),
    ];
    for (name, value) in required {
        if field::validate_not_empty(value).is_err() {
            errors.push(format!("{} is required", name));
        }
    }

    if field::validate_model_year(request.year).is_err() {
        errors.push(format!("year {} is out of range", request.year));
    }
    if field::validate_positive(request.price).is_err() {
        errors.push("price must be greater than zero".to_string());
    }
    if field::validate_non_negative(request.mileage_km).is_err() {
        errors.push("mileage_km must not be negative".to_string());
    }
    if request.image_count() < MIN_IMAGES {
        errors.push(format!(
            "at least {} images are required, got {}",
            MIN_IMAGES,
            request.image_count()
        ));
    }

    errors
}

fn report_detail(
    vin: &VinCheck,
    price: &PriceCheck,
    images: &[&ImageCheck],
) -> serde_json::Value {
    serde_json::json!({
        "vin": {
            "normalized": vin.normalized_vin,
            "is_duplicate": vin.is_duplicate,
            "duplicate_of_vin": vin.duplicate_of_vin,
            "warnings": vin.warnings,
        },
        "price": {
            "median_price": price.median_price,
            "ratio": price.ratio,
            "is_outlier": price.is_outlier,
            "comparables_count": price.comparables_count,
            "warnings": price.warnings,
        },
        "images": {
            "count": images.len(),
            "checks": images.iter().enumerate().map(|(index, check)| {
                serde_json::json!({
                    "index": index,
                    "width": check.width,
                    "height": check.height,
                    "extension": check.extension,
                    "warnings": check.warnings,
                })
            }).collect::<Vec<_>>(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::listing_dto::ImagePayload;
    use rust_decimal::Decimal;

    #[test]
    fn test_clean_submission_is_approved() {
        assert_eq!(determine_status(false, false, 0), ListingStatus::Approved);
        assert_eq!(determine_status(false, false, 2), ListingStatus::Approved);
    }

    #[test]
    fn test_outlier_goes_on_hold() {
        assert_eq!(determine_status(true, false, 1), ListingStatus::OnHold);
    }

    #[test]
    fn test_duplicate_goes_on_hold() {
        assert_eq!(determine_status(false, true, 1), ListingStatus::OnHold);
    }

    #[test]
    fn test_warning_threshold_is_strict() {
        assert_eq!(determine_status(false, false, 3), ListingStatus::OnHold);
    }

    fn minimal_request(images: usize) -> SubmitListingRequest {
        let payload = ImagePayload {
            file_name: None,
            data: Some("aGVsbG8=".to_string()),
            url: None,
        };
        SubmitListingRequest {
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
            city: "Pune".to_string(),
            state: "Maharashtra".to_string(),
            description: None,
            primary_image: payload.clone(),
            additional_images: vec![payload; images.saturating_sub(1)],
        }
    }

    #[test]
    fn test_two_images_fail_required_fields() {
        let errors = check_required_fields(&minimal_request(2));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("at least 3 images"));
    }

    #[test]
    fn test_three_images_pass_required_fields() {
        assert!(check_required_fields(&minimal_request(3)).is_empty());
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let mut request = minimal_request(3);
        request.make = String::new();
        request.color = "  ".to_string();
        request.price = Decimal::ZERO;
        let errors = check_required_fields(&request);
        assert_eq!(errors.len(), 3);
    }
}
