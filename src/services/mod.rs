//! Services module
//! 
//! Este módulo contiene la lógica de negocio del pipeline de ingesta:
//! validadores de VIN, precio e imágenes, el orquestador que los secuencia
//! y el generador del feed de sindicación.

pub mod feed_service;
pub mod image_service;
pub mod ingestion_service;
pub mod price_service;
pub mod vin_service;
