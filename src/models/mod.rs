//! Modelos del sistema
//! 
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod dealer;
pub mod listing;
pub mod validation_report;
