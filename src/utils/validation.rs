//! Utilidades de validación
//! 
//! Este módulo contiene funciones helper para validación de campos
//! de las submissions y registros de dealers.

use validator::ValidationError;
use serde::Serialize;

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar longitud mínima y máxima
pub fn validate_length(value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min || len > max {
        let mut error = ValidationError::new("length");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &len);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor esté en un rango específico
pub fn validate_range<T: PartialOrd + std::fmt::Display + serde::Serialize>(
    value: T,
    min: T,
    max: T,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        let mut error = ValidationError::new("range");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar formato de email
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    if !value.contains('@') || !value.contains('.') {
        let mut error = ValidationError::new("email");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de teléfono (básico)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let clean_phone = value.chars().filter(|c| c.is_digit(10)).collect::<String>();
    if clean_phone.len() < 10 || clean_phone.len() > 15 {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar año de fabricación de un vehículo
pub fn validate_model_year(year: i32) -> Result<(), ValidationError> {
    // Primeros vehículos catalogables ~1950; margen de un año para
    // modelos del año siguiente ya anunciados
    let current_year = chrono::Utc::now().format("%Y").to_string().parse::<i32>().unwrap_or(2026);
    if year < 1950 || year > current_year + 1 {
        let mut error = ValidationError::new("model_year");
        error.add_param("value".into(), &year);
        return Err(error);
    }
    Ok(())
}

/// Validar código de tienda de un dealer (alfanumérico corto)
pub fn validate_store_code(value: &str) -> Result<(), ValidationError> {
    let clean = value.trim();
    if clean.len() < 3 || clean.len() > 20 || !clean.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        let mut error = ValidationError::new("store_code");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Swift").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_length() {
        let value = "test";
        assert!(validate_length(value, 1, 10).is_ok());
        assert!(validate_length(value, 5, 10).is_err());
        assert!(validate_length(value, 1, 3).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range(5, 1, 10).is_ok());
        assert!(validate_range(0, 1, 10).is_err());
        assert!(validate_range(15, 1, 10).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("dealer@example.in").is_ok());
        assert!(validate_email("invalid-email").is_err());
        assert!(validate_email("dealer@").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+91 98765 43210").is_ok());
        assert!(validate_phone("123").is_err());
        assert!(validate_phone("1234567890123456").is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(650000).is_ok());
        assert!(validate_positive(0).is_err());
        assert!(validate_positive(-5).is_err());
    }

    #[test]
    fn test_validate_model_year() {
        assert!(validate_model_year(2020).is_ok());
        assert!(validate_model_year(1949).is_err());
        assert!(validate_model_year(2090).is_err());
    }

    #[test]
    fn test_validate_store_code() {
        assert!(validate_store_code("DLX-01").is_ok());
        assert!(validate_store_code("ab").is_err());
        assert!(validate_store_code("bad code!").is_err());
    }
}
