//! Validación de VIN y detección de duplicados
//! 
//! El VIN se normaliza (mayúsculas, sin espacios) y se valida contra una
//! política estructural configurable. Un VIN inválido aborta la submission;
//! un VIN duplicado del mismo dealer NO la bloquea: re-subir tras una edición
//! es habitual, así que el duplicado degrada a material de revisión manual.

use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use crate::repositories::listing_repository::ListingRepository;
use crate::utils::errors::AppError;

pub const VIN_LENGTH: usize = 17;

lazy_static! {
    // Charset VIN: alfanumérico sin I, O ni Q (evita confusión con 1 y 0)
    static ref VIN_CHARSET: Regex = Regex::new(r"^[A-HJ-NPR-Z0-9]+$").unwrap();
}

/// Política estructural de VIN.
/// 
/// El dígito de control ISO 3779 (posición 9) sólo aplica en mercados que lo
/// adoptaron (Norteamérica); los VIN del mercado indio no lo llevan, así que
/// por defecto queda desactivado y se valida longitud + charset.
#[derive(Debug, Clone)]
pub struct VinPolicy {
    pub length: usize,
    pub enforce_check_digit: bool,
}

impl Default for VinPolicy {
    fn default() -> Self {
        Self {
            length: VIN_LENGTH,
            enforce_check_digit: false,
        }
    }
}

/// Resultado de la validación de VIN de una submission
#[derive(Debug, Clone)]
pub struct VinCheck {
    pub normalized_vin: String,
    pub is_valid: bool,
    pub is_duplicate: bool,
    pub duplicate_of_vin: Option<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Normalizar un VIN: mayúsculas y sin whitespace interno ni externo
pub fn normalize_vin(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Validar la estructura de un VIN ya normalizado contra la política.
/// Devuelve la lista de errores (vacía si es válido).
pub fn check_vin_format(vin: &str, policy: &VinPolicy) -> Vec<String> {
    let mut errors = Vec::new();

    if vin.len() != policy.length {
        errors.push(format!(
            "Invalid VIN format: expected {} characters, got {}",
            policy.length,
            vin.len()
        ));
        return errors;
    }

    if !VIN_CHARSET.is_match(vin) {
        errors.push(
            "Invalid VIN format: only alphanumeric characters excluding I, O and Q are allowed"
                .to_string(),
        );
        return errors;
    }

    if policy.enforce_check_digit {
        if let Some(expected) = compute_check_digit(vin) {
            let actual = vin.chars().nth(8).unwrap_or(' ');
            if actual != expected {
                errors.push(format!(
                    "Invalid VIN check digit: expected '{}', got '{}'",
                    expected, actual
                ));
            }
        }
    }

    errors
}

/// Dígito de control ISO 3779: transliteración ponderada módulo 11
fn compute_check_digit(vin: &str) -> Option<char> {
    const WEIGHTS: [u32; 17] = [8, 7, 6, 5, 4, 3, 2, 10, 0, 9, 8, 7, 6, 5, 4, 3, 2];

    let mut sum = 0u32;
    for (i, c) in vin.chars().enumerate() {
        let value = transliterate(c)?;
        sum += value * WEIGHTS.get(i)?;
    }

    let remainder = sum % 11;
    Some(if remainder == 10 {
        'X'
    } else {
        char::from_digit(remainder, 10)?
    })
}

fn transliterate(c: char) -> Option<u32> {
    match c {
        '0'..='9' => c.to_digit(10),
        'A' | 'J' => Some(1),
        'B' | 'K' | 'S' => Some(2),
        'C' | 'L' | 'T' => Some(3),
        'D' | 'M' | 'U' => Some(4),
        'E' | 'N' | 'V' => Some(5),
        'F' | 'W' => Some(6),
        'G' | 'P' | 'X' => Some(7),
        'H' | 'Y' => Some(8),
        'R' | 'Z' => Some(9),
        _ => None,
    }
}

pub struct VinService {
    repository: ListingRepository,
    policy: VinPolicy,
}

impl VinService {
    pub fn new(repository: ListingRepository, policy: VinPolicy) -> Self {
        Self { repository, policy }
    }

    /// Validar el VIN de una submission y detectar duplicados del dealer.
    /// Un fallo estructural deja `is_valid = false` y NO consulta duplicados.
    pub async fn validate(&self, dealer_id: Uuid, raw_vin: &str) -> Result<VinCheck, AppError> {
        let normalized = normalize_vin(raw_vin);
        let errors = check_vin_format(&normalized, &self.policy);

        if !errors.is_empty() {
            return Ok(VinCheck {
                normalized_vin: normalized,
                is_valid: false,
                is_duplicate: false,
                duplicate_of_vin: None,
                errors,
                warnings: Vec::new(),
            });
        }

        let mut warnings = Vec::new();
        let duplicate = self.repository.find_duplicate(dealer_id, &normalized).await?;
        let (is_duplicate, duplicate_of_vin) = match duplicate {
            Some(prior) => {
                warnings.push(format!(
                    "Duplicate VIN: an earlier listing with VIN {} already exists for this dealer",
                    prior.vin
                ));
                (true, Some(prior.vin))
            }
            None => (false, None),
        };

        Ok(VinCheck {
            normalized_vin: normalized,
            is_valid: true,
            is_duplicate,
            duplicate_of_vin,
            errors: Vec::new(),
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_vin_strips_case_and_whitespace() {
        assert_eq!(normalize_vin(" ma3erlf4s00123456 "), "MA3ERLF4S00123456");
        assert_eq!(normalize_vin("MA3 ERLF4S 00123456"), "MA3ERLF4S00123456");
    }

    #[test]
    fn test_valid_indian_market_vin() {
        let policy = VinPolicy::default();
        assert!(check_vin_format("MA3ERLF4S00123456", &policy).is_empty());
    }

    #[test]
    fn test_wrong_length_rejected() {
        let policy = VinPolicy::default();
        let errors = check_vin_format("MA3ERLF4S0012345", &policy);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("17 characters"));
    }

    #[test]
    fn test_forbidden_characters_rejected() {
        let policy = VinPolicy::default();
        // 'O' y 'I' no son caracteres VIN válidos
        assert!(!check_vin_format("MA3ERLF4O00123456", &policy).is_empty());
        assert!(!check_vin_format("MA3ERLF4I00123456", &policy).is_empty());
    }

    #[test]
    fn test_check_digit_when_policy_enforces_it() {
        let policy = VinPolicy {
            length: VIN_LENGTH,
            enforce_check_digit: true,
        };
        // VIN con dígito de control 'X' correcto en posición 9
        assert!(check_vin_format("1M8GDM9AXKP042788", &policy).is_empty());
        // El mismo VIN con el dígito alterado debe fallar
        let errors = check_vin_format("1M8GDM9A1KP042788", &policy);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("check digit"));
    }

    #[test]
    fn test_compute_check_digit_known_vin() {
        assert_eq!(compute_check_digit("1M8GDM9AXKP042788"), Some('X'));
    }
}
