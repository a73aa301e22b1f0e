//! Generación de slugs para URLs de listings
//! 
//! El slug se construye con el código de tienda del dealer, la marca,
//! el modelo y un fragmento corto del id del listing, en minúsculas y
//! con todo carácter no alfanumérico reemplazado por guiones.

use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

lazy_static! {
    static ref NON_ALNUM: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

/// Generar el slug de un listing
pub fn listing_slug(store_code: &str, make: &str, model: &str, listing_id: Uuid) -> String {
    let id_fragment = listing_id.simple().to_string();
    let raw = format!(
        "{} {} {} {}",
        store_code,
        make,
        model,
        &id_fragment[..8]
    );
    slugify(&raw)
}

/// Pasar un texto libre a formato slug
pub fn slugify(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let replaced = NON_ALNUM.replace_all(&lowered, "-");
    replaced.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_replaces_non_alphanumerics() {
        assert_eq!(slugify("Maruti Suzuki Swift!"), "maruti-suzuki-swift");
        assert_eq!(slugify("  DLX_01  "), "dlx-01");
    }

    #[test]
    fn test_listing_slug_shape() {
        let id = Uuid::parse_str("a1b2c3d4-0000-0000-0000-000000000000").unwrap();
        let slug = listing_slug("DLX01", "Maruti Suzuki", "Swift", id);
        assert_eq!(slug, "dlx01-maruti-suzuki-swift-a1b2c3d4");
    }

    #[test]
    fn test_slug_is_url_safe() {
        let id = Uuid::new_v4();
        let slug = listing_slug("Täller #9", "Hyundai", "i20 N/Line", id);
        assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
    }
}
