//! Utilidades de validación
//!
//! Helpers compartidos por los DTOs: patentes, nombres de ciudad y
//! referencias opcionales.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Patente chilena o genérica: letras, dígitos y guiones
    pub static ref PLATE_REGEX: Regex = Regex::new(r"(?i)^[A-Z0-9-]{4,10}$").unwrap();

    /// Nombre de usuario: minúsculas, dígitos, punto y guion bajo
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-z0-9._]{3,50}$").unwrap();
}

/// Normaliza una patente a mayúsculas sin espacios alrededor
pub fn normalize_plate(plate: &str) -> String {
    plate.trim().to_uppercase()
}

/// Normaliza un nombre de ciudad conservando las mayúsculas originales
pub fn normalize_city(city: &str) -> String {
    city.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Validar que un string no esté vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plate_regex_accepts_common_formats() {
        assert!(PLATE_REGEX.is_match("ABCD12"));
        assert!(PLATE_REGEX.is_match("abc123"));
        assert!(PLATE_REGEX.is_match("GH-KL-34"));
        assert!(!PLATE_REGEX.is_match("AB"));
        assert!(!PLATE_REGEX.is_match("AB 123"));
        assert!(!PLATE_REGEX.is_match("ABCDEFGHIJK"));
    }

    #[test]
    fn test_normalize_helpers() {
        assert_eq!(normalize_plate("  abc123 "), "ABC123");
        assert_eq!(normalize_city("  Puerto   Montt "), "Puerto Montt");
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Temuco").is_ok());
        assert!(validate_not_blank("   ").is_err());
    }
}
