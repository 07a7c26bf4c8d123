//! # Validation Module
//!
//! Input validation for quotation authoring.
//!
//! Validation here is the second of three layers: the form layer catches
//! format problems for immediate feedback, this module enforces business
//! rules before any state changes, and the database schema backs it all
//! with NOT NULL / UNIQUE constraints.

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted quotation or room name.
pub const MAX_NAME_LEN: usize = 200;

/// Validates a quotation name.
pub fn validate_quotation_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name)
}

/// Validates a room name.
pub fn validate_room_name(name: &str) -> ValidationResult<()> {
    validate_name("room name", name)
}

fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a customer-facing discount percentage (0-100).
pub fn validate_discount_percent(pct: f64) -> ValidationResult<()> {
    if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 100,
        });
    }
    Ok(())
}

/// Validates a container quantity (whole containers, at least one).
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_rules() {
        assert!(validate_quotation_name("Site A - Ground Floor").is_ok());
        assert!(validate_quotation_name("  ").is_err());
        assert!(validate_room_name(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_discount_range() {
        assert!(validate_discount_percent(0.0).is_ok());
        assert!(validate_discount_percent(100.0).is_ok());
        assert!(validate_discount_percent(-0.1).is_err());
        assert!(validate_discount_percent(100.1).is_err());
        assert!(validate_discount_percent(f64::NAN).is_err());
    }

    #[test]
    fn test_quantity_minimum() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }
}
