//! Input validation utilities
//!
//! Checks applied to plan files before any resource is built, so that a
//! malformed definition is reported with the field that caused it instead of
//! surfacing as an unpriced line in the breakdown.

use crate::error::{PicostError, Result};
use rust_decimal::Decimal;

/// Validate a resource address
///
/// Addresses follow the `<type>.<name>` form, optionally prefixed by module
/// paths and suffixed by an index (`module.app.ibm_pi_instance.web[0]`).
pub fn validate_address(address: &str) -> Result<()> {
    if address.is_empty() {
        return Err(PicostError::Validation {
            field: "address".to_string(),
            reason: "Address cannot be empty".to_string(),
        });
    }

    if address.chars().any(char::is_whitespace) {
        return Err(PicostError::Validation {
            field: "address".to_string(),
            reason: format!("Address cannot contain whitespace, got: '{}'", address),
        });
    }

    let segments: Vec<&str> = address.split('.').collect();
    if segments.len() < 2 || segments.iter().any(|s| s.is_empty()) {
        return Err(PicostError::Validation {
            field: "address".to_string(),
            reason: format!("Address must look like '<type>.<name>', got: '{}'", address),
        });
    }

    Ok(())
}

/// Validate a region name
///
/// The region selects the price list, so it must be present. Its value is not
/// checked against a list of regions; an unknown region simply matches no rate.
pub fn validate_region(address: &str, region: &str) -> Result<()> {
    if region.trim().is_empty() {
        return Err(PicostError::Validation {
            field: format!("{}.region", address),
            reason: "Region cannot be empty".to_string(),
        });
    }

    if region.chars().any(char::is_whitespace) {
        return Err(PicostError::Validation {
            field: format!("{}.region", address),
            reason: format!("Region cannot contain whitespace, got: '{}'", region),
        });
    }

    Ok(())
}

/// Validate a capacity attribute (memory, cores)
pub fn validate_capacity(address: &str, field: &str, value: Decimal) -> Result<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(PicostError::Validation {
            field: format!("{}.{}", address, field),
            reason: format!("Capacity cannot be negative, got: {}", value),
        });
    }

    Ok(())
}
