//! Pure validation engine: normalizes a raw draft into the canonical
//! product payload. Runs synchronously, mutates nothing, and returns the
//! first failing rule in a fixed order: name, quantity, price, size, the
//! negative-value cross-check, then category and the optional gender policy.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::errors::ValidationError;
use crate::models::{Category, ProductDraft, ProductPayload};

/// Knobs that vary by deployment rather than by contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationPolicy {
    /// When set, a draft without a chosen gender is rejected with
    /// `MissingGender` after the base rules pass.
    pub require_gender: bool,
}

/// Validate and normalize a draft. Empty optional selections map to absent
/// values, never to the literal empty string.
pub fn validate(
    draft: &ProductDraft,
    policy: ValidationPolicy,
) -> Result<ProductPayload, ValidationError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    let quantity = draft
        .quantity
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidQuantity)?;

    let normal_price = Decimal::from_str(draft.normal_price.trim())
        .map_err(|_| ValidationError::InvalidPrice)?;

    let size = draft
        .size
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
        .ok_or(ValidationError::InvalidSize)?;

    // All three parsed; the cross-check now takes precedence over any
    // field-specific outcome.
    if quantity < 0 || normal_price < Decimal::ZERO || size < 0.0 {
        return Err(ValidationError::NegativeValue);
    }

    let brand = non_empty(&draft.brand);
    let category = match non_empty(&draft.category) {
        Some(raw) => Some(
            Category::from_str(&raw).map_err(|_| ValidationError::InvalidCategory(raw))?,
        ),
        None => None,
    };

    if policy.require_gender && draft.gender.is_none() {
        return Err(ValidationError::MissingGender);
    }

    Ok(ProductPayload {
        name: name.to_string(),
        quantity,
        normal_price,
        size,
        brand,
        category,
        gender: draft.gender,
    })
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
