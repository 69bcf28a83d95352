//! Field validation shared by entity constructors.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::ModelError;

pub fn required(field: &str, value: &str) -> Result<String, ModelError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ModelError::invalid(field, "required"));
    }
    Ok(v.to_string())
}

pub fn max_len(field: &str, value: &str, max: usize) -> Result<(), ModelError> {
    if value.chars().count() > max {
        return Err(ModelError::invalid(field, &format!("must be at most {max} characters")));
    }
    Ok(())
}

/// Lower-case, hyphen separated, derived from a display name.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut dash = false;
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            dash = false;
        } else if !dash && !out.is_empty() {
            out.push('-');
            dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

pub fn slug(value: &str) -> Result<String, ModelError> {
    let v = value.trim();
    let ok = !v.is_empty()
        && !v.starts_with('-')
        && !v.ends_with('-')
        && !v.contains("--")
        && v.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !ok {
        return Err(ModelError::invalid("slug", "must be lower-case letters, digits and single hyphens"));
    }
    Ok(v.to_string())
}

/// Explicit slug if given, else derived from `name`.
pub fn slug_or_derive(slug_in: Option<&str>, name: &str) -> Result<String, ModelError> {
    match slug_in {
        Some(s) if !s.trim().is_empty() => slug(s),
        _ => slug(&slugify(name)),
    }
}

/// Upper-cased alphanumeric code of `min..=max` characters.
pub fn code(field: &str, value: &str, min: usize, max: usize) -> Result<String, ModelError> {
    let v = value.trim().to_ascii_uppercase();
    if v.len() < min || v.len() > max || !v.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ModelError::invalid(field, &format!("must be {min}-{max} alphanumeric characters")));
    }
    Ok(v)
}

pub fn money(field: &str, value: Decimal) -> Result<Decimal, ModelError> {
    if value.is_sign_negative() {
        return Err(ModelError::invalid(field, "must not be negative"));
    }
    Ok(round_money(value))
}

/// Half-up rounding to paise.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// GST slabs top out at 28%.
pub fn gst_rate(value: Decimal) -> Result<Decimal, ModelError> {
    if value.is_sign_negative() || value > Decimal::new(28, 0) {
        return Err(ModelError::invalid("gstRate", "must be between 0 and 28"));
    }
    Ok(value)
}

pub fn positive_qty(field: &str, value: i32) -> Result<i32, ModelError> {
    if value <= 0 {
        return Err(ModelError::invalid(field, "must be positive"));
    }
    Ok(value)
}

pub fn non_negative(field: &str, value: i32) -> Result<i32, ModelError> {
    if value < 0 {
        return Err(ModelError::invalid(field, "must not be negative"));
    }
    Ok(value)
}

pub fn email(value: &str) -> Result<String, ModelError> {
    let v = value.trim().to_ascii_lowercase();
    let valid = match v.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.'),
        None => false,
    };
    if !valid {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(v)
}

/// Digits with an optional leading `+`, 10 to 15 digits long.
pub fn phone(value: &str) -> Result<String, ModelError> {
    let v: String = value.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    let digits = v.strip_prefix('+').unwrap_or(&v);
    if digits.len() < 10 || digits.len() > 15 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ModelError::Validation("invalid phone number".into()));
    }
    Ok(v)
}

/// Indian PIN codes are six digits and never start with zero.
pub fn pin_code(value: &str) -> Result<String, ModelError> {
    let v = value.trim();
    if v.len() != 6 || !v.chars().all(|c| c.is_ascii_digit()) || v.starts_with('0') {
        return Err(ModelError::Validation("postal code must be a 6-digit PIN".into()));
    }
    Ok(v.to_string())
}
