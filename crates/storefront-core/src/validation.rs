//! # Validation Module
//!
//! Input validation for the storefront's forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI argument parsing (clap)                                  │
//! │  ├── Types, required flags                                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Register / login / checkout / admin product forms                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Reducer                                                      │
//! │  └── No validation at all: unknown ids are silent no-ops               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{CustomerInfo, Product};
use crate::{MAX_ITEM_QUANTITY, MAX_PRICE_PAISE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum password length at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// String Validators
// =============================================================================

fn required<'a>(field: &str, value: &'a str) -> ValidationResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(value)
}

fn max_len(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Validates a person's or product's display name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = required(field, name)?;
    max_len(field, name, 200)
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Exactly one '@' with a non-empty local part
/// - Domain contains a '.' that is not its first or last character
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_email;
///
/// assert!(validate_email("admin@fixderma.com").is_ok());
/// assert!(validate_email("admin.fixderma.com").is_err());
/// assert!(validate_email("admin@localhost").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = required("email", email)?;
    max_len("email", email, 254)?;

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(|| invalid("missing '@'"))?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must look like name@example.com"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }
    match domain.find('.') {
        Some(dot) if dot > 0 && !domain.ends_with('.') => Ok(()),
        _ => Err(invalid("domain must contain a '.'")),
    }
}

/// Validates a new password.
///
/// ## Rules
/// - At least [`MIN_PASSWORD_LEN`] characters
/// - At most 128 characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }
    max_len("password", password, 128)
}

/// Validates a phone number.
///
/// ## Rules
/// - Digits plus optional '+', '-', ' ' separators
/// - 10 to 15 digits
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_phone;
///
/// assert!(validate_phone("+91-9876543210").is_ok());
/// assert!(validate_phone("12345").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = required("phone", phone)?;

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ')
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces, '+' and '-'".to_string(),
        });
    }

    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if !(10..=15).contains(&digits) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must have 10 to 15 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates an Indian postal pincode (exactly six digits).
pub fn validate_pincode(pincode: &str) -> ValidationResult<()> {
    let pincode = required("pincode", pincode)?;

    if pincode.len() != 6 || !pincode.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "pincode".to_string(),
            reason: "must be 6 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (matches everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();
    max_len("query", query, 100)?;
    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in paise: `0..=MAX_PRICE_PAISE`.
pub fn validate_price_paise(field: &str, paise: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_PAISE).contains(&paise) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE_PAISE,
        });
    }

    Ok(())
}

/// Validates a product rating (0.0 to 5.0 inclusive).
pub fn validate_rating(rating: f64) -> ValidationResult<()> {
    if !rating.is_finite() || !(0.0..=5.0).contains(&rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: 0,
            max: 5,
        });
    }

    Ok(())
}

// =============================================================================
// Form Validators
// =============================================================================

/// Validates the checkout shipping form. Every field is required.
pub fn validate_customer_info(info: &CustomerInfo) -> ValidationResult<()> {
    validate_name("full name", &info.full_name)?;
    validate_email(&info.email)?;
    validate_phone(&info.phone)?;
    required("address", &info.address)?;
    required("city", &info.city)?;
    required("state", &info.state)?;
    validate_pincode(&info.pincode)
}

/// Validates a product submitted from the admin panel.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    required("id", &product.id)?;
    validate_name("name", &product.name)?;
    required("category", &product.category)?;
    validate_price_paise("price", product.price_paise)?;
    if let Some(original) = product.original_price_paise {
        validate_price_paise("original price", original)?;
    }
    validate_rating(product.rating)
}

// =============================================================================
// Unit Tests
// =============================================================================
