//! Field validation
//!
//! Pure, synchronous checks over the raw form values. Validation is
//! fail-fast: [`validate_form`] stops at the first failing field, in form
//! order, before any file is read or any request is made.

use crate::config::LimitsConfig;
use crate::domain::{
    AttachedFile, DeclarationForm, SubmissionPayload, SubmissionPayloadBuilder, TrackingCode,
    ValidationError,
};

/// Validates a tracking code
pub fn validate_tracking_code(raw: &str) -> Result<TrackingCode, ValidationError> {
    TrackingCode::parse(raw)
}

/// Validates a phone number: ASCII digits only, within the length bounds
///
/// `max_digits = None` leaves the length unbounded above.
pub fn validate_phone(
    raw: &str,
    min_digits: usize,
    max_digits: Option<usize>,
) -> Result<String, ValidationError> {
    let value = raw.trim();
    let len = value.len();
    let digits_only = !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit());
    let in_range = len >= min_digits && max_digits.map_or(true, |max| len <= max);

    if digits_only && in_range {
        return Ok(value.to_string());
    }

    let message = match max_digits {
        Some(max) => format!("Phone number must contain between {min_digits} and {max} digits"),
        None => format!("Phone number must contain at least {min_digits} digits"),
    };
    Err(ValidationError::InvalidPhone(message))
}

/// Validates a quantity: a whole number of at least one
///
/// Integral decimals such as `"3.0"` are accepted; `"2.5"` is not.
pub fn validate_quantity(raw: &str) -> Result<u32, ValidationError> {
    let value = raw.trim();
    if let Ok(n) = value.parse::<u32>() {
        return if n >= 1 {
            Ok(n)
        } else {
            Err(ValidationError::InvalidQuantity)
        };
    }

    match value.parse::<f64>() {
        Ok(n) if n.is_finite() && n.fract() == 0.0 && n >= 1.0 && n <= u32::MAX as f64 => {
            Ok(n as u32)
        }
        _ => Err(ValidationError::InvalidQuantity),
    }
}

/// Validates a price: a finite, non-negative number
pub fn validate_price(raw: &str) -> Result<f64, ValidationError> {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ => Err(ValidationError::InvalidPrice),
    }
}

/// Validates the attachment count for starred categories
///
/// Categories outside the starred set accept any number of files.
pub fn validate_category_files(
    category: &str,
    file_count: usize,
    limits: &LimitsConfig,
) -> Result<(), ValidationError> {
    if !limits.is_starred(category) {
        return Ok(());
    }

    if file_count < limits.min_files || file_count > limits.max_files {
        return Err(ValidationError::FileCountOutOfRange {
            category: category.to_string(),
            count: file_count,
            min: limits.min_files,
            max: limits.max_files,
        });
    }
    Ok(())
}

/// Validates per-file and combined attachment sizes
pub fn validate_file_sizes(
    files: &[AttachedFile],
    limits: &LimitsConfig,
) -> Result<(), ValidationError> {
    let mut total: u64 = 0;
    for file in files {
        if file.size > limits.max_file_size_bytes {
            return Err(ValidationError::FileTooLarge {
                name: file.name.clone(),
                size: file.size,
                limit: limits.max_file_size_bytes,
            });
        }
        total += file.size;
    }

    if total > limits.max_total_size_bytes {
        return Err(ValidationError::PayloadTooLarge {
            total,
            limit: limits.max_total_size_bytes,
        });
    }
    Ok(())
}

/// Validates a whole form
///
/// Returns a payload builder holding every validated field; the caller adds
/// the encoded files and builds.
///
/// # Examples
///
/// ```
/// use courier::config::LimitsConfig;
/// use courier::core::validation::validate_form;
/// use courier::domain::DeclarationForm;
///
/// let form = DeclarationForm {
///     tracking_number: "ABC-123".into(),
///     phone: "0123456789".into(),
///     quantity: "2".into(),
///     price: "19.99".into(),
///     category: "Clothing".into(),
///     ..Default::default()
/// };
///
/// let payload = validate_form(&form, &LimitsConfig::default())
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(payload.quantity, 2);
/// ```
pub fn validate_form(
    form: &DeclarationForm,
    limits: &LimitsConfig,
) -> Result<SubmissionPayloadBuilder, ValidationError> {
    let tracking_number = validate_tracking_code(&form.tracking_number)?;
    let phone = validate_phone(&form.phone, limits.phone_min_digits, limits.phone_max_digits)?;
    let quantity = validate_quantity(&form.quantity)?;
    let price = validate_price(&form.price)?;
    let category = form.category.trim();
    validate_category_files(category, form.files.len(), limits)?;
    validate_file_sizes(&form.files, limits)?;

    tracing::debug!(
        tracking_number = %tracking_number,
        files = form.files.len(),
        "Form passed validation"
    );

    Ok(SubmissionPayload::builder()
        .tracking_number(tracking_number)
        .phone(phone)
        .quantity(quantity)
        .price(price)
        .description(form.description.trim())
        .collection_point(form.collection_point.trim())
        .category(category))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn files(n: usize, size: usize) -> Vec<AttachedFile> {
        (0..n)
            .map(|i| AttachedFile::in_memory(format!("f{i}.jpg"), Some("image/jpeg"), vec![0; size]))
            .collect()
    }

    #[test_case("ABC-123" ; "hyphenated")]
    #[test_case("abc123" ; "lowercase")]
    #[test_case(" SPX9 " ; "surrounding whitespace")]
    fn test_tracking_code_accepts(raw: &str) {
        assert!(validate_tracking_code(raw).is_ok());
    }

    #[test_case("" ; "empty")]
    #[test_case("-ABC" ; "leading hyphen")]
    #[test_case("ABC-" ; "trailing hyphen")]
    #[test_case("AB C" ; "inner space")]
    #[test_case("AB#1" ; "symbol")]
    fn test_tracking_code_rejects(raw: &str) {
        assert_eq!(
            validate_tracking_code(raw),
            Err(ValidationError::InvalidTrackingFormat)
        );
    }

    #[test_case("123456" ; "min length")]
    #[test_case("0123456789" ; "ten digits")]
    #[test_case("123456789012345" ; "max length")]
    fn test_phone_accepts(raw: &str) {
        assert!(validate_phone(raw, 6, Some(15)).is_ok());
    }

    #[test_case("12345" ; "too short")]
    #[test_case("1234567890123456" ; "too long")]
    #[test_case("+6012345678" ; "plus sign")]
    #[test_case("012-345678" ; "hyphen")]
    #[test_case("" ; "empty")]
    #[test_case("١٢٣٤٥٦٧" ; "non ascii digits")]
    fn test_phone_rejects(raw: &str) {
        assert!(matches!(
            validate_phone(raw, 6, Some(15)),
            Err(ValidationError::InvalidPhone(_))
        ));
    }

    #[test]
    fn test_phone_unbounded() {
        assert!(validate_phone("12345678901234567890", 6, None).is_ok());
        let err = validate_phone("123", 6, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Phone number must contain at least 6 digits"
        );
    }

    #[test_case("0" ; "zero")]
    #[test_case("-1" ; "negative")]
    #[test_case("2.5" ; "fraction")]
    #[test_case("abc" ; "letters")]
    #[test_case("" ; "empty")]
    #[test_case("NaN" ; "nan")]
    fn test_quantity_rejects(raw: &str) {
        assert_eq!(validate_quantity(raw), Err(ValidationError::InvalidQuantity));
    }

    #[test_case("1", 1 ; "one")]
    #[test_case("1000", 1000 ; "thousand")]
    #[test_case("3.0", 3 ; "integral decimal")]
    fn test_quantity_accepts(raw: &str, expected: u32) {
        assert_eq!(validate_quantity(raw), Ok(expected));
    }

    #[test_case("0", 0.0 ; "zero")]
    #[test_case("19.99", 19.99 ; "decimal")]
    #[test_case(" 7 ", 7.0 ; "padded")]
    fn test_price_accepts(raw: &str, expected: f64) {
        assert_eq!(validate_price(raw), Ok(expected));
    }

    #[test_case("-0.01" ; "negative")]
    #[test_case("free" ; "letters")]
    #[test_case("inf" ; "infinite")]
    #[test_case("" ; "empty")]
    fn test_price_rejects(raw: &str) {
        assert_eq!(validate_price(raw), Err(ValidationError::InvalidPrice));
    }

    #[test_case(0, false ; "none")]
    #[test_case(1, true ; "one")]
    #[test_case(3, true ; "three")]
    #[test_case(4, false ; "four")]
    fn test_starred_category_file_count(count: usize, ok: bool) {
        let limits = LimitsConfig::default();
        let result = validate_category_files("*Gadgets", count, &limits);
        assert_eq!(result.is_ok(), ok);
        if !ok {
            assert!(matches!(
                result,
                Err(ValidationError::FileCountOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn test_unstarred_category_any_count() {
        let limits = LimitsConfig::default();
        assert!(validate_category_files("Clothing", 0, &limits).is_ok());
        assert!(validate_category_files("Clothing", 12, &limits).is_ok());
    }

    #[test]
    fn test_file_too_large() {
        let limits = LimitsConfig {
            max_file_size_bytes: 10,
            max_total_size_bytes: 100,
            ..Default::default()
        };
        let err = validate_file_sizes(&files(1, 11), &limits).unwrap_err();
        assert!(matches!(err, ValidationError::FileTooLarge { size: 11, limit: 10, .. }));
    }

    #[test]
    fn test_payload_too_large() {
        let limits = LimitsConfig {
            max_file_size_bytes: 10,
            max_total_size_bytes: 25,
            ..Default::default()
        };
        assert!(validate_file_sizes(&files(2, 10), &limits).is_ok());
        let err = validate_file_sizes(&files(3, 10), &limits).unwrap_err();
        assert_eq!(err, ValidationError::PayloadTooLarge { total: 30, limit: 25 });
    }

    #[test_case("*Gadgets" ; "exact")]
    #[test_case("*Gadgets " ; "trailing space")]
    #[test_case("  *Books\t" ; "padded")]
    fn test_starred_category_without_files_rejected(category: &str) {
        let form = DeclarationForm {
            tracking_number: "ABC-123".into(),
            phone: "0123456789".into(),
            quantity: "1".into(),
            price: "1".into(),
            category: category.into(),
            ..Default::default()
        };
        let err = validate_form(&form, &LimitsConfig::default()).unwrap_err();
        assert!(matches!(err, ValidationError::FileCountOutOfRange { count: 0, .. }));
    }

    #[test]
    fn test_validate_form_is_fail_fast() {
        // Both phone and quantity are bad; only the first is reported.
        let form = DeclarationForm {
            tracking_number: "ABC-123".into(),
            phone: "12".into(),
            quantity: "0".into(),
            price: "1".into(),
            category: "Clothing".into(),
            ..Default::default()
        };
        let err = validate_form(&form, &LimitsConfig::default()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPhone(_)));
    }

    #[test]
    fn test_validate_form_builds_payload_fields() {
        let form = DeclarationForm {
            tracking_number: " ABC-123 ".into(),
            phone: "0123456789".into(),
            quantity: "2".into(),
            price: "19.99".into(),
            description: "  Two shirts ".into(),
            collection_point: "Warehouse A".into(),
            category: "*Books".into(),
            files: files(1, 4),
        };
        let payload = validate_form(&form, &LimitsConfig::default())
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(payload.tracking_number.as_str(), "ABC-123");
        assert_eq!(payload.description, "Two shirts");
        assert_eq!(payload.category, "*Books");
        assert!(payload.files.is_empty());
    }
}
