//! Result type alias for Courier

use super::errors::CourierError;

/// Result type alias for Courier operations
///
/// # Examples
///
/// ```
/// use courier::domain::result::Result;
/// use courier::domain::errors::{CourierError, ValidationError};
///
/// fn quantity() -> Result<u32> {
///     Err(CourierError::Validation(ValidationError::InvalidQuantity))
/// }
///
/// assert!(quantity().is_err());
/// ```
pub type Result<T> = std::result::Result<T, CourierError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
