use rust_decimal::Decimal;
use thiserror::Error;

/// A domain rule violation, always attributable to one input field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("This field is required.")]
    MissingField { field: String },
    #[error("This field may not be null.")]
    NullField { field: String },
    #[error("This field may not be blank.")]
    BlankField { field: String },
    #[error("Ensure this field has no more than {max} characters.")]
    TooLong { field: String, max: usize },
    #[error("\"{value}\" is not a valid choice.")]
    InvalidChoice { field: String, value: String },
    #[error("A valid number is required.")]
    NotADecimal { field: String },
    #[error("A valid integer is required.")]
    NotAnInteger { field: String },
    #[error("Must be a valid boolean.")]
    NotABoolean { field: String },
    #[error("Not a valid string.")]
    NotAString { field: String },
    #[error("Enter a valid URL.")]
    InvalidUrl { field: String },
    #[error("Enter a valid email address.")]
    InvalidEmail { field: String },
    #[error("Ensure this value is greater than or equal to {min}.")]
    BelowMinimum { field: String, min: Decimal },
    #[error("Ensure that there are no more than {max} digits in total.")]
    TooManyDigits { field: String, max: u32 },
    #[error("Ensure that there are no more than {max} decimal places.")]
    TooManyDecimalPlaces { field: String, max: u32 },
    #[error("Invalid pk \"{pk}\" - object does not exist.")]
    DoesNotExist { field: String, pk: i64 },
    #[error("{message}")]
    Rule { field: String, message: String },
}

impl ValidationError {
    /// Name of the input field the error belongs to.
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field }
            | Self::NullField { field }
            | Self::BlankField { field }
            | Self::TooLong { field, .. }
            | Self::InvalidChoice { field, .. }
            | Self::NotADecimal { field }
            | Self::NotAnInteger { field }
            | Self::NotABoolean { field }
            | Self::NotAString { field }
            | Self::InvalidUrl { field }
            | Self::InvalidEmail { field }
            | Self::BelowMinimum { field, .. }
            | Self::TooManyDigits { field, .. }
            | Self::TooManyDecimalPlaces { field, .. }
            | Self::DoesNotExist { field, .. }
            | Self::Rule { field, .. } => field,
        }
    }

    pub fn rule(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rule {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Reject strings longer than `max` characters.
pub fn max_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Reject values below `min`.
pub fn min_value(field: &str, value: Decimal, min: Decimal) -> Result<(), ValidationError> {
    if value < min {
        return Err(ValidationError::BelowMinimum {
            field: field.to_string(),
            min,
        });
    }
    Ok(())
}

/// Check total digits and decimal places of a decimal value.
pub fn decimal_precision(
    field: &str,
    value: Decimal,
    max_digits: u32,
    decimal_places: u32,
) -> Result<(), ValidationError> {
    let value = value.normalize();
    let scale = value.scale();
    if scale > decimal_places {
        return Err(ValidationError::TooManyDecimalPlaces {
            field: field.to_string(),
            max: decimal_places,
        });
    }
    let digits = value.mantissa().unsigned_abs().to_string().len() as u32;
    if digits.max(scale) > max_digits {
        return Err(ValidationError::TooManyDigits {
            field: field.to_string(),
            max: max_digits,
        });
    }
    Ok(())
}

/// Minimal email shape check: one `@`, non-empty local part and a dotted domain.
pub fn email(field: &str, value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidEmail {
        field: field.to_string(),
    };
    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || !domain.contains('.') || value.len() > 254 {
        return Err(invalid());
    }
    if domain.starts_with('.') || domain.ends_with('.') || value.contains(char::is_whitespace) {
        return Err(invalid());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_max_length() {
        assert!(max_length("name", "abc", 3).is_ok());
        let err = max_length("name", "abcd", 3).unwrap_err();
        assert_eq!(err.field(), "name");
        assert_eq!(
            err.to_string(),
            "Ensure this field has no more than 3 characters."
        );
    }

    #[test]
    fn test_decimal_precision() {
        let d = |s: &str| Decimal::from_str(s).unwrap();
        assert!(decimal_precision("price", d("12.5"), 19, 6).is_ok());
        assert!(decimal_precision("price", d("1.1234560"), 19, 6).is_ok());
        assert!(matches!(
            decimal_precision("price", d("1.1234567"), 19, 6),
            Err(ValidationError::TooManyDecimalPlaces { max: 6, .. })
        ));
        assert!(matches!(
            decimal_precision("quantity", d("123456"), 5, 2),
            Err(ValidationError::TooManyDigits { max: 5, .. })
        ));
    }

    #[test]
    fn test_email() {
        assert!(email("email", "sales@acme.com").is_ok());
        assert!(email("email", "sales@acme").is_err());
        assert!(email("email", "@acme.com").is_err());
        assert!(email("email", "a b@acme.com").is_err());
    }

    #[test]
    fn test_min_value() {
        assert!(min_value("quantity", Decimal::ONE, Decimal::ONE).is_ok());
        let err = min_value("quantity", Decimal::ZERO, Decimal::ONE).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Ensure this value is greater than or equal to 1."
        );
    }
}
