//! Product form validation.
//!
//! Raw form input goes in, a [`ProductInput`] whose fields already satisfy
//! the store's invariants comes out. The first failing check wins.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pantry_core::{Price, PriceError, UnitsPerBox, UnitsPerBoxError};

use crate::models::ProductInput;

/// Raw product form fields, exactly as submitted.
///
/// Missing fields deserialize as empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: String,
    pub category: String,
    pub units_per_box: String,
    pub price: String,
    pub description: String,
    pub image: String,
}

/// Product form field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Category,
    UnitsPerBox,
    Price,
    Description,
    Image,
}

impl Field {
    /// Form field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Category => "category",
            Self::UnitsPerBox => "units_per_box",
            Self::Price => "price",
            Self::Description => "description",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What went wrong with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationKind {
    /// Required field left blank.
    MissingRequired,
    /// Numeric field that does not parse.
    NotANumber,
    /// Number outside the allowed range.
    OutOfRange,
}

/// A rejected product form.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: Field,
    pub kind: ValidationKind,
    pub message: String,
}

impl ValidationError {
    fn new(field: Field, kind: ValidationKind, message: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            message: message.into(),
        }
    }

    fn missing(field: Field) -> Self {
        Self::new(
            field,
            ValidationKind::MissingRequired,
            format!("{field} is required"),
        )
    }
}

impl From<UnitsPerBoxError> for ValidationError {
    fn from(err: UnitsPerBoxError) -> Self {
        let kind = match err {
            UnitsPerBoxError::NotANumber => ValidationKind::NotANumber,
            UnitsPerBoxError::NotPositive => ValidationKind::OutOfRange,
        };
        Self::new(Field::UnitsPerBox, kind, err.to_string())
    }
}

impl From<PriceError> for ValidationError {
    fn from(err: PriceError) -> Self {
        let kind = match err {
            PriceError::NotANumber => ValidationKind::NotANumber,
            PriceError::Negative | PriceError::TooLarge { .. } => ValidationKind::OutOfRange,
        };
        Self::new(Field::Price, kind, err.to_string())
    }
}

/// Validate a submitted product form.
///
/// Required fields are checked for presence first (name, category, units
/// per box), then units per box is parsed, then price.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered.
pub fn validate(form: &ProductForm) -> Result<ProductInput, ValidationError> {
    let name = form.name.trim();
    let category = form.category.trim();
    let units_per_box = form.units_per_box.trim();

    for (field, value) in [
        (Field::Name, name),
        (Field::Category, category),
        (Field::UnitsPerBox, units_per_box),
    ] {
        if value.is_empty() {
            return Err(ValidationError::missing(field));
        }
    }

    let units_per_box = UnitsPerBox::parse(units_per_box)?;
    let price = optional(&form.price).map(Price::parse).transpose()?;

    Ok(ProductInput {
        name: name.to_owned(),
        category: category.to_owned(),
        image: optional(&form.image).map(str::to_owned),
        units_per_box,
        price,
        description: optional(&form.description).map(str::to_owned),
    })
}

/// Trimmed value, or `None` when blank.
fn optional(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(units_per_box: &str, price: &str) -> ProductForm {
        ProductForm {
            name: "Arroz Integral".to_owned(),
            category: "Grãos".to_owned(),
            units_per_box: units_per_box.to_owned(),
            price: price.to_owned(),
            ..ProductForm::default()
        }
    }

    #[test]
    fn test_valid_form_is_trimmed() {
        let input = validate(&ProductForm {
            name: "  Arroz  ".to_owned(),
            category: " Grãos ".to_owned(),
            units_per_box: " 10 ".to_owned(),
            price: " 12.5 ".to_owned(),
            description: "  Integral ".to_owned(),
            image: " arroz.jpg ".to_owned(),
        })
        .unwrap();

        assert_eq!(input.name, "Arroz");
        assert_eq!(input.category, "Grãos");
        assert_eq!(input.units_per_box.get(), 10);
        assert_eq!(input.price.unwrap().to_string(), "12.50");
        assert_eq!(input.description.as_deref(), Some("Integral"));
        assert_eq!(input.image.as_deref(), Some("arroz.jpg"));
    }

    #[test]
    fn test_missing_required_fields_in_order() {
        let err = validate(&ProductForm::default()).unwrap_err();
        assert_eq!(err.field, Field::Name);
        assert_eq!(err.kind, ValidationKind::MissingRequired);

        let mut f = form("", "abc");
        f.category = "   ".to_owned();
        let err = validate(&f).unwrap_err();
        assert_eq!(err.field, Field::Category);

        let err = validate(&form("", "abc")).unwrap_err();
        assert_eq!(err.field, Field::UnitsPerBox);
        assert_eq!(err.kind, ValidationKind::MissingRequired);
    }

    #[test]
    fn test_units_per_box_rules() {
        for bad in ["0", "-5"] {
            let err = validate(&form(bad, "")).unwrap_err();
            assert_eq!(err.field, Field::UnitsPerBox);
            assert_eq!(err.kind, ValidationKind::OutOfRange);
        }

        for bad in ["abc", "1.5"] {
            let err = validate(&form(bad, "")).unwrap_err();
            assert_eq!(err.kind, ValidationKind::NotANumber);
        }

        for good in ["1", "9999"] {
            assert!(validate(&form(good, "")).is_ok());
        }
    }

    #[test]
    fn test_units_checked_before_price() {
        let err = validate(&form("abc", "-1")).unwrap_err();
        assert_eq!(err.field, Field::UnitsPerBox);
    }

    #[test]
    fn test_price_rules() {
        assert_eq!(validate(&form("1", "")).unwrap().price, None);
        assert_eq!(validate(&form("1", "   ")).unwrap().price, None);

        let err = validate(&form("1", "-1")).unwrap_err();
        assert_eq!(err.field, Field::Price);
        assert_eq!(err.kind, ValidationKind::OutOfRange);

        let err = validate(&form("1", "R$ 10")).unwrap_err();
        assert_eq!(err.kind, ValidationKind::NotANumber);

        let zero = validate(&form("1", "0")).unwrap().price.unwrap();
        assert!(zero.amount().is_zero());
        assert_eq!(
            validate(&form("1", "19.99")).unwrap().price.unwrap().to_string(),
            "19.99"
        );
    }

    #[test]
    fn test_optional_text_blank_is_none() {
        let mut f = form("1", "");
        f.description = "   ".to_owned();
        let input = validate(&f).unwrap();

        assert_eq!(input.description, None);
        assert_eq!(input.image, None);
    }

    #[test]
    fn test_error_serializes_with_field_and_kind() {
        let err = validate(&form("0", "")).unwrap_err();
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["field"], "units_per_box");
        assert_eq!(json["kind"], "out_of_range");
        assert!(json["message"].as_str().unwrap().contains("greater than zero"));
    }
}
