//! Product domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pantry_core::{Price, ProductId, UnitsPerBox};

/// A catalog product as stored.
///
/// Serializes as a flat record, field for field, which is also the shape of
/// the bulk export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// Store-assigned ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Free-form category label.
    pub category: String,
    /// Image reference, usually a file name.
    pub image: Option<String>,
    /// Units packed per box.
    pub units_per_box: UnitsPerBox,
    /// Unit price; `None` when not priced.
    pub price: Option<Price>,
    /// Free-form description.
    pub description: Option<String>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

/// Validated product fields for create and update.
///
/// Updates are full-row replacements, so the same type serves both.
/// Produced by [`crate::services::catalog::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    pub name: String,
    pub category: String,
    pub image: Option<String>,
    pub units_per_box: UnitsPerBox,
    pub price: Option<Price>,
    pub description: Option<String>,
}

impl ProductInput {
    /// Whether a stored product carries exactly these field values.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.name == product.name
            && self.category == product.category
            && self.image == product.image
            && self.units_per_box == product.units_per_box
            && self.price == product.price
            && self.description == product.description
    }
}
