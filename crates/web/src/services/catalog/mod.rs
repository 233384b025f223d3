//! Catalog service.
//!
//! Every operation takes the [`CurrentUser`] extracted by the session gate.
//! Holding one is the only way to reach the product store from a handler.

mod validation;

pub use validation::{Field, ProductForm, ValidationError, ValidationKind, validate};

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{error, info};

use pantry_core::ProductId;

use crate::db::{ProductFilter, ProductRepository, RepositoryError};
use crate::models::{CurrentUser, Product};

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Submitted product fields were rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No product with this ID.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Catalog service for authenticated product operations.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// All products, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn list(&self, _actor: &CurrentUser) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.get_all().await?)
    }

    /// Products matching `filter`, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn search(
        &self,
        _actor: &CurrentUser,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.search(filter).await?)
    }

    /// Distinct categories in ascending order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn categories(&self, _actor: &CurrentUser) -> Result<Vec<String>, CatalogError> {
        Ok(self.products.list_categories().await?)
    }

    /// A single product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no product has this ID.
    pub async fn get(&self, _actor: &CurrentUser, id: ProductId) -> Result<Product, CatalogError> {
        self.products
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    /// Validate and store a new product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if the form is rejected.
    pub async fn create(
        &self,
        actor: &CurrentUser,
        form: &ProductForm,
    ) -> Result<ProductId, CatalogError> {
        let input = validate(form)?;
        let id = self.products.create(&input).await.inspect_err(|e| {
            error!(error = %e, "failed to create product");
        })?;

        info!(product_id = %id, user = %actor.username, "product created");
        Ok(id)
    }

    /// Replace every field of an existing product.
    ///
    /// Existence is checked before the form is validated.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no product has this ID and
    /// `CatalogError::Validation` if the form is rejected.
    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: ProductId,
        form: &ProductForm,
    ) -> Result<(), CatalogError> {
        if self.products.get_by_id(id).await?.is_none() {
            return Err(CatalogError::NotFound(id));
        }

        let input = validate(form)?;
        if !self.products.update(id, &input).await? {
            return Err(CatalogError::NotFound(id));
        }

        info!(product_id = %id, user = %actor.username, "product updated");
        Ok(())
    }

    /// Hard-delete a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the delete matched nothing.
    pub async fn delete(&self, actor: &CurrentUser, id: ProductId) -> Result<(), CatalogError> {
        if !self.products.delete(id).await? {
            return Err(CatalogError::NotFound(id));
        }

        info!(product_id = %id, user = %actor.username, "product deleted");
        Ok(())
    }

    /// Every product as a flat record.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn export(&self, _actor: &CurrentUser) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.export().await?)
    }
}
