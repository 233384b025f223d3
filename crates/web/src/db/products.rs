//! Product repository for database operations.
//!
//! Listing queries are ordered by `name` (SQLite `BINARY` collation) with the
//! id as a tiebreaker, so repeated reads return rows in a stable order.

use chrono::Utc;
use sqlx::{Executor, QueryBuilder, Sqlite, SqlitePool};

use pantry_core::ProductId;

use super::{BEGIN_WRITE, ProductFilter, RepositoryError};
use crate::models::{Product, ProductInput};

const SELECT_PRODUCTS: &str = r"
    SELECT id, name, category, image, units_per_box, price, description, created_at
    FROM products";

const ORDER_BY_NAME: &str = " ORDER BY name, id";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new product and return its ID.
    ///
    /// `created_at` is set here and never changed afterwards.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &ProductInput) -> Result<ProductId, RepositoryError> {
        insert_product(self.pool, input).await
    }

    /// Insert `inputs` only if the table holds no products.
    ///
    /// The emptiness check and every insert share one write transaction:
    /// either all rows land or none do, and concurrent callers fill the
    /// table at most once. Returns the number of rows inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the transaction fails.
    pub async fn insert_all_if_empty(
        &self,
        inputs: &[ProductInput],
    ) -> Result<usize, RepositoryError> {
        let mut tx = self.pool.begin_with(BEGIN_WRITE).await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            return Ok(0);
        }

        for input in inputs {
            insert_product(&mut *tx, input).await?;
        }
        tx.commit().await?;

        Ok(inputs.len())
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let mut query = QueryBuilder::<Sqlite>::new(SELECT_PRODUCTS);
        query.push(" WHERE id = ").push_bind(id);

        let product = query
            .build_query_as::<Product>()
            .fetch_optional(self.pool)
            .await?;

        Ok(product)
    }

    /// Get every product, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_all(&self) -> Result<Vec<Product>, RepositoryError> {
        self.search(&ProductFilter::default()).await
    }

    /// Get the products matching `filter`, ordered by name.
    ///
    /// An empty filter returns the same rows as [`Self::get_all`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let mut query = QueryBuilder::<Sqlite>::new(SELECT_PRODUCTS);
        filter.push_where(&mut query);
        query.push(ORDER_BY_NAME);

        let products = query
            .build_query_as::<Product>()
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }

    /// Distinct category labels in ascending order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<String>, RepositoryError> {
        let categories: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT category FROM products ORDER BY category")
                .fetch_all(self.pool)
                .await?;

        Ok(categories)
    }

    /// Replace every mutable field of a product.
    ///
    /// Returns `false` if no product has this ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE products
            SET name = ?, category = ?, image = ?, units_per_box = ?,
                price = ?, description = ?
            WHERE id = ?
            ",
        )
        .bind(&input.name)
        .bind(&input.category)
        .bind(input.image.as_deref())
        .bind(input.units_per_box)
        .bind(input.price)
        .bind(input.description.as_deref())
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a product.
    ///
    /// Returns `false` if no product has this ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Every product as a flat record, in the same order as [`Self::get_all`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn export(&self) -> Result<Vec<Product>, RepositoryError> {
        self.get_all().await
    }

    /// Number of stored products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}

async fn insert_product<'e, E>(
    executor: E,
    input: &ProductInput,
) -> Result<ProductId, RepositoryError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r"
        INSERT INTO products
            (name, category, image, units_per_box, price, description, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ",
    )
    .bind(&input.name)
    .bind(&input.category)
    .bind(input.image.as_deref())
    .bind(input.units_per_box)
    .bind(input.price)
    .bind(input.description.as_deref())
    .bind(Utc::now())
    .execute(executor)
    .await?;

    Ok(ProductId::new(result.last_insert_rowid()))
}
