//! First-run sample data.
//!
//! Each table is seeded independently and only while it is empty, so running
//! this against a populated database is a no-op.

use sqlx::SqlitePool;
use tracing::{info, warn};

use pantry_core::{Price, UnitsPerBox, Username};

use super::auth::{AuthError, hash_password};
use crate::db::{ProductRepository, RepositoryError, UserRepository};
use crate::models::ProductInput;

/// Default accounts as `(username, password)`.
const DEFAULT_USERS: [(&str, &str); 2] = [("admin", "password123"), ("user", "hello123")];

/// `(name, category, image, units_per_box, price, description)`
type SampleProduct = (&'static str, &'static str, &'static str, i64, &'static str, &'static str);

const SAMPLE_PRODUCTS: [SampleProduct; 8] = [
    ("Arroz Integral", "Grãos", "arroz.jpg", 10, "12.50", "Arroz integral de alta qualidade"),
    ("Feijão Preto", "Grãos", "feijao.jpg", 12, "8.90", "Feijão preto selecionado"),
    ("Azeite de Oliva", "Condimentos", "azeite.jpg", 6, "25.90", "Azeite extra virgem"),
    ("Macarrão Espaguete", "Massas", "macarrao.jpg", 8, "4.50", "Macarrão espaguete tipo 1"),
    ("Açúcar Mascavo", "Grãos", "acucar.jpg", 15, "6.80", "Açúcar mascavo orgânico"),
    ("Café em Grãos", "Bebidas", "cafe.jpg", 5, "18.90", "Café em grãos premium"),
    ("Leite em Pó", "Laticínios", "leite.jpg", 8, "15.75", "Leite em pó integral"),
    ("Farinha de Trigo", "Grãos", "farinha.jpg", 12, "5.20", "Farinha de trigo especial"),
];

/// Errors that can occur while seeding.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("invalid sample product {0}")]
    InvalidSample(&'static str),
}

/// What [`seed_if_empty`] inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub products: usize,
}

/// Insert the default users and sample products into empty tables.
///
/// Each table is filled inside its own write transaction, so concurrent
/// runs against one database seed it once and a failed run seeds nothing.
///
/// # Errors
///
/// Returns `SeedError` if any insert fails.
pub async fn seed_if_empty(pool: &SqlitePool) -> Result<SeedReport, SeedError> {
    let users = UserRepository::new(pool);
    let products = ProductRepository::new(pool);
    let mut report = SeedReport::default();

    // Skips hashing on a populated table; the insert checks again under the lock.
    if users.count().await? == 0 {
        let accounts = DEFAULT_USERS
            .into_iter()
            .map(|(username, password)| -> Result<_, AuthError> {
                Ok((Username::parse(username)?, hash_password(password)?))
            })
            .collect::<Result<Vec<_>, AuthError>>()?;

        report.users = users.create_all_if_empty(&accounts).await?;
        if report.users > 0 {
            warn!(
                "seeded default accounts 'admin' and 'user' with well-known passwords; \
                 change them before exposing this instance"
            );
        }
    }

    let samples = SAMPLE_PRODUCTS
        .into_iter()
        .map(sample_input)
        .collect::<Result<Vec<_>, _>>()?;

    report.products = products.insert_all_if_empty(&samples).await?;
    if report.products > 0 {
        info!(count = report.products, "seeded sample products");
    }

    Ok(report)
}

fn sample_input(
    (name, category, image, units, price, description): SampleProduct,
) -> Result<ProductInput, SeedError> {
    let units_per_box = UnitsPerBox::new(units).map_err(|_| SeedError::InvalidSample(name))?;
    let price = Price::parse(price).map_err(|_| SeedError::InvalidSample(name))?;

    Ok(ProductInput {
        name: name.to_owned(),
        category: category.to_owned(),
        image: Some(image.to_owned()),
        units_per_box,
        price: Some(price),
        description: Some(description.to_owned()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support;
    use crate::services::auth::AuthService;

    #[tokio::test]
    async fn test_seeds_empty_database_once() {
        let pool = test_support::pool().await;

        let first = seed_if_empty(&pool).await.unwrap();
        assert_eq!(first, SeedReport { users: 2, products: 8 });

        let second = seed_if_empty(&pool).await.unwrap();
        assert_eq!(second, SeedReport::default());

        assert_eq!(ProductRepository::new(&pool).count().await.unwrap(), 8);
        assert_eq!(UserRepository::new(&pool).count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_seeds_fill_tables_once() {
        let pool = test_support::pool().await;

        let (a, b) = tokio::join!(seed_if_empty(&pool), seed_if_empty(&pool));
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(a.users + b.users, 2);
        assert_eq!(a.products + b.products, 8);
        assert_eq!(UserRepository::new(&pool).count().await.unwrap(), 2);
        assert_eq!(ProductRepository::new(&pool).count().await.unwrap(), 8);
    }

    #[tokio::test]
    async fn test_concurrent_seeds_with_users_present() {
        let pool = test_support::pool().await;
        AuthService::new(&pool).create("carol", "secret").await.unwrap();

        let (a, b) = tokio::join!(seed_if_empty(&pool), seed_if_empty(&pool));

        assert_eq!(a.unwrap().products + b.unwrap().products, 8);
        assert_eq!(UserRepository::new(&pool).count().await.unwrap(), 1);
        assert_eq!(ProductRepository::new(&pool).count().await.unwrap(), 8);
    }

    #[tokio::test]
    async fn test_seeded_users_can_log_in() {
        let pool = test_support::pool().await;
        seed_if_empty(&pool).await.unwrap();

        let auth = AuthService::new(&pool);
        assert!(auth.verify("admin", "password123").await.unwrap());
        assert!(auth.verify("user", "hello123").await.unwrap());
    }

    #[tokio::test]
    async fn test_populated_products_are_left_alone() {
        let pool = test_support::pool().await;
        let products = ProductRepository::new(&pool);
        products
            .create(&sample_input(SAMPLE_PRODUCTS[0]).unwrap())
            .await
            .unwrap();

        let report = seed_if_empty(&pool).await.unwrap();
        assert_eq!(report.products, 0);
        assert_eq!(report.users, 2);
        assert_eq!(products.count().await.unwrap(), 1);
    }

    #[test]
    fn test_samples_are_valid() {
        for sample in SAMPLE_PRODUCTS {
            assert!(sample_input(sample).is_ok());
        }
    }
}
