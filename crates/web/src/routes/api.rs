//! JSON API handlers.
//!
//! Unauthenticated calls get `401 {"error": "unauthorized"}` from the
//! session gate rather than a redirect.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::Product;
use crate::services::catalog::CatalogService;
use crate::state::AppState;

/// Bulk export of every product as a flat record.
#[instrument(skip_all, fields(username = %user.username))]
pub async fn products(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Product>>> {
    let products = CatalogService::new(state.pool()).export(&user).await?;
    Ok(Json(products))
}

/// Distinct category labels.
#[instrument(skip_all, fields(username = %user.username))]
pub async fn categories(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<String>>> {
    let categories = CatalogService::new(state.pool()).categories(&user).await?;
    Ok(Json(categories))
}
