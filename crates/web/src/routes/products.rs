//! Product route handlers.
//!
//! Every handler requires a signed-in user. Reads answer with JSON page data;
//! writes answer with redirects, except for rejected forms, which answer
//! `400` with the offending field.

use axum::{
    Form, Json,
    extract::{Path, Query, State, rejection::PathRejection},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use pantry_core::ProductId;

use super::{MessageQuery, redirect_with};
use crate::db::ProductFilter;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Product;
use crate::services::catalog::{CatalogError, CatalogService, ProductForm};
use crate::state::AppState;

const PRODUCTS_PAGE: &str = "/products";

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

/// Product listing page data.
#[derive(Debug, Serialize)]
pub struct ProductsPage {
    pub products: Vec<Product>,
    pub categories: Vec<String>,
    pub search_term: Option<String>,
    pub selected_category: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Product detail page data.
#[derive(Debug, Serialize)]
pub struct ProductPage {
    pub product: Product,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// All products with the category list.
#[instrument(skip(state, user, query), fields(username = %user.username))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<Json<ProductsPage>> {
    let catalog = CatalogService::new(state.pool());

    Ok(Json(ProductsPage {
        products: catalog.list(&user).await?,
        categories: catalog.categories(&user).await?,
        search_term: None,
        selected_category: None,
        error: query.error,
        success: query.success,
    }))
}

/// Products filtered by term and category.
#[instrument(skip(state, user), fields(username = %user.username))]
pub async fn search(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ProductsPage>> {
    let catalog = CatalogService::new(state.pool());
    let filter = ProductFilter::new(query.q.as_deref(), query.category.as_deref());

    Ok(Json(ProductsPage {
        products: catalog.search(&user, &filter).await?,
        categories: catalog.categories(&user).await?,
        search_term: query.q,
        selected_category: query.category,
        error: None,
        success: None,
    }))
}

/// A single product.
#[instrument(skip(state, user, path, query), fields(username = %user.username))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    path: std::result::Result<Path<i64>, PathRejection>,
    Query(query): Query<MessageQuery>,
) -> Result<Response> {
    let Some(id) = product_id(path) else {
        return Ok(not_found());
    };
    let catalog = CatalogService::new(state.pool());

    match catalog.get(&user, id).await {
        Ok(product) => Ok(Json(ProductPage {
            product,
            error: query.error,
            success: query.success,
        })
        .into_response()),
        Err(CatalogError::NotFound(_)) => Ok(not_found()),
        Err(e) => Err(e.into()),
    }
}

/// Create a product and redirect to it.
#[instrument(skip(state, user, form), fields(username = %user.username))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<ProductForm>,
) -> Result<Redirect> {
    let catalog = CatalogService::new(state.pool());
    let id = catalog.create(&user, &form).await?;

    Ok(redirect_with(&detail_path(id), "success", "created"))
}

/// Replace a product's fields.
#[instrument(skip(state, user, path, form), fields(username = %user.username))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    path: std::result::Result<Path<i64>, PathRejection>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let Some(id) = product_id(path) else {
        return Ok(not_found());
    };
    let catalog = CatalogService::new(state.pool());

    match catalog.update(&user, id, &form).await {
        Ok(()) => Ok(redirect_with(&detail_path(id), "success", "updated").into_response()),
        Err(CatalogError::NotFound(_)) => Ok(not_found()),
        Err(e) => Err(AppError::from(e)),
    }
}

/// Delete a product.
#[instrument(skip(state, user, path), fields(username = %user.username))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Redirect> {
    let Some(id) = product_id(path) else {
        return Ok(redirect_with(PRODUCTS_PAGE, "error", "not_found"));
    };
    let catalog = CatalogService::new(state.pool());

    match catalog.delete(&user, id).await {
        Ok(()) => Ok(redirect_with(PRODUCTS_PAGE, "success", "deleted")),
        Err(CatalogError::NotFound(_)) => Ok(redirect_with(PRODUCTS_PAGE, "error", "not_found")),
        Err(e) => Err(e.into()),
    }
}

/// A path id that is not an integer names no product.
fn product_id(path: std::result::Result<Path<i64>, PathRejection>) -> Option<ProductId> {
    path.ok().map(|Path(id)| ProductId::new(id))
}

fn detail_path(id: ProductId) -> String {
    format!("{PRODUCTS_PAGE}/{id}")
}

fn not_found() -> Response {
    redirect_with(PRODUCTS_PAGE, "error", "not_found").into_response()
}
