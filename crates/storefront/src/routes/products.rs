//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use aura_core::catalog::{self, SortOrder};
use aura_core::{Category, Product, ProductId};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    /// Category slug or display name.
    pub category: Option<String>,
    /// Free-text search.
    pub q: Option<String>,
    /// `featured`, `newest`, `price-asc` (`price-low`) or `price-desc`
    /// (`price-high`).
    pub sort: Option<String>,
}

/// List products, optionally filtered and sorted.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>> {
    let category = query
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(str::parse::<Category>)
        .transpose()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let order = query
        .sort
        .as_deref()
        .map(str::parse::<SortOrder>)
        .transpose()
        .map_err(AppError::BadRequest)?
        .unwrap_or_default();

    let mut listing: Vec<&Product> = match (query.q.as_deref().map(str::trim), category) {
        (Some(q), _) if !q.is_empty() => state.catalog().search(q),
        (_, Some(category)) => state.catalog().by_category(category).collect(),
        _ => state.catalog().all().iter().collect(),
    };
    if let Some(category) = category {
        listing.retain(|p| p.category == category);
    }
    catalog::sort(&mut listing, order);

    Ok(Json(listing.into_iter().cloned().collect()))
}

/// Show a single product.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    state
        .catalog()
        .get(&ProductId::new(id.as_str()))
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}
