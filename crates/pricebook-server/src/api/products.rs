//! Product handlers: CRUD on `/products` and search on `/products/search`.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use pricebook_core::{Product, ProductInput};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_service_error, ApiError, ApiResponse, AppState};

pub(super) const MSG_CREATED: &str = "Product created successfully";
pub(super) const MSG_UPDATED: &str = "Product updated successfully";
pub(super) const MSG_DELETED: &str = "Product deleted successfully";
pub(super) const MSG_RETRIEVED: &str = "Product retrieved successfully";
pub(super) const MSG_LISTED: &str = "Products retrieved successfully";
pub(super) const MSG_FOUND: &str = "Products found";
pub(super) const MSG_PRODUCT_NOT_FOUND: &str = "Product not found";
pub(super) const MSG_INVALID_PAYLOAD: &str = "Invalid request payload";
pub(super) const MSG_INVALID_ID: &str = "Invalid ID parameter";
pub(super) const MSG_FAILED_CREATE: &str = "Failed to create product";
pub(super) const MSG_FAILED_UPDATE: &str = "Failed to update product";
pub(super) const MSG_FAILED_DELETE: &str = "Failed to delete product";
pub(super) const MSG_FAILED_GET: &str = "Failed to get product";
pub(super) const MSG_FAILED_LIST: &str = "Failed to get products";
pub(super) const MSG_FAILED_SEARCH: &str = "Failed to search products";

#[derive(Debug, Deserialize)]
pub(super) struct ProductQuery {
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct SearchRequest {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default, alias = "productCategory")]
    pub product_category: Option<String>,
    #[serde(default)]
    pub tier: Option<String>,
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::bad_request(MSG_INVALID_ID))
}

fn payload<T>(body: Result<Json<T>, JsonRejection>, req_id: &str) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        tracing::debug!(request_id = req_id, error = %rejection, "rejected request body");
        ApiError::bad_request(MSG_INVALID_PAYLOAD)
    })
}

pub(super) async fn create_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> Result<ApiResponse<Product>, ApiError> {
    let input = payload(body, &req_id.0)?;
    let product = state
        .products
        .create(input)
        .await
        .map_err(|e| map_service_error(&req_id.0, e, MSG_FAILED_CREATE))?;

    tracing::info!(request_id = %req_id.0, product_id = product.id, "product created");
    Ok(ApiResponse::new(
        StatusCode::CREATED,
        MSG_CREATED,
        Some(product),
    ))
}

/// `GET /products?id=N` fetches one product; without `id` lists them all.
pub(super) async fn get_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProductQuery>,
) -> Result<Response, ApiError> {
    if let Some(raw) = query.id.as_deref() {
        let id = parse_id(raw)?;
        let product = state
            .products
            .get(id)
            .await
            .map_err(|e| map_service_error(&req_id.0, e, MSG_FAILED_GET))?;
        return Ok(ApiResponse::ok(MSG_RETRIEVED, product).into_response());
    }

    let products = state
        .products
        .list()
        .await
        .map_err(|e| map_service_error(&req_id.0, e, MSG_FAILED_LIST))?;
    Ok(ApiResponse::ok(MSG_LISTED, products).into_response())
}

pub(super) async fn update_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> Result<ApiResponse<Product>, ApiError> {
    let input = payload(body, &req_id.0)?;
    let product = state
        .products
        .update(input)
        .await
        .map_err(|e| map_service_error(&req_id.0, e, MSG_FAILED_UPDATE))?;

    tracing::info!(request_id = %req_id.0, product_id = product.id, "product updated");
    Ok(ApiResponse::ok(MSG_UPDATED, product))
}

pub(super) async fn delete_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProductQuery>,
) -> Result<ApiResponse<()>, ApiError> {
    let id = query
        .id
        .as_deref()
        .ok_or_else(|| ApiError::bad_request(MSG_INVALID_ID))
        .and_then(parse_id)?;

    state
        .products
        .delete(id)
        .await
        .map_err(|e| map_service_error(&req_id.0, e, MSG_FAILED_DELETE))?;

    tracing::info!(request_id = %req_id.0, product_id = id, "product deleted");
    Ok(ApiResponse::new(StatusCode::OK, MSG_DELETED, None))
}

pub(super) async fn search_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<ApiResponse<Vec<Product>>, ApiError> {
    let request = payload(body, &req_id.0)?;
    let products = state
        .products
        .search(
            request.keyword.as_deref(),
            request.product_category.as_deref(),
            request.tier.as_deref(),
        )
        .await
        .map_err(|e| map_service_error(&req_id.0, e, MSG_FAILED_SEARCH))?;

    Ok(ApiResponse::ok(MSG_FOUND, products))
}
