use std::sync::Arc;

use axum::{
    extract::{
        Extension, Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use catalog_core::ProductId;
use catalog_products::StockDecrease;

use crate::app::dto::{ProductRequest, StockQuery};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/sku/:sku", get(get_product_by_sku))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/check-stock", get(check_stock))
        .route("/:id/decrease-stock", post(decrease_stock))
}

fn parse_id(raw: &str) -> Result<ProductId, axum::response::Response> {
    raw.parse().map_err(errors::domain_error_to_response)
}

fn parse_body(
    body: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<ProductRequest, axum::response::Response> {
    match body {
        Ok(Json(req)) => Ok(req),
        Err(e) => Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            e.body_text(),
        )),
    }
}

fn parse_quantity(
    query: Result<Query<StockQuery>, QueryRejection>,
) -> Result<u32, axum::response::Response> {
    match query {
        Ok(Query(q)) => Ok(q.quantity),
        Err(e) => Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            e.body_text(),
        )),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.products.list_products().await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.products.get_product(id).await {
        Ok(Some(p)) => (StatusCode::OK, Json(p)).into_response(),
        Ok(None) => errors::not_found("product not found"),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_product_by_sku(
    Extension(services): Extension<Arc<AppServices>>,
    Path(sku): Path<String>,
) -> axum::response::Response {
    match services.products.get_product_by_sku(&sku).await {
        Ok(Some(p)) => (StatusCode::OK, Json(p)).into_response(),
        Ok(None) => errors::not_found("product not found"),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<ProductRequest>, JsonRejection>,
) -> axum::response::Response {
    let input = match parse_body(body).map(ProductRequest::into_input) {
        Ok(Ok(input)) => input,
        Ok(Err(e)) => return errors::domain_error_to_response(e),
        Err(resp) => return resp,
    };

    match services.products.create_product(input).await {
        Ok(p) => (StatusCode::CREATED, Json(p)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<ProductRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let input = match parse_body(body).map(ProductRequest::into_input) {
        Ok(Ok(input)) => input,
        Ok(Err(e)) => return errors::domain_error_to_response(e),
        Err(resp) => return resp,
    };

    match services.products.update_product(id, input).await {
        Ok(Some(p)) => (StatusCode::OK, Json(p)).into_response(),
        Ok(None) => errors::not_found("product not found"),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.products.delete_product(id).await {
        Ok(true) => StatusCode::OK.into_response(),
        Ok(false) => errors::not_found("product not found"),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// A missing product reads as "not in stock" here, never as 404.
pub async fn check_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    query: Result<Query<StockQuery>, QueryRejection>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let quantity = match parse_quantity(query) {
        Ok(q) => q,
        Err(resp) => return resp,
    };
    match services.products.check_stock(id, quantity).await {
        Ok(in_stock) => (StatusCode::OK, Json(in_stock)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn decrease_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    query: Result<Query<StockQuery>, QueryRejection>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let quantity = match parse_quantity(query) {
        Ok(q) => q,
        Err(resp) => return resp,
    };
    match services.products.decrease_stock(id, quantity).await {
        Ok(StockDecrease::Decreased(p)) => (StatusCode::OK, Json(p)).into_response(),
        Ok(StockDecrease::NotFound) => errors::not_found("product not found"),
        Ok(StockDecrease::InsufficientStock {
            available,
            requested,
        }) => errors::json_error(
            StatusCode::CONFLICT,
            "insufficient_stock",
            format!("requested {requested}, only {available} in stock"),
        ),
        Err(e) => errors::service_error_to_response(e),
    }
}
