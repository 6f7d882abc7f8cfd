//! Read-only HTTP surface over the product catalog.
//!
//! - `GET /consigna`: static description page (HTML)
//! - `GET /products?limit=N`: whole catalog or its first N entries
//! - `GET /products/{productId}`: a single product

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};
use tracing::{error, info, warn};
use uuid::Uuid;
use vitrina_core::domain::product::{Product, ProductId};
use vitrina_core::errors::{ApplicationError, DomainError, InterfaceError};
use vitrina_store::CatalogRepository;

const CONSIGNA_TEMPLATE: &str = "consigna.html";

#[derive(Clone)]
pub struct CatalogState {
    catalog: Arc<dyn CatalogRepository>,
    templates: Arc<Tera>,
}

impl CatalogState {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog, templates: init_templates() }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub productos: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub producto: Product,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
    pub correlation_id: String,
}

#[derive(Debug, Serialize)]
struct Endpoint {
    method: &'static str,
    path: &'static str,
    summary: &'static str,
}

const ENDPOINTS: &[Endpoint] = &[
    Endpoint { method: "GET", path: "/consigna", summary: "esta descripcion" },
    Endpoint {
        method: "GET",
        path: "/products?limit=N",
        summary: "lista de productos, opcionalmente limitada a los primeros N",
    },
    Endpoint { method: "GET", path: "/products/{productId}", summary: "un producto por id" },
    Endpoint { method: "GET", path: "/health", summary: "estado del servicio" },
];

/// Error body returned by every catalog route.
#[derive(Debug)]
pub struct ApiError(InterfaceError);

impl ApiError {
    fn from_application(error: impl Into<ApplicationError>) -> Self {
        let correlation_id = Uuid::new_v4().to_string();
        Self::logged(error.into().into_interface(correlation_id))
    }

    /// Not-found for a path segment that is not a product id at all.
    fn unknown_reference(raw: &str) -> Self {
        Self::logged(InterfaceError::NotFound {
            message: format!("product `{raw}` does not exist"),
            correlation_id: Uuid::new_v4().to_string(),
        })
    }

    fn logged(mapped: InterfaceError) -> Self {
        match &mapped {
            InterfaceError::ServiceUnavailable { .. } | InterfaceError::Internal { .. } => {
                error!(
                    event_name = "http.catalog.error",
                    correlation_id = %mapped.correlation_id(),
                    error = %mapped,
                    "catalog request failed"
                );
            }
            _ => {
                warn!(
                    event_name = "http.catalog.rejected",
                    correlation_id = %mapped.correlation_id(),
                    error = %mapped,
                    "catalog request rejected"
                );
            }
        }

        Self(mapped)
    }

    pub fn status(&self) -> StatusCode {
        match self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InterfaceError::Conflict { .. } => StatusCode::CONFLICT,
            InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.0.user_message().to_string(),
            detail: self.0.message().to_string(),
            correlation_id: self.0.correlation_id().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

pub fn router(state: CatalogState) -> Router {
    Router::new()
        .route("/consigna", get(consigna))
        .route("/products", get(list_products))
        .route("/products/{product_id}", get(get_product))
        .with_state(state)
}

fn init_templates() -> Arc<Tera> {
    let mut tera = Tera::default();
    // Template content is static; paths such as `/products/{productId}` render verbatim.
    tera.autoescape_on(Vec::new());
    if let Err(error) =
        tera.add_raw_template(CONSIGNA_TEMPLATE, include_str!("../../../templates/consigna.html"))
    {
        warn!(error = %error, "failed to register consigna template");
    }
    Arc::new(tera)
}

pub async fn consigna(State(state): State<CatalogState>) -> Result<Html<String>, ApiError> {
    let mut context = Context::new();
    context.insert("service", "vitrina");
    context.insert("endpoints", ENDPOINTS);

    state.templates.render(CONSIGNA_TEMPLATE, &context).map(Html).map_err(|error| {
        ApiError::from_application(ApplicationError::Configuration(format!(
            "consigna template could not be rendered: {error}"
        )))
    })
}

pub async fn list_products(
    State(state): State<CatalogState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProductsResponse>, ApiError> {
    let mut productos = state.catalog.list().await.map_err(ApiError::from_application)?;

    if let Some(limit) = parse_limit(query.limit.as_deref()) {
        productos.truncate(limit);
    }

    info!(
        event_name = "http.catalog.listed",
        product_count = productos.len(),
        limit = query.limit.as_deref().unwrap_or(""),
        "catalog listed"
    );
    Ok(Json(ProductsResponse { productos }))
}

pub async fn get_product(
    State(state): State<CatalogState>,
    Path(product_id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    // A non-numeric id cannot match any product.
    let id =
        product_id.parse::<ProductId>().map_err(|_| ApiError::unknown_reference(&product_id))?;

    match state.catalog.get_by_id(id).await.map_err(ApiError::from_application)? {
        Some(producto) => Ok(Json(ProductResponse { producto })),
        None => Err(ApiError::from_application(DomainError::ProductNotFound { id })),
    }
}

/// `limit` applies only when it is a non-negative integer; anything else
/// returns the whole catalog. Values past the end are clamped by truncation.
pub fn parse_limit(raw: Option<&str>) -> Option<usize> {
    raw?.trim().parse::<usize>().ok()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        extract::{Path, Query, State},
        http::{Request, StatusCode},
        response::IntoResponse,
        Json,
    };
    use rust_decimal::Decimal;
    use tower::ServiceExt;
    use vitrina_core::domain::product::{Product, ProductId};
    use vitrina_store::InMemoryCatalog;

    use super::*;

    fn product(id: u64) -> Product {
        Product {
            id: ProductId(id),
            title: format!("producto prueba {id}"),
            description: "Este es un producto prueba".to_string(),
            price: Decimal::new(200, 0),
            thumbnail: "Sin imagen".to_string(),
            code: format!("code-{id}"),
            stock: 25,
        }
    }

    fn state_with(count: u64) -> CatalogState {
        let products = (1..=count).map(product).collect();
        CatalogState::new(Arc::new(InMemoryCatalog::with_products(products)))
    }

    fn limit(value: &str) -> Query<ListQuery> {
        Query(ListQuery { limit: Some(value.to_string()) })
    }

    #[tokio::test]
    async fn limit_returns_first_entries_in_insertion_order() {
        let Json(body) = list_products(State(state_with(5)), limit("2")).await.expect("list");

        let ids: Vec<u64> = body.productos.iter().map(|product| product.id.0).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn missing_or_non_numeric_limit_returns_everything() {
        let Json(all) =
            list_products(State(state_with(5)), Query(ListQuery::default())).await.expect("list");
        let Json(garbage) =
            list_products(State(state_with(5)), limit("abc")).await.expect("list");
        let Json(oversized) =
            list_products(State(state_with(5)), limit("50")).await.expect("list");

        assert_eq!(all.productos.len(), 5);
        assert_eq!(garbage.productos.len(), 5);
        assert_eq!(oversized.productos.len(), 5);
    }

    #[tokio::test]
    async fn existing_product_is_returned() {
        let Json(body) = get_product(State(state_with(3)), Path("2".to_string()))
            .await
            .expect("product 2 exists");

        assert_eq!(body.producto.id, ProductId(2));
    }

    #[tokio::test]
    async fn unknown_or_non_numeric_product_is_a_single_not_found() {
        for (raw, detail) in [("9", "product 9 does not exist"), ("abc", "product `abc` does not exist")] {
            let error = get_product(State(state_with(3)), Path(raw.to_string()))
                .await
                .expect_err("product must be absent");
            assert_eq!(error.status(), StatusCode::NOT_FOUND);

            let response = error.into_response();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
            let payload: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
            assert_eq!(payload["error"], "producto no encontrado");
            assert_eq!(payload["detail"], detail);
            assert!(payload["correlation_id"].as_str().is_some_and(|id| !id.is_empty()));
        }
    }

    #[tokio::test]
    async fn router_serves_products_envelope() {
        let app = router(state_with(3));

        let response = app
            .oneshot(Request::builder().uri("/products?limit=1").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let payload: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(payload["productos"].as_array().map(Vec::len), Some(1));
        assert_eq!(payload["productos"][0]["price"], 200);
    }

    #[tokio::test]
    async fn router_serves_single_product_envelope() {
        let app = router(state_with(3));

        let response = app
            .oneshot(Request::builder().uri("/products/3").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let payload: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(payload["producto"]["code"], "code-3");
    }

    #[tokio::test]
    async fn consigna_renders_static_description() {
        let Html(page) = consigna(State(state_with(0))).await.expect("render consigna");

        assert!(page.contains("<h1>Desarrollar un servidor"));
        assert!(page.contains("/products/{productId}"));
    }

    #[tokio::test]
    async fn malformed_catalog_file_maps_to_service_unavailable() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("products.json");
        let catalog = vitrina_store::JsonFileCatalog::open(&path).await;
        tokio::fs::write(&path, "{broken").await.expect("corrupt catalog");

        let state = CatalogState::new(Arc::new(catalog));
        let error = list_products(State(state), Query(ListQuery::default()))
            .await
            .expect_err("malformed file must fail");

        assert_eq!(error.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn parse_limit_accepts_only_non_negative_integers() {
        assert_eq!(parse_limit(Some("3")), Some(3));
        assert_eq!(parse_limit(Some(" 0 ")), Some(0));
        assert_eq!(parse_limit(Some("-1")), None);
        assert_eq!(parse_limit(Some("2.5")), None);
        assert_eq!(parse_limit(Some("")), None);
        assert_eq!(parse_limit(None), None);
    }
}
