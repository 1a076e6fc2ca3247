use super::protocol::{ENDPOINT_CUSTOMER, ENDPOINT_HOME};
use super::router::TenantRouter;
use crate::config::Config;
use crate::local::handlers::{handle_home, serve_customer_page};
use crate::local::store::LocalStore;

use axum::extract::Path;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Router};
use std::sync::Arc;

/// Builds the HTTP application around handles owned by `main`.
pub fn build_app(
    config: Arc<Config>,
    store: Arc<LocalStore>,
    router: Arc<TenantRouter>,
) -> Router {
    Router::new()
        .route(ENDPOINT_HOME, get(handle_home))
        .route(ENDPOINT_CUSTOMER, get(handle_customer))
        .layer(Extension(config))
        .layer(Extension(store))
        .layer(Extension(router))
}

pub async fn handle_customer(
    Path(customer_id): Path<String>,
    Extension(config): Extension<Arc<Config>>,
    Extension(store): Extension<Arc<LocalStore>>,
    Extension(router): Extension<Arc<TenantRouter>>,
) -> Response {
    if customer_id == config.customer_id {
        return serve_customer_page(store, &customer_id).await;
    }

    router.route(&customer_id).await.into_response()
}
