use super::store::{LocalStore, LocalStoreError};
use crate::config::Config;

use axum::Extension;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use std::sync::Arc;

/// Main page of the customer served by this process.
pub async fn handle_home(
    Extension(config): Extension<Arc<Config>>,
    Extension(store): Extension<Arc<LocalStore>>,
) -> Response {
    serve_customer_page(store, &config.customer_id).await
}

/// Counts the visit and renders the page.
pub async fn serve_customer_page(store: Arc<LocalStore>, customer_id: &str) -> Response {
    match store.record_visit().await {
        Ok(count) => Html(render_page(customer_id, count)).into_response(),
        Err(LocalStoreError::Closed) => {
            tracing::warn!("Visit for customer {} arrived during shutdown", customer_id);
            (StatusCode::SERVICE_UNAVAILABLE, "shutting down").into_response()
        }
        Err(e) => {
            tracing::error!("Failed to record visit for customer {}: {}", customer_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to update visit count",
            )
                .into_response()
        }
    }
}

pub fn render_page(customer_id: &str, count: i64) -> String {
    let customer = escape_html(customer_id);
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Customer {customer}</title></head>\n<body>\n<h1>Customer {customer}</h1>\n<p>This page has been visited {count} time{plural}.</p>\n</body>\n</html>\n",
        plural = if count == 1 { "" } else { "s" },
    )
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
