//! Middleware for routes that only serve HTMX requests.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRequest;

use crate::not_found::NotFound;

/// Respond with the 404 page unless the request was made by HTMX.
///
/// Fragments and API endpoints are not meant to be opened in the browser directly.
pub async fn htmx_only(HxRequest(is_htmx): HxRequest, request: Request, next: Next) -> Response {
    if is_htmx {
        next.run(request).await
    } else {
        tracing::debug!("rejected non-HTMX request to {}", request.uri());
        NotFound.into_response()
    }
}
