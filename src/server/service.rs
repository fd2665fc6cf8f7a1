//! axum adapter for the gateway.
//!
//! The gateway does its own routing (slot paths are dynamic and the
//! manifest/refresh paths are configurable), so the axum router consists of
//! a single fallback handler that forwards every request.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::gateway::{Gateway, Reply};

/// Build an axum router serving every path through `gateway`.
pub fn router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .fallback(dispatch)
        .with_state(gateway)
        .layer(TraceLayer::new_for_http())
}

async fn dispatch(State(gateway): State<Arc<Gateway>>, method: Method, uri: Uri) -> Response {
    gateway.handle(method.as_str(), uri.path()).await.into_response()
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Response(cached) => {
                let status =
                    StatusCode::from_u16(cached.status).unwrap_or(StatusCode::BAD_GATEWAY);
                let mut response = Response::new(Body::from(cached.body));
                *response.status_mut() = status;
                let headers = response.headers_mut();
                for (name, value) in &cached.headers {
                    match (
                        HeaderName::from_bytes(name.as_bytes()),
                        HeaderValue::from_str(value),
                    ) {
                        (Ok(name), Ok(value)) => {
                            headers.append(name, value);
                        }
                        _ => warn!(header = %name, "dropping unrepresentable cached header"),
                    }
                }
                response
            }
            Reply::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
            Reply::Redirect(url) => match HeaderValue::from_str(&url) {
                Ok(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
                Err(_) => {
                    warn!(%url, "redirect target is not a valid header value");
                    StatusCode::BAD_GATEWAY.into_response()
                }
            },
            Reply::Json(value) => axum::Json(value).into_response(),
        }
    }
}
