//! Gateway replies, independent of the HTTP framework.

use crate::cache::CachedResponse;

/// The single answer the gateway produces for a request.
///
/// The HTTP adapter turns this into a framework response (see
/// [`server::service`](crate::server::service)).
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// A stored (or freshly built) response, replayed verbatim.
    Response(CachedResponse),
    /// `404 Not Found`.
    NotFound,
    /// `302 Found` to the given absolute URL.
    Redirect(String),
    /// `200 OK` with a JSON body.
    Json(serde_json::Value),
}

impl Reply {
    /// HTTP status code this reply maps to.
    pub fn status(&self) -> u16 {
        match self {
            Reply::Response(response) => response.status,
            Reply::NotFound => 404,
            Reply::Redirect(_) => 302,
            Reply::Json(_) => 200,
        }
    }

    /// Redirect target, if this is a redirect.
    pub fn location(&self) -> Option<&str> {
        match self {
            Reply::Redirect(url) => Some(url),
            _ => None,
        }
    }

    /// The stored response, if this reply carries one.
    pub fn response(&self) -> Option<&CachedResponse> {
        match self {
            Reply::Response(response) => Some(response),
            _ => None,
        }
    }
}
