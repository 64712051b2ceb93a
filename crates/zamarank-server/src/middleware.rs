use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id for one inbound request, available to handlers as an
/// extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    /// Reuses a non-blank inbound `x-request-id`, otherwise mints a `UUIDv4`.
    fn from_headers(headers: &HeaderMap) -> Self {
        let inbound = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        match inbound {
            Some(id) => Self(id.to_owned()),
            None => Self(Uuid::new_v4().to_string()),
        }
    }
}

/// Tags the request with a [`RequestId`] and echoes it on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = RequestId::from_headers(req.headers());
    let echoed = HeaderValue::from_str(&id.0).ok();
    req.extensions_mut().insert(id);

    let mut response = next.run(req).await;
    if let Some(value) = echoed {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
