mod profile;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use zamarank_card::Background;
use zamarank_client::ZamaClient;

use crate::middleware::{request_id, REQUEST_ID_HEADER};

pub const LIVENESS_MESSAGE: &str = "Zama helper API is running. Try /zama/<handle>";

#[derive(Clone)]
pub struct AppState {
    pub client: ZamaClient,
    pub background: Arc<Background>,
}

impl AppState {
    #[must_use]
    pub fn new(client: ZamaClient, background: Background) -> Self {
        Self {
            client,
            background: Arc::new(background),
        }
    }
}

/// Error envelope returned by every route: `{"error": "server_error", "message": "..."}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn server_error(message: impl Into<String>) -> Self {
        Self {
            error: "server_error",
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/zama/{handle}", get(profile::get_profile))
        .route("/card/{handle}", get(profile::get_card))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}

async fn root() -> &'static str {
    LIVENESS_MESSAGE
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use zamarank_client::ZamaClientConfig;

    fn app_for(server: &MockServer) -> Router {
        let client = ZamaClient::new(&ZamaClientConfig::new(format!("{}/api", server.uri())))
            .expect("client");
        build_app(AppState::new(client, Background::Gradient))
    }

    async fn get(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response")
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }

    async fn mount_ranked_bob(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/search/bob"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "handle": "@bob",
                "displayName": "Bob",
                "results": [{"season": "s1", "rank": 5}]
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/zama"))
            .and(query_param("timeframe", "24h"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"handle": "@bob", "rank": 11, "mindshare": 0.8}]
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/zama"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(server)
            .await;
    }

    #[test]
    fn api_error_maps_to_internal_server_error() {
        let response = ApiError::server_error("boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn root_returns_liveness_message() {
        let server = MockServer::start().await;
        let response = get(app_for(&server), "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        assert_eq!(&body[..], LIVENESS_MESSAGE.as_bytes());
    }

    #[tokio::test]
    async fn profile_route_normalizes_handle_and_returns_profile() {
        let server = MockServer::start().await;
        mount_ranked_bob(&server).await;

        let response = get(app_for(&server), "/zama/@BOB").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["handle"], "@bob");
        assert_eq!(json["displayName"], "Bob");
        assert_eq!(json["seasons"]["s1"], 5);
        assert_eq!(json["s5"]["rank24h"], 11);
        assert_eq!(json["s5"]["mindshare24h"], 0.8);
        assert!(json["s5"]["rank7d"].is_null());
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn profile_route_reports_not_ranked() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search/ghost"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .mount(&server)
            .await;

        let response = get(app_for(&server), "/zama/ghost").await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "not_ranked");
        assert_eq!(json["handle"], "@ghost");
    }

    #[tokio::test]
    async fn profile_route_wraps_upstream_failure_in_error_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search/bob"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let response = get(app_for(&server), "/zama/bob").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = json_body(response).await;
        assert_eq!(json["error"], "server_error");
        let message = json["message"].as_str().expect("message string");
        assert!(message.contains("invalid JSON"), "{message}");
        assert!(message.contains("<html>not json</html>"), "{message}");
    }

    #[tokio::test]
    async fn card_route_returns_png() {
        let server = MockServer::start().await;
        mount_ranked_bob(&server).await;

        let response = get(app_for(&server), "/card/bob").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("image/png")
        );
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        assert_eq!(&body[..4], b"\x89PNG");
    }

    #[tokio::test]
    async fn card_route_uses_error_envelope_on_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("nope"))
            .mount(&server)
            .await;

        let response = get(app_for(&server), "/card/bob").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json["error"], "server_error");
    }
}
