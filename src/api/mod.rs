//! API handlers for the book loans REST endpoints

pub mod books;
pub mod health;
pub mod openapi;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // The web front is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_body_bytes = state.config.server.max_body_bytes;

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route("/books", post(books::book_request))
        .route("/books/:book_id", get(books::get_book))
        .route("/invoke", post(books::invoke))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        config::AppConfig,
        repository::{MockBookStore, Repository},
        services::Services,
    };

    fn state(repository: Repository) -> AppState {
        state_with(AppConfig::default(), repository)
    }

    fn state_with(config: AppConfig, repository: Repository) -> AppState {
        AppState {
            config: Arc::new(config),
            services: Arc::new(Services::new(repository)),
        }
    }

    fn app() -> Router {
        create_router(state(Repository::in_memory()))
    }

    fn app_with_body_limit(max_body_bytes: usize) -> Router {
        let mut config = AppConfig::default();
        config.server.max_body_bytes = max_body_bytes;
        create_router(state_with(config, Repository::in_memory()))
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app().oneshot(get("/api/v1/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "healthy");

        let response = app().oneshot(get("/api/v1/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ready");
    }

    #[tokio::test]
    async fn test_ready_reports_storage_fault() {
        let mut store = MockBookStore::new();
        store.expect_ping().returning(|| {
            Err(redis::RedisError::from((redis::ErrorKind::IoError, "connection refused")).into())
        });
        let app = create_router(state(Repository::new(Arc::new(store))));

        let response = app.oneshot(get("/api/v1/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_book_lifecycle_over_http() {
        let app = app();

        let create = json!({
            "operation": "create",
            "title": "T",
            "borrower": "B",
            "borrowed_date": "2024-01-01",
        });
        let response = app
            .clone()
            .oneshot(post("/api/v1/books", create.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"].to_str().unwrap(),
            "application/json"
        );
        let body = json_body(response).await;
        assert_eq!(body["message"], "Book created");
        let book_id = body["book_id"].as_str().unwrap().to_string();

        let update = json!({
            "operation": "update",
            "book_id": book_id,
            "returned_date": "2024-01-09",
            "title": "New",
        });
        let response = app
            .clone()
            .oneshot(post("/api/v1/books", update.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(get(&format!("/api/v1/books/{}", book_id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({
                "book_id": book_id,
                "title": "New",
                "borrower": "B",
                "borrowed_date": "2024-01-01",
                "returned_date": "2024-01-09",
            })
        );

        let delete = json!({"operation": "delete", "book_id": book_id});
        let response = app
            .clone()
            .oneshot(post("/api/v1/books", delete.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(get(&format!("/api/v1/books/{}", book_id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_client_errors_over_http() {
        let response = app().oneshot(post("/api/v1/books", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({"error": "Missing request body"}));

        let response = app()
            .oneshot(post("/api/v1/books", r#"{"operation":"rename"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({"error": "Invalid operation"}));

        let response = app()
            .oneshot(post("/api/v1/books", vec![0xff_u8, 0xfe]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({"error": "Invalid request body"}));
    }

    #[tokio::test]
    async fn test_invoke_returns_envelope() {
        let envelope = json!({
            "body": json!({"operation": "delete"}).to_string(),
            "isBase64Encoded": false,
        });

        let response = app()
            .oneshot(post("/api/v1/invoke", envelope.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({
                "statusCode": 400,
                "body": r#"{"error":"Missing required field"}"#,
            })
        );
    }

    #[tokio::test]
    async fn test_invoke_unreadable_envelope() {
        for raw in [r#"{"body": 5}"#, "not json", ""] {
            let response = app().oneshot(post("/api/v1/invoke", raw)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                json_body(response).await,
                json!({
                    "statusCode": 400,
                    "body": r#"{"error":"Invalid request body"}"#,
                })
            );
        }
    }

    #[tokio::test]
    async fn test_invoke_without_content_type() {
        let envelope = json!({
            "body": json!({"operation": "delete", "book_id": "unknown"}).to_string(),
        });
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/invoke")
            .body(Body::from(envelope.to_string()))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({
                "statusCode": 200,
                "body": r#"{"message":"Book deleted"}"#,
            })
        );
    }

    #[tokio::test]
    async fn test_oversized_body_is_client_error() {
        let create = json!({
            "operation": "create",
            "title": "T".repeat(512),
            "borrower": "B",
            "borrowed_date": "2024-01-01",
        })
        .to_string();

        let response = app_with_body_limit(256)
            .oneshot(post("/api/v1/books", create.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({"error": "Request body too large"}));

        let envelope = json!({ "body": create }).to_string();
        let response = app_with_body_limit(256)
            .oneshot(post("/api/v1/invoke", envelope))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({
                "statusCode": 400,
                "body": r#"{"error":"Request body too large"}"#,
            })
        );
    }
}
