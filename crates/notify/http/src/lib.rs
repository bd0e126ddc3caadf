//! Order Notification HTTP Layer
//!
//! Axum handlers for the notification webhooks and admin subscription API.

mod api;
mod handlers;
mod middleware;

pub use api::*;
pub use handlers::*;
pub use middleware::*;

use axum::Router;

/// Create the admin new-order webhook router.
pub fn admin_router<A>(service: A) -> Router
where
    A: notify_service::AdminNotify + Clone + 'static,
{
    use axum::routing::post;

    Router::new()
        .route(
            "/notify/admin",
            post(handlers::admin_notify_handler::<A>),
        )
        .with_state(service)
}

/// Create the customer status-change router.
pub fn customer_router<C>(service: C) -> Router
where
    C: notify_service::CustomerNotify + Clone + 'static,
{
    use axum::routing::post;

    Router::new()
        .route(
            "/notify/customer",
            post(handlers::customer_notify_handler::<C>),
        )
        .with_state(service)
}

/// Create the API router.
pub fn api_router<St>(store: St) -> Router
where
    St: notify_storage::SubscriptionStore + Clone + 'static,
{
    use axum::routing::{get, post};

    Router::new()
        .route("/v1/subscriptions", post(api::subscribe_handler::<St>))
        .route("/healthz", get(api::health_handler))
        .with_state(store)
}

/// Create the full application with CORS and request logging.
///
/// The CORS layer answers every `OPTIONS` request itself, so pre-flights
/// never reach a handler.
pub fn notify_app<A, C, St>(admin: A, customer: C, store: St) -> Router
where
    A: notify_service::AdminNotify + Clone + 'static,
    C: notify_service::CustomerNotify + Clone + 'static,
    St: notify_storage::SubscriptionStore + Clone + 'static,
{
    Router::new()
        .merge(admin_router(admin))
        .merge(customer_router(customer))
        .merge(api_router(store))
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .layer(middleware::cors_layer())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use notify_core::Settings;
    use notify_service::testing::{
        MemoryStore, RecordingMailer, RecordingMessenger, RecordingPusher,
    };
    use notify_service::{AdminNotifier, CustomerNotifier};
    use tower::ServiceExt as _;

    struct Harness {
        store: MemoryStore,
        pusher: RecordingPusher,
        mailer: RecordingMailer,
        messenger: RecordingMessenger,
    }

    impl Harness {
        fn new(store: MemoryStore) -> Self {
            Self {
                store,
                pusher: RecordingPusher::new(),
                mailer: RecordingMailer::new(),
                messenger: RecordingMessenger::new(),
            }
        }

        fn app(&self) -> Router {
            notify_app(
                AdminNotifier::new(self.store.clone(), self.pusher.clone()),
                CustomerNotifier::new(
                    self.store.clone(),
                    Some(self.mailer.clone()),
                    Some(self.messenger.clone()),
                ),
                self.store.clone(),
            )
        }

        async fn post(&self, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
            let request = Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap();

            let response = self.app().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();

            (status, serde_json::from_slice(&bytes).unwrap())
        }
    }

    #[tokio::test]
    async fn test_admin_duplicate_token_scenario() {
        let harness = Harness::new(MemoryStore::new().with_tokens(["tok-A", "tok-A"]));

        let (status, body) = harness
            .post(
                "/notify/admin",
                serde_json::json!({"record": {"id": "ORD123", "total_amount": 499}}),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({"message": "Notifications sent", "success": 1, "failure": 0})
        );

        let calls = harness.pusher.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, vec!["tok-A"]);
    }

    #[tokio::test]
    async fn test_admin_no_subscribers() {
        let harness = Harness::new(MemoryStore::new());

        let (status, body) = harness
            .post("/notify/admin", serde_json::json!({"record": {"id": "ORD1", "total": 10}}))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"message": "No subscribers"}));
        assert!(harness.pusher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_admin_push_disabled() {
        let harness = Harness::new(
            MemoryStore::new()
                .with_settings(Settings {
                    push_enabled: Some(false),
                    ..Default::default()
                })
                .with_tokens(["tok-A"]),
        );

        let (status, body) = harness
            .post("/notify/admin", serde_json::json!({"record": {"id": "ORD1"}}))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Push notifications disabled");
        assert!(harness.pusher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_admin_missing_record() {
        let harness = Harness::new(MemoryStore::new().with_tokens(["tok-A"]));

        let (status, body) = harness
            .post("/notify/admin", serde_json::json!({"type": "INSERT"}))
            .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("no order record"));
    }

    #[tokio::test]
    async fn test_admin_invalid_json() {
        let harness = Harness::new(MemoryStore::new());
        let request = Request::builder()
            .method(Method::POST)
            .uri("/notify/admin")
            .body(Body::from("{not json"))
            .unwrap();

        let response = harness.app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_admin_push_disabled_ignores_malformed_body() {
        let harness = Harness::new(MemoryStore::new().with_settings(Settings {
            push_enabled: Some(false),
            ..Default::default()
        }));
        let request = Request::builder()
            .method(Method::POST)
            .uri("/notify/admin")
            .body(Body::from("{not json"))
            .unwrap();

        let response = harness.app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({"message": "Push notifications disabled"}));
    }

    #[tokio::test]
    async fn test_customer_scenario_without_phone() {
        let harness = Harness::new(MemoryStore::new().with_settings(Settings {
            whatsapp_enabled: Some(true),
            ..Default::default()
        }));

        let (status, body) = harness
            .post(
                "/notify/customer",
                serde_json::json!({
                    "orderId": "O1",
                    "status": "Shipped",
                    "customerName": "Asha",
                    "customerEmail": "a@b.com",
                    "customerPhone": null
                }),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"message": "Notifications processed"}));

        let sent = harness.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].subject.contains("O1"));
        assert!(harness.messenger.sent().is_empty());
    }

    #[tokio::test]
    async fn test_customer_missing_fields() {
        let harness = Harness::new(MemoryStore::new());

        let (status, body) = harness
            .post("/notify/customer", serde_json::json!({"customerEmail": "a@b.com"}))
            .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.get("error").is_some());
        assert!(harness.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_bare_options_acknowledged() {
        let harness = Harness::new(MemoryStore::new().with_tokens(["tok-A"]));
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/notify/admin")
            .header(header::ORIGIN, "https://shop.example")
            .body(Body::empty())
            .unwrap();

        let response = harness.app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        assert!(harness.pusher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_options_without_origin_does_no_work() {
        let harness = Harness::new(MemoryStore::new());
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/notify/customer")
            .body(Body::empty())
            .unwrap();

        let response = harness.app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(harness.mailer.sent().is_empty());
        assert!(harness.messenger.sent().is_empty());
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let harness = Harness::new(MemoryStore::new());
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/notify/customer")
            .header(header::ORIGIN, "https://shop.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "apikey, content-type")
            .body(Body::empty())
            .unwrap();

        let response = harness.app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS].to_str().unwrap();
        assert!(allowed.contains("apikey"));
        assert!(allowed.contains("x-client-info"));
        assert!(harness.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_subscribe() {
        let harness = Harness::new(MemoryStore::new().with_tokens(["tok-A"]));

        let (status, body) = harness
            .post("/v1/subscriptions", serde_json::json!({"token": "tok-B"}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Subscribed");

        harness
            .post("/v1/subscriptions", serde_json::json!({"token": "tok-A"}))
            .await;
        assert_eq!(harness.store.tokens(), vec!["tok-A", "tok-B"]);
    }

    #[tokio::test]
    async fn test_subscribe_blank_token() {
        let harness = Harness::new(MemoryStore::new());

        let (status, body) = harness
            .post("/v1/subscriptions", serde_json::json!({"token": "  "}))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "token is required");
        assert!(harness.store.tokens().is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let harness = Harness::new(MemoryStore::new());
        let request = Request::builder()
            .uri("/healthz")
            .body(Body::empty())
            .unwrap();

        let response = harness.app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
