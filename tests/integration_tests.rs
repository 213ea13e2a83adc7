//! # تست‌های Integration
//!
//! از بیرون crate و فقط با API عمومی:
//! - store و سرویس روی SQLite در RAM
//! - Router با `tower::ServiceExt::oneshot` (بدون شبکه)
//! - یک سناریوی کامل با سرور واقعی و `reqwest`
//!
//! ```bash
//! cargo test --test integration_tests
//! cargo test --test integration_tests router_   # فقط تست‌های Router
//! ```

use std::sync::Arc;

use shortlink::{
    config::{Config, ConfigBuilder},
    database::{Database, LinkStore, SqliteLinkStore},
    services::{AppState, LinkService},
    AppError,
};

const BASE_URL: &str = "https://sho.rt";

async fn test_db() -> Database {
    Database::in_memory().await.expect("in-memory database")
}

fn test_config() -> Config {
    ConfigBuilder::new().app_url(BASE_URL).build()
}

async fn test_service() -> LinkService {
    let store: Arc<dyn LinkStore> = Arc::new(SqliteLinkStore::new(test_db().await));
    LinkService::new(store, &test_config())
}

// =====================================
// تست‌های Config
// =====================================
mod config_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shortlink::config::Environment;

    fn load(toml: &str) -> shortlink::Result<Config> {
        Config::load_from(::config::File::from_str(toml, ::config::FileFormat::Toml))
    }

    #[test]
    fn test_required_settings_fail_fast() {
        let missing_app_url = load(r#"database_url = "sqlite::memory:""#);
        assert!(matches!(missing_app_url, Err(AppError::Config(_))));

        let missing_database_url = load(r#"app_url = "https://sho.rt""#);
        assert!(matches!(missing_database_url, Err(AppError::Config(_))));
    }

    #[test]
    fn test_defaults_are_applied() {
        let config = load(
            r#"
            app_url = "https://sho.rt/"
            database_url = "sqlite::memory:"
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.short_code_length, 7);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.base_url(), "https://sho.rt");
        assert_eq!(config.admin_token(), None);
    }

    #[test]
    fn test_production_requires_admin_token() {
        let result = load(
            r#"
            app_url = "https://sho.rt"
            database_url = "sqlite::memory:"
            environment = "production"
            "#,
        );
        assert!(matches!(result, Err(AppError::Config(_))));

        let config = load(
            r#"
            app_url = "https://sho.rt"
            database_url = "sqlite::memory:"
            environment = "production"
            admin_token = "s3cret"
            "#,
        )
        .unwrap();
        assert!(config.environment.is_production());
    }

    #[test]
    fn test_invalid_app_url_rejected() {
        let result = ConfigBuilder::new().app_url("not a url").build_validated();
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}

// =====================================
// تست‌های Error
// =====================================
mod error_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use axum::http::StatusCode;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::InvalidUrl("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::CodeCollision("abc1234".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Database(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_errors_are_opaque() {
        let err = AppError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(err.public_message(), shortlink::error::INTERNAL_ERROR_MESSAGE);

        let err = AppError::InvalidUrl("Invalid URL format".into());
        assert_eq!(err.public_message(), "Invalid URL format");
    }
}

// =====================================
// تست‌های Store
// =====================================
mod store_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_find_after_insert() {
        let store = SqliteLinkStore::new(test_db().await);
        let link = store.insert("https://example.com/a", "abcd123").await.unwrap();

        let by_code = store.find_by_short_code("abcd123").await.unwrap();
        let by_id = store.find_by_id(&link.id).await.unwrap();

        assert_eq!(by_code.as_ref(), Some(&link));
        assert_eq!(by_id, Some(link));
        assert_eq!(store.find_by_short_code("zzzz999").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_increment_is_cumulative() {
        let store = SqliteLinkStore::new(test_db().await);
        let link = store.insert("https://example.com", "inc1234").await.unwrap();

        for _ in 0..5 {
            store.increment_clicks(&link.id).await.unwrap();
        }

        let link = store.find_by_id(&link.id).await.unwrap().unwrap();
        assert_eq!(link.clicks, 5);
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let store = SqliteLinkStore::new(test_db().await);
        let link = store.insert("https://example.com", "del1234").await.unwrap();

        store.delete_by_id(&link.id).await.unwrap();

        assert_eq!(store.find_by_short_code("del1234").await.unwrap(), None);
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ping() {
        let store = SqliteLinkStore::new(test_db().await);
        assert!(store.ping().await.is_ok());
    }
}

// =====================================
// تست‌های Service
// =====================================
mod service_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use tokio::task::JoinSet;

    #[tokio::test]
    async fn test_many_creates_get_distinct_codes() {
        let service = test_service().await;
        let mut codes = HashSet::new();

        for i in 0..50 {
            let link = service
                .create(&format!("https://example.com/{i}"))
                .await
                .unwrap();
            assert_eq!(link.clicks, 0);
            assert!(codes.insert(link.short_code));
        }

        let dashboard = service.list().await.unwrap();
        assert_eq!(dashboard.stats.total_links, 50);
    }

    #[tokio::test]
    async fn test_same_url_twice_gets_two_links() {
        let service = test_service().await;

        let first = service.create("https://example.com").await.unwrap();
        let second = service.create("https://example.com").await.unwrap();

        assert_ne!(first.short_code, second.short_code);
        assert_eq!(service.list().await.unwrap().links.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_url_persists_nothing() {
        let service = test_service().await;

        for input in ["not a url", "", "   ", "mailto:a@b.c", "//example.com"] {
            let err = service.create(input).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidUrl(_)), "input: {input:?}");
        }

        assert!(service.list().await.unwrap().links.is_empty());
    }

    #[tokio::test]
    async fn test_short_url_uses_base() {
        let service = test_service().await;
        let link = service.create("https://example.com").await.unwrap();

        assert_eq!(
            service.short_url(&link),
            format!("{BASE_URL}/{}", link.short_code)
        );
    }

    #[tokio::test]
    async fn test_concurrent_resolves_count_every_click() {
        const RESOLVES: i64 = 25;

        let service = Arc::new(test_service().await);
        let link = service.create("https://example.com/hot").await.unwrap();

        let mut tasks = JoinSet::new();
        for _ in 0..RESOLVES {
            let service = service.clone();
            let code = link.short_code.clone();
            tasks.spawn(async move { service.resolve(&code).await });
        }

        while let Some(result) = tasks.join_next().await {
            assert_eq!(result.unwrap().unwrap(), "https://example.com/hot");
        }

        let dashboard = service.list().await.unwrap();
        assert_eq!(dashboard.links[0].clicks, RESOLVES);
        assert_eq!(dashboard.stats.total_clicks, RESOLVES);
    }

    #[tokio::test]
    async fn test_unknown_code_changes_nothing() {
        let service = test_service().await;
        service.create("https://example.com").await.unwrap();

        assert!(matches!(
            service.resolve("nope123").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.resolve("../etc").await,
            Err(AppError::NotFound(_))
        ));

        assert_eq!(service.list().await.unwrap().stats.total_clicks, 0);
    }

    #[tokio::test]
    async fn test_delete_lifecycle() {
        let service = test_service().await;
        let link = service.create("https://example.com").await.unwrap();

        service.delete(&link.id).await.unwrap();

        assert!(matches!(
            service.delete(&link.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.resolve(&link.short_code).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete("short").await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_stats() {
        let service = test_service().await;

        let empty = service.list().await.unwrap();
        assert_eq!(empty.stats.total_links, 0);
        assert_eq!(empty.stats.average_clicks, 0);

        let a = service.create("https://a.example").await.unwrap();
        service.create("https://b.example").await.unwrap();
        service.resolve(&a.short_code).await.unwrap();
        service.resolve(&a.short_code).await.unwrap();
        service.resolve(&a.short_code).await.unwrap();

        let stats = service.list().await.unwrap().stats;
        assert_eq!(stats.total_links, 2);
        assert_eq!(stats.total_clicks, 3);
        assert_eq!(stats.average_clicks, 2); // 1.5 -> 2
    }
}

// =====================================
// تست‌های Router
// =====================================
mod router_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use shortlink::{api, models::ShortLink};
    use tower::ServiceExt;

    async fn app_with(config: Config) -> Router {
        api::create_router(test_db().await, config)
    }

    async fn app() -> Router {
        app_with(test_config()).await
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(Method::DELETE).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn create(app: &Router, url: &str) -> String {
        let (status, body) = send(app, post_json("/", json!({ "url": url }))).await;
        assert_eq!(status, StatusCode::OK);
        body["shortCode"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn router_create_returns_short_url() {
        let app = app().await;

        for path in ["/", "/api/shorten"] {
            let (status, body) =
                send(&app, post_json(path, json!({ "url": "https://example.com/x" }))).await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["success"], true);

            let short_url = body["shortUrl"].as_str().unwrap();
            let code = short_url.strip_prefix("https://sho.rt/").unwrap();
            assert!(shortlink::utils::is_valid_short_code(code));
        }
    }

    #[tokio::test]
    async fn router_create_rejects_bad_input() {
        let app = app().await;

        let (status, body) = send(&app, post_json("/", json!({ "url": "not a url" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let (status, _) = send(&app, post_json("/", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, post_json("/", json!({ "url": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, dashboard) = send(&app, get("/dashboard")).await;
        assert_eq!(dashboard["stats"]["totalLinks"], 0);
    }

    #[tokio::test]
    async fn router_redirect_counts_clicks() {
        let app = app().await;
        let code = create(&app, "https://example.com/target").await;

        for expected_clicks in 1..=2 {
            let response = app
                .clone()
                .oneshot(get(&format!("/{code}")))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
            assert_eq!(
                response.headers()[header::LOCATION],
                "https://example.com/target"
            );

            let (_, dashboard) = send(&app, get("/dashboard")).await;
            assert_eq!(dashboard["links"][0]["clicks"], expected_clicks);
            assert_eq!(dashboard["stats"]["totalClicks"], expected_clicks);
        }
    }

    #[tokio::test]
    async fn router_unknown_code_is_404() {
        let app = app().await;

        let (status, body) = send(&app, get("/zzzzzzz")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn router_dashboard_shape() {
        let app = app().await;

        let (status, body) = send(&app, get("/dashboard")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["stats"],
            json!({ "totalLinks": 0, "totalClicks": 0, "averageClicks": 0 })
        );

        let code = create(&app, "https://example.com").await;
        let (_, body) = send(&app, get("/dashboard")).await;
        let row = &body["links"][0];
        assert_eq!(row["shortCode"], code.as_str());
        assert_eq!(row["shortUrl"], format!("{BASE_URL}/{code}"));
        assert_eq!(row["originalUrl"], "https://example.com/");
        assert!(row["id"].is_string());
    }

    #[tokio::test]
    async fn router_delete_without_admin_token_configured() {
        let app = app().await;
        create(&app, "https://example.com").await;

        let (_, dashboard) = send(&app, get("/dashboard")).await;
        let id = dashboard["links"][0]["id"].as_str().unwrap().to_string();

        let uri = format!("/api/delete-url?urlId={id}");
        let (status, body) = send(&app, delete(&uri, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, _) = send(&app, delete(&uri, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, delete("/api/delete-url", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn router_delete_requires_admin_token() {
        let app = app_with(
            ConfigBuilder::new()
                .app_url(BASE_URL)
                .admin_token("s3cret")
                .build(),
        )
        .await;
        create(&app, "https://example.com").await;

        let (_, dashboard) = send(&app, get("/dashboard")).await;
        let id = dashboard["links"][0]["id"].as_str().unwrap().to_string();
        let uri = format!("/api/delete-url?urlId={id}");

        let (status, _) = send(&app, delete(&uri, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, delete(&uri, Some("wrong"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, delete(&uri, Some("s3cret"))).await;
        assert_eq!(status, StatusCode::OK);

        let (_, dashboard) = send(&app, get("/dashboard")).await;
        assert_eq!(dashboard["stats"]["totalLinks"], 0);
    }

    #[tokio::test]
    async fn router_sets_request_id_and_security_headers() {
        let app = app().await;

        let response = app.clone().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");

        let request = Request::builder()
            .uri("/health")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }

    async fn location_of(app: &Router, code: &str) -> (StatusCode, Option<String>) {
        let response = app.clone().oneshot(get(&format!("/{code}"))).await.unwrap();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|value| value.to_str().unwrap().to_string());
        (response.status(), location)
    }

    #[tokio::test]
    async fn router_url_with_control_characters_redirects() {
        let app = app().await;
        let code = create(&app, "https://example.com/a\nb\tc").await;

        let (status, location) = location_of(&app, &code).await;
        assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location.as_deref(), Some("https://example.com/abc"));
    }

    #[tokio::test]
    async fn router_non_ascii_url_is_percent_encoded() {
        let app = app().await;
        let code = create(&app, "https://fa.wikipedia.org/wiki/ایران").await;

        let (status, location) = location_of(&app, &code).await;
        assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            location.as_deref(),
            Some("https://fa.wikipedia.org/wiki/%D8%A7%DB%8C%D8%B1%D8%A7%D9%86")
        );

        let (_, dashboard) = send(&app, get("/dashboard")).await;
        assert_eq!(
            dashboard["links"][0]["originalUrl"],
            "https://fa.wikipedia.org/wiki/%D8%A7%DB%8C%D8%B1%D8%A7%D9%86"
        );
    }

    #[tokio::test]
    async fn router_unusable_stored_url_is_500() {
        let db = test_db().await;
        SqliteLinkStore::new(db.clone())
            .insert("https://example.com/a\nb", "broken1")
            .await
            .unwrap();
        let app = api::create_router(db, test_config());

        let (status, body) = send(&app, get("/broken1")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], shortlink::error::INTERNAL_ERROR_MESSAGE);
    }

    // =====================================
    // Store خراب
    // =====================================
    struct UnavailableStore;

    fn unavailable() -> AppError {
        AppError::Database(sqlx::Error::PoolTimedOut)
    }

    #[async_trait]
    impl LinkStore for UnavailableStore {
        async fn insert(&self, _url: &str, _code: &str) -> shortlink::Result<ShortLink> {
            Err(unavailable())
        }
        async fn find_by_short_code(&self, _code: &str) -> shortlink::Result<Option<ShortLink>> {
            Err(unavailable())
        }
        async fn find_by_id(&self, _id: &str) -> shortlink::Result<Option<ShortLink>> {
            Err(unavailable())
        }
        async fn increment_clicks(&self, _id: &str) -> shortlink::Result<()> {
            Err(unavailable())
        }
        async fn list_all(&self) -> shortlink::Result<Vec<ShortLink>> {
            Err(unavailable())
        }
        async fn delete_by_id(&self, _id: &str) -> shortlink::Result<()> {
            Err(unavailable())
        }
        async fn ping(&self) -> shortlink::Result<()> {
            Err(unavailable())
        }
    }

    #[tokio::test]
    async fn router_store_unavailable_is_opaque_500() {
        let app = api::router(AppState::with_store(Arc::new(UnavailableStore), test_config()));

        let (status, body) =
            send(&app, post_json("/", json!({ "url": "https://example.com" }))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], shortlink::error::INTERNAL_ERROR_MESSAGE);

        let (status, _) = send(&app, get("/abc1234")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) = send(&app, get("/dashboard")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["database"], false);
    }
}

// =====================================
// سناریوی کامل روی شبکه
// =====================================
mod end_to_end_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqwest::{redirect::Policy, StatusCode};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_shorten_then_follow() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let config = ConfigBuilder::new().app_url(base.clone()).build();
        let app = shortlink::api::create_router(test_db().await, config);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()
            .unwrap();

        let created: Value = client
            .post(format!("{base}/api/shorten"))
            .json(&json!({ "url": "https://www.rust-lang.org/learn" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(created["success"], true);

        let short_url = created["shortUrl"].as_str().unwrap();
        assert!(short_url.starts_with(&base));

        let response = client.get(short_url).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers()["location"],
            "https://www.rust-lang.org/learn"
        );

        let dashboard: Value = client
            .get(format!("{base}/dashboard"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(dashboard["stats"]["totalClicks"], 1);
    }
}

// =====================================
// Property-based Tests
// =====================================
mod property_tests {
    use proptest::prelude::*;
    use shortlink::utils;

    proptest! {
        #[test]
        fn generated_codes_are_valid(len in utils::MIN_SHORT_CODE_LENGTH..=utils::MAX_SHORT_CODE_LENGTH) {
            let code = utils::generate_short_code_with_length(len);
            prop_assert_eq!(code.len(), len);
            prop_assert!(utils::is_valid_short_code(&code));
        }

        #[test]
        fn http_urls_are_accepted(host in "[a-z]{1,20}", path in "[a-z0-9/]{0,30}") {
            let url = format!("https://{host}.com/{path}");
            prop_assert!(utils::is_valid_url(&url));
        }

        #[test]
        fn bare_words_are_rejected(word in "[a-zA-Z0-9 ]{0,40}") {
            prop_assert!(!utils::is_valid_url(&word));
        }
    }
}
