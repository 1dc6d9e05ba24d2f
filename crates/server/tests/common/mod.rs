//! Common test utilities for in-process API tests.
//!
//! The fixture builds the real router over a SQLite file in a temporary
//! directory, so requests exercise the full stack without binding a port.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use helpdesk_core::{
    create_authenticator, AuthConfig, AuthMethod, Config, Database, DatabaseConfig,
    ServerConfig, SqliteTicketStore, TicketConfig, TicketStore, TicketTools,
};
use helpdesk_server::state::AppState;

/// Test fixture wrapping an in-process router.
pub struct TestFixture {
    pub router: Router,
    /// Holds the database file for the fixture's lifetime.
    pub temp_dir: TempDir,
    api_key: Option<String>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// The `result` text of a successful tool invocation.
    pub fn result(&self) -> &str {
        self.body["result"].as_str().unwrap_or_default()
    }
}

impl TestFixture {
    /// Fixture with no authentication and default ticket settings.
    pub fn new() -> Self {
        Self::build(None, TicketConfig::default(), None)
    }

    /// Fixture serving tools over a caller-supplied store.
    pub fn with_store(store: Arc<dyn TicketStore>) -> Self {
        Self::build(None, TicketConfig::default(), Some(store))
    }

    /// Fixture protected by a shared API key.
    pub fn with_api_key(key: &str) -> Self {
        Self::build(Some(key.to_string()), TicketConfig::default(), None)
    }

    /// Fixture with custom ticket settings.
    pub fn with_ticket_config(tickets: TicketConfig) -> Self {
        Self::build(None, tickets, None)
    }

    fn build(
        api_key: Option<String>,
        tickets: TicketConfig,
        store: Option<Arc<dyn TicketStore>>,
    ) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let config = Config {
            auth: AuthConfig {
                method: if api_key.is_some() {
                    AuthMethod::ApiKey
                } else {
                    AuthMethod::None
                },
                api_key: api_key.clone(),
            },
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            tickets: tickets.clone(),
        };

        let authenticator =
            create_authenticator(&config.auth).expect("Failed to create authenticator");
        let store = store.unwrap_or_else(|| -> Arc<dyn TicketStore> {
            let database = Arc::new(Database::open(&db_path).expect("Failed to open database"));
            Arc::new(
                SqliteTicketStore::new(database, tickets.clone())
                    .expect("Failed to create ticket store"),
            )
        });
        let tools = TicketTools::new(store, tickets.default_list_limit);

        let state = Arc::new(AppState::new(config, Arc::from(authenticator), tools));
        let router = helpdesk_server::api::create_router(state);

        Self {
            router,
            temp_dir,
            api_key,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Invoke a tool by name.
    pub async fn invoke(&self, name: &str, arguments: Value) -> TestResponse {
        self.post(
            "/api/v1/tools/invoke",
            json!({ "name": name, "arguments": arguments }),
        )
        .await
    }

    /// Create a ticket and return its id.
    pub async fn create_ticket(&self, user: &str, subject: &str, description: &str) -> String {
        let response = self
            .invoke(
                "create_ticket",
                json!({ "user": user, "subject": subject, "description": description }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "create failed: {:?}", response.body);
        ticket_id_from(response.result())
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(key) = &self.api_key {
            builder = builder.header("x-api-key", key);
        }
        self.send(builder, body).await
    }

    /// Send a request without the fixture's credentials.
    pub async fn send(
        &self,
        builder: axum::http::request::Builder,
        body: Option<Value>,
    ) -> TestResponse {
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse { status, body }
    }
}

/// Extract the id from `✅ Ticket created: #<id> — <subject>`.
pub fn ticket_id_from(confirmation: &str) -> String {
    confirmation
        .split('#')
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap_or_else(|| panic!("no ticket id in {confirmation:?}"))
        .to_string()
}
