#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use eventbook::{
    AppState, Config,
    config::{DatabaseConfig, JwtConfig, ObservabilityConfig, PolicyConfig, ServerConfig},
};
use eventbook_user::{EventMutationPolicy, UserRepository};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use temp_dir::TempDir;
use tower::ServiceExt;

pub const SECRET: &str = "test_secret_key_minimum_32_characters_long";

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    _dir: TempDir,
}

pub fn test_config(url: String, policy: PolicyConfig) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
        },
        database: DatabaseConfig {
            url,
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: SECRET.to_string(),
            expiration_hours: 1,
            issuer: "eventbook".to_string(),
            audience: "eventbook-api".to_string(),
        },
        policy,
        observability: ObservabilityConfig::default(),
    }
}

pub async fn setup_test_app() -> anyhow::Result<TestApp> {
    setup_test_app_with(PolicyConfig::default()).await
}

pub async fn setup_test_app_with_mutation(
    event_mutation: EventMutationPolicy,
) -> anyhow::Result<TestApp> {
    setup_test_app_with(PolicyConfig {
        event_mutation,
        allow_self_admin: false,
    })
    .await
}

pub async fn setup_test_app_with(policy: PolicyConfig) -> anyhow::Result<TestApp> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let url = format!("sqlite:{}", path.to_str().unwrap());

    let pool = eventbook::db::create_pool(&url, 1).await?;
    eventbook::db::migrate(&pool).await?;

    let state = AppState::new(test_config(url, policy), eventbook_shared::State::single(pool));
    let app = eventbook::create_app(state.clone());

    Ok(TestApp {
        app,
        state,
        _dir: dir,
    })
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        self.send(req).await
    }

    pub async fn send(&self, req: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
        let response = self.app.clone().oneshot(req).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok((status, body))
    }

    pub async fn register(&self, username: &str, password: &str) -> anyhow::Result<StatusCode> {
        let (status, _) = self
            .request(
                Method::POST,
                "/users",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await?;

        Ok(status)
    }

    pub async fn login(&self, username: &str, password: &str) -> anyhow::Result<(StatusCode, Value)> {
        self.request(
            Method::POST,
            "/login",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    /// Register then log in, returning the access token.
    pub async fn user_token(&self, username: &str) -> anyhow::Result<String> {
        self.register(username, "my_password").await?;
        let (_, body) = self.login(username, "my_password").await?;

        Ok(body["access_token"].as_str().unwrap().to_owned())
    }

    pub async fn admin_token(&self, username: &str) -> anyhow::Result<String> {
        let token = self.user_token(username).await?;
        let user = self.state.users.find_by_username(username).await?.unwrap();
        self.state.users.set_admin(&user.id, true).await?;

        Ok(token)
    }

    pub async fn user_id(&self, username: &str) -> anyhow::Result<String> {
        Ok(self.state.users.find_by_username(username).await?.unwrap().id)
    }

    pub async fn add_event(&self, token: &str, title: &str, date: &str) -> anyhow::Result<Value> {
        let (status, body) = self
            .request(
                Method::POST,
                "/admin/add_event",
                Some(token),
                Some(json!({
                    "title": title,
                    "description": "An evening of music",
                    "date": date,
                    "location": "Paris",
                })),
            )
            .await?;

        assert_eq!(status, StatusCode::CREATED, "{body}");

        Ok(body["event"].clone())
    }

    pub async fn count(&self, table: &str) -> anyhow::Result<i64> {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.state.pool)
            .await?;

        Ok(count)
    }
}
