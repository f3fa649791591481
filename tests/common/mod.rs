#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use quill::config::{CorsConfig, JwtConfig};
use quill::quill_auth::{Role, Status, create_access_token};
use quill::quill_core::hash_password_with_cost;
use quill::quill_models::{NewPost, NewUser, Post, User};
use quill::router::init_router;
use quill::state::AppState;

pub const TEST_PASSWORD: &str = "secret123";

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        access_token_expiry: 3600,
    }
}

pub fn test_app() -> TestApp {
    let state = AppState::in_memory(
        jwt_config(),
        CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        },
    );
    let router = init_router(state.clone());
    TestApp { state, router }
}

impl TestApp {
    /// Inserts a user directly through the repository, hashed at the
    /// minimum bcrypt cost.
    pub async fn create_user(&self, username: &str, role: Role, status: Status) -> User {
        self.state
            .users
            .create(NewUser {
                username: username.to_string(),
                email: format!("{username}@quill.dev"),
                password_hash: hash_password_with_cost(TEST_PASSWORD, 4).unwrap(),
                role,
                status,
            })
            .await
            .unwrap()
    }

    /// Creates an active user and returns it with a valid token.
    pub async fn login_as(&self, username: &str, role: Role) -> (User, String) {
        let user = self.create_user(username, role, Status::Active).await;
        let token = self.token_for(&user);
        (user, token)
    }

    pub fn token_for(&self, user: &User) -> String {
        create_access_token(
            user.id,
            user.role,
            &user.username,
            &user.email,
            &self.state.jwt_config,
        )
        .unwrap()
    }

    pub async fn create_post(&self, title: &str, author: &str) -> Post {
        self.state
            .posts
            .create(NewPost {
                title: title.to_string(),
                body: "Lorem ipsum".to_string(),
                author: author.to_string(),
            })
            .await
            .unwrap()
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::DELETE, uri, token, None).await
    }
}

impl TestResponse {
    pub fn code(&self) -> &str {
        self.body["code"].as_str().unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}
