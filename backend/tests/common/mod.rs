//! Common test utilities for integration tests
//!
//! The app runs against `MemoryStore`, so these tests need no database.
//! Tokens are minted with the same shared secret the provider would use.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Word;
use fake::Fake;
use jsonwebtoken::{encode, EncodingKey, Header};
use macrotrack_backend::{
    auth::Claims,
    config::{AppConfig, StoreBackend},
    routes,
    state::{AppState, Stores},
    store::MemoryStore,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-32chars";
pub const TEST_DATE: &str = "2025-03-14";

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub store: MemoryStore,
    pub config: AppConfig,
}

/// A signed-in caller
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        let config = test_config();
        let store = MemoryStore::new();
        let state = AppState::new(Stores::memory(store.clone()), config.clone());
        let app = routes::create_router(state);

        Self { app, store, config }
    }

    /// Random user with a valid token
    pub fn user(&self) -> TestUser {
        let id = Uuid::new_v4();
        let email: String = SafeEmail().fake();
        let token = mint_token(
            &id.to_string(),
            &self.config.auth.audience,
            Some(email.as_str()),
            TEST_SECRET,
        );
        TestUser { id, email, token }
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        self.send("GET", path, None, None).await
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> (StatusCode, String) {
        self.send("GET", path, None, Some(token)).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.send("POST", path, Some(body), None).await
    }

    pub async fn post_auth(&self, path: &str, body: &str, token: &str) -> (StatusCode, String) {
        self.send("POST", path, Some(body), Some(token)).await
    }

    pub async fn put_auth(&self, path: &str, body: &str, token: &str) -> (StatusCode, String) {
        self.send("PUT", path, Some(body), Some(token)).await
    }

    pub async fn patch_auth(&self, path: &str, body: &str, token: &str) -> (StatusCode, String) {
        self.send("PATCH", path, Some(body), Some(token)).await
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> (StatusCode, String) {
        self.send("DELETE", path, None, Some(token)).await
    }

    async fn send(
        &self,
        method: &str,
        path: &str,
        body: Option<&str>,
        token: Option<&str>,
    ) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(path);
        if body.is_some() {
            builder = builder.header("Content-Type", "application/json");
        }
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }

    /// Onboard a user with the 70kg / 175cm / 25y maintenance profile
    pub async fn onboard(&self, user: &TestUser, goal: &str) -> Value {
        let body = json!({
            "weight_kg": 70.0,
            "height_cm": 175.0,
            "age_years": 25,
            "sex": "male",
            "activity_level": "moderate",
            "goal": goal,
        });
        let (status, response) = self
            .put_auth("/api/v1/profile/onboarding", &body.to_string(), &user.token)
            .await;
        assert_eq!(status, StatusCode::OK, "onboarding failed: {}", response);
        serde_json::from_str(&response).unwrap()
    }

    /// Add a catalog food and return it
    pub async fn create_food(&self, user: &TestUser, calories: f64, protein: f64) -> Value {
        let name: String = Word().fake();
        let body = json!({
            "name": format!("{} {}", name, Uuid::new_v4().simple()),
            "calories_per_100g": calories,
            "protein_per_100g": protein,
            "carbs_per_100g": 0.0,
            "fats_per_100g": 3.6,
        });
        let (status, response) = self.post_auth("/api/v1/foods", &body.to_string(), &user.token).await;
        assert_eq!(status, StatusCode::CREATED, "food creation failed: {}", response);
        serde_json::from_str(&response).unwrap()
    }

    /// Log a manual meal on `TEST_DATE` and return the day snapshot
    pub async fn log_manual(&self, user: &TestUser, meal_type: &str, calories: f64) -> Value {
        let body = json!({
            "name": "Manual entry",
            "meal_type": meal_type,
            "meal_date": TEST_DATE,
            "calories": calories,
        });
        let (status, response) = self.post_auth("/api/v1/meals", &body.to_string(), &user.token).await;
        assert_eq!(status, StatusCode::CREATED, "meal log failed: {}", response);
        serde_json::from_str(&response).unwrap()
    }
}

pub fn mint_token(sub: &str, aud: &str, email: Option<&str>, secret: &str) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: sub.to_string(),
        exp: (now + Duration::hours(1)).timestamp(),
        iat: Some(now.timestamp()),
        aud: aud.to_string(),
        email: email.map(str::to_string),
        role: Some("authenticated".to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub fn parse(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.port = 0;
    config.store.backend = StoreBackend::Memory;
    config.auth.jwt_secret = TEST_SECRET.to_string();
    config
}
