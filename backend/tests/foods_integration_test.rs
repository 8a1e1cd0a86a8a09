//! Integration tests for the food catalog endpoints

mod common;

use axum::http::StatusCode;
use common::{parse, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_create_food_accepts_upstream_field_names() {
    let app = TestApp::new();
    let user = app.user();

    let body = json!({
        "name": "  Greek yogurt ",
        "brand": "",
        "calories": 97.0,
        "proteins": 9.0,
        "carbohydrates": 3.6,
        "fat": 5.0,
    });
    let (status, response) = app.post_auth("/api/v1/foods", &body.to_string(), &user.token).await;

    assert_eq!(status, StatusCode::CREATED);
    let food = parse(&response);
    assert_eq!(food["name"], "Greek yogurt");
    assert_eq!(food["protein_per_100g"], 9.0);
    assert_eq!(food["carbs_per_100g"], 3.6);
    assert!(food["brand"].is_null());
}

#[tokio::test]
async fn test_create_food_rejects_negative_values() {
    let app = TestApp::new();
    let user = app.user();

    let body = json!({
        "name": "Broken",
        "calories_per_100g": -1.0,
        "protein_per_100g": 0.0,
        "carbs_per_100g": 0.0,
        "fats_per_100g": 0.0,
    });
    let (status, _) = app.post_auth("/api/v1/foods", &body.to_string(), &user.token).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_barcode_conflicts() {
    let app = TestApp::new();
    let user = app.user();
    let body = json!({
        "name": "Oat milk",
        "barcode": "7394376616037",
        "calories_per_100g": 46.0,
        "protein_per_100g": 1.0,
        "carbs_per_100g": 6.7,
        "fats_per_100g": 1.5,
    });

    let (status, _) = app.post_auth("/api/v1/foods", &body.to_string(), &user.token).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, response) = app.post_auth("/api/v1/foods", &body.to_string(), &user.token).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(parse(&response)["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let app = TestApp::new();
    let user = app.user();
    for name in ["Chicken breast", "Chickpeas", "Rice"] {
        let body = json!({
            "name": name,
            "calories_per_100g": 100.0,
            "protein_per_100g": 10.0,
            "carbs_per_100g": 10.0,
            "fats_per_100g": 1.0,
        });
        app.post_auth("/api/v1/foods", &body.to_string(), &user.token).await;
    }

    let (status, body) = app
        .get_auth("/api/v1/foods/search?q=CHICK", &user.token)
        .await;

    assert_eq!(status, StatusCode::OK);
    let results = parse(&body);
    assert_eq!(results["count"], 2);

    let (_, body) = app
        .get_auth("/api/v1/foods/search?limit=1", &user.token)
        .await;
    assert_eq!(parse(&body)["count"], 1);
}

#[tokio::test]
async fn test_get_food() {
    let app = TestApp::new();
    let user = app.user();
    let food = app.create_food(&user, 165.0, 31.0).await;

    let (status, body) = app
        .get_auth(
            &format!("/api/v1/foods/{}", food["id"].as_str().unwrap()),
            &user.token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body)["calories_per_100g"], 165.0);

    let (status, _) = app
        .get_auth(&format!("/api/v1/foods/{}", uuid::Uuid::new_v4()), &user.token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_foods_require_auth() {
    let app = TestApp::new();

    let (status, _) = app.get("/api/v1/foods/search?q=rice").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
