//! Integration tests for the `/products` HTTP surface.
//!
//! Reconcile semantics are covered in depth by the db crate tests; these
//! focus on the HTTP layer: auth, status codes, the response envelope and
//! validation error bodies.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, get, send_json, token_for};
use serde_json::json;
use sqlx::PgPool;

use attier_core::types::DbId;

struct Fixture {
    wholesaler_token: String,
    sub_category_id: DbId,
    color_id: DbId,
}

async fn fixture(pool: &PgPool, app: &Router) -> Fixture {
    let (main_id,): (DbId,) =
        sqlx::query_as("INSERT INTO main_categories (name) VALUES ('outer') RETURNING id")
            .fetch_one(pool)
            .await
            .unwrap();
    let (sub_category_id,): (DbId,) = sqlx::query_as(
        "INSERT INTO sub_categories (main_category_id, name) VALUES ($1, 'coat') RETURNING id",
    )
    .bind(main_id)
    .fetch_one(pool)
    .await
    .unwrap();
    let (color_id,): (DbId,) =
        sqlx::query_as("INSERT INTO colors (name) VALUES ('Black') RETURNING id")
            .fetch_one(pool)
            .await
            .unwrap();

    let response = send_json(
        app.clone(),
        "POST",
        "/api/v1/wholesalers",
        None,
        &json!({
            "username": "wh1",
            "password": "correct-horse-battery-staple",
            "company_name": "Attier Apparel",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let wholesaler_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    Fixture {
        wholesaler_token: token_for(wholesaler_id, "wholesaler"),
        sub_category_id,
        color_id,
    }
}

fn product_body(fx: &Fixture) -> serde_json::Value {
    json!({
        "sub_category_id": fx.sub_category_id,
        "name": "wool coat",
        "price": 50_000,
        "base_discount_rate": 10,
        "manufacturing_country": "Korea",
        "materials": [
            { "material": "wool", "mixing_rate": 100 },
        ],
        "images": [
            { "image_url": "products/img-1.jpg", "sequence": 1 },
        ],
        "colors": [
            {
                "color": fx.color_id,
                "image_url": "products/black.jpg",
                "options": [{ "size": "S" }, { "size": "M" }],
            },
        ],
    })
}

async fn create_product(app: &Router, fx: &Fixture) -> serde_json::Value {
    let response = send_json(
        app.clone(),
        "POST",
        "/api/v1/products",
        Some(&fx.wholesaler_token),
        &product_body(fx),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Test: creation derives prices and returns the nested collections
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_product_derives_prices(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let fx = fixture(&pool, &app).await;

    let json = create_product(&app, &fx).await;
    let data = &json["data"];

    assert_eq!(data["sale_price"], 100_000);
    assert_eq!(data["base_discounted_price"], 90_000);
    // Display name defaults to the registry color name.
    assert_eq!(data["colors"][0]["display_color_name"], "Black");
    assert_eq!(data["colors"][0]["options"].as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Test: price not a multiple of 100 is rejected with the exact message
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_product_with_odd_price_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let fx = fixture(&pool, &app).await;

    let mut body = product_body(&fx);
    body["price"] = json!(50_050);
    let response = send_json(
        app,
        "POST",
        "/api/v1/products",
        Some(&fx.wholesaler_token),
        &body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "The price must be a multiple of 100.");
}

// ---------------------------------------------------------------------------
// Test: reconcile rejection surfaces as 400 naming the collection field
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn patch_duplicate_material_returns_400_with_field(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let fx = fixture(&pool, &app).await;

    let created = create_product(&app, &fx).await;
    let id = created["data"]["id"].as_i64().unwrap();

    // "wool" already exists on the product.
    let response = send_json(
        app,
        "PATCH",
        &format!("/api/v1/products/{id}"),
        Some(&fx.wholesaler_token),
        &json!({
            "materials": [{ "material": "wool", "mixing_rate": 10 }],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["field"], "materials");
    assert_eq!(json["error"], "The product with the material already exists.");
}

// ---------------------------------------------------------------------------
// Test: listing is public, soft delete hides the product
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn soft_deleted_product_disappears_from_reads(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let fx = fixture(&pool, &app).await;

    let created = create_product(&app, &fx).await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = get(app.clone(), "/api/v1/products").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let response = send_json(
        app.clone(),
        "DELETE",
        &format!("/api/v1/products/{id}"),
        Some(&fx.wholesaler_token),
        &json!(null),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app.clone(), &format!("/api/v1/products/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app, "/api/v1/products").await;
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}
