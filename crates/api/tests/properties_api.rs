//! HTTP-level integration tests for listings: multipart create/update,
//! filtering, search, delete and interest marking.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    body_json, create_user, get, listing_form, send_empty, send_multipart, MultipartBody,
    PNG_BYTES, TEST_MAX_UPLOAD_BYTES,
};
use realty_db::models::property::CreateProperty;
use realty_db::repositories::PropertyRepo;
use rust_decimal::Decimal;
use sqlx::PgPool;

async fn seed_property(pool: &PgPool, title: &str, city: &str, bedroom: i32, price: i64) -> i64 {
    PropertyRepo::create(
        pool,
        &CreateProperty {
            title: title.to_string(),
            price: Decimal::from(price),
            city: city.to_string(),
            description: None,
            property_type: "For Sale".to_string(),
            image: format!("{}.png", title.replace(' ', "_")),
            size: None,
            area: None,
            bedroom,
            bathroom: 1,
            garage: 0,
            year: None,
            address: "1 Main Street".to_string(),
            zip_code: None,
            city_area: None,
            state: None,
            country: "India".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

/// Prices are serialised as decimal strings; compare them numerically.
fn price_of(property: &serde_json::Value) -> Decimal {
    property["price"].as_str().unwrap().parse().unwrap()
}

async fn property_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM properties")
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_then_fetch_round_trips_fields(pool: PgPool) {
    let user = create_user(&pool, "agent@example.com", "user").await;
    let test = common::build_test_app(pool);
    let token = test.token_for(&user);

    let response = send_multipart(
        test.app(),
        Method::POST,
        "/api/properties/createProperty",
        Some(&token),
        listing_form("Sunny Villa", "Pune"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Property created successfully");
    let created = &json["property"];
    let id = created["id"].as_i64().unwrap();
    let image = created["image"].as_str().unwrap().to_string();
    assert_eq!(test.stored_files(), vec![image.clone()]);

    let response = get(test.app(), &format!("/api/properties/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await["property"].clone();
    assert_eq!(fetched["title"], "Sunny Villa");
    assert_eq!(fetched["city"], "Pune");
    assert_eq!(fetched["type"], "For Sale");
    assert_eq!(price_of(&fetched), Decimal::from(4_500_000));
    assert_eq!(fetched["bedroom"], 3);
    assert_eq!(fetched["year"], 2015);
    assert_eq!(fetched["country"], "India");
    assert_eq!(fetched["image"], image.as_str());
    assert_eq!(fetched["interestedUsers"], serde_json::json!([]));

    // The stored image is served back.
    let response = get(test.app(), &format!("/uploads/{image}")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_requires_authentication(pool: PgPool) {
    let test = common::build_test_app(pool.clone());

    let response = send_multipart(
        test.app(),
        Method::POST,
        "/api/properties/createProperty",
        None,
        listing_form("Sunny Villa", "Pune"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(property_count(&pool).await, 0);
    assert!(test.stored_files().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_without_image_is_rejected(pool: PgPool) {
    let user = create_user(&pool, "agent@example.com", "user").await;
    let test = common::build_test_app(pool.clone());
    let token = test.token_for(&user);

    let form = MultipartBody::new()
        .text("title", "No Picture")
        .text("price", "100")
        .text("city", "Pune")
        .text("type", "For Rent")
        .text("address", "1 Lane");
    let response = send_multipart(
        test.app(),
        Method::POST,
        "/api/properties/createProperty",
        Some(&token),
        form,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Image is required.");
    assert_eq!(property_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_price_removes_the_saved_image(pool: PgPool) {
    let user = create_user(&pool, "agent@example.com", "user").await;
    let test = common::build_test_app(pool.clone());
    let token = test.token_for(&user);

    let form = listing_form("Cheap", "Pune").text("price", "-5");
    let response = send_multipart(
        test.app(),
        Method::POST,
        "/api/properties/createProperty",
        Some(&token),
        form,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Price must be a valid positive number."
    );
    assert_eq!(property_count(&pool).await, 0);
    assert!(test.stored_files().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn image_type_and_size_are_enforced(pool: PgPool) {
    let user = create_user(&pool, "agent@example.com", "user").await;
    let test = common::build_test_app(pool.clone());
    let token = test.token_for(&user);

    let gif = MultipartBody::new()
        .text("title", "Animated")
        .text("price", "100")
        .text("city", "Pune")
        .text("type", "For Rent")
        .text("address", "1 Lane")
        .file("image", "house.gif", "image/gif", PNG_BYTES);
    let response = send_multipart(
        test.app(),
        Method::POST,
        "/api/properties/createProperty",
        Some(&token),
        gif,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let message = body_json(response).await["message"].as_str().unwrap().to_string();
    assert!(message.starts_with("Invalid file type"), "{message}");

    let oversized = vec![0u8; TEST_MAX_UPLOAD_BYTES + 1];
    let big = MultipartBody::new()
        .text("title", "Huge")
        .text("price", "100")
        .text("city", "Pune")
        .text("type", "For Rent")
        .text("address", "1 Lane")
        .file("image", "house.png", "image/png", &oversized);
    let response = send_multipart(
        test.app(),
        Method::POST,
        "/api/properties/createProperty",
        Some(&token),
        big,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(property_count(&pool).await, 0);
    assert!(test.stored_files().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_soft_fields_are_coerced(pool: PgPool) {
    let user = create_user(&pool, "agent@example.com", "user").await;
    let test = common::build_test_app(pool);
    let token = test.token_for(&user);

    let form = listing_form("Odd Numbers", "Pune")
        .text("garage", "abc")
        .text("size", "big")
        .text("year", "999");
    let response = send_multipart(
        test.app(),
        Method::POST,
        "/api/properties/createProperty",
        Some(&token),
        form,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let property = body_json(response).await["property"].clone();
    assert_eq!(property["garage"], 0);
    assert!(property["size"].is_null());
    assert!(property["year"].is_null());
}

// ---------------------------------------------------------------------------
// Listing and search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_paginates_newest_first(pool: PgPool) {
    for i in 1..=20 {
        seed_property(&pool, &format!("Home {i}"), "Pune", 2, 1_000_000).await;
    }
    let test = common::build_test_app(pool);

    let response = get(test.app(), "/api/properties?limit=9&offset=9").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 20);
    assert_eq!(json["currentPage"], 2);
    assert_eq!(json["totalPages"], 3);
    let properties = json["properties"].as_array().unwrap();
    assert_eq!(properties.len(), 9);
    assert_eq!(properties[0]["title"], "Home 11");

    let json = body_json(get(test.app(), "/api/properties").await).await;
    assert_eq!(json["properties"].as_array().unwrap().len(), 9);
    assert_eq!(json["currentPage"], 1);
    assert_eq!(json["properties"][0]["title"], "Home 20");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_location_and_bedrooms(pool: PgPool) {
    seed_property(&pool, "Pune Flat", "Pune", 2, 3_000_000).await;
    seed_property(&pool, "Pune Bungalow", "Pune", 5, 9_000_000).await;
    seed_property(&pool, "Mumbai Flat", "Mumbai", 2, 8_000_000).await;
    let test = common::build_test_app(pool);

    let json = body_json(get(test.app(), "/api/properties?location=pun").await).await;
    assert_eq!(json["total"], 2);

    let json = body_json(get(test.app(), "/api/properties?location=MUMBAI").await).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["properties"][0]["title"], "Mumbai Flat");

    let json = body_json(get(test.app(), "/api/properties?bedrooms=4%2B").await).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["properties"][0]["title"], "Pune Bungalow");

    let json = body_json(
        get(test.app(), "/api/properties?type=all&bedrooms=2&maxPrice=5000000").await,
    )
    .await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["properties"][0]["title"], "Pune Flat");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_filters_are_bad_requests(pool: PgPool) {
    let test = common::build_test_app(pool);

    for uri in [
        "/api/properties?limit=ten",
        "/api/properties?bedrooms=lots",
        "/api/properties?type=Lease",
        "/api/properties?minPrice=cheap",
    ] {
        let response = get(test.app(), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await["success"], false);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn search_matches_text_and_requires_query(pool: PgPool) {
    seed_property(&pool, "Lake View", "Nagpur", 2, 1_000_000).await;
    seed_property(&pool, "Hill Top", "Shimla", 3, 2_000_000).await;
    let test = common::build_test_app(pool);

    let json = body_json(get(test.app(), "/api/properties/search?query=lake").await).await;
    let properties = json["properties"].as_array().unwrap();
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0]["title"], "Lake View");

    for uri in ["/api/properties/search", "/api/properties/search?query=%20%20"] {
        let response = get(test.app(), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["message"],
            "Search query is required."
        );
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_unknown_property_is_not_found(pool: PgPool) {
    let test = common::build_test_app(pool);

    let response = get(test.app(), "/api/properties/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Property not found");
}

// ---------------------------------------------------------------------------
// Update and delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_is_admin_only(pool: PgPool) {
    let id = seed_property(&pool, "Old Title", "Pune", 2, 1_000_000).await;
    let user = create_user(&pool, "user@example.com", "user").await;
    let test = common::build_test_app(pool);
    let uri = format!("/api/properties/{id}");

    let form = || MultipartBody::new().text("title", "New Title");
    let response = send_multipart(test.app(), Method::PUT, &uri, None, form()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = test.token_for(&user);
    let response = send_multipart(test.app(), Method::PUT, &uri, Some(&token), form()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(get(test.app(), &uri).await).await;
    assert_eq!(json["property"]["title"], "Old Title");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_update_patches_fields_and_replaces_image(pool: PgPool) {
    let agent = create_user(&pool, "agent@example.com", "user").await;
    let admin = create_user(&pool, "admin@example.com", "admin").await;
    let test = common::build_test_app(pool);

    let response = send_multipart(
        test.app(),
        Method::POST,
        "/api/properties/createProperty",
        Some(&test.token_for(&agent)),
        listing_form("Sunny Villa", "Pune"),
    )
    .await;
    let created = body_json(response).await["property"].clone();
    let id = created["id"].as_i64().unwrap();
    let old_image = created["image"].as_str().unwrap().to_string();

    let form = MultipartBody::new()
        .text("title", "Sunnier Villa")
        .text("bedroom", "4")
        .file("image", "new.jpg", "image/jpeg", PNG_BYTES);
    let response = send_multipart(
        test.app(),
        Method::PUT,
        &format!("/api/properties/{id}"),
        Some(&test.token_for(&admin)),
        form,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Property updated successfully");
    let updated = &json["property"];
    assert_eq!(updated["title"], "Sunnier Villa");
    assert_eq!(updated["bedroom"], 4);
    // Untouched fields survive.
    assert_eq!(updated["city"], "Pune");
    assert_eq!(price_of(updated), Decimal::from(4_500_000));

    let new_image = updated["image"].as_str().unwrap().to_string();
    assert_ne!(new_image, old_image);
    assert!(new_image.ends_with(".jpg"));
    assert_eq!(test.stored_files(), vec![new_image]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_unknown_property_is_not_found(pool: PgPool) {
    let admin = create_user(&pool, "admin@example.com", "admin").await;
    let test = common::build_test_app(pool);

    let form = MultipartBody::new()
        .text("title", "Ghost")
        .file("image", "ghost.png", "image/png", PNG_BYTES);
    let response = send_multipart(
        test.app(),
        Method::PUT,
        "/api/properties/424242",
        Some(&test.token_for(&admin)),
        form,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(test.stored_files().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_removes_row_and_image(pool: PgPool) {
    let agent = create_user(&pool, "agent@example.com", "user").await;
    let admin = create_user(&pool, "admin@example.com", "admin").await;
    let test = common::build_test_app(pool.clone());

    let response = send_multipart(
        test.app(),
        Method::POST,
        "/api/properties/createProperty",
        Some(&test.token_for(&agent)),
        listing_form("Doomed", "Pune"),
    )
    .await;
    let id = body_json(response).await["property"]["id"].as_i64().unwrap();
    assert_eq!(test.stored_files().len(), 1);

    let uri = format!("/api/properties/{id}");
    let response = send_empty(test.app(), Method::DELETE, &uri, Some(&test.token_for(&admin))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Property deleted successfully"
    );

    assert_eq!(property_count(&pool).await, 0);
    assert!(test.stored_files().is_empty());
    assert_eq!(get(test.app(), &uri).await.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Interest
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn marking_interest_is_idempotent(pool: PgPool) {
    let id = seed_property(&pool, "Popular", "Pune", 2, 1_000_000).await;
    let user = create_user(&pool, "fan@example.com", "user").await;
    let test = common::build_test_app(pool);
    let token = test.token_for(&user);
    let uri = format!("/api/properties/{id}/interested");

    let response = send_empty(test.app(), Method::PUT, &uri, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Marked as interested");
    assert_eq!(json["interestedUsers"], serde_json::json!([user.id]));

    let response = send_empty(test.app(), Method::PUT, &uri, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Already marked as interested");
    assert_eq!(json["interestedUsers"], serde_json::json!([user.id]));

    let response = send_empty(test.app(), Method::PUT, &uri, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send_empty(
        test.app(),
        Method::PUT,
        "/api/properties/999/interested",
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

async fn stored_interest(pool: &PgPool, id: i64) -> serde_json::Value {
    sqlx::query_scalar("SELECT interested_users FROM properties WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_interest_set_is_repaired_on_write(pool: PgPool) {
    let id = seed_property(&pool, "Messy", "Pune", 2, 1_000_000).await;
    let earlier = create_user(&pool, "earlier@example.com", "user").await;
    let caller = create_user(&pool, "caller@example.com", "user").await;

    // A JSON string wrapping an array, with a numeric-string duplicate and junk.
    let wrapped = serde_json::Value::String(format!(
        "[{0}, \"{0}\", \"not-an-id\", {{\"x\": 1}}]",
        earlier.id
    ));
    sqlx::query("UPDATE properties SET interested_users = $2 WHERE id = $1")
        .bind(id)
        .bind(&wrapped)
        .execute(&pool)
        .await
        .unwrap();

    let test = common::build_test_app(pool.clone());
    let uri = format!("/api/properties/{id}/interested");
    let response = send_empty(test.app(), Method::PUT, &uri, Some(&test.token_for(&caller))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let expected = serde_json::json!([earlier.id, caller.id]);
    assert_eq!(body_json(response).await["interestedUsers"], expected);
    assert_eq!(stored_interest(&pool, id).await, expected);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_array_interest_set_starts_over(pool: PgPool) {
    let id = seed_property(&pool, "Object", "Pune", 2, 1_000_000).await;
    let caller = create_user(&pool, "caller@example.com", "user").await;
    sqlx::query(r#"UPDATE properties SET interested_users = '{"a": 1}'::jsonb WHERE id = $1"#)
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    let test = common::build_test_app(pool.clone());
    let uri = format!("/api/properties/{id}/interested");
    let response = send_empty(test.app(), Method::PUT, &uri, Some(&test.token_for(&caller))).await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(stored_interest(&pool, id).await, serde_json::json!([caller.id]));
}

// ---------------------------------------------------------------------------
// Rejected input leaves storage untouched
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_update_discards_new_image_and_keeps_old(pool: PgPool) {
    let agent = create_user(&pool, "agent@example.com", "user").await;
    let admin = create_user(&pool, "admin@example.com", "admin").await;
    let test = common::build_test_app(pool);

    let response = send_multipart(
        test.app(),
        Method::POST,
        "/api/properties/createProperty",
        Some(&test.token_for(&agent)),
        listing_form("Sunny Villa", "Pune"),
    )
    .await;
    let created = body_json(response).await["property"].clone();
    let id = created["id"].as_i64().unwrap();
    let old_image = created["image"].as_str().unwrap().to_string();

    let form = MultipartBody::new()
        .text("price", "-1")
        .file("image", "new.png", "image/png", PNG_BYTES);
    let uri = format!("/api/properties/{id}");
    let response =
        send_multipart(test.app(), Method::PUT, &uri, Some(&test.token_for(&admin)), form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(test.stored_files(), vec![old_image.clone()]);
    let fetched = body_json(get(test.app(), &uri).await).await["property"].clone();
    assert_eq!(fetched["image"], old_image.as_str());
    assert_eq!(price_of(&fetched), Decimal::from(4_500_000));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn over_long_text_is_a_validation_error(pool: PgPool) {
    let user = create_user(&pool, "agent@example.com", "user").await;
    let test = common::build_test_app(pool.clone());
    let token = test.token_for(&user);

    for (field, max) in [("title", 255), ("city", 100), ("zip_code", 20)] {
        let form = listing_form("Long", "Pune").text(field, &"x".repeat(max + 1));
        let response = send_multipart(
            test.app(),
            Method::POST,
            "/api/properties/createProperty",
            Some(&token),
            form,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{field}");
        assert_eq!(
            body_json(response).await["message"],
            format!("{field} cannot exceed {max} characters."),
        );
    }

    assert_eq!(property_count(&pool).await, 0);
    assert!(test.stored_files().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_multipart_create_is_json_bad_request(pool: PgPool) {
    let user = create_user(&pool, "agent@example.com", "user").await;
    let test = common::build_test_app(pool);

    let response = send_empty(
        test.app(),
        Method::POST,
        "/api/properties/createProperty",
        Some(&test.token_for(&user)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "BAD_REQUEST");
}
