//! API integration tests
//!
//! These run against a live server whose database was bootstrapped with the
//! super admin given by `TVPSS_TEST_EMAIL` / `TVPSS_TEST_PASSWORD`.

use reqwest::{multipart, Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn admin_credentials() -> (String, String) {
    (
        std::env::var("TVPSS_TEST_EMAIL").unwrap_or_else(|_| "admin@tvpss.local".to_string()),
        std::env::var("TVPSS_TEST_PASSWORD").unwrap_or_else(|_| "change-me-now".to_string()),
    )
}

/// Suffix keeping emails and school codes unique between runs
fn unique() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}

async fn login(client: &Client, email: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn admin_token(client: &Client) -> String {
    let (email, password) = admin_credentials();
    login(client, &email, &password).await
}

/// Create an account with the given role and return (id, token)
async fn create_account(client: &Client, admin: &str, role: i16, district: &str) -> (i64, String) {
    let email = format!("user{}_{}@tvpss.test", role, unique());
    let response = client
        .post(format!("{}/users", BASE_URL))
        .bearer_auth(admin)
        .json(&json!({
            "name": format!("Test role {}", role),
            "email": email,
            "password": "password123",
            "password_confirmation": "password123",
            "state": "Johor",
            "district": district,
            "role": role
        }))
        .send()
        .await
        .expect("Failed to create user");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.unwrap();
    let id = body["id"].as_i64().unwrap();
    (id, login(client, &email, "password123").await)
}

/// Onboard a school with a fresh code and return its id
async fn create_school(
    client: &Client,
    admin: &str,
    prefix: &str,
    name: &str,
    district: &str,
    owner: i64,
) -> i64 {
    let response = client
        .post(format!("{}/schools", BASE_URL))
        .bearer_auth(admin)
        .json(&json!({
            "code": format!("{}{:04}", prefix, unique() % 10000),
            "name": name,
            "district": district,
            "state": "Johor",
            "user_id": owner
        }))
        .send()
        .await
        .expect("Failed to create school");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.unwrap();
    body["id"].as_i64().unwrap()
}

/// Register working equipment for the caller's school and return its id
async fn create_equipment(client: &Client, school_admin: &str, name: &str) -> i64 {
    let response = client
        .post(format!("{}/school/equipment", BASE_URL))
        .bearer_auth(school_admin)
        .json(&json!({
            "name": name,
            "equipment_type": "other",
            "other_type": "Kamera",
            "location": "Bilik Studio",
            "acquired_date": "2024-01-15",
            "status": "Berfungsi"
        }))
        .send()
        .await
        .expect("Failed to create equipment");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.unwrap();
    body["equipment"]["id"].as_i64().unwrap()
}

/// Equipment count of one school as the district overview reports it
async fn equipment_count(client: &Client, ppd: &str, school_id: i64) -> i64 {
    let body: Value = client
        .get(format!("{}/ppd/equipment/schools", BASE_URL))
        .bearer_auth(ppd)
        .send()
        .await
        .expect("Failed to list district schools")
        .json()
        .await
        .unwrap();
    body.as_array()
        .unwrap()
        .iter()
        .find(|s| s["id"].as_i64() == Some(school_id))
        .and_then(|s| s["equipment_count"].as_i64())
        .expect("school missing from equipment overview")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();
    let (email, _) = admin_credentials();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "wrong-password" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_unauthenticated_request_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/status-options", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_status_options() {
    let client = Client::new();
    let token = admin_token(&client).await;

    let response = client
        .get(format!("{}/status-options", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["status"],
        json!(["Berfungsi", "Tidak Berfungsi", "Penyelenggaraan", "Lupus"])
    );
}

#[tokio::test]
#[ignore]
async fn test_create_user_password_mismatch() {
    let client = Client::new();
    let token = admin_token(&client).await;

    let response = client
        .post(format!("{}/users", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Mismatch",
            "email": format!("mismatch{}@tvpss.test", unique()),
            "password": "password123",
            "password_confirmation": "password321",
            "state": "Johor",
            "district": "Johor Bahru",
            "role": 4
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert!(body["fields"]["password"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_ppd_stats_zero_without_school() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (_, ppd) = create_account(&client, &admin, 3, "Daerah Kosong").await;

    let response = client
        .get(format!("{}/ppd/stats", BASE_URL))
        .bearer_auth(&ppd)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["approved_tvpss"], 0);
    assert_eq!(body["pending_validation"], 0);
    assert_eq!(body["schools_in_district"], 0);
}

#[tokio::test]
#[ignore]
async fn test_version_review_workflow() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let district = format!("Daerah {}", unique());

    let (school_admin_id, school_admin) = create_account(&client, &admin, 4, &district).await;
    let (_, ppd) = create_account(&client, &admin, 3, &district).await;
    let (_, state) = create_account(&client, &admin, 2, &district).await;

    let code = format!("TST{:04}", unique() % 10000);
    let response = client
        .post(format!("{}/schools", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({
            "code": code,
            "name": "SK Ujian",
            "officer_name": "Cikgu Ujian",
            "district": district,
            "state": "Johor",
            "user_id": school_admin_id
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Listed without a version yet
    let body: Value = client
        .get(format!("{}/ppd/schools", BASE_URL))
        .bearer_auth(&ppd)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let listed = body["schools"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["school_code"] == code.as_str())
        .cloned()
        .expect("school missing from district list");
    assert_eq!(listed["school_version"], "-");
    assert_eq!(listed["status"], "Null");

    // State cannot approve before the district
    let response = client
        .put(format!("{}/school/version", BASE_URL))
        .bearer_auth(&school_admin)
        .json(&json!({ "version": 1, "has_studio": true }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["current_version"], 1);
    assert_eq!(body["next_version"], 2);

    let response = client
        .post(format!("{}/state/schools/{}/approve", BASE_URL, code))
        .bearer_auth(&state)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = client
        .post(format!("{}/ppd/schools/{}/approve", BASE_URL, code))
        .bearer_auth(&ppd)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["message"], "TVPSS Version successfully approved!");
    assert_eq!(body["school_version"]["status"], "Pending");
    assert_eq!(body["school_version"]["ppd_approval"], true);

    let body: Value = client
        .post(format!("{}/state/schools/{}/approve", BASE_URL, code))
        .bearer_auth(&state)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["school_version"]["status"], "Approved");

    // Going back is refused
    let response = client
        .put(format!("{}/school/version", BASE_URL))
        .bearer_auth(&school_admin)
        .json(&json!({ "version": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore]
async fn test_equipment_follow_up_workflow() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let district = format!("Daerah {}", unique());

    let (school_admin_id, school_admin) = create_account(&client, &admin, 4, &district).await;
    let (_, ppd) = create_account(&client, &admin, 3, &district).await;

    let school_id =
        create_school(&client, &admin, "EQP", "SMK Peralatan", &district, school_admin_id).await;

    // Neighbouring school in the same district with one item of its own
    let (other_admin_id, other_admin) = create_account(&client, &admin, 4, &district).await;
    let other_id =
        create_school(&client, &admin, "EQQ", "SMK Jiran", &district, other_admin_id).await;
    create_equipment(&client, &other_admin, "Laptop Jiran").await;

    let id = create_equipment(&client, &school_admin, "Kamera Sony").await;
    assert_eq!(equipment_count(&client, &ppd, school_id).await, 1);
    assert_eq!(equipment_count(&client, &ppd, other_id).await, 1);

    // Functional equipment takes no follow-ups
    let form = multipart::Form::new().text("content", "Semakan berkala");
    let response = client
        .post(format!("{}/equipment/{}/follow-ups", BASE_URL, id))
        .bearer_auth(&ppd)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = client
        .put(format!("{}/equipment/{}/status", BASE_URL, id))
        .bearer_auth(&ppd)
        .json(&json!({ "status": "Tidak Berfungsi" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let image = multipart::Part::bytes(vec![0x89, b'P', b'N', b'G'])
        .file_name("skrin.png")
        .mime_str("image/png")
        .unwrap();
    let form = multipart::Form::new()
        .text("content", "Skrin tidak menyala")
        .part("images[]", image);
    let response = client
        .post(format!("{}/equipment/{}/follow-ups", BASE_URL, id))
        .bearer_auth(&ppd)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Follow-up successfully saved!");
    let path = body["follow_up"]["images"][0].as_str().unwrap().to_string();
    assert!(path.starts_with("followUpEq/school_"));
    assert!(path.ends_with("_skrin.png"));

    let body: Value = client
        .get(format!("{}/equipment/{}", BASE_URL, id))
        .bearer_auth(&school_admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["follow_ups"].as_array().unwrap().len(), 1);
    assert_eq!(body["accepts_follow_up"], true);

    let response = client
        .delete(format!("{}/equipment/{}", BASE_URL, id))
        .bearer_auth(&ppd)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let response = client
        .get(format!("{}/equipment/{}", BASE_URL, id))
        .bearer_auth(&school_admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Only the owning school's count moves
    assert_eq!(equipment_count(&client, &ppd, school_id).await, 0);
    assert_eq!(equipment_count(&client, &ppd, other_id).await, 1);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_crew_applications_keep_one_pending() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let district = format!("Daerah {}", unique());

    let (school_admin_id, school_admin) = create_account(&client, &admin, 4, &district).await;
    create_school(&client, &admin, "CRW", "SMK Krew", &district, school_admin_id).await;
    let (student_user_id, student) = create_account(&client, &admin, 5, &district).await;

    let response = client
        .post(format!("{}/students", BASE_URL))
        .bearer_auth(&school_admin)
        .json(&json!({
            "name": "Siti Aminah",
            "ic_number": format!("{:012}", unique() % 1_000_000_000_000),
            "class_name": "5 Bestari",
            "user_id": student_user_id
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let apply = || {
        client
            .post(format!("{}/applyCrew", BASE_URL))
            .bearer_auth(&student)
            .json(&json!({ "position": "Jurukamera" }))
            .send()
    };
    let (first, second) = tokio::join!(apply(), apply());
    let mut statuses = vec![first.unwrap().status(), second.unwrap().status()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);

    let body: Value = client
        .get(format!("{}/resultApply", BASE_URL))
        .bearer_auth(&student)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);
}
