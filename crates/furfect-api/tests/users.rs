mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{RecordingMailer, TestApp};

async fn sign_up(app: &TestApp, email: &str) -> StatusCode {
    let (status, _) = app
        .multipart(
            "/signup",
            &[
                ("firstName", "Maya"),
                ("lastName", "Cruz"),
                ("email", email),
                ("password", "hunter22"),
            ],
            &[],
        )
        .await;
    status
}

#[tokio::test]
async fn signup_then_login() {
    let app = TestApp::new();
    assert_eq!(sign_up(&app, "Maya@Example.com").await, StatusCode::CREATED);

    let (status, body) = app
        .json(
            "POST",
            "/login",
            json!({ "email": "maya@example.com", "password": "hunter22" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful!");
    assert_eq!(body["user"]["firstName"], "Maya");
    assert_eq!(body["user"]["email"], "maya@example.com");

    let (status, body) = app
        .json(
            "POST",
            "/login",
            json!({ "email": "maya@example.com", "password": "wrong" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid email or password!");

    let (status, _) = app
        .json("POST", "/login", json!({ "email": "nobody@example.com", "password": "x" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_signup_is_rejected() {
    let app = TestApp::new();
    assert_eq!(sign_up(&app, "maya@example.com").await, StatusCode::CREATED);

    let (status, body) = app
        .multipart(
            "/signup",
            &[("email", "MAYA@example.com"), ("password", "other")],
            &[],
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already registered!");

    let (_, body) = app.get("/api/users/count").await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn signup_requires_email_and_password() {
    let app = TestApp::new();
    let (status, body) = app
        .multipart("/signup", &[("email", "maya@example.com")], &[])
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email and password are required.");
}

#[tokio::test]
async fn profile_uses_default_avatar_until_upload() {
    let app = TestApp::new();
    sign_up(&app, "maya@example.com").await;

    let (status, body) = app.get("/api/user?email=maya@example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["firstName"], "Maya");
    assert_eq!(
        body["profileImage"],
        furfect_types::media::DEFAULT_AVATAR
    );

    let (status, body) = app
        .multipart(
            "/api/upload-profile",
            &[("email", "maya@example.com")],
            &[("profileImage", "image/jpeg", &[9, 9, 9])],
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profileImage"], "data:image/jpeg;base64,CQkJ");

    let (_, body) = app.get("/api/user?email=maya@example.com").await;
    assert_eq!(body["profileImage"], "data:image/jpeg;base64,CQkJ");
}

#[tokio::test]
async fn profile_lookups_report_missing_input() {
    let app = TestApp::new();

    let (status, _) = app.get("/api/user?email=ghost@example.com").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get("/api/user").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .multipart("/api/upload-profile", &[("email", "maya@example.com")], &[])
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No file uploaded");

    let (status, _) = app
        .multipart(
            "/api/upload-profile",
            &[("email", "ghost@example.com")],
            &[("profileImage", "image/png", &[1])],
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pet_state_defaults_and_round_trips() {
    let app = TestApp::new();
    sign_up(&app, "maya@example.com").await;

    let (status, body) = app.get("/api/get-pet?email=maya@example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pet"]["name"], "My Pet");
    assert_eq!(body["pet"]["level"], 1);
    assert_eq!(body["pet"]["hunger"], 100);

    let pet = json!({
        "name": "Mochi",
        "type": "cat",
        "level": 3,
        "hunger": 40,
        "energy": 75,
        "exp": 12
    });
    let (status, body) = app
        .json(
            "POST",
            "/api/save-pet",
            json!({ "email": "maya@example.com", "pet": pet }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Pet saved");

    let (_, body) = app.get("/api/get-pet?email=maya@example.com").await;
    assert_eq!(body["pet"], pet);
}

#[tokio::test]
async fn pet_state_save_validates_input() {
    let app = TestApp::new();
    sign_up(&app, "maya@example.com").await;

    let (status, body) = app
        .json("POST", "/api/save-pet", json!({ "pet": { "type": "dog" } }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "email required");

    let (status, body) = app
        .json(
            "POST",
            "/api/save-pet",
            json!({ "email": "maya@example.com", "pet": { "name": "Rex" } }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "pet.type required");

    let (status, _) = app
        .json(
            "POST",
            "/api/save-pet",
            json!({ "email": "ghost@example.com", "pet": { "type": "dog" } }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn contact_message_is_relayed_to_inbox() {
    let app = TestApp::new();

    let (status, body) = app
        .json(
            "POST",
            "/api/contact",
            json!({ "name": "Maya", "email": "maya@example.com", "message": "Hello there" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Message sent successfully!");

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "inbox@furfect.test");
    assert_eq!(sent[0].reply_to.as_deref(), Some("maya@example.com"));
    assert!(sent[0].body.contains("Hello there"));

    let (status, _) = app
        .json("POST", "/api/contact", json!({ "name": "Maya", "message": "  " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.mailer.sent().len(), 1);
}

#[tokio::test]
async fn contact_failure_is_reported() {
    let app = TestApp::with_mailer(RecordingMailer::failing());

    let (status, body) = app
        .json(
            "POST",
            "/api/contact",
            json!({ "name": "Maya", "email": "maya@example.com", "message": "Hi" }),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to send message.");
}

#[tokio::test]
async fn malformed_user_requests_get_structured_rejections() {
    let app = TestApp::new();
    sign_up(&app, "maya@example.com").await;

    let (status, body) = app
        .json("POST", "/login", json!({ "email": "maya@example.com" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid email or password!");

    let (status, body) = app
        .json(
            "POST",
            "/api/save-pet",
            json!({ "email": "maya@example.com", "pet": { "type": "hamster" } }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());

    let (status, body) = app
        .get("/api/get-pet?email=maya@example.com&email=other@example.com")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = app
        .json("POST", "/api/contact", json!({ "name": ["Maya"] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(app.mailer.sent().is_empty());
}
