#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use furfect_api::mailer::{Notifier, OutgoingMail};
use furfect_api::{AppStateInner, MailSettings};
use furfect_db::Database;
use furfect_db::models::{AdoptionRow, PetRow, format_timestamp};

pub const BOUNDARY: &str = "furfect-test-boundary";

/// Captures outgoing mail, optionally failing every send.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutgoingMail>>,
    pub fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<()> {
        if self.fail {
            return Err(anyhow!("smtp relay unavailable"));
        }
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: Arc<Database>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_mailer(RecordingMailer::default())
    }

    pub fn with_mailer(mailer: RecordingMailer) -> Self {
        Self::with_parts(Database::open_in_memory().unwrap(), mailer)
    }

    pub fn with_parts(db: Database, mailer: RecordingMailer) -> Self {
        let db = Arc::new(db);
        let mailer = Arc::new(mailer);
        let state = AppStateInner::new(
            db.clone(),
            mailer.clone(),
            MailSettings {
                from: "admin@furfect.test".into(),
                contact_inbox: "inbox@furfect.test".into(),
                timeout: Duration::from_secs(5),
            },
        );
        Self {
            router: furfect_api::router(state, 10 * 1024 * 1024),
            db,
            mailer,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::delete(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn multipart(
        &self,
        uri: &str,
        fields: &[(&str, &str)],
        files: &[(&str, &str, &[u8])],
    ) -> (StatusCode, Value) {
        self.send(
            Request::post(uri)
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(multipart_body(fields, files)))
                .unwrap(),
        )
        .await
    }

    pub fn seed_pet(&self, id: &str, name: &str, breed: &str, image: &[u8]) {
        self.db
            .insert_pet(&PetRow {
                id: id.into(),
                name: name.into(),
                kind: "Dog".into(),
                breed: breed.into(),
                description: "Loves walks".into(),
                image: image.to_vec(),
                image_type: "image/png".into(),
                created_at: format_timestamp(Utc.timestamp_opt(1_700_000_000, 0).unwrap()),
            })
            .unwrap();
    }

    pub fn seed_adoption(&self, id: &str, email: &str) {
        self.db
            .insert_adoption(&AdoptionRow {
                id: id.into(),
                pet_id: None,
                pet_name: "Biscuit".into(),
                pet_breed: "Beagle".into(),
                pet_image: None,
                requester_name: "Maya Cruz".into(),
                requester_dob: "1994-03-02".into(),
                requester_contact: "09171234567".into(),
                requester_email: email.into(),
                requester_address: "12 Mabini St".into(),
                experience: "yes".into(),
                time_with_pet: ">5".into(),
                living_space: "yes".into(),
                budget: ">5000".into(),
                reason: "I have a big yard and lots of time for walks.".into(),
                qualification_score: 100,
                recommendation: "Highly Qualified".into(),
                status: "pending".into(),
                created_at: format_timestamp(Utc::now()),
            })
            .unwrap();
    }
}

/// Build a multipart/form-data body. Files are `(field, content_type, bytes)`.
pub fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    for (name, content_type, data) in files {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}.bin\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, name, name, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}
