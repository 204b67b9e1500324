pub mod adoptions;
pub mod auth;
pub mod chat;
pub mod contact;
pub mod error;
pub mod extract;
pub mod mailer;
pub mod pets;
pub mod profile;
pub mod scoring;
pub mod state;
pub mod upload;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
};

pub use error::{ApiError, ApiResult};
pub use extract::{ApiJson, ApiQuery};
pub use state::{AppState, AppStateInner, MailSettings};

/// Every HTTP and WebSocket route the backend serves.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let pets = Router::new()
        .route("/upload-pet", post(pets::upload_pet))
        .route("/get-pets", get(pets::get_pets))
        .route("/all", get(pets::all_pets))
        .route("/delete-pet/{id}", delete(pets::delete_pet));

    let adoptions = Router::new()
        .route("/request", post(adoptions::submit_request))
        .route("/all", get(adoptions::list_all))
        .route("/{id}/status", patch(adoptions::set_status))
        .route("/user", get(adoptions::list_by_user))
        .route("/user/adopted", get(adoptions::list_adopted_by_user))
        .route("/count/approved", get(adoptions::count_approved))
        .route("/{id}", delete(adoptions::delete_request));

    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/api/user", get(profile::get_profile))
        .route("/api/users/count", get(profile::count_users))
        .route("/api/upload-profile", post(profile::upload_profile_image))
        .route("/api/save-pet", post(profile::save_pet_state))
        .route("/api/get-pet", get(profile::get_pet_state))
        .route("/api/contact", post(contact::send_contact))
        .route("/api/messages", get(chat::get_messages))
        .route("/chat", get(chat::ws_upgrade))
        .nest("/api/pets", pets)
        .nest("/api/adoptions", adoptions)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
