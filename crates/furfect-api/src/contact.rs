use axum::{Json, extract::State};
use tracing::{error, info};

use furfect_types::api::{ContactRequest, MessageResponse};

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::mailer::OutgoingMail;
use crate::state::AppState;

/// Relay a visitor's contact-form message to the site inbox.
pub async fn send_contact(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ContactRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let (Some(name), Some(email), Some(message)) =
        (non_empty(req.name), non_empty(req.email), non_empty(req.message))
    else {
        return Err(ApiError::Validation(
            "Name, email and message are required.".to_string(),
        ));
    };

    let mail = OutgoingMail {
        from: state.mail.from.clone(),
        reply_to: Some(email.clone()),
        to: state.mail.contact_inbox.clone(),
        subject: format!("New Contact Form Message from {}", name),
        body: format!("Name: {}\nEmail: {}\n\nMessage:\n{}", name, email, message),
    };

    if let Err(e) = state.deliver(mail).await {
        error!("Contact message from {} failed: {:#}", email, e);
        return Err(ApiError::Notification("Failed to send message.".to_string()));
    }

    info!("Contact message from {} relayed", email);
    Ok(Json(MessageResponse::ok("Message sent successfully!")))
}
