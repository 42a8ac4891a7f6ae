use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use folio_core_contact_contracts::{ContactFeatureService, ContactSubmitError};
use folio_email_contracts::EmailErrorKind;
use folio_models::contact::ContactSubmission;
use tracing::warn;

use super::{error, internal_server_error};
use crate::models::contact::{ApiContactSubmission, ApiContactSuccess};

pub const CONTACT_ROUTE: &str = "/api/contact";

const NOT_CONFIGURED_DETAILS: &str =
    "The SMTP settings are incomplete or invalid. Please check the server configuration.";

pub fn router(service: Arc<impl ContactFeatureService>) -> Router<()> {
    Router::new()
        .route(CONTACT_ROUTE, routing::post(submit))
        .with_state(service)
}

async fn submit(
    service: State<Arc<impl ContactFeatureService>>,
    body: Result<Json<ApiContactSubmission>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return internal_server_error(rejection),
    };

    let submission = match ContactSubmission::validate(body.into()) {
        Ok(submission) => submission,
        Err(err) => {
            warn!("Rejected contact form submission: {err}");
            return error(StatusCode::BAD_REQUEST, "Missing required fields", None);
        }
    };

    match service.submit(submission).await {
        Ok(()) => Json(ApiContactSuccess {
            success: true,
            message: "Email sent successfully",
        })
        .into_response(),
        Err(ContactSubmitError::Configuration(_)) => error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Email service is not configured",
            Some(NOT_CONFIGURED_DETAILS),
        ),
        Err(ContactSubmitError::Transport(kind)) => error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to connect to email server",
            Some(transport_details(kind)),
        ),
        Err(ContactSubmitError::Dispatch { kind, .. }) => error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to send email",
            Some(dispatch_details(kind)),
        ),
        Err(ContactSubmitError::Other(err)) => internal_server_error(err),
    }
}

fn transport_details(kind: EmailErrorKind) -> &'static str {
    match kind {
        EmailErrorKind::Unknown => {
            "Could not establish a connection to the SMTP server. Please check the server \
             configuration."
        }
        kind => dispatch_details(kind),
    }
}

fn dispatch_details(kind: EmailErrorKind) -> &'static str {
    match kind {
        EmailErrorKind::ConnectionRefused => {
            "Connection refused. Please check the SMTP server address and make sure the server \
             is available."
        }
        EmailErrorKind::TimedOut => {
            "Connection timed out. Please check the SMTP server address and port."
        }
        EmailErrorKind::AuthenticationFailed => {
            "Authentication failed. Please check the SMTP credentials."
        }
        EmailErrorKind::ServerError => "The SMTP server rejected the request.",
        EmailErrorKind::ClientError => {
            "The SMTP server is temporarily unable to process the request. Please try again later."
        }
        EmailErrorKind::Unknown => "The email could not be sent.",
    }
}
