use axum::{Json, body::Bytes, extract::State, http::Method};
use serde::Deserialize;
use tracing::warn;

use super::AppState;
use crate::error::{AppError, MessageBody};
use crate::report::send_survey_report;

pub const MSG_EMAIL_REQUIRED: &str = "La dirección de correo es requerida.";

#[derive(Debug, Default, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub email: Option<String>,
}

impl ReportRequest {
    /// Returns the recipient, or `None` when the body is absent, not JSON,
    /// or has no non-empty string `email`.
    pub fn recipient(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<ReportRequest>(body)
            .ok()
            .and_then(|req| req.email)
            .filter(|email| !email.is_empty())
    }
}

/// `POST /api/enviar-correo`: emails the full survey table as CSV.
#[tracing::instrument(skip(state, body))]
pub async fn send_report(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Json<MessageBody>, AppError> {
    if method != Method::POST {
        warn!("Rejected report request");
        return Err(AppError::method_not_allowed(method, Method::POST));
    }

    let email = ReportRequest::recipient(&body).ok_or_else(|| {
        warn!("Report request without email");
        AppError::Validation(MSG_EMAIL_REQUIRED.to_string())
    })?;

    let outcome = send_survey_report(state.store.as_ref(), state.mail.as_ref(), &email).await?;
    Ok(Json(MessageBody::new(outcome.message())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipient() {
        assert_eq!(
            ReportRequest::recipient(br#"{"email": "ana@example.com"}"#),
            Some("ana@example.com".to_string())
        );
        assert_eq!(ReportRequest::recipient(br#"{"email": ""}"#), None);
        assert_eq!(ReportRequest::recipient(br#"{"email": null}"#), None);
        assert_eq!(ReportRequest::recipient(br#"{"email": 42}"#), None);
        assert_eq!(ReportRequest::recipient(br#"{}"#), None);
        assert_eq!(ReportRequest::recipient(b""), None);
        assert_eq!(ReportRequest::recipient(b"email=ana@example.com"), None);
    }
}
