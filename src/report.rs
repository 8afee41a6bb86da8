//! The survey report: fetch every record, render CSV, mail it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::error::AppError;
use crate::output::records_to_csv;
use crate::services::mailer::{Attachment, Mailer, OutgoingEmail};
use crate::services::survey_store::SurveyStore;

pub const REPORT_SUBJECT: &str = "Reporte de Encuestas de Salud Visual";
pub const REPORT_FILENAME: &str = "reporte_encuestas.csv";

pub const MSG_SENT: &str = "Correo enviado exitosamente.";
pub const MSG_NO_DATA: &str = "No hay datos en la encuesta para enviar.";
pub const MSG_FETCH_FAILED: &str = "No se pudieron obtener los datos de la base de datos.";
pub const MSG_SEND_FAILED: &str = "No se pudo enviar el correo con el reporte.";

/// A mail client paired with the sender address it sends from.
#[derive(Clone)]
pub struct MailSender {
    pub mailer: Arc<dyn Mailer>,
    pub from: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// The table is empty; nothing was sent.
    NoData,
    Sent { rows: usize, email_id: String },
}

impl ReportOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            ReportOutcome::NoData => MSG_NO_DATA,
            ReportOutcome::Sent { .. } => MSG_SENT,
        }
    }
}

/// Builds the report email with the CSV attached.
pub fn build_report_email(
    from: &str,
    to: &str,
    csv: String,
    generated_at: DateTime<Utc>,
) -> OutgoingEmail {
    let html = format!(
        "<h1>Reporte de Encuestas</h1>\n\
         <p>Hola,</p>\n\
         <p>Se ha generado un nuevo reporte con los datos de la encuesta de salud visual.</p>\n\
         <p>Puedes encontrar todos los datos en el archivo CSV adjunto.</p>\n\
         <p>Fecha de generación: {}</p>\n",
        generated_at.format("%d/%m/%Y, %H:%M:%S UTC")
    );

    OutgoingEmail {
        from: from.to_string(),
        to: vec![to.to_string()],
        subject: REPORT_SUBJECT.to_string(),
        html,
        attachments: vec![Attachment {
            filename: REPORT_FILENAME.to_string(),
            content: csv.into_bytes(),
        }],
    }
}

/// Runs the report pipeline for one recipient. Single attempt, no retries.
#[tracing::instrument(skip(store, sender))]
pub async fn send_survey_report(
    store: &dyn SurveyStore,
    sender: Option<&MailSender>,
    to: &str,
) -> Result<ReportOutcome, AppError> {
    let records = store.fetch_all().await.map_err(|e| {
        error!(error = %e, "Failed to fetch survey records");
        AppError::Fetch(MSG_FETCH_FAILED.to_string())
    })?;

    if records.is_empty() {
        info!("Survey table is empty, no email sent");
        return Ok(ReportOutcome::NoData);
    }

    let csv = records_to_csv(&records)?;

    let Some(sender) = sender else {
        warn!("Mail service is not configured");
        return Err(AppError::Send(MSG_SEND_FAILED.to_string()));
    };

    let email = build_report_email(&sender.from, to, csv, Utc::now());
    let email_id = sender.mailer.send(&email).await.map_err(|e| {
        error!(error = %e, "Failed to send report email");
        AppError::Send(MSG_SEND_FAILED.to_string())
    })?;

    info!(rows = records.len(), %email_id, "Report sent");
    Ok(ReportOutcome::Sent {
        rows: records.len(),
        email_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_build_report_email() {
        let generated_at = Utc.with_ymd_and_hms(2025, 3, 9, 14, 5, 0).unwrap();
        let email = build_report_email(
            "Reportes <reportes@example.com>",
            "ana@example.com",
            "id\r\n1\r\n".to_string(),
            generated_at,
        );

        assert_eq!(email.to, vec!["ana@example.com".to_string()]);
        assert_eq!(email.subject, REPORT_SUBJECT);
        assert!(email.html.starts_with("<h1>Reporte de Encuestas</h1>"));
        assert!(email.html.contains("Fecha de generación: 09/03/2025, 14:05:00 UTC"));
        assert_eq!(email.attachments.len(), 1);
        assert_eq!(email.attachments[0].filename, REPORT_FILENAME);
        assert_eq!(email.attachments[0].content, b"id\r\n1\r\n");
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(ReportOutcome::NoData.message(), MSG_NO_DATA);
        let sent = ReportOutcome::Sent {
            rows: 1,
            email_id: "abc".to_string(),
        };
        assert_eq!(sent.message(), MSG_SENT);
    }
}
