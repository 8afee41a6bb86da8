//! HTTP surface: one route per handler, both mounted on a single router.

pub mod report;
pub mod stats;

use std::sync::Arc;

use anyhow::Result;
use axum::{Router, routing::any};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::infra::resend::ResendClient;
use crate::infra::supabase::SupabaseClient;
use crate::report::MailSender;
use crate::services::survey_store::SurveyStore;

pub const REPORT_PATH: &str = "/api/enviar-correo";
pub const STATS_PATH: &str = "/api/get-stats";

/// Clients shared by every request. They hold no per-request state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SurveyStore>,
    pub mail: Option<MailSender>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = SupabaseClient::new(&config.store)?;

        let mail = match &config.mail {
            Some(mail) => Some(MailSender {
                mailer: Arc::new(ResendClient::new(&mail.api_key)?),
                from: mail.from.clone(),
            }),
            None => None,
        };

        Ok(Self {
            store: Arc::new(store),
            mail,
        })
    }
}

/// Routes accept every method so the handlers can answer unsupported ones
/// themselves, HEAD included.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(REPORT_PATH, any(report::send_report))
        .route(STATS_PATH, any(stats::get_stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
