use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::fetch::auth::ApiKey;
use crate::fetch::{BasicClient, HttpClient, fetch_json, json_request};
use crate::services::mailer::{Mailer, OutgoingEmail};

const RESEND_EMAILS_URL: &str = "https://api.resend.com/emails";

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<AttachmentPayload<'a>>,
}

#[derive(Serialize)]
struct AttachmentPayload<'a> {
    filename: &'a str,
    /// Base64 of the raw file bytes.
    content: String,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: String,
}

/// Sends email through the Resend REST API.
pub struct ResendClient<C> {
    endpoint: Url,
    client: C,
}

impl ResendClient<ApiKey<BasicClient>> {
    pub fn new(api_key: &str) -> Result<Self> {
        let client = ApiKey::bearer(BasicClient::new()?, api_key)?;
        Self::with_client(RESEND_EMAILS_URL, client)
    }
}

impl<C: HttpClient> ResendClient<C> {
    pub fn with_client(endpoint: &str, client: C) -> Result<Self> {
        let endpoint =
            Url::parse(endpoint).with_context(|| format!("invalid Resend endpoint '{endpoint}'"))?;
        Ok(Self { endpoint, client })
    }
}

#[async_trait]
impl<C: HttpClient> Mailer for ResendClient<C> {
    #[tracing::instrument(skip_all, fields(recipients = email.to.len(), attachments = email.attachments.len()))]
    async fn send(&self, email: &OutgoingEmail) -> Result<String> {
        let body = SendEmailRequest {
            from: &email.from,
            to: &email.to,
            subject: &email.subject,
            html: &email.html,
            attachments: email
                .attachments
                .iter()
                .map(|a| AttachmentPayload {
                    filename: &a.filename,
                    content: STANDARD.encode(&a.content),
                })
                .collect(),
        };

        let req = json_request(Method::POST, self.endpoint.clone(), Some(&body))?;
        let resp: SendEmailResponse = fetch_json(&self.client, req).await?;

        info!(email_id = %resp.id, "Email accepted by Resend");
        Ok(resp.id)
    }
}
