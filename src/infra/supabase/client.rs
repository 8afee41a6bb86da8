use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Method, Url};
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::fetch::auth::ApiKey;
use crate::fetch::{BasicClient, HttpClient, fetch_json, json_request};
use crate::services::survey_store::{SurveyDemographics, SurveyRecord, SurveyStore};

/// Reads the survey table through Supabase's PostgREST endpoint.
pub struct SupabaseClient<C> {
    table_url: Url,
    client: C,
}

impl SupabaseClient<ApiKey<ApiKey<BasicClient>>> {
    /// Builds a client authenticated with the service key, sent both as
    /// `apikey` and as a bearer token.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let client = ApiKey::new(
            ApiKey::bearer(BasicClient::new()?, &config.service_key)?,
            "apikey",
            &config.service_key,
        )?;
        Self::with_client(&config.url, &config.table, client)
    }
}

impl<C: HttpClient> SupabaseClient<C> {
    pub fn with_client(base_url: &str, table: &str, client: C) -> Result<Self> {
        let table_url = Url::parse(&format!("{base_url}/rest/v1/{table}"))
            .with_context(|| format!("invalid Supabase URL '{base_url}'"))?;
        Ok(Self { table_url, client })
    }

    fn query_url(&self, params: &[(&str, &str)]) -> Url {
        let mut url = self.table_url.clone();
        url.query_pairs_mut().extend_pairs(params);
        url
    }
}

#[async_trait]
impl<C: HttpClient> SurveyStore for SupabaseClient<C> {
    #[tracing::instrument(skip(self))]
    async fn fetch_all(&self) -> Result<Vec<SurveyRecord>> {
        let url = self.query_url(&[("select", "*"), ("order", "created_at.desc")]);
        let req = json_request::<()>(Method::GET, url, None)?;

        let records: Vec<SurveyRecord> = fetch_json(&self.client, req).await?;
        info!(table = self.table_url.path(), rows = records.len(), "Survey records fetched");
        Ok(records)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_demographics(&self) -> Result<Vec<SurveyDemographics>> {
        let url = self.query_url(&[("select", "edad,agendo_cita")]);
        let req = json_request::<()>(Method::GET, url, None)?;

        let rows: Vec<SurveyDemographics> = fetch_json(&self.client, req).await?;
        debug!(table = self.table_url.path(), rows = rows.len(), "Survey demographics fetched");
        Ok(rows)
    }
}
