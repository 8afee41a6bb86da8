//! Runtime configuration read from the process environment.

use anyhow::{Context, Result, bail};

const DEFAULT_SURVEY_TABLE: &str = "encuesta";

/// Connection settings for the hosted database.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub url: String,
    pub service_key: String,
    pub table: String,
}

/// Credentials and sender address for the mail service.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_key: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreConfig,
    /// `None` when the deployment only serves statistics.
    pub mail: Option<MailConfig>,
}

impl Config {
    /// Loads the config from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the config through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &str| get(name).with_context(|| format!("{name} must be set"));

        let store = StoreConfig {
            url: require("SUPABASE_URL")?.trim_end_matches('/').to_string(),
            service_key: require("SUPABASE_SERVICE_KEY")?,
            table: get("SURVEY_TABLE").unwrap_or_else(|| DEFAULT_SURVEY_TABLE.to_string()),
        };

        let mail = match (get("RESEND_API_KEY"), get("FROM_EMAIL")) {
            (Some(api_key), Some(from)) => Some(MailConfig { api_key, from }),
            (None, None) => None,
            (Some(_), None) => bail!("FROM_EMAIL must be set when RESEND_API_KEY is set"),
            (None, Some(_)) => bail!("RESEND_API_KEY must be set when FROM_EMAIL is set"),
        };

        Ok(Self { store, mail })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://project.supabase.co/"),
            ("SUPABASE_SERVICE_KEY", "service"),
            ("RESEND_API_KEY", "re_123"),
            ("FROM_EMAIL", "Reportes <reportes@example.com>"),
        ]))
        .unwrap();

        assert_eq!(config.store.url, "https://project.supabase.co");
        assert_eq!(config.store.table, "encuesta");
        let mail = config.mail.unwrap();
        assert_eq!(mail.api_key, "re_123");
        assert_eq!(mail.from, "Reportes <reportes@example.com>");
    }

    #[test]
    fn test_mail_is_optional() {
        let config = Config::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://project.supabase.co"),
            ("SUPABASE_SERVICE_KEY", "service"),
            ("SURVEY_TABLE", "encuesta_2025"),
            ("FROM_EMAIL", "  "),
        ]))
        .unwrap();

        assert!(config.mail.is_none());
        assert_eq!(config.store.table, "encuesta_2025");
    }

    #[test]
    fn test_missing_store_settings() {
        let err = Config::from_lookup(lookup(&[("SUPABASE_URL", "https://x.supabase.co")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "SUPABASE_SERVICE_KEY must be set");
    }

    #[test]
    fn test_half_configured_mail_is_an_error() {
        let err = Config::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://x.supabase.co"),
            ("SUPABASE_SERVICE_KEY", "service"),
            ("RESEND_API_KEY", "re_123"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("FROM_EMAIL"));
    }
}
