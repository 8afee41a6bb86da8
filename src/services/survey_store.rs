//! Trait and types for reading survey records from the hosted database.

use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One respondent's submission, with every column the store returned.
///
/// Columns keep the order the store sent them in, which becomes the CSV
/// column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurveyRecord(pub Map<String, Value>);

impl SurveyRecord {
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }
}

impl From<Value> for SurveyRecord {
    /// Non-object values produce an empty record.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

/// The `edad, agendo_cita` projection used for statistics.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SurveyDemographics {
    #[serde(rename = "edad", default, deserialize_with = "lenient_age")]
    pub age: Option<f64>,
    #[serde(rename = "agendo_cita", default)]
    pub appointment: Option<String>,
}

impl SurveyDemographics {
    pub fn new(age: Option<f64>, appointment: Option<&str>) -> Self {
        Self {
            age,
            appointment: appointment.map(str::to_string),
        }
    }
}

/// Accepts numbers and numeric strings; anything else counts as no age.
fn lenient_age<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|a| a.is_finite()),
        _ => None,
    })
}

/// Abstraction over the hosted survey table (e.g., Supabase).
#[async_trait::async_trait]
pub trait SurveyStore: Send + Sync {
    /// Returns every record with all columns, newest first by `created_at`.
    async fn fetch_all(&self) -> Result<Vec<SurveyRecord>>;

    /// Returns the age and appointment flag of every record.
    async fn fetch_demographics(&self) -> Result<Vec<SurveyDemographics>>;
}
