use serde::Serialize;
use tracing::{error, info};

use crate::error::AppError;
use crate::services::survey_store::{SurveyDemographics, SurveyStore};

/// Appointment flag value counted as "scheduled". Compared verbatim.
pub const APPOINTMENT_SCHEDULED: &str = "Si";

/// The fixed age ranges used for reporting. Ranges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeGroup {
    Under18,
    From18To30,
    From31To45,
    From46To60,
    Over60,
    Unspecified,
}

impl AgeGroup {
    /// Missing, null and non-positive ages are unspecified.
    pub fn classify(age: Option<f64>) -> Self {
        match age {
            None => AgeGroup::Unspecified,
            Some(a) if a.is_nan() || a <= 0.0 => AgeGroup::Unspecified,
            Some(a) if a < 18.0 => AgeGroup::Under18,
            Some(a) if a <= 30.0 => AgeGroup::From18To30,
            Some(a) if a <= 45.0 => AgeGroup::From31To45,
            Some(a) if a <= 60.0 => AgeGroup::From46To60,
            Some(_) => AgeGroup::Over60,
        }
    }
}

/// Histogram of respondents per [`AgeGroup`], serialized with the labels the
/// dashboard expects.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct AgeGroups {
    #[serde(rename = "Menor de 18")]
    pub under_18: usize,
    #[serde(rename = "18-30")]
    pub from_18_to_30: usize,
    #[serde(rename = "31-45")]
    pub from_31_to_45: usize,
    #[serde(rename = "46-60")]
    pub from_46_to_60: usize,
    #[serde(rename = "Mayor de 60")]
    pub over_60: usize,
    #[serde(rename = "No especificado")]
    pub unspecified: usize,
}

impl AgeGroups {
    pub fn record(&mut self, group: AgeGroup) {
        let slot = match group {
            AgeGroup::Under18 => &mut self.under_18,
            AgeGroup::From18To30 => &mut self.from_18_to_30,
            AgeGroup::From31To45 => &mut self.from_31_to_45,
            AgeGroup::From46To60 => &mut self.from_46_to_60,
            AgeGroup::Over60 => &mut self.over_60,
            AgeGroup::Unspecified => &mut self.unspecified,
        };
        *slot += 1;
    }

    pub fn total(&self) -> usize {
        self.under_18
            + self.from_18_to_30
            + self.from_31_to_45
            + self.from_46_to_60
            + self.over_60
            + self.unspecified
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyStats {
    pub total_surveys: usize,
    pub appointments_scheduled: usize,
    pub age_groups: AgeGroups,
}

impl SurveyStats {
    pub fn from_rows(rows: &[SurveyDemographics]) -> Self {
        let mut s = SurveyStats {
            total_surveys: rows.len(),
            ..Default::default()
        };

        for row in rows {
            if row.appointment.as_deref() == Some(APPOINTMENT_SCHEDULED) {
                s.appointments_scheduled += 1;
            }

            s.age_groups.record(AgeGroup::classify(row.age));
        }

        s
    }
}

/// Fetches the demographics projection and aggregates it.
///
/// Store failures keep the store's own message.
pub async fn collect_stats(store: &dyn SurveyStore) -> Result<SurveyStats, AppError> {
    let rows = store.fetch_demographics().await.map_err(|e| {
        error!(error = %e, "Failed to fetch survey demographics");
        AppError::Fetch(e.to_string())
    })?;

    let stats = SurveyStats::from_rows(&rows);
    info!(
        total = stats.total_surveys,
        appointments = stats.appointments_scheduled,
        "Survey stats computed"
    );
    Ok(stats)
}
