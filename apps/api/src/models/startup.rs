use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::matcher::MatchQuery;

/// Founder-supplied startup profile. Every field defaults so that missing required
/// fields surface as a descriptive validation error instead of a body rejection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupProfile {
    pub name: String,
    pub industry: String,
    pub stage: String,
    pub product: String,
    pub traction: String,
    pub ask: String,
    pub city: String,
    pub country: String,
    pub age_years: f64,
    /// Millions.
    pub valuation: Option<f64>,
    pub existing_investors: Vec<String>,
}

impl StartupProfile {
    /// Required for pitch generation: name, industry, stage.
    pub fn validate(&self) -> Result<(), AppError> {
        let missing: Vec<&str> = [
            ("name", &self.name),
            ("industry", &self.industry),
            ("stage", &self.stage),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Missing required profile fields: {}",
                missing.join(", ")
            )));
        }
        if !self.age_years.is_finite() || self.age_years < 0.0 {
            return Err(AppError::Validation(
                "age_years must be a non-negative number".to_string(),
            ));
        }
        if let Some(v) = self.valuation {
            if !v.is_finite() || v < 0.0 {
                return Err(AppError::Validation(
                    "valuation must be a non-negative number (millions)".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Matching additionally needs a country to score geography.
    pub fn validate_for_matching(&self) -> Result<(), AppError> {
        self.validate()?;
        if self.country.trim().is_empty() {
            return Err(AppError::Validation(
                "Missing required profile fields: country".to_string(),
            ));
        }
        Ok(())
    }

    /// Raw values the sentence grader looks for, in a fixed order.
    pub fn user_inputs(&self) -> Vec<String> {
        [
            &self.name,
            &self.industry,
            &self.product,
            &self.traction,
            &self.stage,
            &self.ask,
        ]
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .collect()
    }

    /// "City, Country" with empty parts dropped.
    pub fn location(&self) -> String {
        [self.city.trim(), self.country.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn match_query(&self) -> MatchQuery {
        MatchQuery {
            startup_name: self.name.clone(),
            industry: self.industry.clone(),
            stage: self.stage.clone(),
            city: self.city.clone(),
            country: self.country.clone(),
            valuation: self.valuation,
            existing_investors: self.existing_investors.clone(),
        }
    }
}

/// Stored in the `startups` collection, keyed by `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartupRecord {
    pub id: Uuid,
    pub profile: StartupProfile,
    pub created_at: DateTime<Utc>,
}
