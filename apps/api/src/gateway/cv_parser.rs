//! CV parsing: raw CV text → structured candidate profile.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::info;

use crate::gateway::prompts::CV_PARSE_TEMPLATE;
use crate::gateway::{AiGateway, GatewayError};
use crate::models::candidate::Skills;
use crate::models::nullable;

const OPERATION: &str = "parse_cv";

/// Personal details as the model reports them. Every field is free text;
/// normalisation (gender, date of birth) happens when the candidate is updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub country_of_residence: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedCv {
    #[serde(default, deserialize_with = "nullable")]
    pub personal_info: PersonalInfo,
    #[serde(default, deserialize_with = "nullable")]
    pub education: Vec<Value>,
    #[serde(default, deserialize_with = "nullable")]
    pub certifications: Vec<Value>,
    #[serde(default, deserialize_with = "nullable")]
    pub experience: Vec<Value>,
    #[serde(default, deserialize_with = "nullable")]
    pub skills: Skills,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_years_experience: Option<f64>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub has_international_experience: Option<bool>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub has_un_au_experience: Option<bool>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub disability_mentioned: Option<bool>,
    #[serde(default)]
    pub disability_details: Option<String>,
    /// The model's JSON object exactly as received.
    #[serde(skip)]
    pub raw: Value,
}

/// Accepts `10`, `10.5` or `"10"`; anything else (e.g. `"10+"`) becomes `None`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Accepts booleans and yes/no/true/false text; anything else becomes `None`.
fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "yes" | "true" | "y" => Some(true),
            "no" | "false" | "n" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

impl AiGateway {
    pub async fn parse_cv(&self, cv_text: &str) -> Result<ParsedCv, GatewayError> {
        let prompt = CV_PARSE_TEMPLATE.replace("{cv_text}", cv_text);
        let (mut parsed, raw) = self.call_json::<ParsedCv>(OPERATION, &prompt).await?;
        parsed.raw = raw;

        info!(
            "Parsed CV: {} education, {} experience entries",
            parsed.education.len(),
            parsed.experience.len()
        );
        Ok(parsed)
    }
}
