use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{nullable, UnknownVariant};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
    #[default]
    NotSpecified,
}

impl Gender {
    /// Maps the model's free-text gender to a variant. Only an exact
    /// (case-insensitive) "male" or "female" is recognised; anything else is
    /// `NotSpecified`.
    pub fn from_ai_label(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "male" => Gender::Male,
            "female" => Gender::Female,
            _ => Gender::NotSpecified,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
            Gender::NotSpecified => "not_specified",
        }
    }

    /// Human label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
            Gender::NotSpecified => "Not Specified",
        }
    }
}

impl TryFrom<String> for Gender {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let gender = match value.as_str() {
            "male" => Gender::Male,
            "female" => Gender::Female,
            "other" => Gender::Other,
            "not_specified" => Gender::NotSpecified,
            _ => {
                return Err(UnknownVariant {
                    kind: "gender",
                    value,
                })
            }
        };
        Ok(gender)
    }
}

/// Accepts `{"language", "proficiency"}` objects as well as a bare language name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "LanguageEntry")]
pub struct LanguageSkill {
    pub language: String,
    pub proficiency: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LanguageEntry {
    Name(String),
    Detailed {
        #[serde(default, deserialize_with = "nullable")]
        language: String,
        #[serde(default)]
        proficiency: Option<Value>,
    },
    Other(Value),
}

impl From<LanguageEntry> for LanguageSkill {
    fn from(entry: LanguageEntry) -> Self {
        match entry {
            LanguageEntry::Name(language) => LanguageSkill {
                language,
                proficiency: None,
            },
            LanguageEntry::Detailed {
                language,
                proficiency,
            } => LanguageSkill {
                language,
                proficiency: match proficiency {
                    Some(Value::String(level)) => Some(level),
                    Some(Value::Null) | None => None,
                    Some(other) => Some(other.to_string()),
                },
            },
            LanguageEntry::Other(value) => LanguageSkill {
                language: value.to_string(),
                proficiency: None,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    #[serde(default, deserialize_with = "nullable")]
    pub technical: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub soft_skills: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub languages: Vec<LanguageSkill>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[sqlx(try_from = "String")]
    pub gender: Gender,
    pub date_of_birth: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub country_of_residence: Option<String>,
    pub is_least_represented_country: bool,
    pub has_disability: bool,
    pub disability_details: Option<String>,
    pub cv_filename: Option<String>,
    pub cv_file_key: Option<String>,
    pub cv_raw_text: String,
    pub education: Json<Vec<Value>>,
    pub experience: Json<Vec<Value>>,
    pub skills: Json<Skills>,
    pub certifications: Json<Vec<Value>>,
    pub languages: Json<Vec<LanguageSkill>>,
    /// Full AI parse payload, kept for audit and for re-matching without re-parsing.
    pub parsed_cv_data: Option<Json<Value>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CandidateRow {
    pub fn is_parsed(&self) -> bool {
        self.parsed_cv_data.is_some()
    }

    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.date_of_birth.and_then(|dob| age_on(dob, today))
    }

    pub fn age(&self) -> Option<u32> {
        self.age_on(Utc::now().date_naive())
    }
}

/// Completed years between `dob` and `today`. `None` when `dob` is in the future.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> Option<u32> {
    let mut years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Parses a strict `YYYY-MM-DD` date of birth. The literal string "null" and
/// anything unparseable yield `None`.
pub fn parse_date_of_birth(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() || raw == "null" {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
