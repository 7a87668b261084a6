//! Scoring criteria extracted from a job description.
//!
//! The JSON shape of these records is persisted verbatim in the `jobs` table and
//! echoed back to the model when scoring CVs, so field names must stay stable.

use serde::{Deserialize, Serialize};

use crate::models::nullable;

pub const EDUCATION_CRITERIA_COUNT: usize = 3;
pub const EXPERIENCE_CRITERIA_COUNT: usize = 7;

/// The three fixed education dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationCriterionId {
    DegreeLevel,
    FieldOfStudy,
    Certifications,
}

impl EducationCriterionId {
    pub const ALL: [EducationCriterionId; EDUCATION_CRITERIA_COUNT] = [
        EducationCriterionId::DegreeLevel,
        EducationCriterionId::FieldOfStudy,
        EducationCriterionId::Certifications,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EducationCriterionId::DegreeLevel => "degree_level",
            EducationCriterionId::FieldOfStudy => "field_of_study",
            EducationCriterionId::Certifications => "certifications",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationCriterion {
    pub id: EducationCriterionId,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_certs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_certs: Option<Vec<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub is_mandatory: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceCriterion {
    /// `exp_1` … `exp_7`, in position order.
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_required: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub is_mandatory: bool,
}

/// Both criteria lists as returned by the extraction prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobCriteria {
    pub education_criteria: Vec<EducationCriterion>,
    pub experience_criteria: Vec<ExperienceCriterion>,
}

impl JobCriteria {
    /// Checks cardinality and ids: each education dimension exactly once, and
    /// experience ids `exp_1..exp_7` in order.
    pub fn validate(&self) -> Result<(), String> {
        if self.education_criteria.len() != EDUCATION_CRITERIA_COUNT {
            return Err(format!(
                "expected {EDUCATION_CRITERIA_COUNT} education criteria, got {}",
                self.education_criteria.len()
            ));
        }
        for id in EducationCriterionId::ALL {
            let occurrences = self
                .education_criteria
                .iter()
                .filter(|c| c.id == id)
                .count();
            if occurrences != 1 {
                return Err(format!(
                    "education criterion '{}' appears {occurrences} times",
                    id.as_str()
                ));
            }
        }

        if self.experience_criteria.len() != EXPERIENCE_CRITERIA_COUNT {
            return Err(format!(
                "expected {EXPERIENCE_CRITERIA_COUNT} experience criteria, got {}",
                self.experience_criteria.len()
            ));
        }
        for (index, criterion) in self.experience_criteria.iter().enumerate() {
            let expected = experience_id(index + 1);
            if criterion.id != expected {
                return Err(format!(
                    "experience criterion at position {} has id '{}', expected '{expected}'",
                    index + 1,
                    criterion.id
                ));
            }
        }
        Ok(())
    }
}

pub fn experience_id(position: usize) -> String {
    format!("exp_{position}")
}
