use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::criteria::{EducationCriterion, ExperienceCriterion};
use crate::models::UnknownVariant;

pub const DEFAULT_DIRECTORATE: &str = "Human Resources Management Directorate";

/// Grade band of a requisition. Drives the screening cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradeLevel {
    P1,
    P2,
    P3,
    P4,
    P5,
    P6,
    D1,
    D2,
}

impl GradeLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            GradeLevel::P1 => "P1",
            GradeLevel::P2 => "P2",
            GradeLevel::P3 => "P3",
            GradeLevel::P4 => "P4",
            GradeLevel::P5 => "P5",
            GradeLevel::P6 => "P6",
            GradeLevel::D1 => "D1",
            GradeLevel::D2 => "D2",
        }
    }

    /// Minimum base score (bonuses excluded) a candidate needs to pass.
    pub fn min_pass_mark(self) -> i32 {
        match self {
            GradeLevel::P5 | GradeLevel::P6 | GradeLevel::D1 | GradeLevel::D2 => 70,
            _ => 60,
        }
    }
}

impl TryFrom<String> for GradeLevel {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let grade = match value.as_str() {
            "P1" => GradeLevel::P1,
            "P2" => GradeLevel::P2,
            "P3" => GradeLevel::P3,
            "P4" => GradeLevel::P4,
            "P5" => GradeLevel::P5,
            "P6" => GradeLevel::P6,
            "D1" => GradeLevel::D1,
            "D2" => GradeLevel::D2,
            _ => {
                return Err(UnknownVariant {
                    kind: "grade level",
                    value,
                })
            }
        };
        Ok(grade)
    }
}

impl fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a requisition: draft → active → screening → completed → archived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Draft,
    Active,
    Screening,
    Completed,
    Archived,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Draft => "draft",
            JobStatus::Active => "active",
            JobStatus::Screening => "screening",
            JobStatus::Completed => "completed",
            JobStatus::Archived => "archived",
        }
    }
}

impl TryFrom<String> for JobStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let status = match value.as_str() {
            "draft" => JobStatus::Draft,
            "active" => JobStatus::Active,
            "screening" => JobStatus::Screening,
            "completed" => JobStatus::Completed,
            "archived" => JobStatus::Archived,
            _ => {
                return Err(UnknownVariant {
                    kind: "job status",
                    value,
                })
            }
        };
        Ok(status)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub reference_number: Option<String>,
    pub department: Option<String>,
    pub directorate: Option<String>,
    pub duty_station: Option<String>,
    #[sqlx(try_from = "String")]
    pub grade_level: GradeLevel,
    pub description: Option<String>,
    pub raw_jd_text: String,
    pub education_criteria: Json<Vec<EducationCriterion>>,
    pub experience_criteria: Json<Vec<ExperienceCriterion>>,
    pub min_pass_mark: i32,
    #[sqlx(try_from = "String")]
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub screening_completed_at: Option<DateTime<Utc>>,
}

impl JobRow {
    /// True once criteria extraction has stored both lists.
    pub fn criteria_extracted(&self) -> bool {
        !self.education_criteria.0.is_empty() && !self.experience_criteria.0.is_empty()
    }
}

/// Job listing entry with its candidate count.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobSummary {
    pub id: Uuid,
    pub title: String,
    pub reference_number: Option<String>,
    #[sqlx(try_from = "String")]
    pub grade_level: GradeLevel,
    #[sqlx(try_from = "String")]
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub candidate_count: i64,
}
