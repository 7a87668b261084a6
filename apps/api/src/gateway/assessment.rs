//! CV assessment: parsed CV + job criteria → per-criterion scores and narrative.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::gateway::prompts::CV_MATCH_TEMPLATE;
use crate::gateway::{AiGateway, GatewayError};
use crate::models::criteria::{EducationCriterion, ExperienceCriterion};
use crate::models::match_result::{ScoreMap, CRITERION_MAX_SCORE};
use crate::models::nullable;

const OPERATION: &str = "match_cv_to_job";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvAssessment {
    pub education_scores: ScoreMap,
    pub experience_scores: ScoreMap,
    /// Totals as the model reported them. Stored totals are recomputed from
    /// the per-criterion scores.
    #[serde(default)]
    pub education_total: Option<f64>,
    #[serde(default)]
    pub experience_total: Option<f64>,
    #[serde(default)]
    pub base_score: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub overall_reasoning: String,
    #[serde(default, deserialize_with = "nullable")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub weaknesses: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub flags: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub recommendations: String,
}

impl CvAssessment {
    /// Score maps must be keyed by exactly the job's criterion ids.
    fn check_keys(
        &self,
        education: &[EducationCriterion],
        experience: &[ExperienceCriterion],
    ) -> Result<(), String> {
        let expected_edu: BTreeSet<&str> = education.iter().map(|c| c.id.as_str()).collect();
        let actual_edu: BTreeSet<&str> = self.education_scores.keys().map(String::as_str).collect();
        if expected_edu != actual_edu {
            return Err(format!(
                "education_scores keys {actual_edu:?} do not match criteria {expected_edu:?}"
            ));
        }

        let expected_exp: BTreeSet<&str> = experience.iter().map(|c| c.id.as_str()).collect();
        let actual_exp: BTreeSet<&str> =
            self.experience_scores.keys().map(String::as_str).collect();
        if expected_exp != actual_exp {
            return Err(format!(
                "experience_scores keys {actual_exp:?} do not match criteria {expected_exp:?}"
            ));
        }
        Ok(())
    }

    /// Pulls every score into 0..=10 and pins `max` to 10.
    fn clamp_scores(&mut self) {
        for (id, entry) in self
            .education_scores
            .iter_mut()
            .chain(self.experience_scores.iter_mut())
        {
            if !(0.0..=CRITERION_MAX_SCORE).contains(&entry.score) {
                warn!("Criterion '{id}' scored {} outside 0-10, clamping", entry.score);
                entry.score = entry.score.clamp(0.0, CRITERION_MAX_SCORE);
            }
            entry.max = CRITERION_MAX_SCORE;
        }
    }
}

fn pretty_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

impl AiGateway {
    pub async fn match_cv_to_job(
        &self,
        cv_data: &Value,
        education_criteria: &[EducationCriterion],
        experience_criteria: &[ExperienceCriterion],
        job_title: &str,
    ) -> Result<CvAssessment, GatewayError> {
        let prompt = CV_MATCH_TEMPLATE
            .replace("{job_title}", job_title)
            .replace("{education_criteria}", &pretty_json(education_criteria))
            .replace("{experience_criteria}", &pretty_json(experience_criteria))
            .replace("{cv_data}", &pretty_json(cv_data));

        let (mut assessment, _) = self.call_json::<CvAssessment>(OPERATION, &prompt).await?;
        assessment
            .check_keys(education_criteria, experience_criteria)
            .map_err(|reason| GatewayError::format(OPERATION, reason))?;
        assessment.clamp_scores();

        info!(
            "Assessed CV for '{job_title}': {} education, {} experience scores",
            assessment.education_scores.len(),
            assessment.experience_scores.len()
        );
        Ok(assessment)
    }
}
