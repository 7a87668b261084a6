//! Criteria extraction: job description → 3 education + 7 experience criteria.

use tracing::info;

use crate::gateway::prompts::CRITERIA_EXTRACTION_TEMPLATE;
use crate::gateway::{AiGateway, GatewayError};
use crate::models::criteria::JobCriteria;

const OPERATION: &str = "extract_job_criteria";

impl AiGateway {
    pub async fn extract_job_criteria(
        &self,
        job_description: &str,
        job_title: &str,
    ) -> Result<JobCriteria, GatewayError> {
        let prompt = CRITERIA_EXTRACTION_TEMPLATE
            .replace("{job_title}", job_title)
            .replace("{job_description}", job_description);

        let (criteria, _) = self.call_json::<JobCriteria>(OPERATION, &prompt).await?;
        criteria
            .validate()
            .map_err(|reason| GatewayError::format(OPERATION, reason))?;

        info!(
            "Extracted {} education and {} experience criteria for '{job_title}'",
            criteria.education_criteria.len(),
            criteria.experience_criteria.len()
        );
        Ok(criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{criteria_json, scripted_gateway};

    #[tokio::test]
    async fn test_extracts_criteria_wrapped_in_prose() {
        let (gateway, model) = scripted_gateway(|_| {
            Ok(format!(
                "Sure! Here are the criteria:\n{}\nThanks.",
                criteria_json()
            ))
        });
        let criteria = gateway
            .extract_job_criteria("Lead policy work across member states.", "Senior Policy Officer")
            .await
            .unwrap();

        assert_eq!(criteria.education_criteria.len(), 3);
        assert_eq!(criteria.experience_criteria[6].id, "exp_7");

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("\"Senior Policy Officer\""));
        assert!(prompts[0].contains("Lead policy work across member states."));
    }

    #[tokio::test]
    async fn test_wrong_cardinality_is_format_error() {
        let (gateway, _) = scripted_gateway(|_| {
            let mut value = criteria_json();
            value["experience_criteria"]
                .as_array_mut()
                .unwrap()
                .truncate(5);
            Ok(value.to_string())
        });
        let err = gateway
            .extract_job_criteria("JD", "Officer")
            .await
            .unwrap_err();
        match err {
            GatewayError::ResponseFormat { operation, reason } => {
                assert_eq!(operation, OPERATION);
                assert!(reason.contains("experience"), "{reason}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_placeholder_in_description_not_substituted() {
        let (gateway, model) = scripted_gateway(|_| Ok(criteria_json().to_string()));
        gateway
            .extract_job_criteria("Literal {job_title} in the text", "Analyst")
            .await
            .unwrap();
        assert!(model.prompts()[0].contains("Literal {job_title} in the text"));
    }
}
