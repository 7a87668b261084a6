use chrono::{DateTime, Utc};

use crate::models::candidate::CandidateRow;
use crate::models::job::JobRow;
use crate::models::match_result::{MatchResultRow, ScoreMap};
use crate::reports::docx::ReportDocument;
use crate::reports::{or_na, yes_no, ReportError, DIRECTORATE, ORGANISATION, UNIT};

/// Full evaluation of one candidate against one job.
pub fn render_candidate_report(
    job: &JobRow,
    candidate: &CandidateRow,
    result: &MatchResultRow,
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, ReportError> {
    let rank = result
        .rank
        .map(|r| format!("#{r}"))
        .unwrap_or_else(|| "Not ranked".to_string());
    let cutoff = if result.passes_cutoff {
        "PASSES"
    } else {
        "DOES NOT PASS"
    };

    let doc = ReportDocument::new()
        .title("Candidate Evaluation Report")
        .letterhead(
            &[ORGANISATION, DIRECTORATE, UNIT],
            &generated_at.format("%Y-%m-%d %H:%M").to_string(),
        )
        .heading("Position Information")
        .key_values(&[
            ("Position Title", job.title.clone()),
            ("Reference Number", or_na(job.reference_number.as_deref()).to_string()),
            ("Grade Level", job.grade_level.to_string()),
            ("Minimum Pass Mark", format!("{}%", job.min_pass_mark)),
        ])
        .heading("Candidate Information")
        .key_values(&[
            ("Full Name", candidate.full_name.clone()),
            ("Email", or_na(candidate.email.as_deref()).to_string()),
            ("Nationality", or_na(candidate.nationality.as_deref()).to_string()),
            ("Gender", candidate.gender.label().to_string()),
            (
                "Least Represented Country",
                yes_no(candidate.is_least_represented_country).to_string(),
            ),
            ("Disability Status", yes_no(candidate.has_disability).to_string()),
        ])
        .heading("Score Summary")
        .bold(&format!("FINAL SCORE: {:.1}/100", result.final_score))
        .bold(&format!("RANK: {rank}"))
        .bold(&format!(
            "Cutoff Status: {cutoff} (minimum: {}%)",
            job.min_pass_mark
        ))
        .key_values(&[
            (
                "Education Score (30%)",
                format!("{:.1}/30", result.education_total),
            ),
            (
                "Experience Score (70%)",
                format!("{:.1}/70", result.experience_total),
            ),
            ("Base Score", format!("{:.1}/100", result.base_score)),
            ("Female Bonus", format!("+{}", result.bonus_female)),
            ("Age Bonus (≤35)", format!("+{}", result.bonus_age)),
            (
                "Least Represented Bonus",
                format!("+{}", result.bonus_least_represented),
            ),
            ("Inclusion Bonus", format!("+{}", result.bonus_inclusion)),
            ("Total Bonus", format!("+{}", result.total_bonus)),
        ]);

    let education: Vec<(&str, &str)> = job
        .education_criteria
        .0
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();
    let experience: Vec<(&str, &str)> = job
        .experience_criteria
        .0
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();

    let doc = criterion_section(
        doc.heading("Education Assessment (30%)"),
        &education,
        &result.education_scores.0,
    );
    let doc = criterion_section(
        doc.heading("Experience Assessment (70%)"),
        &experience,
        &result.experience_scores.0,
    );

    let doc = doc
        .heading("Overall Assessment")
        .text(non_empty(&result.overall_reasoning, "No overall assessment provided"))
        .subheading("Strengths");
    let doc = list_or(doc, &result.strengths.0, "No strengths identified")
        .subheading("Areas of Concern / Gaps");
    let mut doc = list_or(doc, &result.weaknesses.0, "No concerns identified");
    if !result.flags.0.is_empty() {
        let flags: Vec<String> = result.flags.0.iter().map(|f| format!("⚠ {f}")).collect();
        doc = doc.subheading("Flags").bullets(&flags);
    }

    doc.heading("Recommendations")
        .text(non_empty(&result.recommendations, "No recommendations provided"))
        .blank()
        .text(&"─".repeat(50))
        .italic("This report was generated by the AI-supported CV Matching Tool")
        .italic(&format!("{ORGANISATION} - {DIRECTORATE}"))
        .finish()
}

/// Score and reasoning per criterion, in the job's criteria order.
fn criterion_section(
    doc: ReportDocument,
    criteria: &[(&str, &str)],
    scores: &ScoreMap,
) -> ReportDocument {
    criteria.iter().fold(doc, |doc, (id, name)| match scores.get(*id) {
        Some(score) => doc
            .labelled(name, &format!("{}/{}", score.score, score.max))
            .italic(non_empty(&score.reasoning, "No reasoning provided")),
        None => doc.labelled(name, "Not scored"),
    })
}

fn list_or(doc: ReportDocument, items: &[String], empty: &str) -> ReportDocument {
    if items.is_empty() {
        doc.text(empty)
    } else {
        doc.bullets(items)
    }
}

fn non_empty<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    if text.trim().is_empty() {
        fallback
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use sqlx::types::Json;

    use super::*;
    use crate::extraction::extract_text;
    use crate::testing::{candidate_fixture, job_fixture, result_with_score};

    #[test]
    fn test_candidate_report_contents() {
        let job = job_fixture();
        let candidate = candidate_fixture();
        let mut result = result_with_score(83.0);
        result.rank = Some(2);
        result.passes_cutoff = true;
        result.bonus_age = 5;
        result.flags = Json(vec!["Employment gap 2019-2020".to_string()]);
        result.overall_reasoning = "Strong regional policy record.".to_string();

        let generated = Utc.with_ymd_and_hms(2024, 6, 3, 9, 30, 0).unwrap();
        let bytes = render_candidate_report(&job, &candidate, &result, generated).unwrap();
        let text = extract_text(&bytes, "report.docx").unwrap();

        for expected in [
            "Candidate Evaluation Report",
            "Generated: 2024-06-03 09:30",
            "AU/HRM/2024/017",
            "Kofi Mensah",
            "FINAL SCORE: 83.0/100",
            "RANK: #2",
            "Cutoff Status: PASSES (minimum: 70%)",
            "Degree Level: 5/10",
            "Experience area 7: 5/10",
            "⚠ Employment gap 2019-2020",
            "Strong regional policy record.",
            "No strengths identified",
        ] {
            assert!(text.contains(expected), "missing {expected:?} in\n{text}");
        }
    }

    #[test]
    fn test_criteria_follow_job_order() {
        let job = job_fixture();
        let bytes = render_candidate_report(
            &job,
            &candidate_fixture(),
            &result_with_score(50.0),
            Utc::now(),
        )
        .unwrap();
        let text = extract_text(&bytes, "report.docx").unwrap();
        let degree = text.find("Degree Level:").unwrap();
        let field = text.find("Field of Study:").unwrap();
        let certs = text.find("Certifications:").unwrap();
        assert!(degree < field && field < certs);
    }
}
