use chrono::{DateTime, Utc};

use crate::matching::ranking::LONGLIST_SIZE;
use crate::models::job::JobRow;
use crate::reports::docx::ReportDocument;
use crate::reports::{or_na, RankedEntry, ReportError, DIRECTORATE, ORGANISATION, UNIT};

pub const SUMMARY_MAX_CHARS: usize = 500;

/// Cuts `text` to [`SUMMARY_MAX_CHARS`] characters, marking the cut with "...".
pub fn truncate_summary(text: &str) -> String {
    if text.chars().count() <= SUMMARY_MAX_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(SUMMARY_MAX_CHARS).collect();
    format!("{cut}...")
}

/// Longlist of the top [`LONGLIST_SIZE`] entries. `entries` must be in rank
/// order; `total_screened` is the job's candidate count.
pub fn render_longlist_report(
    job: &JobRow,
    entries: &[RankedEntry],
    total_screened: i64,
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, ReportError> {
    let top = &entries[..entries.len().min(LONGLIST_SIZE)];
    let passing = top.iter().filter(|e| e.result.passes_cutoff).count();

    let rows = top
        .iter()
        .map(|e| {
            vec![
                e.result.rank.map(|r| r.to_string()).unwrap_or_default(),
                e.candidate.full_name.clone(),
                e.candidate.gender.label().to_string(),
                or_na(e.candidate.nationality.as_deref()).to_string(),
                format!("{:.1}/30", e.result.education_total),
                format!("{:.1}/70", e.result.experience_total),
                format!("{:.1}", e.result.final_score),
            ]
        })
        .collect();

    let doc = ReportDocument::new()
        .title("Candidate Longlist Report")
        .letterhead(
            &[ORGANISATION, DIRECTORATE, UNIT],
            &generated_at.format("%Y-%m-%d %H:%M").to_string(),
        )
        .heading("Position Details")
        .labelled("Position", &job.title)
        .labelled("Reference", or_na(job.reference_number.as_deref()))
        .labelled("Grade", job.grade_level.as_str())
        .labelled("Minimum Pass Mark", &format!("{}%", job.min_pass_mark))
        .blank()
        .heading("Summary Statistics")
        .text(&format!("Total Candidates Screened: {total_screened}"))
        .text(&format!("Candidates in Longlist: {}", top.len()))
        .text(&format!("Meeting Cutoff Score: {passing}"))
        .blank()
        .heading(&format!("Top {LONGLIST_SIZE} Candidates (Longlist)"))
        .grid(
            &[
                "Rank",
                "Name",
                "Gender",
                "Nationality",
                "Education",
                "Experience",
                "Final Score",
            ],
            rows,
        )
        .heading("Individual Candidate Summaries");

    let doc = top.iter().fold(doc, |doc, entry| {
        let result = &entry.result;
        let rank = result.rank.map(|r| format!("#{r}. ")).unwrap_or_default();
        let cutoff = if result.passes_cutoff {
            "✓ Meets cutoff"
        } else {
            "✗ Below cutoff"
        };
        let doc = doc
            .subheading(&format!("{rank}{}", entry.candidate.full_name))
            .bold(&format!("Score: {:.1}/100 {cutoff}", result.final_score))
            .text(&format!("Cutoff mark: {}%", job.min_pass_mark));
        let bonuses = result.earned_bonus_labels();
        let doc = if bonuses.is_empty() {
            doc
        } else {
            doc.text(&format!("Bonuses: {}", bonuses.join(", ")))
        };
        let summary = if result.overall_reasoning.trim().is_empty() {
            "N/A".to_string()
        } else {
            truncate_summary(&result.overall_reasoning)
        };
        doc.text(&format!("Summary: {summary}")).blank()
    });

    doc.text(&"─".repeat(50))
        .italic(&format!(
            "Generated by AI-supported CV Matching Tool - {ORGANISATION}"
        ))
        .finish()
}
