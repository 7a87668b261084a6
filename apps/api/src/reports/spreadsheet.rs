use crate::reports::{yes_no, RankedEntry, ReportError};

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

pub const COLUMNS: [&str; 16] = [
    "Rank",
    "Full Name",
    "Email",
    "Gender",
    "Nationality",
    "Education Score",
    "Experience Score",
    "Base Score",
    "Female Bonus",
    "Age Bonus",
    "LRC Bonus",
    "Inclusion Bonus",
    "Total Bonus",
    "Final Score",
    "Passes Cutoff",
    "In Longlist",
];

/// One row per ranked result, in the order given.
pub fn render_rankings_csv(entries: &[RankedEntry]) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS)?;

    for RankedEntry { result, candidate } in entries {
        writer.write_record([
            result.rank.map(|r| r.to_string()).unwrap_or_default(),
            candidate.full_name.clone(),
            candidate.email.clone().unwrap_or_default(),
            candidate.gender.as_str().to_string(),
            candidate.nationality.clone().unwrap_or_default(),
            result.education_total.to_string(),
            result.experience_total.to_string(),
            result.base_score.to_string(),
            result.bonus_female.to_string(),
            result.bonus_age.to_string(),
            result.bonus_least_represented.to_string(),
            result.bonus_inclusion.to_string(),
            result.total_bonus.to_string(),
            result.final_score.to_string(),
            yes_no(result.passes_cutoff).to_string(),
            yes_no(result.is_in_longlist).to_string(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| ReportError::Buffer(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::join_ranked;
    use crate::testing::{candidate_fixture, result_with_score};

    #[test]
    fn test_header_and_row_values() {
        let mut candidate = candidate_fixture();
        candidate.full_name = "Diallo, Amina".to_string();
        let mut result = result_with_score(72.5);
        result.candidate_id = candidate.id;
        result.rank = Some(1);
        result.bonus_age = 5;
        result.total_bonus = 5;
        result.final_score = 77.5;
        result.passes_cutoff = true;
        result.is_in_longlist = true;

        let bytes = render_rankings_csv(&join_ranked(vec![result], vec![candidate])).unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());

        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, COLUMNS);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(&row[0], "1");
        assert_eq!(&row[1], "Diallo, Amina");
        assert_eq!(&row[3], "male");
        assert_eq!(&row[7], "72.5");
        assert_eq!(&row[9], "5");
        assert_eq!(&row[13], "77.5");
        assert_eq!(&row[14], "Yes");
        assert_eq!(&row[15], "Yes");
    }

    #[test]
    fn test_empty_job_is_header_only() {
        let bytes = render_rankings_csv(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("Rank,Full Name,Email"));
    }
}
