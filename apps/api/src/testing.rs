//! Shared fixtures and doubles for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use sqlx::types::Json;
use uuid::Uuid;

use crate::files::memory::MemoryFileStore;
use crate::gateway::AiGateway;
use crate::gateway::assessment::CvAssessment;
use crate::llm_client::{CompletionModel, LlmError};
use crate::matching::{LeastRepresentedCountries, MatchingService};
use crate::models::candidate::{CandidateRow, Gender, Skills};
use crate::models::criteria::JobCriteria;
use crate::models::job::{GradeLevel, JobRow, JobStatus};
use crate::models::match_result::MatchResultRow;
use crate::state::AppState;
use crate::store::memory::MemoryStore;

type Responder = dyn Fn(&str) -> Result<String, LlmError> + Send + Sync;

/// Completion model that answers from a closure and records every prompt.
pub struct ScriptedModel {
    responder: Box<Responder>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    async fn complete(
        &self,
        _system: &str,
        prompt: &str,
        _max_tokens: u32,
    ) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.responder)(prompt)
    }
}

pub fn scripted_model(
    responder: impl Fn(&str) -> Result<String, LlmError> + Send + Sync + 'static,
) -> Arc<ScriptedModel> {
    Arc::new(ScriptedModel {
        responder: Box::new(responder),
        prompts: Mutex::new(Vec::new()),
    })
}

pub fn scripted_gateway(
    responder: impl Fn(&str) -> Result<String, LlmError> + Send + Sync + 'static,
) -> (AiGateway, Arc<ScriptedModel>) {
    let model = scripted_model(responder);
    (AiGateway::new(model.clone()), model)
}

/// Application state over in-memory backends, plus handles to inspect them.
pub fn test_state(
    responder: impl Fn(&str) -> Result<String, LlmError> + Send + Sync + 'static,
) -> (AppState, Arc<MemoryStore>, Arc<MemoryFileStore>) {
    let store = Arc::new(MemoryStore::new());
    let files = Arc::new(MemoryFileStore::default());
    let (gateway, _) = scripted_gateway(responder);
    let matching = MatchingService::new(
        store.clone(),
        gateway,
        LeastRepresentedCountries::default(),
    );
    let state = AppState {
        store: store.clone(),
        matching: Arc::new(matching),
        files: files.clone(),
    };
    (state, store, files)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn criteria_json() -> Value {
    let experience: Vec<Value> = (1..=7)
        .map(|n| {
            json!({
                "id": format!("exp_{n}"),
                "name": format!("Experience area {n}"),
                "description": format!("Demonstrated experience in area {n}"),
                "years_required": if n == 1 { json!(7) } else { Value::Null },
                "is_mandatory": n <= 3
            })
        })
        .collect();
    json!({
        "education_criteria": [
            {
                "id": "degree_level",
                "name": "Degree Level",
                "description": "Advanced university degree",
                "required_level": "Masters",
                "is_mandatory": true
            },
            {
                "id": "field_of_study",
                "name": "Field of Study",
                "description": "Political science, international relations or law",
                "required_fields": ["Political Science", "International Relations", "Law"],
                "is_mandatory": true
            },
            {
                "id": "certifications",
                "name": "Certifications",
                "description": "Project management certification desirable",
                "required_certs": [],
                "preferred_certs": ["PMP"],
                "is_mandatory": false
            }
        ],
        "experience_criteria": experience
    })
}

pub fn cv_json(full_name: &str, gender: &str, date_of_birth: &str, nationality: &str) -> Value {
    json!({
        "personal_info": {
            "full_name": full_name,
            "email": "applicant@example.org",
            "phone": "+251 11 551 7700",
            "gender": gender,
            "date_of_birth": date_of_birth,
            "nationality": nationality,
            "country_of_residence": "Ethiopia"
        },
        "education": [
            {
                "degree": "Master of Arts",
                "degree_level": "Masters",
                "field_of_study": "International Relations",
                "institution": "Addis Ababa University",
                "country": "Ethiopia",
                "start_year": 2012,
                "end_year": 2014,
                "is_completed": true
            }
        ],
        "certifications": [],
        "experience": [
            {
                "job_title": "Policy Officer",
                "organization": "African Union Commission",
                "organization_type": "Intergovernmental",
                "location": "Addis Ababa, Ethiopia",
                "start_date": "2015-01",
                "end_date": "Present",
                "is_current": true,
                "responsibilities": ["Drafted policy briefs"],
                "achievements": []
            }
        ],
        "skills": {
            "technical": ["Policy analysis"],
            "soft_skills": ["Negotiation"],
            "languages": [
                {"language": "English", "proficiency": "Fluent"},
                {"language": "French", "proficiency": "Intermediate"}
            ]
        },
        "total_years_experience": 10,
        "has_international_experience": true,
        "has_un_au_experience": true,
        "disability_mentioned": false,
        "disability_details": null
    })
}

/// Assessment with every education criterion at `edu` and every experience
/// criterion at `exp`, keyed to [`criteria_json`].
pub fn assessment_json(edu: f64, exp: f64) -> Value {
    let entry = |score: f64| json!({"score": score, "max": 10, "reasoning": "Scored against the requirement"});
    let mut experience = serde_json::Map::new();
    for n in 1..=7 {
        experience.insert(format!("exp_{n}"), entry(exp));
    }
    json!({
        "education_scores": {
            "degree_level": entry(edu),
            "field_of_study": entry(edu),
            "certifications": entry(edu)
        },
        "experience_scores": experience,
        "education_total": edu * 3.0,
        "experience_total": exp * 7.0,
        "base_score": edu * 3.0 + exp * 7.0,
        "overall_reasoning": "Solid regional policy background.",
        "strengths": ["Continental policy experience"],
        "weaknesses": ["No PMP certification"],
        "flags": [],
        "recommendations": "Invite to written test."
    })
}

pub fn assessment(edu: f64, exp: f64) -> CvAssessment {
    serde_json::from_value(assessment_json(edu, exp)).unwrap()
}

/// Unparsed male candidate born 1980-01-01, Kenyan, no bonus flags.
pub fn candidate_fixture() -> CandidateRow {
    let now = Utc::now();
    CandidateRow {
        id: Uuid::new_v4(),
        job_id: Uuid::new_v4(),
        full_name: "Kofi Mensah".to_string(),
        email: Some("kofi@example.org".to_string()),
        phone: None,
        gender: Gender::Male,
        date_of_birth: Some(date(1980, 1, 1)),
        nationality: Some("Kenya".to_string()),
        country_of_residence: Some("Kenya".to_string()),
        is_least_represented_country: false,
        has_disability: false,
        disability_details: None,
        cv_filename: Some("kofi_mensah.pdf".to_string()),
        cv_file_key: None,
        cv_raw_text: "Kofi Mensah\nPolicy Officer".to_string(),
        education: Json(Vec::new()),
        experience: Json(Vec::new()),
        skills: Json(Skills::default()),
        certifications: Json(Vec::new()),
        languages: Json(Vec::new()),
        parsed_cv_data: None,
        created_at: now,
        updated_at: now,
    }
}

/// P5 job in screening with the criteria of [`criteria_json`].
pub fn job_fixture() -> JobRow {
    let criteria: JobCriteria = serde_json::from_value(criteria_json()).unwrap();
    let now = Utc::now();
    JobRow {
        id: Uuid::new_v4(),
        title: "Senior Policy Officer".to_string(),
        reference_number: Some("AU/HRM/2024/017".to_string()),
        department: Some("Political Affairs".to_string()),
        directorate: Some("Human Resources Management Directorate".to_string()),
        duty_station: Some("Addis Ababa".to_string()),
        grade_level: GradeLevel::P5,
        description: None,
        raw_jd_text: "Senior Policy Officer, Department of Political Affairs".to_string(),
        education_criteria: Json(criteria.education_criteria),
        experience_criteria: Json(criteria.experience_criteria),
        min_pass_mark: 70,
        status: JobStatus::Screening,
        created_at: now,
        updated_at: now,
        screening_completed_at: None,
    }
}

pub fn result_with_score(final_score: f64) -> MatchResultRow {
    let now = Utc::now();
    let edu = assessment(5.0, 5.0);
    MatchResultRow {
        id: Uuid::new_v4(),
        job_id: Uuid::new_v4(),
        candidate_id: Uuid::new_v4(),
        education_scores: Json(edu.education_scores),
        education_total: 15.0,
        experience_scores: Json(edu.experience_scores),
        experience_total: 35.0,
        base_score: final_score,
        bonus_female: 0,
        bonus_age: 0,
        bonus_least_represented: 0,
        bonus_inclusion: 0,
        total_bonus: 0,
        final_score,
        rank: None,
        is_in_longlist: false,
        passes_cutoff: false,
        overall_reasoning: String::new(),
        strengths: Json(Vec::new()),
        weaknesses: Json(Vec::new()),
        flags: Json(Vec::new()),
        recommendations: String::new(),
        created_at: now,
        updated_at: now,
    }
}
