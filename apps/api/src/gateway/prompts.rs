// Screening prompt templates.
// Placeholders use {name} syntax and are filled with str::replace.
// Literal JSON braces in the examples are left alone by that substitution.
// Caller-supplied document text is always substituted last.

pub const CRITERIA_EXTRACTION_TEMPLATE: &str = r#"Analyze this job description for the position of "{job_title}" at the African Union.

Extract exactly 10 scoring criteria that will be used to evaluate candidates:

EDUCATION CRITERIA (3 items, will account for 30% of total score):
1. Required Degree Level - What minimum degree is required? (e.g., Bachelor's, Master's, PhD)
2. Field of Study - What fields/disciplines are required or preferred?
3. Certifications - Any professional certifications, licenses, or additional qualifications required?

EXPERIENCE CRITERIA (7 items, will account for 70% of total score):
Extract the 7 most important experience requirements from the job description. These should be specific, measurable criteria.
Number them exp_1 to exp_7 in order of importance.

JOB DESCRIPTION:
{job_description}

Respond in this exact JSON format:
{
    "education_criteria": [
        {
            "id": "degree_level",
            "name": "Degree Level",
            "description": "Description of required degree",
            "required_level": "Masters/Bachelor/PhD",
            "is_mandatory": true
        },
        {
            "id": "field_of_study",
            "name": "Field of Study",
            "description": "Required fields of study",
            "required_fields": ["field1", "field2"],
            "is_mandatory": true
        },
        {
            "id": "certifications",
            "name": "Certifications",
            "description": "Required or preferred certifications",
            "required_certs": ["cert1"],
            "preferred_certs": ["cert2"],
            "is_mandatory": false
        }
    ],
    "experience_criteria": [
        {
            "id": "exp_1",
            "name": "Short name for criterion",
            "description": "Detailed description of the experience requirement",
            "years_required": 5,
            "is_mandatory": true
        }
    ]
}

The experience_criteria list must contain all 7 entries (exp_1 through exp_7).
Be specific and extract the actual requirements from the job description. If something is not specified, make reasonable assumptions based on the job level and African Union standards."#;

pub const CV_PARSE_TEMPLATE: &str = r#"Parse this CV/Resume and extract all relevant information.

CV TEXT:
{cv_text}

Extract and return the following information in this exact JSON format:
{
    "personal_info": {
        "full_name": "Full name of the candidate",
        "email": "email@example.com",
        "phone": "+1234567890",
        "gender": "male/female/other/not_specified",
        "date_of_birth": "YYYY-MM-DD or null if not found",
        "nationality": "Country of nationality",
        "country_of_residence": "Current country of residence"
    },
    "education": [
        {
            "degree": "Degree name (e.g., Master of Science)",
            "degree_level": "PhD/Masters/Bachelor/Diploma/Certificate",
            "field_of_study": "Field/Major",
            "institution": "University/College name",
            "country": "Country where studied",
            "start_year": 2015,
            "end_year": 2017,
            "is_completed": true
        }
    ],
    "certifications": [
        {
            "name": "Certification name",
            "issuing_organization": "Organization",
            "year_obtained": 2020,
            "is_valid": true
        }
    ],
    "experience": [
        {
            "job_title": "Position title",
            "organization": "Company/Organization name",
            "organization_type": "UN Agency/Government/NGO/Private Sector/etc",
            "location": "City, Country",
            "start_date": "YYYY-MM",
            "end_date": "YYYY-MM or Present",
            "is_current": false,
            "responsibilities": ["Key responsibility 1", "Key responsibility 2"],
            "achievements": ["Achievement 1", "Achievement 2"]
        }
    ],
    "skills": {
        "technical": ["skill1", "skill2"],
        "soft_skills": ["skill1", "skill2"],
        "languages": [
            {"language": "English", "proficiency": "Native/Fluent/Intermediate/Basic"},
            {"language": "French", "proficiency": "Fluent"}
        ]
    },
    "total_years_experience": 10,
    "has_international_experience": true,
    "has_un_au_experience": true,
    "disability_mentioned": false,
    "disability_details": null
}

Important notes:
- For gender, look for pronouns, titles (Mr/Ms/Mrs), or explicit mentions. If unclear, use "not_specified"
- For date of birth, look for DOB, birth date, age, or similar. Calculate from age if given.
- Be thorough in extracting all education and experience entries
- Calculate total years of professional experience
- Note if they have UN, AU, or international organization experience"#;

pub const CV_MATCH_TEMPLATE: &str = r#"You are evaluating a candidate for the position of "{job_title}" at the African Union.

CANDIDATE CV DATA:
{cv_data}

EDUCATION CRITERIA (30% of total score, 10 points each criterion, 30 points total):
{education_criteria}

EXPERIENCE CRITERIA (70% of total score, 10 points each criterion, 70 points total):
{experience_criteria}

SCORING INSTRUCTIONS:
1. Score each criterion from 0-10:
   - 10: Exceeds requirements
   - 8-9: Fully meets requirements
   - 6-7: Mostly meets requirements
   - 4-5: Partially meets requirements
   - 2-3: Minimally meets requirements
   - 0-1: Does not meet requirements

2. For Education (30 points total):
   - Degree Level (10 points): Score based on match to required degree
   - Field of Study (10 points): Score based on relevance of field
   - Certifications (10 points): Score based on relevant certifications

3. For Experience (70 points total):
   - Score each of the 7 criteria (10 points each), keyed by the criterion id
   - Consider years of experience, relevance, and quality

Respond in this exact JSON format:
{
    "education_scores": {
        "degree_level": {"score": 8, "max": 10, "reasoning": "Detailed explanation of why this score was given"},
        "field_of_study": {"score": 9, "max": 10, "reasoning": "Detailed explanation"},
        "certifications": {"score": 6, "max": 10, "reasoning": "Detailed explanation"}
    },
    "experience_scores": {
        "exp_1": {"score": 8, "max": 10, "reasoning": "Detailed explanation"}
    },
    "education_total": 23,
    "experience_total": 58,
    "base_score": 81,
    "overall_reasoning": "Comprehensive summary of the candidate's fit for the role, explaining the total score",
    "strengths": ["Strength 1", "Strength 2", "Strength 3"],
    "weaknesses": ["Gap or weakness 1", "Missing qualification 2"],
    "flags": ["Any red flags or concerns"],
    "recommendations": "Recommendations for the hiring committee regarding this candidate"
}

experience_scores must contain one entry for every experience criterion id listed above.
Be fair, objective, and thorough in your assessment. Provide detailed reasoning for each score."#;
