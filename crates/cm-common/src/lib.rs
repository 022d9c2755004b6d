pub mod api;
pub mod db;
pub mod logging;
pub mod matching;
pub mod parser;

use chrono::{DateTime, Utc};
use serde::Serialize;

// Commonly used data models shared by the parser, matcher, and storage layers.

/// A job seeker's stored résumé together with the fields extracted at upload
/// time. One row per user; a re-upload replaces the previous record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CvRecord {
    pub id: i32,
    pub user_id: i32,
    pub file_name: String,
    pub file_path: String,
    pub extracted_skills: Vec<String>,
    pub education: String,
    pub experience: String,
    pub raw_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Identity of the user who owns a CV, attached to recruiter-facing listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CvOwner {
    pub id: i32,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CvWithOwner {
    #[serde(flatten)]
    pub cv: CvRecord,
    pub owner: CvOwner,
}

/// A job listing. `required_skills` keeps the recruiter's declared order and
/// casing; the matcher compares case-insensitively but echoes these entries
/// back verbatim in matched/missing breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: i32,
    pub recruiter_id: i32,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub experience: String,
    pub education: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterInfo {
    pub id: i32,
    pub name: String,
    pub company: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobWithRecruiter {
    #[serde(flatten)]
    pub job: JobRecord,
    pub recruiter: RecruiterInfo,
}
