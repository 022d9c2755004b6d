//! Response shapes for the match read operations. The aggregator builds
//! these; the API layer serializes them as-is.

use serde::Serialize;

use crate::matching::score::MatchResult;
use crate::{CvWithOwner, JobWithRecruiter};

/// One job merged with its match breakdown (seeker view).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatch {
    #[serde(flatten)]
    pub job: JobWithRecruiter,
    #[serde(flatten)]
    pub result: MatchResult,
}

/// One stored CV scored against a specific job (recruiter view).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CvMatch {
    pub cv_id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub user_email: String,
    pub extracted_skills: Vec<String>,
    pub education: String,
    pub experience: String,
    #[serde(flatten)]
    pub result: MatchResult,
}

/// The single highest-scoring job for a CV. Defaults to "no job identified"
/// when the job collection is empty or every score is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestMatch {
    pub match_percentage: u32,
    pub job_id: i32,
    pub job_title: String,
}

impl Default for BestMatch {
    fn default() -> Self {
        Self {
            match_percentage: 0,
            job_id: 0,
            job_title: String::new(),
        }
    }
}

/// One stored CV with its best match among a recruiter's jobs (dashboard).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CvBestMatch {
    pub cv_id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub user_email: String,
    pub extracted_skills: Vec<String>,
    pub education: String,
    pub experience: String,
    pub best_match: BestMatch,
}

impl CvMatch {
    pub fn new(entry: CvWithOwner, result: MatchResult) -> Self {
        Self {
            cv_id: entry.cv.id,
            user_id: entry.cv.user_id,
            user_name: entry.owner.name,
            user_email: entry.owner.email,
            extracted_skills: entry.cv.extracted_skills,
            education: entry.cv.education,
            experience: entry.cv.experience,
            result,
        }
    }
}

impl CvBestMatch {
    pub fn new(entry: CvWithOwner, best_match: BestMatch) -> Self {
        Self {
            cv_id: entry.cv.id,
            user_id: entry.cv.user_id,
            user_name: entry.owner.name,
            user_email: entry.owner.email,
            extracted_skills: entry.cv.extracted_skills,
            education: entry.cv.education,
            experience: entry.cv.experience,
            best_match,
        }
    }
}
