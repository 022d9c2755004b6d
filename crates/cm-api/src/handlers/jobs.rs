use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use cm_common::db::{
    delete_job, fetch_job_with_recruiter, insert_job, list_jobs, list_recruiter_jobs, update_job,
    JobUpdate, NewJob,
};
use cm_common::parser::fields::sanitize;
use cm_common::{JobRecord, JobWithRecruiter};

use crate::auth::{AuthUser, Recruiter};
use crate::error::ApiError;
use crate::SharedState;

pub async fn create_job(
    State(state): State<SharedState>,
    Recruiter(user): Recruiter,
    Json(body): Json<NewJob>,
) -> Result<(StatusCode, Json<JobWithRecruiter>), ApiError> {
    let job = sanitize_new_job(body)?;
    let created = insert_job(&state.pool, user.id, &job).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_job(
    State(state): State<SharedState>,
    _auth: AuthUser,
    Path(job_id): Path<i32>,
) -> Result<Json<JobWithRecruiter>, ApiError> {
    let job = fetch_job_with_recruiter(&state.pool, job_id).await?;
    Ok(Json(job))
}

pub async fn list_all_jobs(
    State(state): State<SharedState>,
    _auth: AuthUser,
) -> Result<Json<Vec<JobWithRecruiter>>, ApiError> {
    let jobs = list_jobs(&state.pool).await?;
    Ok(Json(jobs))
}

pub async fn my_jobs(
    State(state): State<SharedState>,
    Recruiter(user): Recruiter,
) -> Result<Json<Vec<JobRecord>>, ApiError> {
    let jobs = list_recruiter_jobs(&state.pool, user.id).await?;
    Ok(Json(jobs))
}

pub async fn update_existing_job(
    State(state): State<SharedState>,
    Recruiter(user): Recruiter,
    Path(job_id): Path<i32>,
    Json(body): Json<JobUpdate>,
) -> Result<Json<JobWithRecruiter>, ApiError> {
    let update = sanitize_job_update(body);
    let updated = update_job(&state.pool, job_id, user.id, &update).await?;
    Ok(Json(updated))
}

pub async fn delete_existing_job(
    State(state): State<SharedState>,
    Recruiter(user): Recruiter,
    Path(job_id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    delete_job(&state.pool, job_id, user.id).await?;
    Ok(Json(
        serde_json::json!({ "message": "Job deleted successfully" }),
    ))
}

/// Validate and sanitize recruiter input. JSON can legally carry NUL escapes
/// that Postgres `text` rejects, so the same sanitization as for extracted
/// CV fields applies here.
fn sanitize_new_job(job: NewJob) -> Result<NewJob, ApiError> {
    let title = sanitize(&job.title);
    if title.is_empty() {
        return Err(ApiError::BadRequest("job title is required".into()));
    }

    let required_skills = sanitize_skills(job.required_skills);
    if required_skills.is_empty() {
        return Err(ApiError::BadRequest(
            "at least one required skill is needed".into(),
        ));
    }

    Ok(NewJob {
        title,
        description: sanitize(&job.description),
        required_skills,
        experience: sanitize(&job.experience),
        education: sanitize(&job.education),
    })
}

fn sanitize_job_update(update: JobUpdate) -> JobUpdate {
    JobUpdate {
        title: update.title.map(|t| sanitize(&t)),
        description: update.description.map(|d| sanitize(&d)),
        required_skills: update.required_skills.map(sanitize_skills),
        experience: update.experience.map(|e| sanitize(&e)),
        education: update.education.map(|e| sanitize(&e)),
    }
}

fn sanitize_skills(skills: Vec<String>) -> Vec<String> {
    skills
        .into_iter()
        .map(|skill| sanitize(&skill))
        .filter(|skill| !skill.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_job(title: &str, skills: &[&str]) -> NewJob {
        NewJob {
            title: title.into(),
            description: "desc".into(),
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
            experience: "2 years".into(),
            education: "degree".into(),
        }
    }

    #[test]
    fn rejects_blank_title() {
        let err = sanitize_new_job(new_job("  \0 ", &["Python"])).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn rejects_empty_skill_list_after_sanitization() {
        let err = sanitize_new_job(new_job("Backend dev", &["\0", "   "])).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn keeps_declared_skill_order_and_casing() {
        let job = sanitize_new_job(new_job("Backend dev", &[" Python ", "SQL"])).unwrap();
        assert_eq!(job.required_skills, vec!["Python", "SQL"]);
    }
}
