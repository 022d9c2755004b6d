//! The four match read operations. Each handler fetches one consistent
//! snapshot from storage and hands it to the pure aggregation functions in
//! `cm_common::matching`.

use axum::extract::{Path, State};
use axum::Json;

use cm_common::api::{CvBestMatch, CvMatch, JobMatch};
use cm_common::db::{
    fetch_cv_by_user, fetch_job, list_cvs_with_owners, list_jobs, list_recruiter_jobs,
};
use cm_common::matching::{
    best_matches_for_recruiter, match_cv_with_job, rank_cvs_for_job, rank_jobs_for_seeker,
    MatchResult,
};

use crate::auth::{Recruiter, Seeker};
use crate::error::ApiError;
use crate::SharedState;

/// Seeker: match my CV against one job.
pub async fn job_match(
    State(state): State<SharedState>,
    Seeker(user): Seeker,
    Path(job_id): Path<i32>,
) -> Result<Json<MatchResult>, ApiError> {
    let cv = fetch_cv_by_user(&state.pool, user.id).await?;
    let job = fetch_job(&state.pool, job_id).await?;

    Ok(Json(match_cv_with_job(&cv, &job)))
}

/// Seeker: every job in the system, ranked by match percentage.
pub async fn jobs_for_seeker(
    State(state): State<SharedState>,
    Seeker(user): Seeker,
) -> Result<Json<Vec<JobMatch>>, ApiError> {
    let cv = fetch_cv_by_user(&state.pool, user.id).await?;
    let jobs = list_jobs(&state.pool).await?;

    Ok(Json(rank_jobs_for_seeker(&cv, jobs)))
}

/// Recruiter: every stored CV, ranked against one of my jobs.
pub async fn cvs_for_job(
    State(state): State<SharedState>,
    Recruiter(_user): Recruiter,
    Path(job_id): Path<i32>,
) -> Result<Json<Vec<CvMatch>>, ApiError> {
    let job = fetch_job(&state.pool, job_id).await?;
    let cvs = list_cvs_with_owners(&state.pool).await?;

    Ok(Json(rank_cvs_for_job(&job, cvs)))
}

/// Recruiter dashboard: every stored CV with its best match among my jobs.
/// A recruiter without jobs gets an empty list without scanning CVs.
pub async fn dashboard(
    State(state): State<SharedState>,
    Recruiter(user): Recruiter,
) -> Result<Json<Vec<CvBestMatch>>, ApiError> {
    let jobs = list_recruiter_jobs(&state.pool, user.id).await?;
    if jobs.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let cvs = list_cvs_with_owners(&state.pool).await?;

    Ok(Json(best_matches_for_recruiter(cvs, &jobs)))
}
