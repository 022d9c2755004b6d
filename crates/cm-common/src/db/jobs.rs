use deadpool_postgres::PoolError;
use serde::Deserialize;
use tokio_postgres::{Error as PgError, Row};
use tracing::instrument;

use crate::db::PgPool;
use crate::{JobRecord, JobWithRecruiter, RecruiterInfo};

#[derive(Debug, thiserror::Error)]
pub enum JobStorageError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("postgres error: {0}")]
    Postgres(#[from] PgError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("ownership violation: {0}")]
    Ownership(String),
}

const JOB_COLUMNS: &str = "j.id, j.recruiter_id, j.title, j.description, j.required_skills, \
                           j.experience, j.education, j.created_at";

fn job_from_row(row: &Row) -> JobRecord {
    JobRecord {
        id: row.get("id"),
        recruiter_id: row.get("recruiter_id"),
        title: row.get("title"),
        description: row.get("description"),
        required_skills: row.get("required_skills"),
        experience: row.get("experience"),
        education: row.get("education"),
        created_at: row.get("created_at"),
    }
}

fn job_with_recruiter_from_row(row: &Row) -> JobWithRecruiter {
    JobWithRecruiter {
        job: job_from_row(row),
        recruiter: RecruiterInfo {
            id: row.get("recruiter_id"),
            name: row.get("recruiter_name"),
            company: row.get("recruiter_company"),
        },
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub education: String,
}

/// Partial update; omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub required_skills: Option<Vec<String>>,
    pub experience: Option<String>,
    pub education: Option<String>,
}

#[instrument(skip(pool))]
pub async fn fetch_job(pool: &PgPool, job_id: i32) -> Result<JobRecord, JobStorageError> {
    let client = pool.get().await?;

    let sql = format!("SELECT {JOB_COLUMNS} FROM cvmatch.jobs j WHERE j.id = $1");
    let row = client
        .query_opt(sql.as_str(), &[&job_id])
        .await?
        .ok_or_else(|| JobStorageError::NotFound(format!("job {job_id} does not exist")))?;

    Ok(job_from_row(&row))
}

#[instrument(skip(pool))]
pub async fn fetch_job_with_recruiter(
    pool: &PgPool,
    job_id: i32,
) -> Result<JobWithRecruiter, JobStorageError> {
    let client = pool.get().await?;

    let sql = format!(
        "SELECT {JOB_COLUMNS}, u.name AS recruiter_name, u.company AS recruiter_company \
         FROM cvmatch.jobs j \
         JOIN cvmatch.users u ON u.id = j.recruiter_id \
         WHERE j.id = $1"
    );
    let row = client
        .query_opt(sql.as_str(), &[&job_id])
        .await?
        .ok_or_else(|| JobStorageError::NotFound(format!("job {job_id} does not exist")))?;

    Ok(job_with_recruiter_from_row(&row))
}

/// Every job in the system with recruiter identity, newest first.
#[instrument(skip(pool))]
pub async fn list_jobs(pool: &PgPool) -> Result<Vec<JobWithRecruiter>, JobStorageError> {
    let client = pool.get().await?;

    let sql = format!(
        "SELECT {JOB_COLUMNS}, u.name AS recruiter_name, u.company AS recruiter_company \
         FROM cvmatch.jobs j \
         JOIN cvmatch.users u ON u.id = j.recruiter_id \
         ORDER BY j.created_at DESC, j.id DESC"
    );
    let rows = client.query(sql.as_str(), &[]).await?;

    Ok(rows.iter().map(job_with_recruiter_from_row).collect())
}

/// A recruiter's own jobs, newest first. The enumeration order here is what
/// the dashboard's first-wins tie-break operates on.
#[instrument(skip(pool))]
pub async fn list_recruiter_jobs(
    pool: &PgPool,
    recruiter_id: i32,
) -> Result<Vec<JobRecord>, JobStorageError> {
    let client = pool.get().await?;

    let sql = format!(
        "SELECT {JOB_COLUMNS} FROM cvmatch.jobs j \
         WHERE j.recruiter_id = $1 \
         ORDER BY j.created_at DESC, j.id DESC"
    );
    let rows = client.query(sql.as_str(), &[&recruiter_id]).await?;

    Ok(rows.iter().map(job_from_row).collect())
}

#[instrument(skip(pool, job))]
pub async fn insert_job(
    pool: &PgPool,
    recruiter_id: i32,
    job: &NewJob,
) -> Result<JobWithRecruiter, JobStorageError> {
    let client = pool.get().await?;

    let row = client
        .query_one(
            "WITH inserted AS (
                INSERT INTO cvmatch.jobs (
                    recruiter_id, title, description, required_skills, experience, education
                ) VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
            )
            SELECT j.id, j.recruiter_id, j.title, j.description, j.required_skills,
                   j.experience, j.education, j.created_at,
                   u.name AS recruiter_name, u.company AS recruiter_company
            FROM inserted j
            JOIN cvmatch.users u ON u.id = j.recruiter_id",
            &[
                &recruiter_id,
                &job.title,
                &job.description,
                &job.required_skills,
                &job.experience,
                &job.education,
            ],
        )
        .await?;

    Ok(job_with_recruiter_from_row(&row))
}

#[instrument(skip(pool, update))]
pub async fn update_job(
    pool: &PgPool,
    job_id: i32,
    recruiter_id: i32,
    update: &JobUpdate,
) -> Result<JobWithRecruiter, JobStorageError> {
    let existing = fetch_job(pool, job_id).await?;
    if existing.recruiter_id != recruiter_id {
        return Err(JobStorageError::Ownership(format!(
            "job {job_id} is not owned by recruiter {recruiter_id}"
        )));
    }

    let client = pool.get().await?;

    // The ownership check above ran on a different connection; the job can
    // vanish in between, so zero updated rows is NotFound, not an error.
    let row = client
        .query_opt(
            "WITH updated AS (
                UPDATE cvmatch.jobs SET
                    title = COALESCE($2, title),
                    description = COALESCE($3, description),
                    required_skills = COALESCE($4, required_skills),
                    experience = COALESCE($5, experience),
                    education = COALESCE($6, education)
                WHERE id = $1
                RETURNING *
            )
            SELECT j.id, j.recruiter_id, j.title, j.description, j.required_skills,
                   j.experience, j.education, j.created_at,
                   u.name AS recruiter_name, u.company AS recruiter_company
            FROM updated j
            JOIN cvmatch.users u ON u.id = j.recruiter_id",
            &[
                &job_id,
                &update.title,
                &update.description,
                &update.required_skills,
                &update.experience,
                &update.education,
            ],
        )
        .await?
        .ok_or_else(|| JobStorageError::NotFound(format!("job {job_id} does not exist")))?;

    Ok(job_with_recruiter_from_row(&row))
}

#[instrument(skip(pool))]
pub async fn delete_job(
    pool: &PgPool,
    job_id: i32,
    recruiter_id: i32,
) -> Result<(), JobStorageError> {
    let existing = fetch_job(pool, job_id).await?;
    if existing.recruiter_id != recruiter_id {
        return Err(JobStorageError::Ownership(format!(
            "job {job_id} is not owned by recruiter {recruiter_id}"
        )));
    }

    let client = pool.get().await?;
    let deleted = client
        .execute("DELETE FROM cvmatch.jobs WHERE id = $1", &[&job_id])
        .await?;
    if deleted == 0 {
        return Err(JobStorageError::NotFound(format!(
            "job {job_id} does not exist"
        )));
    }

    Ok(())
}
