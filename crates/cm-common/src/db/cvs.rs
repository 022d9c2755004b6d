use deadpool_postgres::PoolError;
use tokio_postgres::{Error as PgError, Row};
use tracing::instrument;

use crate::db::PgPool;
use crate::parser::ParsedDocument;
use crate::{CvOwner, CvRecord, CvWithOwner};

#[derive(Debug, thiserror::Error)]
pub enum CvStorageError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("postgres error: {0}")]
    Postgres(#[from] PgError),
    #[error("not found: {0}")]
    NotFound(String),
}

const CV_COLUMNS: &str = "c.id, c.user_id, c.file_name, c.file_path, c.extracted_skills, \
                          c.education, c.experience, c.raw_text, c.created_at, c.updated_at";

fn cv_from_row(row: &Row) -> CvRecord {
    CvRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        file_name: row.get("file_name"),
        file_path: row.get("file_path"),
        extracted_skills: row.get("extracted_skills"),
        education: row.get("education"),
        experience: row.get("experience"),
        raw_text: row.get("raw_text"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn cv_with_owner_from_row(row: &Row) -> CvWithOwner {
    CvWithOwner {
        cv: cv_from_row(row),
        owner: CvOwner {
            id: row.get("owner_id"),
            name: row.get("owner_name"),
            email: row.get("owner_email"),
        },
    }
}

#[instrument(skip(pool))]
pub async fn fetch_cv_by_user(pool: &PgPool, user_id: i32) -> Result<CvRecord, CvStorageError> {
    let client = pool.get().await?;

    let sql = format!("SELECT {CV_COLUMNS} FROM cvmatch.cvs c WHERE c.user_id = $1");
    let row = client
        .query_opt(sql.as_str(), &[&user_id])
        .await?
        .ok_or_else(|| CvStorageError::NotFound(format!("no CV stored for user {user_id}")))?;

    Ok(cv_from_row(&row))
}

#[instrument(skip(pool))]
pub async fn fetch_cv_with_owner(
    pool: &PgPool,
    user_id: i32,
) -> Result<CvWithOwner, CvStorageError> {
    let client = pool.get().await?;

    let sql = format!(
        "SELECT {CV_COLUMNS}, u.id AS owner_id, u.name AS owner_name, u.email AS owner_email \
         FROM cvmatch.cvs c \
         JOIN cvmatch.users u ON u.id = c.user_id \
         WHERE c.user_id = $1"
    );
    let row = client
        .query_opt(sql.as_str(), &[&user_id])
        .await?
        .ok_or_else(|| CvStorageError::NotFound(format!("no CV stored for user {user_id}")))?;

    Ok(cv_with_owner_from_row(&row))
}

/// Every stored CV with owner identity, newest first. Fetched in bulk so one
/// aggregation call sees a single consistent snapshot.
#[instrument(skip(pool))]
pub async fn list_cvs_with_owners(pool: &PgPool) -> Result<Vec<CvWithOwner>, CvStorageError> {
    let client = pool.get().await?;

    let sql = format!(
        "SELECT {CV_COLUMNS}, u.id AS owner_id, u.name AS owner_name, u.email AS owner_email \
         FROM cvmatch.cvs c \
         JOIN cvmatch.users u ON u.id = c.user_id \
         ORDER BY c.created_at DESC, c.id DESC"
    );
    let rows = client.query(sql.as_str(), &[]).await?;

    Ok(rows.iter().map(cv_with_owner_from_row).collect())
}

#[derive(Debug)]
pub struct CvUpsert<'a> {
    pub user_id: i32,
    pub file_name: &'a str,
    pub file_path: &'a str,
    pub parsed: &'a ParsedDocument,
}

/// Insert the user's CV, or replace it if one exists (one CV per user).
/// Returns the stored record plus the previous file path, if any, so the
/// caller can delete the replaced upload.
#[instrument(skip(pool, upsert))]
pub async fn upsert_cv(
    pool: &PgPool,
    upsert: &CvUpsert<'_>,
) -> Result<(CvRecord, Option<String>), CvStorageError> {
    let client = pool.get().await?;

    let previous_path: Option<String> = client
        .query_opt(
            "SELECT file_path FROM cvmatch.cvs WHERE user_id = $1",
            &[&upsert.user_id],
        )
        .await?
        .map(|row| row.get("file_path"));

    let row = client
        .query_one(
            "INSERT INTO cvmatch.cvs (
                user_id, file_name, file_path, extracted_skills,
                education, experience, raw_text
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO UPDATE SET
                file_name = EXCLUDED.file_name,
                file_path = EXCLUDED.file_path,
                extracted_skills = EXCLUDED.extracted_skills,
                education = EXCLUDED.education,
                experience = EXCLUDED.experience,
                raw_text = EXCLUDED.raw_text,
                updated_at = NOW()
            RETURNING id, user_id, file_name, file_path, extracted_skills,
                      education, experience, raw_text, created_at, updated_at",
            &[
                &upsert.user_id,
                &upsert.file_name,
                &upsert.file_path,
                &upsert.parsed.skills,
                &upsert.parsed.education,
                &upsert.parsed.experience,
                &upsert.parsed.raw_text,
            ],
        )
        .await?;

    Ok((cv_from_row(&row), previous_path))
}

/// Delete the user's CV, returning the stored file path so the caller can
/// remove the file as well.
#[instrument(skip(pool))]
pub async fn delete_cv(pool: &PgPool, user_id: i32) -> Result<String, CvStorageError> {
    let client = pool.get().await?;

    let row = client
        .query_opt(
            "DELETE FROM cvmatch.cvs WHERE user_id = $1 RETURNING file_path",
            &[&user_id],
        )
        .await?
        .ok_or_else(|| CvStorageError::NotFound(format!("no CV stored for user {user_id}")))?;

    Ok(row.get("file_path"))
}
