use std::path::{Path as FsPath, PathBuf};

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use cm_common::db::{delete_cv, fetch_cv_with_owner, upsert_cv, CvUpsert};
use cm_common::parser::{parse_document, ParsedDocument};
use cm_common::{CvRecord, CvWithOwner};

use crate::auth::Seeker;
use crate::error::ApiError;
use crate::SharedState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: &'static str,
    pub cv: CvRecord,
}

/// Multipart CV upload: store the file, extract text and fields, replace the
/// user's previous CV, and delete the replaced file. Parse failures remove
/// the stored file again and are not retried since a corrupt document stays
/// corrupt.
pub async fn upload_cv(
    State(state): State<SharedState>,
    Seeker(user): Seeker,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let (file_name, bytes) = read_file_field(&mut multipart).await?;

    let stored_path = store_upload(&state.config.upload_dir, &file_name, &bytes).await?;

    let parsed = match parse_off_runtime(&state, file_name.clone(), bytes).await {
        Ok(parsed) => parsed,
        Err(err) => {
            remove_file_best_effort(&stored_path).await;
            return Err(err);
        }
    };

    let upsert = CvUpsert {
        user_id: user.id,
        file_name: &file_name,
        file_path: &stored_path.to_string_lossy(),
        parsed: &parsed,
    };

    let (cv, previous_path) = match upsert_cv(&state.pool, &upsert).await {
        Ok(stored) => stored,
        Err(err) => {
            remove_file_best_effort(&stored_path).await;
            return Err(err.into());
        }
    };

    if let Some(previous) = previous_path {
        remove_file_best_effort(FsPath::new(&previous)).await;
    }

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "CV uploaded and processed successfully",
            cv,
        }),
    ))
}

pub async fn my_cv(
    State(state): State<SharedState>,
    Seeker(user): Seeker,
) -> Result<Json<CvWithOwner>, ApiError> {
    let cv = fetch_cv_with_owner(&state.pool, user.id).await?;
    Ok(Json(cv))
}

pub async fn delete_my_cv(
    State(state): State<SharedState>,
    Seeker(user): Seeker,
) -> Result<Json<serde_json::Value>, ApiError> {
    let file_path = delete_cv(&state.pool, user.id).await?;
    remove_file_best_effort(FsPath::new(&file_path)).await;

    Ok(Json(
        serde_json::json!({ "message": "CV deleted successfully" }),
    ))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::BadRequest(format!("invalid multipart body: {err}")))?
    {
        if field.name() == Some("file") {
            let file_name = field
                .file_name()
                .map(ToString::to_string)
                .ok_or_else(|| ApiError::BadRequest("uploaded file has no name".into()))?;

            let bytes = field
                .bytes()
                .await
                .map_err(|err| ApiError::BadRequest(format!("failed to read upload: {err}")))?
                .to_vec();

            return Ok((file_name, bytes));
        }
    }

    Err(ApiError::BadRequest("no file uploaded".into()))
}

/// Write the upload under a UUID-prefixed name. Only the final path
/// component of the client-supplied name is used, so a crafted file name
/// cannot escape the upload directory.
async fn store_upload(
    upload_dir: &FsPath,
    file_name: &str,
    bytes: &[u8],
) -> Result<PathBuf, ApiError> {
    let base_name = FsPath::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ApiError::BadRequest("uploaded file has no usable name".into()))?;

    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|err| ApiError::Internal(format!("failed to create upload dir: {err}")))?;

    let stored_path = upload_dir.join(format!("{}-{base_name}", Uuid::new_v4()));
    tokio::fs::write(&stored_path, bytes)
        .await
        .map_err(|err| ApiError::Internal(format!("failed to store upload: {err}")))?;

    Ok(stored_path)
}

/// Document parsing is CPU-bound; run it off the async runtime.
async fn parse_off_runtime(
    state: &SharedState,
    file_name: String,
    bytes: Vec<u8>,
) -> Result<ParsedDocument, ApiError> {
    let vocabulary = state.vocabulary.clone();

    let parsed = tokio::task::spawn_blocking(move || parse_document(&vocabulary, &file_name, &bytes))
        .await
        .map_err(|err| ApiError::Internal(format!("parser task failed: {err}")))??;

    Ok(parsed)
}

async fn remove_file_best_effort(path: &FsPath) {
    if let Err(err) = tokio::fs::remove_file(path).await {
        warn!(error = %err, path = %path.display(), "failed to remove upload");
    }
}
