//! Catalog endpoints: list, add, update and delete per kind tag.

use axum::{
    Json,
    extract::{
        Multipart, Path, Query, State,
        multipart::{MultipartError, MultipartRejection},
    },
    response::{IntoResponse, Response},
};
use basegrid_assets::UploadedFile;
use basegrid_model::CatalogKind;
use basegrid_storage::{StorageError, StorageResult, Submission};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::response::{CatalogResponse, catalog_error};
use crate::{AppState, run_blocking};

/// Form part carrying an uploaded image.
const IMAGE_FILE_FIELD: &str = "image_file";

/// Collection listed by `/api/items` when no `type` is given.
const DEFAULT_ITEMS_TYPE: &str = "tiles";

#[derive(Debug, Deserialize)]
pub(crate) struct ItemsQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
}

pub(crate) async fn list_handler(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Json<Vec<Map<String, Value>>> {
    Json(list_records(&state, &tag).await)
}

pub(crate) async fn items_handler(
    State(state): State<AppState>,
    Query(query): Query<ItemsQuery>,
) -> Json<Vec<Map<String, Value>>> {
    let tag = query.kind.as_deref().unwrap_or(DEFAULT_ITEMS_TYPE);
    Json(list_records(&state, tag).await)
}

pub(crate) async fn add_handler(
    State(state): State<AppState>,
    Path(tag): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let result: StorageResult<_> = async {
        let kind = CatalogKind::parse(&tag)?;
        let submission = read_submission(multipart).await?;
        let entities = state.entities.clone();
        run_blocking(move || entities.add(kind, &submission)).await
    }
    .await;

    match result {
        Ok(outcome) => Json(CatalogResponse::success(outcome.message, outcome.id)).into_response(),
        Err(e) => {
            warn!("Add to {} failed: {}", tag, e);
            catalog_error(&e)
        }
    }
}

pub(crate) async fn update_handler(
    State(state): State<AppState>,
    Path((tag, id)): Path<(String, String)>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let result: StorageResult<_> = async {
        let kind = CatalogKind::parse(&tag)?;
        let id = parse_id(&id)?;
        let submission = read_submission(multipart).await?;
        let entities = state.entities.clone();
        run_blocking(move || entities.update(kind, id, &submission)).await
    }
    .await;

    match result {
        Ok(outcome) => Json(CatalogResponse::success(outcome.message, outcome.id)).into_response(),
        Err(e) => {
            warn!("Update of {} {} failed: {}", tag, id, e);
            catalog_error(&e)
        }
    }
}

pub(crate) async fn delete_handler(
    State(state): State<AppState>,
    Path((tag, id)): Path<(String, String)>,
) -> Response {
    let result: StorageResult<_> = async {
        let kind = CatalogKind::parse(&tag)?;
        let id = parse_id(&id)?;
        let entities = state.entities.clone();
        run_blocking(move || entities.delete(kind, id)).await
    }
    .await;

    match result {
        Ok(outcome) => Json(CatalogResponse::success(outcome.message, outcome.id)).into_response(),
        Err(e) => {
            warn!("Delete of {} {} failed: {}", tag, id, e);
            catalog_error(&e)
        }
    }
}

/// Lists a kind for the read API. Never fails: an unknown tag or a store
/// error yields an empty list.
async fn list_records(state: &AppState, tag: &str) -> Vec<Map<String, Value>> {
    let kind = match CatalogKind::parse(tag) {
        Ok(kind) => kind,
        Err(e) => {
            debug!("List request for {:?}: {}", tag, e);
            return Vec::new();
        }
    };

    let entities = state.entities.clone();
    match run_blocking(move || entities.list(kind)).await {
        Ok(records) => records.into_iter().map(|record| record.data).collect(),
        Err(e) => {
            warn!("Listing {} failed, returning no records: {}", kind, e);
            Vec::new()
        }
    }
}

fn parse_id(raw: &str) -> StorageResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| StorageError::ValidationFailed(format!("id must be numeric, got {raw:?}")))
}

/// Collects the form into a submission.
///
/// A failure while reading the `image_file` part is kept as a failed upload
/// so the image resolver reports it after field validation; a broken form
/// stream fails the whole request.
async fn read_submission(
    multipart: Result<Multipart, MultipartRejection>,
) -> StorageResult<Submission> {
    let mut multipart =
        multipart.map_err(|e| StorageError::UploadFailed(e.body_text()))?;
    let mut submission = Submission::new();

    while let Some(field) = multipart.next_field().await.map_err(upload_failed)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == IMAGE_FILE_FIELD {
            let file_name = field.file_name().map(str::to_string);
            let upload = match field.bytes().await {
                Ok(bytes) => UploadedFile::new(file_name, bytes.to_vec()),
                Err(e) => UploadedFile::failed(e.body_text()),
            };
            submission.upload = Some(upload);
        } else {
            let value = field.text().await.map_err(upload_failed)?;
            submission.fields.insert(name, value);
        }
    }

    Ok(submission)
}

fn upload_failed(err: MultipartError) -> StorageError {
    StorageError::UploadFailed(err.body_text())
}
