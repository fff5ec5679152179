//! Grid layout endpoints.

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use basegrid_model::{DEFAULT_GRID_ID, NewPlacement, coerce_int, parse_leading_int};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::response::{GridLoadResponse, GridWriteResponse, grid_error};
use crate::{AppState, run_blocking};

const INVALID_DATA: &str = "Invalid data - items array required";

#[derive(Debug, Deserialize)]
pub(crate) struct GridQuery {
    grid_id: Option<String>,
}

impl GridQuery {
    fn grid_id(&self) -> i64 {
        self.grid_id
            .as_deref()
            .map(parse_leading_int)
            .unwrap_or(DEFAULT_GRID_ID)
    }
}

/// Degrades to an empty, unsuccessful body instead of an error status.
pub(crate) async fn load_handler(
    State(state): State<AppState>,
    Query(query): Query<GridQuery>,
) -> Json<GridLoadResponse> {
    let grid_id = query.grid_id();
    let grids = state.grids.clone();
    match run_blocking(move || grids.load(grid_id)).await {
        Ok(items) => Json(GridLoadResponse {
            success: true,
            count: items.len(),
            items,
            error: None,
        }),
        Err(e) => {
            warn!("Loading grid {} failed: {}", grid_id, e);
            Json(GridLoadResponse {
                success: false,
                items: Vec::new(),
                count: 0,
                error: Some(e.to_string()),
            })
        }
    }
}

/// Body: `{"gridId": N, "items": [{"itemId", "itemType", "x", "y"}, ...]}`.
/// `grid_id` is accepted in place of `gridId`; a missing or null id saves to the
/// default grid.
pub(crate) async fn save_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let data: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let Some(entries) = data.get("items").and_then(Value::as_array) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(GridWriteResponse::error(INVALID_DATA)),
        )
            .into_response();
    };

    let grid_id = ["gridId", "grid_id"]
        .into_iter()
        .filter_map(|key| data.get(key))
        .find(|v| !v.is_null())
        .map(coerce_int)
        .unwrap_or(DEFAULT_GRID_ID);
    let placements: Vec<NewPlacement> = entries.iter().map(NewPlacement::from_json).collect();

    let grids = state.grids.clone();
    match run_blocking(move || grids.save(grid_id, &placements)).await {
        Ok(inserted) => Json(GridWriteResponse::saved(inserted)).into_response(),
        Err(e) => {
            warn!("Saving grid {} failed: {}", grid_id, e);
            grid_error(&e)
        }
    }
}

pub(crate) async fn clear_handler(
    State(state): State<AppState>,
    Query(query): Query<GridQuery>,
) -> Response {
    let grid_id = query.grid_id();
    let grids = state.grids.clone();
    match run_blocking(move || grids.clear(grid_id)).await {
        Ok(deleted) => Json(GridWriteResponse::cleared(deleted)).into_response(),
        Err(e) => {
            warn!("Clearing grid {} failed: {}", grid_id, e);
            grid_error(&e)
        }
    }
}
