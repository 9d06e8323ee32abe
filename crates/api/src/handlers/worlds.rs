//! CRUD handlers for the `world` table.
//!
//! Body-taking handlers extract `Result<Json<_>, JsonRejection>` so every
//! malformed or mistyped body maps to 400 rather than axum's default 422.
//! Store failures map to 500 with an empty body.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use db::models::World;
use db::repository::{batch, worlds as world_repo};
use db::DbError;

use crate::AppState;

const DEFAULT_PAGE_LIMIT: i64 = 20;

// ---------------------------------------------------------------------------
// single-row
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct ReadOneQuery {
    pub id: i32,
}

pub async fn read_one(
    State(state): State<AppState>,
    Query(q): Query<ReadOneQuery>,
) -> Result<Json<World>, StatusCode> {
    match world_repo::get_world(&state.pool, q.id).await {
        Ok(w) => Ok(Json(w)),
        Err(DbError::NotFound) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn read_many(
    State(state): State<AppState>,
    Query(q): Query<PageQuery>,
) -> Result<Json<Vec<World>>, StatusCode> {
    let limit = q.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    let offset = q.offset.unwrap_or(0);

    match world_repo::list_worlds(&state.pool, limit, offset).await {
        Ok(rows) => Ok(Json(rows)),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[derive(Deserialize)]
pub struct RandomNumberBody {
    #[serde(rename = "randomNumber")]
    pub random_number: i32,
}

pub async fn create_one(
    State(state): State<AppState>,
    payload: Result<Json<RandomNumberBody>, JsonRejection>,
) -> StatusCode {
    let Ok(Json(body)) = payload else {
        return StatusCode::BAD_REQUEST;
    };

    match world_repo::create_world(&state.pool, body.random_number).await {
        Ok(()) => StatusCode::CREATED,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub async fn update_one(
    Path(id): Path<i32>,
    State(state): State<AppState>,
    payload: Result<Json<RandomNumberBody>, JsonRejection>,
) -> StatusCode {
    let Ok(Json(body)) = payload else {
        return StatusCode::BAD_REQUEST;
    };

    // Zero rows affected (unknown id) is still a success.
    match world_repo::update_world(&state.pool, id, body.random_number).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub async fn delete_one(Path(id): Path<i32>, State(state): State<AppState>) -> StatusCode {
    match world_repo::delete_world(&state.pool, id).await {
        Ok(_) => StatusCode::NO_CONTENT,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ---------------------------------------------------------------------------
// batched
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct CreateManyBody {
    pub items: Vec<RandomNumberBody>,
}

pub async fn create_many(
    State(state): State<AppState>,
    payload: Result<Json<CreateManyBody>, JsonRejection>,
) -> StatusCode {
    let Ok(Json(body)) = payload else {
        return StatusCode::BAD_REQUEST;
    };
    if body.items.is_empty() {
        return StatusCode::BAD_REQUEST;
    }

    let values: Vec<i32> = body.items.iter().map(|i| i.random_number).collect();
    match batch::create_worlds(&state.pool, &values).await {
        Ok(()) => StatusCode::CREATED,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Deserialize)]
pub struct UpdateManyItem {
    pub id: i32,
    #[serde(rename = "randomNumber")]
    pub random_number: i32,
}

#[derive(Deserialize)]
pub struct UpdateManyBody {
    pub items: Vec<UpdateManyItem>,
}

/// Unlike create-many and delete-many, an empty update batch is accepted and
/// succeeds as a no-op.
pub async fn update_many(
    State(state): State<AppState>,
    payload: Result<Json<UpdateManyBody>, JsonRejection>,
) -> StatusCode {
    let Ok(Json(body)) = payload else {
        return StatusCode::BAD_REQUEST;
    };

    let items: Vec<(i32, i32)> = body
        .items
        .iter()
        .map(|i| (i.id, i.random_number))
        .collect();

    match batch::update_worlds(&state.pool, &items).await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Deserialize)]
pub struct DeleteManyBody {
    pub ids: Vec<i32>,
}

pub async fn delete_many(
    State(state): State<AppState>,
    payload: Result<Json<DeleteManyBody>, JsonRejection>,
) -> StatusCode {
    let Ok(Json(body)) = payload else {
        return StatusCode::BAD_REQUEST;
    };
    if body.ids.is_empty() {
        return StatusCode::BAD_REQUEST;
    }

    match batch::delete_worlds(&state.pool, &body.ids).await {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ---------------------------------------------------------------------------
// write-through
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct WriteManyQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Comma-separated replacement values, paired positionally with the
    /// rows the page read returns.
    pub r: Option<String>,
}

pub async fn write_many(
    State(state): State<AppState>,
    Query(q): Query<WriteManyQuery>,
) -> Result<Json<Vec<World>>, StatusCode> {
    let limit = q.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    let offset = q.offset.unwrap_or(0);
    let values = parse_values(q.r.as_deref());

    match batch::write_through(&state.pool, limit, offset, &values).await {
        Ok(rows) => Ok(Json(rows)),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// Parse the `r` parameter, keeping positions intact: entries that fail to
/// parse fall back to the batch default so later values still line up with
/// their rows.
fn parse_values(r: Option<&str>) -> Vec<i32> {
    match r {
        None | Some("") => Vec::new(),
        Some(raw) => raw
            .split(',')
            .map(|s| s.trim().parse().unwrap_or(batch::DEFAULT_WRITE_VALUE))
            .collect(),
    }
}
