//! List endpoints
//!
//! index/show/new/create/edit/update/destroy. Each handler picks HTML,
//! Turbo Stream, or JSON from the `Accept` header.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::db::repos::{DbError, ListRepo};
use crate::http::error::ApiError;
use crate::http::extractors::ListId;
use crate::http::respond::{self, Flash, Format};
use crate::http::server::AppState;
use crate::http::views::{self, ListForm, LISTS_PATH};
use crate::models::{List, ListParams, ValidationError};

pub const CREATED_NOTICE: &str = "List successfully created.";
pub const UPDATED_NOTICE: &str = "List successfully edited.";
pub const DESTROYED_NOTICE: &str = "List successfully destroyed.";

/// List response
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<List> for ListResponse {
    fn from(l: List) -> Self {
        Self {
            id: l.id,
            name: l.name,
            created_at: l.created_at.to_rfc3339(),
            updated_at: l.updated_at.to_rfc3339(),
        }
    }
}

/// GET /lists - all lists, newest first
async fn index(
    State(state): State<Arc<AppState>>,
    format: Format,
    flash: Flash,
) -> Result<Response, ApiError> {
    let lists = ListRepo::new(&state.pool).all().await?;

    Ok(match format {
        Format::Json => {
            Json(lists.into_iter().map(ListResponse::from).collect::<Vec<_>>()).into_response()
        }
        Format::Html | Format::TurboStream => respond::page(
            StatusCode::OK,
            views::index_page(&lists, flash.notice()),
            &flash,
        ),
    })
}

/// GET /lists/{id}
async fn show(
    State(state): State<Arc<AppState>>,
    ListId(id): ListId,
    format: Format,
    flash: Flash,
) -> Result<Response, ApiError> {
    let list = ListRepo::new(&state.pool).find(id).await?;

    Ok(match format {
        Format::Json => Json(ListResponse::from(list)).into_response(),
        Format::Html | Format::TurboStream => respond::page(
            StatusCode::OK,
            views::show_page(&list, flash.notice()),
            &flash,
        ),
    })
}

/// GET /lists/new
async fn new(flash: Flash) -> Response {
    respond::page(
        StatusCode::OK,
        views::new_page(&ListForm::blank(), flash.notice()),
        &flash,
    )
}

/// POST /lists
async fn create(
    State(state): State<Arc<AppState>>,
    format: Format,
    params: ListParams,
) -> Result<Response, ApiError> {
    let list = match ListRepo::new(&state.pool).create(&params).await {
        Ok(list) => list,
        Err(DbError::Validation(err)) => {
            tracing::debug!(error = %err, "list rejected");
            let form = ListForm::rejected(None, "", &params, &err);
            return Ok(unprocessable(format, views::new_page(&form, None), err));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(list_id = list.id, name = %list.name, "list created");

    Ok(match format {
        Format::Html => respond::redirect_with_notice(LISTS_PATH, CREATED_NOTICE),
        Format::TurboStream => respond::turbo_stream(
            StatusCode::OK,
            views::created_stream(&list, CREATED_NOTICE),
        ),
        Format::Json => (StatusCode::CREATED, Json(ListResponse::from(list))).into_response(),
    })
}

/// GET /lists/{id}/edit
async fn edit(
    State(state): State<Arc<AppState>>,
    ListId(id): ListId,
    flash: Flash,
) -> Result<Response, ApiError> {
    let list = ListRepo::new(&state.pool).find(id).await?;

    Ok(respond::page(
        StatusCode::OK,
        views::edit_page(&ListForm::for_list(&list), flash.notice()),
        &flash,
    ))
}

/// PATCH/PUT /lists/{id}
async fn update(
    State(state): State<Arc<AppState>>,
    ListId(id): ListId,
    format: Format,
    params: Result<ListParams, ApiError>,
) -> Result<Response, ApiError> {
    let repo = ListRepo::new(&state.pool);
    // An unknown id is a 404 whatever the body holds.
    let current = repo.find(id).await?;
    let params = params?;

    let list = match repo.update(id, &params).await {
        Ok(list) => list,
        Err(DbError::Validation(err)) => {
            tracing::debug!(list_id = id, error = %err, "list update rejected");
            let form = ListForm::rejected(Some(id), &current.name, &params, &err);
            return Ok(unprocessable(format, views::edit_page(&form, None), err));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(list_id = list.id, name = %list.name, "list updated");

    Ok(match format {
        Format::Html => respond::redirect_with_notice(LISTS_PATH, UPDATED_NOTICE),
        Format::TurboStream => respond::turbo_stream(
            StatusCode::OK,
            views::updated_stream(&list, UPDATED_NOTICE),
        ),
        Format::Json => Json(ListResponse::from(list)).into_response(),
    })
}

/// DELETE /lists/{id}
async fn destroy(
    State(state): State<Arc<AppState>>,
    ListId(id): ListId,
    format: Format,
) -> Result<Response, ApiError> {
    let list = ListRepo::new(&state.pool).destroy(id).await?;

    tracing::info!(list_id = list.id, name = %list.name, "list destroyed");

    Ok(match format {
        Format::Html => respond::redirect_with_notice(LISTS_PATH, DESTROYED_NOTICE),
        Format::TurboStream => respond::turbo_stream(
            StatusCode::OK,
            views::destroyed_stream(list.id, DESTROYED_NOTICE),
        ),
        Format::Json => StatusCode::NO_CONTENT.into_response(),
    })
}

/// GET / - the index is the home page
async fn root() -> Redirect {
    Redirect::to(LISTS_PATH)
}

/// 422 with the form re-rendered, or a JSON error body.
fn unprocessable(format: Format, html: String, err: ValidationError) -> Response {
    match format {
        Format::Json => ApiError::Validation(err).into_response(),
        Format::Html | Format::TurboStream => {
            respond::page(StatusCode::UNPROCESSABLE_ENTITY, html, &Flash::default())
        }
    }
}

/// List routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/lists", get(index).post(create))
        .route("/lists/new", get(new))
        .route(
            "/lists/{id}",
            get(show).patch(update).put(update).delete(destroy),
        )
        .route("/lists/{id}/edit", get(edit))
}
