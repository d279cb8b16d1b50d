//! Media library endpoints: list, fetch, delete, batch delete, and usage.

use crate::auth::models::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use pixlift_core::models::{LibraryItemWithUrl, LibraryUsage, MediaType};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Deserialize, ToSchema, utoipa::IntoParams)]
pub struct LibraryQuery {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
    /// Filter to "image" or "video"; absent means both
    #[serde(rename = "type")]
    pub media_type: Option<MediaType>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListLibraryResponse {
    pub success: bool,
    pub items: Vec<LibraryItemWithUrl>,
    pub total: i64,
    pub has_more: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GetLibraryItemResponse {
    pub success: bool,
    pub item: LibraryItemWithUrl,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteLibraryItemResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchDeleteRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatchDeleteResponse {
    pub success: bool,
    pub deleted: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UsageResponse {
    pub success: bool,
    pub usage: LibraryUsage,
}

#[utoipa::path(
    get,
    path = "/api/library",
    tag = "library",
    params(
        LibraryQuery
    ),
    responses(
        (status = 200, description = "Page of library items", body = ListLibraryResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, query),
    fields(
        user_id = %user.user_id,
        limit = ?query.limit,
        offset = ?query.offset,
        media_type = ?query.media_type,
        operation = "list_library"
    )
)]
pub async fn list_library(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<LibraryQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let page = state
        .library
        .list(user.user_id, query.media_type, query.limit, query.offset)
        .await?;

    Ok(Json(ListLibraryResponse {
        success: true,
        items: page.items,
        total: page.total,
        has_more: page.has_more,
    }))
}

#[utoipa::path(
    get,
    path = "/api/library/{id}",
    tag = "library",
    params(
        ("id" = Uuid, Path, description = "Library item ID")
    ),
    responses(
        (status = 200, description = "Library item found", body = GetLibraryItemResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(
        user_id = %user.user_id,
        item_id = %id,
        operation = "get_library_item"
    )
)]
pub async fn get_library_item(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, HttpAppError> {
    let item = state.library.get(user.user_id, id).await?;

    Ok(Json(GetLibraryItemResponse {
        success: true,
        item,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/library/{id}",
    tag = "library",
    params(
        ("id" = Uuid, Path, description = "Library item ID")
    ),
    responses(
        (status = 200, description = "Item deleted", body = DeleteLibraryItemResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Delete failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(
        user_id = %user.user_id,
        item_id = %id,
        operation = "delete_library_item"
    )
)]
pub async fn delete_library_item(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, HttpAppError> {
    state.library.delete(user.user_id, id).await?;

    Ok(Json(DeleteLibraryItemResponse { success: true }))
}

#[utoipa::path(
    delete,
    path = "/api/library/batch",
    tag = "library",
    request_body = BatchDeleteRequest,
    responses(
        (status = 200, description = "Batch delete completed", body = BatchDeleteResponse),
        (status = 400, description = "Empty or oversized batch", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No owned items in batch", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, body),
    fields(
        user_id = %user.user_id,
        batch_size = body.ids.len(),
        operation = "batch_delete_library"
    )
)]
pub async fn batch_delete_library(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(body): ValidatedJson<BatchDeleteRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let deleted = state.library.batch_delete(user.user_id, &body.ids).await?;

    Ok(Json(BatchDeleteResponse {
        success: true,
        deleted,
    }))
}

#[utoipa::path(
    get,
    path = "/api/library/usage",
    tag = "library",
    responses(
        (status = 200, description = "Storage usage for the user", body = UsageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(
        user_id = %user.user_id,
        operation = "get_usage"
    )
)]
pub async fn get_usage(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, HttpAppError> {
    let usage = state.library.usage(user.user_id).await?;

    Ok(Json(UsageResponse {
        success: true,
        usage,
    }))
}
