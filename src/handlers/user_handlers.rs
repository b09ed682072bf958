use crate::error::{AppError, Result};
use crate::models::{User, UserInput, UserPage};
use crate::services::export::export_filename;
use crate::services::user_service::ListUsersQuery;
use crate::services::validation::FieldError;
use crate::AppState;
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

/// Query string of `GET /api/users`. Numbers are kept as text so that a
/// malformed value falls back to its default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

impl From<ListUsersParams> for ListUsersQuery {
    fn from(params: ListUsersParams) -> Self {
        ListUsersQuery {
            page: parse_number(params.page.as_deref()),
            limit: parse_number(params.limit.as_deref()),
            search: params.search,
        }
    }
}

fn parse_number(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse::<i64>().ok())
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    fn with_message(message: &str, data: Option<T>) -> Self {
        ApiResponse {
            success: true,
            message: Some(message.to_string()),
            data,
        }
    }
}

fn json_body(payload: std::result::Result<Json<UserInput>, JsonRejection>) -> Result<UserInput> {
    payload.map(|Json(input)| input).map_err(|rejection| {
        AppError::Validation(vec![FieldError {
            field: "body",
            message: rejection.body_text(),
        }])
    })
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> Result<Json<ApiResponse<UserPage>>> {
    let page = state.user_service.list_users(params.into()).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<User>>> {
    let user = state.user_service.get_user(&id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    payload: std::result::Result<Json<UserInput>, JsonRejection>,
) -> Result<Response> {
    let input = json_body(payload)?;
    let user = state.user_service.create_user(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("User created successfully", Some(user))),
    )
        .into_response())
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UserInput>, JsonRejection>,
) -> Result<Json<ApiResponse<User>>> {
    let input = json_body(payload)?;
    let user = state.user_service.update_user(&id, input).await?;

    Ok(Json(ApiResponse::with_message(
        "User updated successfully",
        Some(user),
    )))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    state.user_service.delete_user(&id).await?;
    Ok(Json(ApiResponse::with_message("User deleted successfully", None)))
}

/// GET /api/users/export/csv
///
/// Streams the export line by line as a dated attachment.
pub async fn export_users_csv(State(state): State<AppState>) -> Result<Response> {
    let export = state.user_service.export_users().await?;
    tracing::debug!("Exporting {} users as CSV", export.remaining_records());

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_filename(Utc::now().date_naive())
    );
    let chunks = tokio_stream::iter(export.into_chunks().map(Ok::<_, Infallible>));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(chunks),
    )
        .into_response())
}
