//! Avatar route handlers: multipart upload, serving, and the paged catalog.

use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;

use campus_core::{Error, StudentId};
use campus_db::models::Avatar;

use crate::context::AppContext;
use crate::error::AppError;

/// Avatar metadata response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AvatarResponse {
    pub id: i64,
    pub student_id: i64,
    pub file_path: String,
    pub media_type: String,
    pub file_size: i64,
}

impl AvatarResponse {
    fn from_model(avatar: &Avatar) -> Self {
        Self {
            id: avatar.id.value(),
            student_id: avatar.student_id.value(),
            file_path: avatar.file_path.clone(),
            media_type: avatar.media_type.clone(),
            file_size: avatar.file_size,
        }
    }
}

/// Catalog entry: metadata plus the stored bytes, base64-encoded.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AvatarListEntry {
    pub id: i64,
    pub student_id: i64,
    pub file_path: String,
    pub media_type: String,
    pub file_size: i64,
    /// Base64-encoded copy of the stored bytes.
    pub data: String,
}

impl AvatarListEntry {
    fn from_model(avatar: &Avatar) -> Self {
        Self {
            id: avatar.id.value(),
            student_id: avatar.student_id.value(),
            file_path: avatar.file_path.clone(),
            media_type: avatar.media_type.clone(),
            file_size: avatar.file_size,
            data: base64::engine::general_purpose::STANDARD.encode(&avatar.data),
        }
    }
}

/// Query parameters for the avatar catalog.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct PageParams {
    /// 1-indexed page number.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Page size; must be positive.
    #[serde(default = "default_size")]
    pub size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    20
}

/// POST /api/students/{id}/avatar
///
/// Accepts a multipart form with an `avatar` file field. The declared file
/// name supplies the extension; the declared content type is stored
/// verbatim.
#[utoipa::path(
    post,
    path = "/api/students/{id}/avatar",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Stored avatar metadata", body = AvatarResponse),
        (status = 400, description = "Missing field or unusable file name"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn upload_avatar(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<AvatarResponse>, AppError> {
    let student_id = StudentId::new(id);

    let mut uploaded = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(format!("invalid multipart payload: {e}")))?
    {
        if field.name() != Some("avatar") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| Error::Validation(format!("failed to read avatar field: {e}")))?;
        uploaded = Some((file_name, content_type, bytes));
        break;
    }

    let (file_name, content_type, bytes) =
        uploaded.ok_or_else(|| Error::Validation("missing 'avatar' multipart field".into()))?;

    let avatar = ctx
        .avatars
        .upload(student_id, &file_name, &content_type, &bytes)
        .await?;

    Ok(Json(AvatarResponse::from_model(&avatar)))
}

/// GET /api/students/{id}/avatar
///
/// Serves the database copy of the avatar bytes.
#[utoipa::path(
    get,
    path = "/api/students/{id}/avatar",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Avatar bytes from the database copy"),
        (status = 404, description = "No avatar for this student")
    )
)]
pub async fn serve_avatar(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let avatar = ctx.catalog.get(StudentId::new(id))?;
    Ok((
        [
            (header::CONTENT_TYPE, avatar.media_type.clone()),
            (header::CONTENT_LENGTH, avatar.file_size.to_string()),
        ],
        avatar.data,
    )
        .into_response())
}

/// GET /api/students/{id}/avatar/file
///
/// Streams the filesystem copy of the avatar without loading it into memory.
#[utoipa::path(
    get,
    path = "/api/students/{id}/avatar/file",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Avatar bytes streamed from disk"),
        (status = 404, description = "No avatar for this student")
    )
)]
pub async fn serve_avatar_file(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let avatar = ctx.catalog.get(StudentId::new(id))?;

    let file = tokio::fs::File::open(&avatar.file_path)
        .await
        .map_err(|e| Error::Io { source: e })?;
    let body = Body::from_stream(ReaderStream::new(file));

    Ok((
        [
            (header::CONTENT_TYPE, avatar.media_type.clone()),
            (header::CONTENT_LENGTH, avatar.file_size.to_string()),
        ],
        body,
    )
        .into_response())
}

/// GET /api/avatars
#[utoipa::path(
    get,
    path = "/api/avatars",
    params(PageParams),
    responses(
        (status = 200, description = "One page of avatar records", body = Vec<AvatarListEntry>),
        (status = 400, description = "Non-positive page number or size")
    )
)]
pub async fn list_avatars(
    State(ctx): State<AppContext>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<AvatarListEntry>>, AppError> {
    let page = ctx.catalog.list_page(params.page, params.size)?;
    Ok(Json(page.iter().map(AvatarListEntry::from_model).collect()))
}
