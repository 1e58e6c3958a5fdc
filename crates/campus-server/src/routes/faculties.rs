//! Faculty route handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use campus_core::{Error, FacultyId};
use campus_db::queries::{faculties, students};

use crate::context::AppContext;
use crate::error::AppError;
use crate::routes::students::StudentResponse;

/// Faculty response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct FacultyResponse {
    pub id: i64,
    pub name: String,
    pub color: String,
}

impl FacultyResponse {
    pub(crate) fn from_model(faculty: &campus_db::models::Faculty) -> Self {
        Self {
            id: faculty.id.value(),
            name: faculty.name.clone(),
            color: faculty.color.clone(),
        }
    }
}

/// Body for creating or updating a faculty.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct FacultyRequest {
    pub name: String,
    pub color: String,
}

/// Query parameters for listing faculties.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListFacultiesParams {
    /// Case-insensitive match against faculty name or color.
    pub query: Option<String>,
}

/// POST /api/faculties
#[utoipa::path(
    post,
    path = "/api/faculties",
    request_body = FacultyRequest,
    responses((status = 200, description = "Created faculty", body = FacultyResponse))
)]
pub async fn create_faculty(
    State(ctx): State<AppContext>,
    Json(body): Json<FacultyRequest>,
) -> Result<Json<FacultyResponse>, AppError> {
    let conn = campus_db::pool::get_conn(&ctx.db)?;
    let faculty = faculties::create_faculty(&conn, &body.name, &body.color)?;
    Ok(Json(FacultyResponse::from_model(&faculty)))
}

/// GET /api/faculties/{id}
#[utoipa::path(
    get,
    path = "/api/faculties/{id}",
    params(("id" = i64, Path, description = "Faculty ID")),
    responses(
        (status = 200, description = "Faculty details", body = FacultyResponse),
        (status = 404, description = "Faculty not found")
    )
)]
pub async fn get_faculty(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
) -> Result<Json<FacultyResponse>, AppError> {
    let faculty_id = FacultyId::new(id);
    let conn = campus_db::pool::get_conn(&ctx.db)?;
    let faculty = faculties::get_faculty(&conn, faculty_id)?
        .ok_or_else(|| Error::not_found("faculty", faculty_id))?;
    Ok(Json(FacultyResponse::from_model(&faculty)))
}

/// PUT /api/faculties/{id}
#[utoipa::path(
    put,
    path = "/api/faculties/{id}",
    params(("id" = i64, Path, description = "Faculty ID")),
    request_body = FacultyRequest,
    responses(
        (status = 200, description = "Updated faculty", body = FacultyResponse),
        (status = 404, description = "Faculty not found")
    )
)]
pub async fn update_faculty(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
    Json(body): Json<FacultyRequest>,
) -> Result<Json<FacultyResponse>, AppError> {
    let faculty_id = FacultyId::new(id);
    let conn = campus_db::pool::get_conn(&ctx.db)?;
    let faculty = faculties::update_faculty(&conn, faculty_id, &body.name, &body.color)?
        .ok_or_else(|| Error::not_found("faculty", faculty_id))?;
    Ok(Json(FacultyResponse::from_model(&faculty)))
}

/// DELETE /api/faculties/{id}
#[utoipa::path(
    delete,
    path = "/api/faculties/{id}",
    params(("id" = i64, Path, description = "Faculty ID")),
    responses(
        (status = 200, description = "Faculty deleted"),
        (status = 404, description = "Faculty not found")
    )
)]
pub async fn delete_faculty(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let faculty_id = FacultyId::new(id);
    let conn = campus_db::pool::get_conn(&ctx.db)?;
    if !faculties::delete_faculty(&conn, faculty_id)? {
        return Err(Error::not_found("faculty", faculty_id).into());
    }
    Ok(Json(serde_json::json!({"deleted": true})))
}

/// GET /api/faculties
#[utoipa::path(
    get,
    path = "/api/faculties",
    params(ListFacultiesParams),
    responses((status = 200, description = "List faculties", body = Vec<FacultyResponse>))
)]
pub async fn list_faculties(
    State(ctx): State<AppContext>,
    Query(params): Query<ListFacultiesParams>,
) -> Result<Json<Vec<FacultyResponse>>, AppError> {
    let conn = campus_db::pool::get_conn(&ctx.db)?;
    let list = match params.query {
        Some(ref term) => faculties::search_faculties(&conn, term)?,
        None => faculties::list_faculties(&conn)?,
    };
    Ok(Json(list.iter().map(FacultyResponse::from_model).collect()))
}

/// GET /api/faculties/{id}/students
#[utoipa::path(
    get,
    path = "/api/faculties/{id}/students",
    params(("id" = i64, Path, description = "Faculty ID")),
    responses(
        (status = 200, description = "Students of the faculty", body = Vec<StudentResponse>),
        (status = 404, description = "Faculty not found")
    )
)]
pub async fn faculty_students(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<StudentResponse>>, AppError> {
    let faculty_id = FacultyId::new(id);
    let conn = campus_db::pool::get_conn(&ctx.db)?;
    faculties::get_faculty(&conn, faculty_id)?
        .ok_or_else(|| Error::not_found("faculty", faculty_id))?;
    let roster = students::list_students_by_faculty(&conn, faculty_id)?;
    Ok(Json(roster.iter().map(StudentResponse::from_model).collect()))
}
