//! Student route handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use campus_core::{Error, FacultyId, StudentId};
use campus_db::queries::{faculties, students};

use crate::context::AppContext;
use crate::error::AppError;
use crate::routes::faculties::FacultyResponse;

/// Student response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct StudentResponse {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub faculty_id: Option<i64>,
}

impl StudentResponse {
    pub(crate) fn from_model(student: &campus_db::models::Student) -> Self {
        Self {
            id: student.id.value(),
            name: student.name.clone(),
            age: student.age,
            faculty_id: student.faculty_id.map(|f| f.value()),
        }
    }
}

/// Body for creating or updating a student.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct StudentRequest {
    pub name: String,
    pub age: i32,
    pub faculty_id: Option<i64>,
}

/// Query parameters for listing students.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListStudentsParams {
    /// Exact age filter.
    pub age: Option<i32>,
    /// Lower bound of an inclusive age range (requires `max`).
    pub min: Option<i32>,
    /// Upper bound of an inclusive age range (requires `min`).
    pub max: Option<i32>,
}

/// POST /api/students
#[utoipa::path(
    post,
    path = "/api/students",
    request_body = StudentRequest,
    responses((status = 200, description = "Created student", body = StudentResponse))
)]
pub async fn create_student(
    State(ctx): State<AppContext>,
    Json(body): Json<StudentRequest>,
) -> Result<Json<StudentResponse>, AppError> {
    let conn = campus_db::pool::get_conn(&ctx.db)?;
    let faculty_id = resolve_faculty(&conn, body.faculty_id)?;
    let student = students::create_student(&conn, &body.name, body.age, faculty_id)?;
    Ok(Json(StudentResponse::from_model(&student)))
}

/// GET /api/students/{id}
#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = StudentResponse),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_student(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
) -> Result<Json<StudentResponse>, AppError> {
    let student_id = StudentId::new(id);
    let conn = campus_db::pool::get_conn(&ctx.db)?;
    let student = students::get_student(&conn, student_id)?
        .ok_or_else(|| Error::not_found("student", student_id))?;
    Ok(Json(StudentResponse::from_model(&student)))
}

/// PUT /api/students/{id}
#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = i64, Path, description = "Student ID")),
    request_body = StudentRequest,
    responses(
        (status = 200, description = "Updated student", body = StudentResponse),
        (status = 404, description = "Student not found")
    )
)]
pub async fn update_student(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
    Json(body): Json<StudentRequest>,
) -> Result<Json<StudentResponse>, AppError> {
    let student_id = StudentId::new(id);
    let conn = campus_db::pool::get_conn(&ctx.db)?;
    let faculty_id = resolve_faculty(&conn, body.faculty_id)?;
    let student = students::update_student(&conn, student_id, &body.name, body.age, faculty_id)?
        .ok_or_else(|| Error::not_found("student", student_id))?;
    Ok(Json(StudentResponse::from_model(&student)))
}

/// DELETE /api/students/{id}
#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn delete_student(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let student_id = StudentId::new(id);
    let conn = campus_db::pool::get_conn(&ctx.db)?;
    if !students::delete_student(&conn, student_id)? {
        return Err(Error::not_found("student", student_id).into());
    }
    Ok(Json(serde_json::json!({"deleted": true})))
}

/// GET /api/students
#[utoipa::path(
    get,
    path = "/api/students",
    params(ListStudentsParams),
    responses((status = 200, description = "List students", body = Vec<StudentResponse>))
)]
pub async fn list_students(
    State(ctx): State<AppContext>,
    Query(params): Query<ListStudentsParams>,
) -> Result<Json<Vec<StudentResponse>>, AppError> {
    let conn = campus_db::pool::get_conn(&ctx.db)?;

    let list = if let Some(age) = params.age {
        students::list_students_by_age(&conn, age)?
    } else if let (Some(min), Some(max)) = (params.min, params.max) {
        if min < 1 || max < min {
            return Err(Error::Validation(format!(
                "invalid age range: min={min}, max={max}"
            ))
            .into());
        }
        students::list_students_by_age_between(&conn, min, max)?
    } else if params.min.is_some() || params.max.is_some() {
        return Err(Error::Validation("age range requires both min and max".into()).into());
    } else {
        students::list_students(&conn)?
    };

    Ok(Json(list.iter().map(StudentResponse::from_model).collect()))
}

/// GET /api/students/{id}/faculty
#[utoipa::path(
    get,
    path = "/api/students/{id}/faculty",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Faculty of the student", body = FacultyResponse),
        (status = 404, description = "Student not found or has no faculty")
    )
)]
pub async fn get_student_faculty(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
) -> Result<Json<FacultyResponse>, AppError> {
    let student_id = StudentId::new(id);
    let conn = campus_db::pool::get_conn(&ctx.db)?;
    let student = students::get_student(&conn, student_id)?
        .ok_or_else(|| Error::not_found("student", student_id))?;
    let faculty_id = student
        .faculty_id
        .ok_or_else(|| Error::not_found("faculty", student_id))?;
    let faculty = faculties::get_faculty(&conn, faculty_id)?
        .ok_or_else(|| Error::not_found("faculty", faculty_id))?;
    Ok(Json(FacultyResponse::from_model(&faculty)))
}

/// GET /api/students/by-name/{name}/faculty
#[utoipa::path(
    get,
    path = "/api/students/by-name/{name}/faculty",
    params(("name" = String, Path, description = "Student name (case-insensitive)")),
    responses(
        (status = 200, description = "Faculty of the named student", body = FacultyResponse),
        (status = 404, description = "No such student, or the student has no faculty")
    )
)]
pub async fn student_faculty_by_name(
    State(ctx): State<AppContext>,
    Path(name): Path<String>,
) -> Result<Json<FacultyResponse>, AppError> {
    let conn = campus_db::pool::get_conn(&ctx.db)?;
    let student = students::find_student_by_name(&conn, &name)?
        .ok_or_else(|| Error::not_found("student", &name))?;
    let faculty_id = student
        .faculty_id
        .ok_or_else(|| Error::not_found("faculty", &student.name))?;
    let faculty = faculties::get_faculty(&conn, faculty_id)?
        .ok_or_else(|| Error::not_found("faculty", faculty_id))?;
    Ok(Json(FacultyResponse::from_model(&faculty)))
}

/// Student headcount.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CountResponse {
    pub count: i64,
}

/// GET /api/students/stats/count
#[utoipa::path(
    get,
    path = "/api/students/stats/count",
    responses((status = 200, description = "Total number of students", body = CountResponse))
)]
pub async fn count_students(
    State(ctx): State<AppContext>,
) -> Result<Json<CountResponse>, AppError> {
    let conn = campus_db::pool::get_conn(&ctx.db)?;
    let count = students::count_students(&conn)?;
    Ok(Json(CountResponse { count }))
}

/// Average student age; `null` when there are no students.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AverageAgeResponse {
    pub average_age: Option<f64>,
}

/// GET /api/students/stats/average-age
#[utoipa::path(
    get,
    path = "/api/students/stats/average-age",
    responses((status = 200, description = "Average age", body = AverageAgeResponse))
)]
pub async fn average_age(
    State(ctx): State<AppContext>,
) -> Result<Json<AverageAgeResponse>, AppError> {
    let conn = campus_db::pool::get_conn(&ctx.db)?;
    let average_age = students::average_age(&conn)?;
    Ok(Json(AverageAgeResponse { average_age }))
}

/// Query parameters for the latest-enrolled listing.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct LastEnrolledParams {
    /// How many students to return, newest first.
    #[serde(default = "default_last_enrolled_limit")]
    pub limit: i64,
}

fn default_last_enrolled_limit() -> i64 {
    5
}

/// GET /api/students/stats/last-enrolled
#[utoipa::path(
    get,
    path = "/api/students/stats/last-enrolled",
    params(LastEnrolledParams),
    responses((status = 200, description = "Most recently enrolled students", body = Vec<StudentResponse>))
)]
pub async fn last_enrolled(
    State(ctx): State<AppContext>,
    Query(params): Query<LastEnrolledParams>,
) -> Result<Json<Vec<StudentResponse>>, AppError> {
    if params.limit < 1 {
        return Err(Error::Validation(format!(
            "limit must be at least 1, got {}",
            params.limit
        ))
        .into());
    }
    let conn = campus_db::pool::get_conn(&ctx.db)?;
    let list = students::last_enrolled(&conn, params.limit)?;
    Ok(Json(list.iter().map(StudentResponse::from_model).collect()))
}

/// Query parameters for the name-prefix listing.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct NamesParams {
    /// Case-insensitive name prefix.
    pub prefix: String,
}

/// GET /api/students/names
#[utoipa::path(
    get,
    path = "/api/students/names",
    params(NamesParams),
    responses((status = 200, description = "Uppercased, sorted student names", body = Vec<String>))
)]
pub async fn student_names(
    State(ctx): State<AppContext>,
    Query(params): Query<NamesParams>,
) -> Result<Json<Vec<String>>, AppError> {
    let conn = campus_db::pool::get_conn(&ctx.db)?;
    let names = students::student_names_with_prefix(&conn, &params.prefix)?;
    Ok(Json(names))
}

/// Check that an optional faculty reference points at a real faculty.
fn resolve_faculty(
    conn: &rusqlite::Connection,
    faculty_id: Option<i64>,
) -> Result<Option<FacultyId>, Error> {
    match faculty_id {
        None => Ok(None),
        Some(raw) => {
            let id = FacultyId::new(raw);
            faculties::get_faculty(conn, id)?
                .map(|f| Some(f.id))
                .ok_or_else(|| Error::Validation(format!("unknown faculty: {id}")))
        }
    }
}
