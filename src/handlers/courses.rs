use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::{
    common::{error::helpers::error_response, token::Claims},
    controllers,
    handlers::{ErrorResponse, ErrorTypes},
    AppState,
};

#[derive(Deserialize)]
pub struct IdsStruct {
    ids: Vec<i32>,
}

#[derive(Deserialize, ToSchema)]
pub struct ProgressReport {
    pub completion_percentage: f32,
}

// PUBLIC GET /courses - Get a list of all available courses (for main page)
#[utoipa::path(
    get,
    path = "/courses",
    description = "All courses in the catalog",
    responses(
        (status = 200, description = "Success", body = [controllers::course::CourseInfo]),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn get_all_courses(State(state): State<AppState>) -> Result<Response, Response> {
    match controllers::course::get_all_courses(&state).await {
        Ok(courses) => {
            let body = json!({
                "data": courses,
            });
            Ok((StatusCode::OK, axum::Json(body)).into_response())
        }
        Err(why) => {
            tracing::error!("could not fetch courses: {}", why);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(ErrorResponse::new(
                    ErrorTypes::InternalError,
                    "Could not fetch courses",
                )),
            )
                .into_response())
        }
    }
}

// PUBLIC GET /courses/ids?ids=1&ids=2 - Batch fetch (admin panel listings)
#[utoipa::path(
    get,
    path = "/courses/ids",
    description = "Courses by id list",
    params(
        ("ids" = Vec<i32>, Query, description = "Course ids to fetch")
    ),
    responses(
        (status = 200, description = "Success", body = [controllers::course::CourseInfo]),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn get_courses_by_ids(
    State(state): State<AppState>,
    Query(ids): Query<IdsStruct>,
) -> Result<Response, Response> {
    match controllers::course::get_courses_by_ids(&state, ids.ids).await {
        Ok(courses) => {
            let body = json!({
                "data": courses,
            });
            Ok((StatusCode::OK, axum::Json(body)).into_response())
        }
        Err(why) => {
            tracing::error!("could not fetch courses by ids: {}", why);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(ErrorResponse::new(
                    ErrorTypes::InternalError,
                    "Could not fetch courses",
                )),
            )
                .into_response())
        }
    }
}

// PUBLIC GET /courses/{course_id} - Get info about a single course
#[utoipa::path(
    get,
    path = "/courses/{course_id}",
    description = "One course",
    params(
        ("course_id" = i32, Path, description = "Course id")
    ),
    responses(
        (status = 200, description = "Success", body = controllers::course::CourseInfo),
        (status = 404, description = "No such course", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn get_course(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
) -> Result<Response, Response> {
    match controllers::course::get_course(&state, course_id).await {
        Ok(Some(course)) => {
            let body = json!({
                "data": course,
            });
            Ok((StatusCode::OK, axum::Json(body)).into_response())
        }
        Ok(None) => Err(error_response(
            StatusCode::NOT_FOUND,
            ErrorTypes::NotFound,
            &format!("Course {} does not exist", course_id),
        )),
        Err(why) => {
            tracing::error!("could not fetch course {}: {}", course_id, why);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(ErrorResponse::new(
                    ErrorTypes::InternalError,
                    "Could not fetch the course",
                )),
            )
                .into_response())
        }
    }
}

// GET /courses/with-progress - Full catalog joined with the caller's progress
#[utoipa::path(
    get,
    path = "/courses/with-progress",
    description = "Catalog joined with the caller's progress; untouched courses read as 0%",
    params(
        ("Authorization" = String, Header, description = "JWT")
    ),
    responses(
        (status = 200, description = "Success", body = [controllers::progress::CourseWithProgress]),
        (status = 401, description = "Bad token", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn get_courses_with_progress(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Response, Response> {
    match controllers::progress::get_user_courses_with_progress(&state, claims.id).await {
        Ok(courses) => {
            let body = json!({
                "data": courses,
            });
            Ok((StatusCode::OK, axum::Json(body)).into_response())
        }
        Err(why) => {
            tracing::error!("could not join courses with progress: {}", why);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(ErrorResponse::new(
                    ErrorTypes::InternalError,
                    "Could not fetch courses with progress",
                )),
            )
                .into_response())
        }
    }
}

// GET /courses/enrolled - Started but unfinished courses
#[utoipa::path(
    get,
    path = "/courses/enrolled",
    description = "Courses with progress strictly between 0 and 100",
    params(
        ("Authorization" = String, Header, description = "JWT")
    ),
    responses(
        (status = 200, description = "Success", body = [controllers::progress::CourseWithProgress]),
        (status = 401, description = "Bad token", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn get_enrolled_courses(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Response, Response> {
    match controllers::progress::get_enrolled_courses(&state, claims.id).await {
        Ok(courses) => {
            let body = json!({
                "data": courses,
            });
            Ok((StatusCode::OK, axum::Json(body)).into_response())
        }
        Err(why) => {
            tracing::error!("could not fetch enrolled courses: {}", why);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(ErrorResponse::new(
                    ErrorTypes::InternalError,
                    "Could not fetch enrolled courses",
                )),
            )
                .into_response())
        }
    }
}

// GET /courses/completed - Finished courses
#[utoipa::path(
    get,
    path = "/courses/completed",
    description = "Courses at 100%",
    params(
        ("Authorization" = String, Header, description = "JWT")
    ),
    responses(
        (status = 200, description = "Success", body = [controllers::progress::CourseWithProgress]),
        (status = 401, description = "Bad token", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn get_completed_courses(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Response, Response> {
    match controllers::progress::get_completed_courses(&state, claims.id).await {
        Ok(courses) => {
            let body = json!({
                "data": courses,
            });
            Ok((StatusCode::OK, axum::Json(body)).into_response())
        }
        Err(why) => {
            tracing::error!("could not fetch completed courses: {}", why);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(ErrorResponse::new(
                    ErrorTypes::InternalError,
                    "Could not fetch completed courses",
                )),
            )
                .into_response())
        }
    }
}

// GET /courses/{course_id}/progress - This user's row for one course
#[utoipa::path(
    get,
    path = "/courses/{course_id}/progress",
    description = "The caller's progress row for one course, null when untouched",
    params(
        ("Authorization" = String, Header, description = "JWT"),
        ("course_id" = i32, Path, description = "Course id")
    ),
    responses(
        (status = 200, description = "Success", body = controllers::progress::ProgressInfo),
        (status = 401, description = "Bad token", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn get_course_progress(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    claims: Claims,
) -> Result<Response, Response> {
    match controllers::progress::get_course_progress(&state, claims.id, course_id).await {
        Ok(row) => {
            let body = json!({
                "data": row,
            });
            Ok((StatusCode::OK, axum::Json(body)).into_response())
        }
        Err(why) => {
            tracing::error!("could not fetch course progress: {}", why);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(ErrorResponse::new(
                    ErrorTypes::InternalError,
                    "Could not fetch the course progress",
                )),
            )
                .into_response())
        }
    }
}

// PUT /courses/{course_id}/progress - Direct percentage report
#[utoipa::path(
    put,
    path = "/courses/{course_id}/progress",
    description = "Report a completion percentage; values outside 0-100 are clamped",
    params(
        ("Authorization" = String, Header, description = "JWT"),
        ("course_id" = i32, Path, description = "Course id")
    ),
    request_body = ProgressReport,
    responses(
        (status = 200, description = "Success"),
        (status = 401, description = "Bad token", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn update_course_progress(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    claims: Claims,
    axum::Json(report): axum::Json<ProgressReport>,
) -> Result<Response, Response> {
    match controllers::progress::update_course_progress(
        &state,
        claims.id,
        course_id,
        report.completion_percentage,
    )
    .await
    {
        Ok(()) => Ok(StatusCode::OK.into_response()),
        Err(why) => {
            tracing::error!("could not update course progress: {}", why);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(ErrorResponse::new(
                    ErrorTypes::InternalError,
                    "Could not update the course progress",
                )),
            )
                .into_response())
        }
    }
}
