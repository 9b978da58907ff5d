use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    common::token::Claims,
    controllers::{
        self,
        content::LessonDraft,
        course::CourseDraft,
    },
    handlers::{ErrorResponse, ErrorTypes},
    AppState,
};

fn internal(msg: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(ErrorResponse::new(ErrorTypes::InternalError, msg)),
    )
        .into_response()
}

// POST /admin/courses - Create a course
#[utoipa::path(
    post,
    path = "/admin/courses",
    description = "Create a course, returns its id",
    params(
        ("Authorization" = String, Header, description = "JWT")
    ),
    request_body = CourseDraft,
    responses(
        (status = 200, description = "Created"),
        (status = 401, description = "Bad token", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn create_course(
    State(state): State<AppState>,
    _claims: Claims,
    axum::Json(draft): axum::Json<CourseDraft>,
) -> Result<Response, Response> {
    match controllers::course::create_course(&state, draft).await {
        Ok(id) => {
            let body = json!({
                "data": { "id": id },
            });
            Ok((StatusCode::OK, axum::Json(body)).into_response())
        }
        Err(why) => {
            tracing::error!("could not create course: {}", why);
            Err(internal("Could not create the course"))
        }
    }
}

// PUT /admin/courses/{course_id} - Update a course
#[utoipa::path(
    put,
    path = "/admin/courses/{course_id}",
    description = "Overwrite a course's fields",
    params(
        ("Authorization" = String, Header, description = "JWT"),
        ("course_id" = i32, Path, description = "Course id")
    ),
    request_body = CourseDraft,
    responses(
        (status = 200, description = "Updated"),
        (status = 401, description = "Bad token", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn update_course(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    _claims: Claims,
    axum::Json(draft): axum::Json<CourseDraft>,
) -> Result<Response, Response> {
    match controllers::course::update_course(&state, course_id, draft).await {
        Ok(()) => Ok(StatusCode::OK.into_response()),
        Err(why) => {
            tracing::error!("could not update course {}: {}", course_id, why);
            Err(internal("Could not update the course"))
        }
    }
}

// DELETE /admin/courses/{course_id} - Drop a course and its lessons
#[utoipa::path(
    delete,
    path = "/admin/courses/{course_id}",
    description = "Delete a course; its lessons go with it",
    params(
        ("Authorization" = String, Header, description = "JWT"),
        ("course_id" = i32, Path, description = "Course id")
    ),
    responses(
        (status = 200, description = "Deleted"),
        (status = 401, description = "Bad token", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn delete_course(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    _claims: Claims,
) -> Result<Response, Response> {
    match controllers::course::delete_course(&state, course_id).await {
        Ok(()) => Ok(StatusCode::OK.into_response()),
        Err(why) => {
            tracing::error!("could not delete course {}: {}", course_id, why);
            Err(internal("Could not delete the course"))
        }
    }
}

// POST /admin/courses/{course_id}/lessons - Add a lesson to a course
#[utoipa::path(
    post,
    path = "/admin/courses/{course_id}/lessons",
    description = "Create a lesson inside a course, returns its id",
    params(
        ("Authorization" = String, Header, description = "JWT"),
        ("course_id" = i32, Path, description = "Course id")
    ),
    request_body = LessonDraft,
    responses(
        (status = 200, description = "Created"),
        (status = 401, description = "Bad token", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn create_lesson(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    _claims: Claims,
    axum::Json(draft): axum::Json<LessonDraft>,
) -> Result<Response, Response> {
    match controllers::content::create_lesson(&state, course_id, draft).await {
        Ok(id) => {
            let body = json!({
                "data": { "id": id },
            });
            Ok((StatusCode::OK, axum::Json(body)).into_response())
        }
        Err(why) => {
            tracing::error!("could not create lesson: {}", why);
            Err(internal("Could not create the lesson"))
        }
    }
}

// PUT /admin/lessons/{lesson_id} - Update a lesson
#[utoipa::path(
    put,
    path = "/admin/lessons/{lesson_id}",
    description = "Overwrite a lesson's fields",
    params(
        ("Authorization" = String, Header, description = "JWT"),
        ("lesson_id" = i32, Path, description = "Lesson id")
    ),
    request_body = LessonDraft,
    responses(
        (status = 200, description = "Updated"),
        (status = 401, description = "Bad token", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn update_lesson(
    State(state): State<AppState>,
    Path(lesson_id): Path<i32>,
    _claims: Claims,
    axum::Json(draft): axum::Json<LessonDraft>,
) -> Result<Response, Response> {
    match controllers::content::update_lesson(&state, lesson_id, draft).await {
        Ok(()) => Ok(StatusCode::OK.into_response()),
        Err(why) => {
            tracing::error!("could not update lesson {}: {}", lesson_id, why);
            Err(internal("Could not update the lesson"))
        }
    }
}

// DELETE /admin/lessons/{lesson_id} - Drop a lesson
#[utoipa::path(
    delete,
    path = "/admin/lessons/{lesson_id}",
    description = "Delete a lesson",
    params(
        ("Authorization" = String, Header, description = "JWT"),
        ("lesson_id" = i32, Path, description = "Lesson id")
    ),
    responses(
        (status = 200, description = "Deleted"),
        (status = 401, description = "Bad token", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn delete_lesson(
    State(state): State<AppState>,
    Path(lesson_id): Path<i32>,
    _claims: Claims,
) -> Result<Response, Response> {
    match controllers::content::delete_lesson(&state, lesson_id).await {
        Ok(()) => Ok(StatusCode::OK.into_response()),
        Err(why) => {
            tracing::error!("could not delete lesson {}: {}", lesson_id, why);
            Err(internal("Could not delete the lesson"))
        }
    }
}
