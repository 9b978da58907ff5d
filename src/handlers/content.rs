use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    common::error::helpers::error_response,
    controllers::{self, content::LessonDetail},
    handlers::{ErrorResponse, ErrorTypes},
    AppState,
};

// PUBLIC GET /courses/{course_id}/lessons - Ordered lesson list
#[utoipa::path(
    get,
    path = "/courses/{course_id}/lessons",
    description = "Lessons for a course in display order",
    params(
        ("course_id" = i32, Path, description = "Course id")
    ),
    responses(
        (status = 200, description = "Success", body = [controllers::content::LessonInfo]),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn get_lessons_for_course(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
) -> Result<Response, Response> {
    match controllers::content::get_lessons_for_course(&state, course_id).await {
        Ok(lessons) => {
            let body = json!({
                "data": lessons,
            });
            Ok((StatusCode::OK, axum::Json(body)).into_response())
        }
        Err(why) => {
            tracing::error!("could not fetch lessons for course {}: {}", course_id, why);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(ErrorResponse::new(
                    ErrorTypes::InternalError,
                    "Could not fetch lessons",
                )),
            )
                .into_response())
        }
    }
}

// PUBLIC GET /courses/{course_id}/lessons/{lesson_id} - Lesson with parsed blobs
#[utoipa::path(
    get,
    path = "/courses/{course_id}/lessons/{lesson_id}",
    description = "One lesson with its objectives, takeaways and activity questions parsed out; correct answers are not included",
    params(
        ("course_id" = i32, Path, description = "Course id"),
        ("lesson_id" = i32, Path, description = "Lesson id")
    ),
    responses(
        (status = 200, description = "Success", body = LessonDetail),
        (status = 404, description = "No such lesson", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn get_lesson(
    State(state): State<AppState>,
    Path((course_id, lesson_id)): Path<(i32, i32)>,
) -> Result<Response, Response> {
    match controllers::content::get_lesson(&state, course_id, lesson_id).await {
        Ok(Some(lesson)) => {
            let body = json!({
                "data": LessonDetail::from(lesson),
            });
            Ok((StatusCode::OK, axum::Json(body)).into_response())
        }
        Ok(None) => Err(error_response(
            StatusCode::NOT_FOUND,
            ErrorTypes::NotFound,
            &format!("Lesson {} does not exist in course {}", lesson_id, course_id),
        )),
        Err(why) => {
            tracing::error!("could not fetch lesson {}: {}", lesson_id, why);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(ErrorResponse::new(
                    ErrorTypes::InternalError,
                    "Could not fetch the lesson",
                )),
            )
                .into_response())
        }
    }
}
