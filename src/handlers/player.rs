use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::{
    common::{error::helpers::error_response, token::Claims},
    controllers::{
        self,
        content::{AssessmentQuestion, LearningObjective, ScoringSystem},
        player::{LessonPlan, PlayerEvent, PlayerSession, PlayerView},
    },
    handlers::{ErrorResponse, ErrorTypes},
    AppState,
};

#[derive(Deserialize, ToSchema)]
pub struct ScrollReport {
    pub fraction: f32,
}

#[derive(Deserialize, ToSchema)]
pub struct SelectLesson {
    pub index: usize,
}

#[derive(Deserialize, ToSchema)]
pub struct ActivityAnswers {
    pub answers: Vec<usize>,
}

fn no_session(course_id: i32) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        ErrorTypes::NotFound,
        &format!("No open player session for course {}", course_id),
    )
}

fn internal(msg: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(ErrorResponse::new(ErrorTypes::InternalError, msg)),
    )
        .into_response()
}

// POST /courses/{course_id}/player - Open a reading session, or resume the
// one already going so a revisit cannot reset earned completions.
#[utoipa::path(
    post,
    path = "/courses/{course_id}/player",
    description = "Open or resume the caller's reading session for a course",
    params(
        ("Authorization" = String, Header, description = "JWT"),
        ("course_id" = i32, Path, description = "Course id")
    ),
    responses(
        (status = 200, description = "Success", body = PlayerView),
        (status = 404, description = "Course has no lessons", body = ErrorResponse),
        (status = 401, description = "Bad token", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn open_player(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    claims: Claims,
) -> Result<Response, Response> {
    {
        let players = state.players.lock().expect("player registry poisoned");
        if let Some(session) = players.get(&(claims.id, course_id)) {
            let body = json!({
                "data": PlayerView::from(session),
            });
            return Ok((StatusCode::OK, axum::Json(body)).into_response());
        }
    }

    let lessons = match controllers::content::get_lessons_for_course(&state, course_id).await {
        Ok(lessons) => lessons,
        Err(why) => {
            tracing::error!("could not fetch lessons for player: {}", why);
            return Err(internal("Could not open the player"));
        }
    };
    if lessons.is_empty() {
        return Err(error_response(
            StatusCode::NOT_FOUND,
            ErrorTypes::NotFound,
            &format!("Course {} has no lessons", course_id),
        ));
    }

    let plans: Vec<LessonPlan> = lessons
        .iter()
        .map(|lesson| {
            let objectives: Vec<LearningObjective> =
                controllers::content::parse_blob(lesson.learning_objectives.as_deref());
            let questions: Vec<AssessmentQuestion> =
                controllers::content::parse_blob(lesson.assessment_questions.as_deref());
            LessonPlan {
                lesson_id: lesson.id,
                objective_count: objectives.len(),
                question_count: questions.len(),
            }
        })
        .collect();

    let mut players = state.players.lock().expect("player registry poisoned");
    let session = players
        .entry((claims.id, course_id))
        .or_insert_with(|| PlayerSession::new(plans));
    let body = json!({
        "data": PlayerView::from(&*session),
    });
    Ok((StatusCode::OK, axum::Json(body)).into_response())
}

// GET /courses/{course_id}/player - Current session state
#[utoipa::path(
    get,
    path = "/courses/{course_id}/player",
    description = "Current state of the caller's reading session",
    params(
        ("Authorization" = String, Header, description = "JWT"),
        ("course_id" = i32, Path, description = "Course id")
    ),
    responses(
        (status = 200, description = "Success", body = PlayerView),
        (status = 404, description = "No session open", body = ErrorResponse),
        (status = 401, description = "Bad token", body = ErrorResponse)
    )
)]
pub async fn get_player(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    claims: Claims,
) -> Result<Response, Response> {
    let players = state.players.lock().expect("player registry poisoned");
    match players.get(&(claims.id, course_id)) {
        Some(session) => {
            let body = json!({
                "data": PlayerView::from(session),
            });
            Ok((StatusCode::OK, axum::Json(body)).into_response())
        }
        None => Err(no_session(course_id)),
    }
}

// POST /courses/{course_id}/player/scroll - Scroll position report. Lesson
// and course completions that fall out of it are pushed into the progress
// rows here; this is the hand-off between the player and the aggregator.
#[utoipa::path(
    post,
    path = "/courses/{course_id}/player/scroll",
    description = "Report the scroll fraction for the current lesson and collect the transitions it caused",
    params(
        ("Authorization" = String, Header, description = "JWT"),
        ("course_id" = i32, Path, description = "Course id")
    ),
    request_body = ScrollReport,
    responses(
        (status = 200, description = "Success", body = PlayerView),
        (status = 404, description = "No session open", body = ErrorResponse),
        (status = 401, description = "Bad token", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn report_scroll(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    claims: Claims,
    axum::Json(report): axum::Json<ScrollReport>,
) -> Result<Response, Response> {
    let (events, view) = {
        let mut players = state.players.lock().expect("player registry poisoned");
        let Some(session) = players.get_mut(&(claims.id, course_id)) else {
            return Err(no_session(course_id));
        };
        let events = session.on_scroll(report.fraction);
        let view = PlayerView::from(&*session);
        (events, view)
    };

    let course_completed = events.contains(&PlayerEvent::CourseCompleted);
    let lesson_completed = events
        .iter()
        .any(|e| matches!(e, PlayerEvent::LessonCompleted { .. }));

    if course_completed || lesson_completed {
        let pct = if course_completed {
            100.0
        } else {
            view.progress_percentage
        };
        if let Err(why) =
            controllers::progress::update_course_progress(&state, claims.id, course_id, pct).await
        {
            tracing::error!("could not record lesson completion: {}", why);
            return Err(internal("Could not record the completion"));
        }
    }

    let body = json!({
        "data": { "view": view, "events": events },
    });
    Ok((StatusCode::OK, axum::Json(body)).into_response())
}

// POST /courses/{course_id}/player/next
#[utoipa::path(
    post,
    path = "/courses/{course_id}/player/next",
    description = "Advance to the next lesson (clamped at the last one)",
    params(
        ("Authorization" = String, Header, description = "JWT"),
        ("course_id" = i32, Path, description = "Course id")
    ),
    responses(
        (status = 200, description = "Success", body = PlayerView),
        (status = 404, description = "No session open", body = ErrorResponse),
        (status = 401, description = "Bad token", body = ErrorResponse)
    )
)]
pub async fn next_lesson(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    claims: Claims,
) -> Result<Response, Response> {
    let mut players = state.players.lock().expect("player registry poisoned");
    match players.get_mut(&(claims.id, course_id)) {
        Some(session) => {
            session.next();
            let body = json!({
                "data": PlayerView::from(&*session),
            });
            Ok((StatusCode::OK, axum::Json(body)).into_response())
        }
        None => Err(no_session(course_id)),
    }
}

// POST /courses/{course_id}/player/previous
#[utoipa::path(
    post,
    path = "/courses/{course_id}/player/previous",
    description = "Go back one lesson (clamped at the first one)",
    params(
        ("Authorization" = String, Header, description = "JWT"),
        ("course_id" = i32, Path, description = "Course id")
    ),
    responses(
        (status = 200, description = "Success", body = PlayerView),
        (status = 404, description = "No session open", body = ErrorResponse),
        (status = 401, description = "Bad token", body = ErrorResponse)
    )
)]
pub async fn previous_lesson(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    claims: Claims,
) -> Result<Response, Response> {
    let mut players = state.players.lock().expect("player registry poisoned");
    match players.get_mut(&(claims.id, course_id)) {
        Some(session) => {
            session.previous();
            let body = json!({
                "data": PlayerView::from(&*session),
            });
            Ok((StatusCode::OK, axum::Json(body)).into_response())
        }
        None => Err(no_session(course_id)),
    }
}

// POST /courses/{course_id}/player/select - Sidebar jump
#[utoipa::path(
    post,
    path = "/courses/{course_id}/player/select",
    description = "Jump to a lesson by index (clamped into range)",
    params(
        ("Authorization" = String, Header, description = "JWT"),
        ("course_id" = i32, Path, description = "Course id")
    ),
    request_body = SelectLesson,
    responses(
        (status = 200, description = "Success", body = PlayerView),
        (status = 404, description = "No session open", body = ErrorResponse),
        (status = 401, description = "Bad token", body = ErrorResponse)
    )
)]
pub async fn select_lesson(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    claims: Claims,
    axum::Json(select): axum::Json<SelectLesson>,
) -> Result<Response, Response> {
    let mut players = state.players.lock().expect("player registry poisoned");
    match players.get_mut(&(claims.id, course_id)) {
        Some(session) => {
            session.select(select.index);
            let body = json!({
                "data": PlayerView::from(&*session),
            });
            Ok((StatusCode::OK, axum::Json(body)).into_response())
        }
        None => Err(no_session(course_id)),
    }
}

// POST /courses/{course_id}/player/activity/start
#[utoipa::path(
    post,
    path = "/courses/{course_id}/player/activity/start",
    description = "Start the offered activity; one without questions completes immediately",
    params(
        ("Authorization" = String, Header, description = "JWT"),
        ("course_id" = i32, Path, description = "Course id")
    ),
    responses(
        (status = 200, description = "Success", body = PlayerView),
        (status = 404, description = "No session open", body = ErrorResponse),
        (status = 409, description = "No activity on offer yet", body = ErrorResponse),
        (status = 401, description = "Bad token", body = ErrorResponse)
    )
)]
pub async fn start_activity(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    claims: Claims,
) -> Result<Response, Response> {
    let mut players = state.players.lock().expect("player registry poisoned");
    let Some(session) = players.get_mut(&(claims.id, course_id)) else {
        return Err(no_session(course_id));
    };

    match session.start_activity() {
        Some(_) => {
            let body = json!({
                "data": PlayerView::from(&*session),
            });
            Ok((StatusCode::OK, axum::Json(body)).into_response())
        }
        None => Err(error_response(
            StatusCode::CONFLICT,
            ErrorTypes::ActivityUnavailable,
            "Keep reading, the activity is not on offer yet",
        )),
    }
}

// POST /courses/{course_id}/player/activity/submit - Grade the activity
// answers against the lesson's stored questions.
#[utoipa::path(
    post,
    path = "/courses/{course_id}/player/activity/submit",
    description = "Submit activity answers for the current lesson; grading is server-side",
    params(
        ("Authorization" = String, Header, description = "JWT"),
        ("course_id" = i32, Path, description = "Course id")
    ),
    request_body = ActivityAnswers,
    responses(
        (status = 200, description = "Graded", body = controllers::content::AssessmentResult),
        (status = 404, description = "No session open", body = ErrorResponse),
        (status = 409, description = "Activity was not started", body = ErrorResponse),
        (status = 401, description = "Bad token", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn submit_activity(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    claims: Claims,
    axum::Json(submission): axum::Json<ActivityAnswers>,
) -> Result<Response, Response> {
    use crate::controllers::player::LessonPhase;

    let lesson_id = {
        let players = state.players.lock().expect("player registry poisoned");
        let Some(session) = players.get(&(claims.id, course_id)) else {
            return Err(no_session(course_id));
        };
        if session.phase() != LessonPhase::ActivityInProgress {
            return Err(error_response(
                StatusCode::CONFLICT,
                ErrorTypes::ActivityUnavailable,
                "The activity was not started",
            ));
        }
        session.current_lesson_id()
    };

    let lesson = match controllers::content::get_lesson(&state, course_id, lesson_id).await {
        Ok(Some(lesson)) => lesson,
        Ok(None) => {
            return Err(error_response(
                StatusCode::NOT_FOUND,
                ErrorTypes::NotFound,
                &format!("Lesson {} does not exist in course {}", lesson_id, course_id),
            ))
        }
        Err(why) => {
            tracing::error!("could not fetch lesson for grading: {}", why);
            return Err(internal("Could not grade the activity"));
        }
    };

    let questions: Vec<AssessmentQuestion> =
        controllers::content::parse_blob(lesson.assessment_questions.as_deref());
    let scoring: ScoringSystem = controllers::content::parse_blob(lesson.scoring_system.as_deref());
    let result = controllers::content::grade_assessment(&questions, &submission.answers, &scoring);

    let view = {
        let mut players = state.players.lock().expect("player registry poisoned");
        let Some(session) = players.get_mut(&(claims.id, course_id)) else {
            return Err(no_session(course_id));
        };
        if result.passed {
            session.complete_activity();
        }
        PlayerView::from(&*session)
    };

    let body = json!({
        "data": { "result": result, "view": view },
    });
    Ok((StatusCode::OK, axum::Json(body)).into_response())
}
