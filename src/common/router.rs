use std::time::Duration;

use axum::{error_handling::HandleErrorLayer, http::StatusCode, BoxError, Router};
use tower::{buffer::BufferLayer, limit::RateLimitLayer, ServiceBuilder};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    common::error::{ErrorResponse, ErrorTypes},
    handlers, internal_server_error_handler, swagger, AppState,
};

fn courses_router() -> Router<AppState> {
    Router::new()
        .route(
            "/courses",
            axum::routing::get(handlers::courses::get_all_courses),
        )
        .route(
            "/courses/ids",
            axum::routing::get(handlers::courses::get_courses_by_ids),
        )
        .route(
            "/courses/with-progress",
            axum::routing::get(handlers::courses::get_courses_with_progress),
        )
        .route(
            "/courses/enrolled",
            axum::routing::get(handlers::courses::get_enrolled_courses),
        )
        .route(
            "/courses/completed",
            axum::routing::get(handlers::courses::get_completed_courses),
        )
        .route(
            "/courses/{course_id}",
            axum::routing::get(handlers::courses::get_course),
        )
        .route(
            "/courses/{course_id}/progress",
            axum::routing::get(handlers::courses::get_course_progress)
                .put(handlers::courses::update_course_progress),
        )
        .route(
            "/courses/{course_id}/lessons",
            axum::routing::get(handlers::content::get_lessons_for_course),
        )
        .route(
            "/courses/{course_id}/lessons/{lesson_id}",
            axum::routing::get(handlers::content::get_lesson),
        )
}

fn progress_router() -> Router<AppState> {
    Router::new()
        .route(
            "/progress/init",
            axum::routing::post(handlers::progress::init_progress),
        )
        .route(
            "/progress",
            axum::routing::get(handlers::progress::get_progress),
        )
}

fn player_router() -> Router<AppState> {
    Router::new()
        .route(
            "/courses/{course_id}/player",
            axum::routing::post(handlers::player::open_player)
                .get(handlers::player::get_player),
        )
        .route(
            "/courses/{course_id}/player/scroll",
            axum::routing::post(handlers::player::report_scroll),
        )
        .route(
            "/courses/{course_id}/player/next",
            axum::routing::post(handlers::player::next_lesson),
        )
        .route(
            "/courses/{course_id}/player/previous",
            axum::routing::post(handlers::player::previous_lesson),
        )
        .route(
            "/courses/{course_id}/player/select",
            axum::routing::post(handlers::player::select_lesson),
        )
        .route(
            "/courses/{course_id}/player/activity/start",
            axum::routing::post(handlers::player::start_activity),
        )
        .route(
            "/courses/{course_id}/player/activity/submit",
            axum::routing::post(handlers::player::submit_activity),
        )
}

fn certs_router() -> Router<AppState> {
    Router::new().route("/certs", axum::routing::get(handlers::certs::get_certs))
}

fn users_router() -> Router<AppState> {
    Router::new().route("/users/me", axum::routing::get(handlers::users::get_me))
}

fn admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/courses",
            axum::routing::post(handlers::admin::create_course),
        )
        .route(
            "/admin/courses/{course_id}",
            axum::routing::put(handlers::admin::update_course)
                .delete(handlers::admin::delete_course),
        )
        .route(
            "/admin/courses/{course_id}/lessons",
            axum::routing::post(handlers::admin::create_lesson),
        )
        .route(
            "/admin/lessons/{lesson_id}",
            axum::routing::put(handlers::admin::update_lesson)
                .delete(handlers::admin::delete_lesson),
        )
}

pub fn get_router(app_state: AppState) -> Router {
    let app = Router::new()
        .merge(courses_router())
        .merge(progress_router())
        .merge(player_router())
        .merge(certs_router())
        .merge(users_router())
        .merge(admin_router())
        .layer(CorsLayer::permissive().allow_origin(tower_http::cors::Any))
        .layer(CatchPanicLayer::custom(internal_server_error_handler))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(|err: BoxError| async move {
                    tracing::error!("{}", err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        axum::Json(ErrorResponse::new(
                            ErrorTypes::InternalError,
                            "Internal error occured",
                        )),
                    )
                }))
                .layer(BufferLayer::new(1024))
                .layer(RateLimitLayer::new(10, Duration::from_secs(1))), // RateLimit does not impl Clone, hence the BufferLayer in front
        )
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", swagger::ApiDoc::openapi()))
        .with_state(app_state);
    app
}
