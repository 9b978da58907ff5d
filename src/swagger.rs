use utoipa::OpenApi;

use crate::handlers;

pub struct SecurityAddon;
impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::courses::get_all_courses,
        handlers::courses::get_courses_by_ids,
        handlers::courses::get_course,
        handlers::courses::get_courses_with_progress,
        handlers::courses::get_enrolled_courses,
        handlers::courses::get_completed_courses,
        handlers::courses::get_course_progress,
        handlers::courses::update_course_progress,
        handlers::content::get_lessons_for_course,
        handlers::content::get_lesson,
        handlers::progress::init_progress,
        handlers::progress::get_progress,
        handlers::player::open_player,
        handlers::player::get_player,
        handlers::player::report_scroll,
        handlers::player::next_lesson,
        handlers::player::previous_lesson,
        handlers::player::select_lesson,
        handlers::player::start_activity,
        handlers::player::submit_activity,
        handlers::certs::get_certs,
        handlers::users::get_me,
        handlers::admin::create_course,
        handlers::admin::update_course,
        handlers::admin::delete_course,
        handlers::admin::create_lesson,
        handlers::admin::update_lesson,
        handlers::admin::delete_lesson,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Aprendia-Courses", description = "Every JSON payload is wrapped in a 'data' field. A 5xx means an unexpected failure and error_msg carries the underlying error text")
    )
)]
pub struct ApiDoc;
