use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use utoipa::ToSchema;

use crate::{db, AppState};

#[derive(Serialize, Deserialize, Clone, Debug, FromRow, ToSchema)]
pub struct CourseInfo {
    pub id: i32,
    pub title_en: String,
    pub title_es: String,
    pub description_en: String,
    pub description_es: String,
    pub category: String,
    pub difficulty_level: String,
    pub duration_minutes: i32,
    pub instructor_name: String,
    pub thumbnail_url: String,
}

// Payload for admin create/update. Same shape both ways, the id comes from
// the path.
#[derive(Serialize, Deserialize, Clone, ToSchema)]
pub struct CourseDraft {
    pub title_en: String,
    pub title_es: String,
    pub description_en: String,
    pub description_es: String,
    pub category: String,
    pub difficulty_level: String,
    pub duration_minutes: i32,
    pub instructor_name: String,
    pub thumbnail_url: String,
}

pub async fn get_all_courses(state: &AppState) -> anyhow::Result<Vec<CourseInfo>> {
    let courses = db::coursedb::fetch_all_courses(state).await?;
    Ok(courses)
}

pub async fn get_courses_by_ids(state: &AppState, ids: Vec<i32>) -> anyhow::Result<Vec<CourseInfo>> {
    let courses = db::coursedb::fetch_courses_by_ids(state, ids).await?;
    Ok(courses)
}

pub async fn get_course(state: &AppState, id: i32) -> anyhow::Result<Option<CourseInfo>> {
    let course = db::coursedb::fetch_course(state, id).await?;
    Ok(course)
}

pub async fn create_course(state: &AppState, draft: CourseDraft) -> anyhow::Result<i32> {
    let id = db::coursedb::insert_course(state, &draft).await?;
    Ok(id)
}

pub async fn update_course(state: &AppState, id: i32, draft: CourseDraft) -> anyhow::Result<()> {
    db::coursedb::update_course(state, id, &draft).await
}

pub async fn delete_course(state: &AppState, id: i32) -> anyhow::Result<()> {
    db::coursedb::delete_course(state, id).await
}
