use redis::Commands;
use sqlx::mysql::MySqlRow;
use sqlx::Row;

use crate::controllers::content::{ContentType, LessonDraft, LessonInfo};
use crate::AppState;

const LESSON_COLUMNS: &str = "id, course_id, title, description, content_type, order_index, estimated_duration_minutes, video_lecture_url, captions_hindi, captions_tamil, captions_telugu, text_content, learning_objectives, key_takeaways, interactive_elements, assessment_questions, scoring_system";

fn lesson_from_row(row: &MySqlRow) -> anyhow::Result<LessonInfo> {
    let content_type: ContentType = row.try_get::<String, _>("content_type")?.into();
    Ok(LessonInfo {
        id: row.try_get("id")?,
        course_id: row.try_get("course_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        content_type,
        order_index: row.try_get("order_index")?,
        estimated_duration_minutes: row.try_get("estimated_duration_minutes")?,
        video_lecture_url: row.try_get("video_lecture_url")?,
        captions_hindi: row.try_get("captions_hindi")?,
        captions_tamil: row.try_get("captions_tamil")?,
        captions_telugu: row.try_get("captions_telugu")?,
        text_content: row.try_get("text_content")?,
        learning_objectives: row.try_get("learning_objectives")?,
        key_takeaways: row.try_get("key_takeaways")?,
        interactive_elements: row.try_get("interactive_elements")?,
        assessment_questions: row.try_get("assessment_questions")?,
        scoring_system: row.try_get("scoring_system")?,
    })
}

// Display order is order_index with id as the tie break, so lessons sharing
// an index keep their insertion order.
pub async fn fetch_lessons_for_course(
    state: &AppState,
    course_id: i32,
) -> anyhow::Result<Vec<LessonInfo>> {
    let cache_key = format!("lessons:{}", course_id);
    if let Ok(mut conn) = state.redis.get() {
        if let Ok(val) = conn.get::<_, String>(&cache_key) {
            if let Ok(parsed) = serde_json::from_str::<Vec<LessonInfo>>(&val) {
                return Ok(parsed);
            }
        }
    }

    let query = format!(
        "SELECT {} FROM course_content WHERE course_id = ? ORDER BY order_index, id",
        LESSON_COLUMNS
    );
    let rows = sqlx::query(&query)
        .bind(course_id)
        .fetch_all(&state.pool)
        .await?;

    let mut lessons = Vec::with_capacity(rows.len());
    for row in &rows {
        lessons.push(lesson_from_row(row)?);
    }

    if let Ok(mut conn) = state.redis.get() {
        let payload = serde_json::to_string(&lessons)?;
        conn.set_ex(&cache_key, payload, 3600).unwrap_or(());
    }
    Ok(lessons)
}

pub async fn fetch_lesson(
    state: &AppState,
    course_id: i32,
    lesson_id: i32,
) -> anyhow::Result<Option<LessonInfo>> {
    let query = format!(
        "SELECT {} FROM course_content WHERE course_id = ? AND id = ?",
        LESSON_COLUMNS
    );
    let row = sqlx::query(&query)
        .bind(course_id)
        .bind(lesson_id)
        .fetch_optional(&state.pool)
        .await?;

    match row {
        Some(row) => Ok(Some(lesson_from_row(&row)?)),
        None => Ok(None),
    }
}

pub async fn insert_lesson(
    state: &AppState,
    course_id: i32,
    draft: &LessonDraft,
) -> anyhow::Result<i32> {
    let result = sqlx::query(
        "INSERT INTO course_content (course_id, title, description, content_type, order_index, estimated_duration_minutes, video_lecture_url, captions_hindi, captions_tamil, captions_telugu, text_content, learning_objectives, key_takeaways, interactive_elements, assessment_questions, scoring_system)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(course_id)
    .bind(&draft.title)
    .bind(&draft.description)
    .bind(draft.content_type.to_string())
    .bind(draft.order_index)
    .bind(draft.estimated_duration_minutes)
    .bind(&draft.video_lecture_url)
    .bind(&draft.captions_hindi)
    .bind(&draft.captions_tamil)
    .bind(&draft.captions_telugu)
    .bind(&draft.text_content)
    .bind(&draft.learning_objectives)
    .bind(&draft.key_takeaways)
    .bind(&draft.interactive_elements)
    .bind(&draft.assessment_questions)
    .bind(&draft.scoring_system)
    .execute(&state.pool)
    .await?;

    invalidate_lesson_cache(state, course_id);
    Ok(result.last_insert_id() as i32)
}

pub async fn update_lesson(
    state: &AppState,
    lesson_id: i32,
    draft: &LessonDraft,
) -> anyhow::Result<()> {
    sqlx::query(
        "UPDATE course_content SET title = ?, description = ?, content_type = ?, order_index = ?, estimated_duration_minutes = ?, video_lecture_url = ?, captions_hindi = ?, captions_tamil = ?, captions_telugu = ?, text_content = ?, learning_objectives = ?, key_takeaways = ?, interactive_elements = ?, assessment_questions = ?, scoring_system = ?
         WHERE id = ?",
    )
    .bind(&draft.title)
    .bind(&draft.description)
    .bind(draft.content_type.to_string())
    .bind(draft.order_index)
    .bind(draft.estimated_duration_minutes)
    .bind(&draft.video_lecture_url)
    .bind(&draft.captions_hindi)
    .bind(&draft.captions_tamil)
    .bind(&draft.captions_telugu)
    .bind(&draft.text_content)
    .bind(&draft.learning_objectives)
    .bind(&draft.key_takeaways)
    .bind(&draft.interactive_elements)
    .bind(&draft.assessment_questions)
    .bind(&draft.scoring_system)
    .bind(lesson_id)
    .execute(&state.pool)
    .await?;

    if let Some(course_id) = owning_course(state, lesson_id).await? {
        invalidate_lesson_cache(state, course_id);
    }
    Ok(())
}

pub async fn delete_lesson(state: &AppState, lesson_id: i32) -> anyhow::Result<()> {
    let course_id = owning_course(state, lesson_id).await?;

    sqlx::query("DELETE FROM course_content WHERE id = ?")
        .bind(lesson_id)
        .execute(&state.pool)
        .await?;

    if let Some(course_id) = course_id {
        invalidate_lesson_cache(state, course_id);
    }
    Ok(())
}

async fn owning_course(state: &AppState, lesson_id: i32) -> anyhow::Result<Option<i32>> {
    let row = sqlx::query("SELECT course_id FROM course_content WHERE id = ?")
        .bind(lesson_id)
        .fetch_optional(&state.pool)
        .await?;
    match row {
        Some(row) => Ok(Some(row.try_get("course_id")?)),
        None => Ok(None),
    }
}

fn invalidate_lesson_cache(state: &AppState, course_id: i32) {
    if let Ok(mut conn) = state.redis.get() {
        let _: () = conn.del(format!("lessons:{}", course_id)).unwrap_or(());
    }
}
