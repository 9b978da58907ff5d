use redis::Commands;

use crate::controllers::course::{CourseDraft, CourseInfo};
use crate::AppState;

const COURSE_COLUMNS: &str = "id, title_en, title_es, description_en, description_es, category, difficulty_level, duration_minutes, instructor_name, thumbnail_url";

pub async fn fetch_all_courses(state: &AppState) -> anyhow::Result<Vec<CourseInfo>> {
    if let Ok(mut conn) = state.redis.get() {
        if let Ok(val) = conn.get::<_, String>("courses:all") {
            if let Ok(parsed) = serde_json::from_str::<Vec<CourseInfo>>(&val) {
                return Ok(parsed);
            }
        }
    }

    let query = format!("SELECT {} FROM courses", COURSE_COLUMNS);
    let courses = sqlx::query_as::<_, CourseInfo>(&query)
        .fetch_all(&state.pool)
        .await?;

    if let Ok(mut conn) = state.redis.get() {
        let payload = serde_json::to_string(&courses)?;
        conn.set_ex("courses:all", payload, 3600).unwrap_or(());
    }
    Ok(courses)
}

pub async fn fetch_courses_by_ids(
    state: &AppState,
    ids: Vec<i32>,
) -> anyhow::Result<Vec<CourseInfo>> {
    let mut courses = Vec::new();
    let mut ids_to_fetch = Vec::new();

    if let Ok(mut conn) = state.redis.get() {
        for id in &ids {
            if let Ok(val) = conn.get::<_, String>(format!("course:{}", id)) {
                if let Ok(parsed) = serde_json::from_str::<CourseInfo>(&val) {
                    courses.push(parsed);
                    continue;
                }
            }
            ids_to_fetch.push(*id);
        }
    } else {
        ids_to_fetch = ids;
    }

    if !ids_to_fetch.is_empty() {
        let placeholders: Vec<String> = ids_to_fetch.iter().map(|_| "?".to_string()).collect();
        let query = format!(
            "SELECT {} FROM courses WHERE id IN ({})",
            COURSE_COLUMNS,
            placeholders.join(", ")
        );

        let mut query_builder = sqlx::query_as::<_, CourseInfo>(&query);
        for id in &ids_to_fetch {
            query_builder = query_builder.bind(id);
        }
        let fetched = query_builder.fetch_all(&state.pool).await?;

        if let Ok(mut conn) = state.redis.get() {
            for course in &fetched {
                let payload = serde_json::to_string(course)?;
                conn.set_ex(format!("course:{}", course.id), payload, 3600)
                    .unwrap_or(());
            }
        }
        courses.extend(fetched);
    }

    Ok(courses)
}

pub async fn fetch_course(state: &AppState, id: i32) -> anyhow::Result<Option<CourseInfo>> {
    if let Ok(mut conn) = state.redis.get() {
        if let Ok(val) = conn.get::<_, String>(format!("course:{}", id)) {
            if let Ok(parsed) = serde_json::from_str::<CourseInfo>(&val) {
                return Ok(Some(parsed));
            }
        }
    }

    let query = format!("SELECT {} FROM courses WHERE id = ?", COURSE_COLUMNS);
    let course = sqlx::query_as::<_, CourseInfo>(&query)
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;

    if let Some(ref course) = course {
        if let Ok(mut conn) = state.redis.get() {
            let payload = serde_json::to_string(course)?;
            conn.set_ex(format!("course:{}", id), payload, 3600)
                .unwrap_or(());
        }
    }

    Ok(course)
}

pub async fn insert_course(state: &AppState, draft: &CourseDraft) -> anyhow::Result<i32> {
    let result = sqlx::query(
        "INSERT INTO courses (title_en, title_es, description_en, description_es, category, difficulty_level, duration_minutes, instructor_name, thumbnail_url)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&draft.title_en)
    .bind(&draft.title_es)
    .bind(&draft.description_en)
    .bind(&draft.description_es)
    .bind(&draft.category)
    .bind(&draft.difficulty_level)
    .bind(draft.duration_minutes)
    .bind(&draft.instructor_name)
    .bind(&draft.thumbnail_url)
    .execute(&state.pool)
    .await?;

    invalidate_course_cache(state, None);
    Ok(result.last_insert_id() as i32)
}

pub async fn update_course(state: &AppState, id: i32, draft: &CourseDraft) -> anyhow::Result<()> {
    sqlx::query(
        "UPDATE courses SET title_en = ?, title_es = ?, description_en = ?, description_es = ?, category = ?, difficulty_level = ?, duration_minutes = ?, instructor_name = ?, thumbnail_url = ?
         WHERE id = ?",
    )
    .bind(&draft.title_en)
    .bind(&draft.title_es)
    .bind(&draft.description_en)
    .bind(&draft.description_es)
    .bind(&draft.category)
    .bind(&draft.difficulty_level)
    .bind(draft.duration_minutes)
    .bind(&draft.instructor_name)
    .bind(&draft.thumbnail_url)
    .bind(id)
    .execute(&state.pool)
    .await?;

    invalidate_course_cache(state, Some(id));
    Ok(())
}

pub async fn delete_course(state: &AppState, id: i32) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(id)
        .execute(&state.pool)
        .await?;

    invalidate_course_cache(state, Some(id));
    Ok(())
}

// Cache drops are best effort, a dead Redis never fails a write.
fn invalidate_course_cache(state: &AppState, id: Option<i32>) {
    if let Ok(mut conn) = state.redis.get() {
        let _: () = conn.del("courses:all").unwrap_or(());
        if let Some(id) = id {
            let _: () = conn.del(format!("course:{}", id)).unwrap_or(());
        }
    }
}
