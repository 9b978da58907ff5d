use crate::controllers::progress::ProgressInfo;
use crate::AppState;

const PROGRESS_COLUMNS: &str =
    "id, user_id, course_id, completion_percentage, is_completed, last_updated";

pub async fn fetch_user_progress(
    state: &AppState,
    user_id: u32,
) -> anyhow::Result<Vec<ProgressInfo>> {
    let query = format!(
        "SELECT {} FROM user_course_progress WHERE user_id = ? ORDER BY id",
        PROGRESS_COLUMNS
    );
    let rows = sqlx::query_as::<_, ProgressInfo>(&query)
        .bind(user_id)
        .fetch_all(&state.pool)
        .await?;
    Ok(rows)
}

pub async fn fetch_course_progress(
    state: &AppState,
    user_id: u32,
    course_id: i32,
) -> anyhow::Result<Option<ProgressInfo>> {
    let query = format!(
        "SELECT {} FROM user_course_progress WHERE user_id = ? AND course_id = ?",
        PROGRESS_COLUMNS
    );
    let row = sqlx::query_as::<_, ProgressInfo>(&query)
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(&state.pool)
        .await?;
    Ok(row)
}

pub async fn insert_progress(
    state: &AppState,
    user_id: u32,
    course_id: i32,
    completion_percentage: f32,
    is_completed: bool,
) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO user_course_progress (user_id, course_id, completion_percentage, is_completed)
         VALUES (?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(course_id)
    .bind(completion_percentage)
    .bind(is_completed)
    .execute(&state.pool)
    .await?;
    Ok(())
}

pub async fn update_progress(
    state: &AppState,
    progress_id: i32,
    completion_percentage: f32,
    is_completed: bool,
) -> anyhow::Result<()> {
    sqlx::query(
        "UPDATE user_course_progress
         SET completion_percentage = ?, is_completed = ?, last_updated = CURRENT_TIMESTAMP
         WHERE id = ?",
    )
    .bind(completion_percentage)
    .bind(is_completed)
    .bind(progress_id)
    .execute(&state.pool)
    .await?;
    Ok(())
}
