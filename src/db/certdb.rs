use sqlx::mysql::MySqlArguments;
use sqlx::{Arguments, Row};

use crate::controllers::certs::{CertInfo, CertStatus};
use crate::AppState;

pub async fn add_certs(
    state: &AppState,
    user_id: u32,
    course_ids: Vec<i32>,
) -> anyhow::Result<()> {
    if course_ids.is_empty() {
        return Ok(());
    }

    let mut query =
        String::from("INSERT IGNORE INTO user_certs (user_id, course_id, status) VALUES ");
    let mut args = MySqlArguments::default();

    for (i, course_id) in course_ids.iter().enumerate() {
        if i > 0 {
            query.push_str(", ");
        }
        query.push_str("(?, ?, 'NOT_CREATED')");
        args.add(user_id)
            .map_err(|e| anyhow::anyhow!("bind failed: {}", e))?;
        args.add(course_id)
            .map_err(|e| anyhow::anyhow!("bind failed: {}", e))?;
    }

    sqlx::query_with(&query, args).execute(&state.pool).await?;
    Ok(())
}

pub async fn get_certs(state: &AppState, user_id: u32) -> anyhow::Result<Vec<CertInfo>> {
    let rows = sqlx::query(
        "SELECT user_certs.id, user_certs.course_id, courses.title_en AS course_title, user_certs.status
         FROM user_certs
         JOIN courses ON courses.id = user_certs.course_id
         WHERE user_certs.user_id = ?",
    )
    .bind(user_id)
    .fetch_all(&state.pool)
    .await?;

    let mut certs = Vec::with_capacity(rows.len());
    for row in rows {
        let status: CertStatus = row.try_get::<String, _>("status")?.into();
        certs.push(CertInfo {
            id: row.try_get("id")?,
            course_id: row.try_get("course_id")?,
            course_title: row.try_get("course_title")?,
            status,
        });
    }
    Ok(certs)
}
