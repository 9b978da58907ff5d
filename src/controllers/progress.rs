use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use utoipa::ToSchema;

use crate::controllers::course::CourseInfo;
use crate::store::{CourseStore, ProgressStore};

#[derive(Serialize, Deserialize, Clone, Debug, FromRow, ToSchema)]
pub struct ProgressInfo {
    pub id: i32,
    pub user_id: u32,
    pub course_id: i32,
    pub completion_percentage: f32,
    pub is_completed: bool,
    pub last_updated: DateTime<Utc>,
}

#[derive(Serialize, Clone, Debug, ToSchema)]
pub struct CourseWithProgress {
    #[serde(flatten)]
    pub course: CourseInfo,
    pub progress: f32,
    pub is_completed: bool,
}

// Creates a 0% row for every course the first time a user shows up.
// Idempotent: any existing row for this user means initialization already
// happened and nothing may be touched. Returns the number of rows created.
pub async fn initialize_user_progress<S>(store: &S, user_id: u32) -> anyhow::Result<usize>
where
    S: CourseStore + ProgressStore,
{
    let existing = store.list_progress(user_id).await?;
    if !existing.is_empty() {
        tracing::debug!("user {} already has progress rows, skipping init", user_id);
        return Ok(0);
    }

    let courses = store.list_courses().await?;
    for course in &courses {
        store.insert_progress(user_id, course.id, 0.0, false).await?;
    }
    Ok(courses.len())
}

pub async fn get_user_progress<S: ProgressStore>(
    store: &S,
    user_id: u32,
) -> anyhow::Result<Vec<ProgressInfo>> {
    let rows = store.list_progress(user_id).await?;
    Ok(rows)
}

pub async fn get_course_progress<S: ProgressStore>(
    store: &S,
    user_id: u32,
    course_id: i32,
) -> anyhow::Result<Option<ProgressInfo>> {
    let row = store.get_progress(user_id, course_id).await?;
    Ok(row)
}

// Creates the row if it is missing, updates it in place otherwise, so one
// row per (user, course) survives any call sequence. Reported percentages
// outside 0-100 are clamped into range.
pub async fn update_course_progress<S: ProgressStore>(
    store: &S,
    user_id: u32,
    course_id: i32,
    completion_percentage: f32,
) -> anyhow::Result<()> {
    let pct = completion_percentage.clamp(0.0, 100.0);
    let is_completed = pct >= 100.0;

    // Read-then-write without a guard: concurrent updates for the same
    // (user, course) are last-write-wins. See DESIGN.md.
    match store.get_progress(user_id, course_id).await? {
        Some(existing) => store.update_progress(existing.id, pct, is_completed).await?,
        None => store.insert_progress(user_id, course_id, pct, is_completed).await?,
    }
    Ok(())
}

// Full course list joined with this user's rows; courses without a row read
// as untouched.
pub async fn get_user_courses_with_progress<S>(
    store: &S,
    user_id: u32,
) -> anyhow::Result<Vec<CourseWithProgress>>
where
    S: CourseStore + ProgressStore,
{
    let courses = store.list_courses().await?;
    let rows = store.list_progress(user_id).await?;

    Ok(courses
        .into_iter()
        .map(|course| {
            let row = rows.iter().find(|p| p.course_id == course.id);
            CourseWithProgress {
                progress: row.map(|p| p.completion_percentage).unwrap_or(0.0),
                is_completed: row.map(|p| p.is_completed).unwrap_or(false),
                course,
            }
        })
        .collect())
}

pub async fn get_completed_courses<S>(
    store: &S,
    user_id: u32,
) -> anyhow::Result<Vec<CourseWithProgress>>
where
    S: CourseStore + ProgressStore,
{
    let joined = get_user_courses_with_progress(store, user_id).await?;
    Ok(joined.into_iter().filter(|c| c.is_completed).collect())
}

pub async fn get_enrolled_courses<S>(
    store: &S,
    user_id: u32,
) -> anyhow::Result<Vec<CourseWithProgress>>
where
    S: CourseStore + ProgressStore,
{
    let joined = get_user_courses_with_progress(store, user_id).await?;
    Ok(joined
        .into_iter()
        .filter(|c| c.progress > 0.0 && !c.is_completed)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn store_with_courses(n: i32) -> InMemoryStore {
        let store = InMemoryStore::new();
        for i in 1..=n {
            store.push_course(CourseInfo {
                id: i,
                title_en: format!("Course {}", i),
                title_es: format!("Curso {}", i),
                description_en: String::new(),
                description_es: String::new(),
                category: "general".to_owned(),
                difficulty_level: "beginner".to_owned(),
                duration_minutes: 60,
                instructor_name: "Ada".to_owned(),
                thumbnail_url: String::new(),
            });
        }
        store
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let store = store_with_courses(3);

        let created = initialize_user_progress(&store, 7).await.unwrap();
        assert_eq!(created, 3);

        let created = initialize_user_progress(&store, 7).await.unwrap();
        assert_eq!(created, 0);

        let rows = get_user_progress(&store, 7).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.completion_percentage == 0.0 && !r.is_completed));
    }

    #[tokio::test]
    async fn test_initialize_never_overwrites_existing_rows() {
        let store = store_with_courses(3);
        update_course_progress(&store, 7, 2, 40.0).await.unwrap();

        let created = initialize_user_progress(&store, 7).await.unwrap();
        assert_eq!(created, 0);

        let row = get_course_progress(&store, 7, 2).await.unwrap().unwrap();
        assert_eq!(row.completion_percentage, 40.0);
    }

    #[tokio::test]
    async fn test_joined_view_after_init() {
        let store = store_with_courses(3);
        initialize_user_progress(&store, 7).await.unwrap();

        let joined = get_user_courses_with_progress(&store, 7).await.unwrap();
        assert_eq!(joined.len(), 3);
        for course in &joined {
            assert_eq!(course.progress, 0.0);
            assert!(!course.is_completed);
        }
    }

    #[tokio::test]
    async fn test_update_keeps_one_row_per_course() {
        let store = store_with_courses(2);

        for pct in [10.0, 55.0, 100.0, 30.0] {
            update_course_progress(&store, 7, 1, pct).await.unwrap();
        }

        let rows = get_user_progress(&store, 7).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].completion_percentage, 30.0);
    }

    #[tokio::test]
    async fn test_is_completed_tracks_percentage() {
        let store = store_with_courses(1);

        update_course_progress(&store, 7, 1, 100.0).await.unwrap();
        let row = get_course_progress(&store, 7, 1).await.unwrap().unwrap();
        assert!(row.is_completed);

        update_course_progress(&store, 7, 1, 50.0).await.unwrap();
        let row = get_course_progress(&store, 7, 1).await.unwrap().unwrap();
        assert!(!row.is_completed);
        assert_eq!(row.completion_percentage, 50.0);

        update_course_progress(&store, 7, 1, 99.9).await.unwrap();
        let row = get_course_progress(&store, 7, 1).await.unwrap().unwrap();
        assert!(!row.is_completed);
    }

    #[tokio::test]
    async fn test_out_of_range_percentages_are_clamped() {
        let store = store_with_courses(1);

        update_course_progress(&store, 7, 1, 250.0).await.unwrap();
        let row = get_course_progress(&store, 7, 1).await.unwrap().unwrap();
        assert_eq!(row.completion_percentage, 100.0);
        assert!(row.is_completed);

        update_course_progress(&store, 7, 1, -15.0).await.unwrap();
        let row = get_course_progress(&store, 7, 1).await.unwrap().unwrap();
        assert_eq!(row.completion_percentage, 0.0);
        assert!(!row.is_completed);
    }

    #[tokio::test]
    async fn test_enrolled_and_completed_are_disjoint() {
        let store = store_with_courses(4);
        update_course_progress(&store, 7, 1, 100.0).await.unwrap();
        update_course_progress(&store, 7, 2, 45.0).await.unwrap();
        update_course_progress(&store, 7, 3, 0.0).await.unwrap();

        let completed = get_completed_courses(&store, 7).await.unwrap();
        let enrolled = get_enrolled_courses(&store, 7).await.unwrap();

        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].course.id, 1);
        assert_eq!(enrolled.len(), 1);
        assert_eq!(enrolled[0].course.id, 2);
        for c in &completed {
            assert!(enrolled.iter().all(|e| e.course.id != c.course.id));
        }
    }

    #[tokio::test]
    async fn test_missing_rows_default_to_untouched() {
        let store = store_with_courses(2);
        update_course_progress(&store, 7, 1, 80.0).await.unwrap();

        let joined = get_user_courses_with_progress(&store, 7).await.unwrap();
        let untouched = joined.iter().find(|c| c.course.id == 2).unwrap();
        assert_eq!(untouched.progress, 0.0);
        assert!(!untouched.is_completed);
    }

    #[tokio::test]
    async fn test_progress_is_per_user() {
        let store = store_with_courses(1);
        update_course_progress(&store, 7, 1, 100.0).await.unwrap();
        update_course_progress(&store, 8, 1, 10.0).await.unwrap();

        assert_eq!(get_user_progress(&store, 7).await.unwrap().len(), 1);
        let row = get_course_progress(&store, 8, 1).await.unwrap().unwrap();
        assert_eq!(row.completion_percentage, 10.0);
    }
}
