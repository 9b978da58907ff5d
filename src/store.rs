use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::controllers::content::LessonInfo;
use crate::controllers::course::CourseInfo;
use crate::controllers::progress::ProgressInfo;
use crate::{db, AppState};

// Storage contracts for the aggregation logic. Handlers hand the live
// AppState in; tests hand an InMemoryStore. Not-found reads are Ok(None) /
// Ok(empty), Err means the store itself failed.

#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn list_courses(&self) -> anyhow::Result<Vec<CourseInfo>>;
    async fn get_course(&self, course_id: i32) -> anyhow::Result<Option<CourseInfo>>;
}

#[async_trait]
pub trait LessonStore: Send + Sync {
    async fn list_lessons(&self, course_id: i32) -> anyhow::Result<Vec<LessonInfo>>;
    async fn get_lesson(
        &self,
        course_id: i32,
        lesson_id: i32,
    ) -> anyhow::Result<Option<LessonInfo>>;
}

#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn list_progress(&self, user_id: u32) -> anyhow::Result<Vec<ProgressInfo>>;
    async fn get_progress(
        &self,
        user_id: u32,
        course_id: i32,
    ) -> anyhow::Result<Option<ProgressInfo>>;
    async fn insert_progress(
        &self,
        user_id: u32,
        course_id: i32,
        completion_percentage: f32,
        is_completed: bool,
    ) -> anyhow::Result<()>;
    async fn update_progress(
        &self,
        progress_id: i32,
        completion_percentage: f32,
        is_completed: bool,
    ) -> anyhow::Result<()>;
}

#[async_trait]
impl CourseStore for AppState {
    async fn list_courses(&self) -> anyhow::Result<Vec<CourseInfo>> {
        db::coursedb::fetch_all_courses(self).await
    }

    async fn get_course(&self, course_id: i32) -> anyhow::Result<Option<CourseInfo>> {
        db::coursedb::fetch_course(self, course_id).await
    }
}

#[async_trait]
impl LessonStore for AppState {
    async fn list_lessons(&self, course_id: i32) -> anyhow::Result<Vec<LessonInfo>> {
        db::contentdb::fetch_lessons_for_course(self, course_id).await
    }

    async fn get_lesson(
        &self,
        course_id: i32,
        lesson_id: i32,
    ) -> anyhow::Result<Option<LessonInfo>> {
        db::contentdb::fetch_lesson(self, course_id, lesson_id).await
    }
}

#[async_trait]
impl ProgressStore for AppState {
    async fn list_progress(&self, user_id: u32) -> anyhow::Result<Vec<ProgressInfo>> {
        db::progressdb::fetch_user_progress(self, user_id).await
    }

    async fn get_progress(
        &self,
        user_id: u32,
        course_id: i32,
    ) -> anyhow::Result<Option<ProgressInfo>> {
        db::progressdb::fetch_course_progress(self, user_id, course_id).await
    }

    async fn insert_progress(
        &self,
        user_id: u32,
        course_id: i32,
        completion_percentage: f32,
        is_completed: bool,
    ) -> anyhow::Result<()> {
        db::progressdb::insert_progress(self, user_id, course_id, completion_percentage, is_completed)
            .await
    }

    async fn update_progress(
        &self,
        progress_id: i32,
        completion_percentage: f32,
        is_completed: bool,
    ) -> anyhow::Result<()> {
        db::progressdb::update_progress(self, progress_id, completion_percentage, is_completed).await
    }
}

// In-memory store for unit tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    courses: Arc<Mutex<Vec<CourseInfo>>>,
    lessons: Arc<Mutex<Vec<LessonInfo>>>,
    progress: Arc<Mutex<HashMap<i32, ProgressInfo>>>,
    next_progress_id: Arc<Mutex<i32>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_course(&self, course: CourseInfo) {
        self.courses.lock().expect("store lock poisoned").push(course);
    }

    pub fn push_lesson(&self, lesson: LessonInfo) {
        self.lessons.lock().expect("store lock poisoned").push(lesson);
    }
}

#[async_trait]
impl CourseStore for InMemoryStore {
    async fn list_courses(&self) -> anyhow::Result<Vec<CourseInfo>> {
        Ok(self.courses.lock().expect("store lock poisoned").clone())
    }

    async fn get_course(&self, course_id: i32) -> anyhow::Result<Option<CourseInfo>> {
        Ok(self
            .courses
            .lock()
            .expect("store lock poisoned")
            .iter()
            .find(|c| c.id == course_id)
            .cloned())
    }
}

#[async_trait]
impl LessonStore for InMemoryStore {
    async fn list_lessons(&self, course_id: i32) -> anyhow::Result<Vec<LessonInfo>> {
        let mut lessons: Vec<LessonInfo> = self
            .lessons
            .lock()
            .expect("store lock poisoned")
            .iter()
            .filter(|l| l.course_id == course_id)
            .cloned()
            .collect();
        lessons.sort_by_key(|l| (l.order_index, l.id));
        Ok(lessons)
    }

    async fn get_lesson(
        &self,
        course_id: i32,
        lesson_id: i32,
    ) -> anyhow::Result<Option<LessonInfo>> {
        Ok(self
            .lessons
            .lock()
            .expect("store lock poisoned")
            .iter()
            .find(|l| l.course_id == course_id && l.id == lesson_id)
            .cloned())
    }
}

#[async_trait]
impl ProgressStore for InMemoryStore {
    async fn list_progress(&self, user_id: u32) -> anyhow::Result<Vec<ProgressInfo>> {
        let mut rows: Vec<ProgressInfo> = self
            .progress
            .lock()
            .expect("store lock poisoned")
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|p| p.id);
        Ok(rows)
    }

    async fn get_progress(
        &self,
        user_id: u32,
        course_id: i32,
    ) -> anyhow::Result<Option<ProgressInfo>> {
        Ok(self
            .progress
            .lock()
            .expect("store lock poisoned")
            .values()
            .find(|p| p.user_id == user_id && p.course_id == course_id)
            .cloned())
    }

    async fn insert_progress(
        &self,
        user_id: u32,
        course_id: i32,
        completion_percentage: f32,
        is_completed: bool,
    ) -> anyhow::Result<()> {
        let mut next = self.next_progress_id.lock().expect("store lock poisoned");
        *next += 1;
        let id = *next;
        drop(next);

        self.progress.lock().expect("store lock poisoned").insert(
            id,
            ProgressInfo {
                id,
                user_id,
                course_id,
                completion_percentage,
                is_completed,
                last_updated: Utc::now(),
            },
        );
        Ok(())
    }

    async fn update_progress(
        &self,
        progress_id: i32,
        completion_percentage: f32,
        is_completed: bool,
    ) -> anyhow::Result<()> {
        let mut rows = self.progress.lock().expect("store lock poisoned");
        let row = rows
            .get_mut(&progress_id)
            .ok_or_else(|| anyhow::anyhow!("no progress row with id {}", progress_id))?;
        row.completion_percentage = completion_percentage;
        row.is_completed = is_completed;
        row.last_updated = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::content::ContentType;

    fn lesson(id: i32, course_id: i32, order_index: i32) -> LessonInfo {
        LessonInfo {
            id,
            course_id,
            title: format!("Lesson {}", id),
            description: String::new(),
            content_type: ContentType::Text,
            order_index,
            estimated_duration_minutes: 10,
            video_lecture_url: None,
            captions_hindi: None,
            captions_tamil: None,
            captions_telugu: None,
            text_content: None,
            learning_objectives: None,
            key_takeaways: None,
            interactive_elements: None,
            assessment_questions: None,
            scoring_system: None,
        }
    }

    #[tokio::test]
    async fn test_lessons_come_back_in_display_order() {
        let store = InMemoryStore::new();
        store.push_lesson(lesson(3, 1, 2));
        store.push_lesson(lesson(1, 1, 1));
        // Same order_index as lesson 1: insertion order (id) breaks the tie
        store.push_lesson(lesson(2, 1, 1));
        store.push_lesson(lesson(9, 2, 0));

        let lessons = store.list_lessons(1).await.unwrap();
        let ids: Vec<i32> = lessons.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        assert!(store.get_lesson(1, 9).await.unwrap().is_none());
        assert_eq!(store.get_lesson(2, 9).await.unwrap().unwrap().id, 9);
    }
}
