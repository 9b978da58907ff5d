use std::fmt::Display;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{db, AppState};

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Video,
    Text,
    Quiz,
    Assessment,
    Module,
}

impl Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Text => write!(f, "text"),
            Self::Quiz => write!(f, "quiz"),
            Self::Assessment => write!(f, "assessment"),
            Self::Module => write!(f, "module"),
        }
    }
}

impl From<String> for ContentType {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "video" => Self::Video,
            "quiz" => Self::Quiz,
            "assessment" => Self::Assessment,
            "module" => Self::Module,
            // Unknown types render as plain text rather than failing the row
            _ => Self::Text,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct LessonInfo {
    pub id: i32,
    pub course_id: i32,
    pub title: String,
    pub description: String,
    pub content_type: ContentType,
    pub order_index: i32,
    pub estimated_duration_minutes: i32,
    pub video_lecture_url: Option<String>,
    pub captions_hindi: Option<String>,
    pub captions_tamil: Option<String>,
    pub captions_telugu: Option<String>,
    pub text_content: Option<String>,
    pub learning_objectives: Option<String>,
    pub key_takeaways: Option<String>,
    pub interactive_elements: Option<String>,
    pub assessment_questions: Option<String>,
    pub scoring_system: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, ToSchema)]
pub struct LessonDraft {
    pub title: String,
    pub description: String,
    pub content_type: ContentType,
    pub order_index: i32,
    pub estimated_duration_minutes: i32,
    pub video_lecture_url: Option<String>,
    pub captions_hindi: Option<String>,
    pub captions_tamil: Option<String>,
    pub captions_telugu: Option<String>,
    pub text_content: Option<String>,
    pub learning_objectives: Option<String>,
    pub key_takeaways: Option<String>,
    pub interactive_elements: Option<String>,
    pub assessment_questions: Option<String>,
    pub scoring_system: Option<String>,
}

// Shapes of the JSON blobs stored inside lesson rows. The field names are
// camelCase on the wire, as the authoring side writes them.

#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LearningObjective {
    #[serde(default)]
    pub id: String,
    pub text: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeyTakeaway {
    #[serde(default)]
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InteractiveElement {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    // Position in the lesson text, 0-100
    #[serde(default)]
    pub position: f32,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentQuestion {
    #[serde(default)]
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoringSystem {
    #[serde(default = "default_passing_score")]
    pub passing_score: f32,
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

fn default_passing_score() -> f32 {
    70.0
}

impl Default for ScoringSystem {
    fn default() -> Self {
        Self {
            passing_score: default_passing_score(),
            max_attempts: None,
        }
    }
}

// Absent or malformed blobs decode to the default shape. Authoring mistakes
// degrade a lesson, they don't break it.
pub fn parse_blob<T: DeserializeOwned + Default>(raw: Option<&str>) -> T {
    match raw {
        Some(s) if !s.trim().is_empty() => serde_json::from_str(s).unwrap_or_else(|why| {
            tracing::warn!("discarding malformed lesson blob: {}", why);
            T::default()
        }),
        _ => T::default(),
    }
}

#[derive(Serialize, Clone, Debug, ToSchema)]
pub struct AssessmentQuestionView {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
}

impl From<&AssessmentQuestion> for AssessmentQuestionView {
    fn from(q: &AssessmentQuestion) -> Self {
        Self {
            id: q.id.clone(),
            question: q.question.clone(),
            options: q.options.clone(),
        }
    }
}

// A lesson with its blobs parsed out. Correct answers stay server-side,
// grading happens in `grade_assessment`.
#[derive(Serialize, Clone, Debug, ToSchema)]
pub struct LessonDetail {
    pub id: i32,
    pub course_id: i32,
    pub title: String,
    pub description: String,
    pub content_type: ContentType,
    pub order_index: i32,
    pub estimated_duration_minutes: i32,
    pub video_lecture_url: Option<String>,
    pub captions_hindi: Option<String>,
    pub captions_tamil: Option<String>,
    pub captions_telugu: Option<String>,
    pub text_content: Option<String>,
    pub learning_objectives: Vec<LearningObjective>,
    pub key_takeaways: Vec<KeyTakeaway>,
    pub interactive_elements: Vec<InteractiveElement>,
    pub assessment: Vec<AssessmentQuestionView>,
}

impl From<LessonInfo> for LessonDetail {
    fn from(lesson: LessonInfo) -> Self {
        let objectives: Vec<LearningObjective> =
            parse_blob(lesson.learning_objectives.as_deref());
        let takeaways: Vec<KeyTakeaway> = parse_blob(lesson.key_takeaways.as_deref());
        let elements: Vec<InteractiveElement> =
            parse_blob(lesson.interactive_elements.as_deref());
        let questions: Vec<AssessmentQuestion> =
            parse_blob(lesson.assessment_questions.as_deref());

        Self {
            id: lesson.id,
            course_id: lesson.course_id,
            title: lesson.title,
            description: lesson.description,
            content_type: lesson.content_type,
            order_index: lesson.order_index,
            estimated_duration_minutes: lesson.estimated_duration_minutes,
            video_lecture_url: lesson.video_lecture_url,
            captions_hindi: lesson.captions_hindi,
            captions_tamil: lesson.captions_tamil,
            captions_telugu: lesson.captions_telugu,
            text_content: lesson.text_content,
            learning_objectives: objectives,
            key_takeaways: takeaways,
            interactive_elements: elements,
            assessment: questions.iter().map(AssessmentQuestionView::from).collect(),
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, ToSchema)]
pub struct AssessmentResult {
    pub score: f32,
    pub passed: bool,
    pub correct: usize,
    pub total: usize,
}

// An assessment with no questions grades as a pass.
pub fn grade_assessment(
    questions: &[AssessmentQuestion],
    answers: &[usize],
    scoring: &ScoringSystem,
) -> AssessmentResult {
    let total = questions.len();
    if total == 0 {
        return AssessmentResult {
            score: 100.0,
            passed: true,
            correct: 0,
            total: 0,
        };
    }

    let correct = questions
        .iter()
        .enumerate()
        .filter(|(i, q)| answers.get(*i) == Some(&q.correct_answer))
        .count();
    let score = correct as f32 / total as f32 * 100.0;

    AssessmentResult {
        score,
        passed: score >= scoring.passing_score,
        correct,
        total,
    }
}

pub async fn get_lessons_for_course(
    state: &AppState,
    course_id: i32,
) -> anyhow::Result<Vec<LessonInfo>> {
    let lessons = db::contentdb::fetch_lessons_for_course(state, course_id).await?;
    Ok(lessons)
}

pub async fn get_lesson(
    state: &AppState,
    course_id: i32,
    lesson_id: i32,
) -> anyhow::Result<Option<LessonInfo>> {
    let lesson = db::contentdb::fetch_lesson(state, course_id, lesson_id).await?;
    Ok(lesson)
}

pub async fn create_lesson(
    state: &AppState,
    course_id: i32,
    draft: LessonDraft,
) -> anyhow::Result<i32> {
    let id = db::contentdb::insert_lesson(state, course_id, &draft).await?;
    Ok(id)
}

pub async fn update_lesson(state: &AppState, lesson_id: i32, draft: LessonDraft) -> anyhow::Result<()> {
    db::contentdb::update_lesson(state, lesson_id, &draft).await
}

pub async fn delete_lesson(state: &AppState, lesson_id: i32) -> anyhow::Result<()> {
    db::contentdb::delete_lesson(state, lesson_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_str() {
        assert_eq!(ContentType::Video.to_string(), "video");
        assert_eq!(ContentType::Quiz.to_string(), "quiz");
        assert_eq!(ContentType::Assessment.to_string(), "assessment");
        assert_eq!(ContentType::Module.to_string(), "module");
    }

    #[test]
    fn test_str_into_content_type() {
        let parsed: ContentType = String::from("VIDEO").into();
        assert_eq!(parsed, ContentType::Video);

        let parsed: ContentType = String::from("module").into();
        assert_eq!(parsed, ContentType::Module);
    }

    #[test]
    fn test_unknown_content_type_degrades_to_text() {
        let parsed: ContentType = String::from("hologram").into();
        assert_eq!(parsed, ContentType::Text);
    }

    #[test]
    fn test_parse_blob_well_formed() {
        let raw = r#"[{"id":"o1","text":"Understand charts"},{"id":"o2","text":"Build dashboards"}]"#;
        let objectives: Vec<LearningObjective> = parse_blob(Some(raw));
        assert_eq!(objectives.len(), 2);
        assert_eq!(objectives[1].text, "Build dashboards");
    }

    #[test]
    fn test_parse_blob_malformed_falls_back_to_empty() {
        let objectives: Vec<LearningObjective> = parse_blob(Some("{not json"));
        assert!(objectives.is_empty());

        let takeaways: Vec<KeyTakeaway> = parse_blob(None);
        assert!(takeaways.is_empty());
    }

    #[test]
    fn test_scoring_system_defaults() {
        let scoring: ScoringSystem = parse_blob(Some("{}"));
        assert_eq!(scoring.passing_score, 70.0);
        assert!(scoring.max_attempts.is_none());

        let scoring: ScoringSystem = parse_blob(Some(r#"{"passingScore": 85.0}"#));
        assert_eq!(scoring.passing_score, 85.0);
    }

    fn question(correct: usize) -> AssessmentQuestion {
        AssessmentQuestion {
            id: String::new(),
            question: "q".to_owned(),
            options: vec!["a".to_owned(), "b".to_owned(), "c".to_owned()],
            correct_answer: correct,
        }
    }

    #[test]
    fn test_grade_assessment() {
        let questions = vec![question(1), question(0), question(2), question(2)];
        let scoring = ScoringSystem::default();

        let result = grade_assessment(&questions, &[1, 0, 2, 0], &scoring);
        assert_eq!(result.correct, 3);
        assert_eq!(result.total, 4);
        assert_eq!(result.score, 75.0);
        assert!(result.passed);

        let result = grade_assessment(&questions, &[0, 1, 0, 0], &scoring);
        assert_eq!(result.correct, 0);
        assert!(!result.passed);
    }

    #[test]
    fn test_grade_assessment_missing_answers_count_as_wrong() {
        let questions = vec![question(0), question(1)];
        let result = grade_assessment(&questions, &[0], &ScoringSystem::default());
        assert_eq!(result.correct, 1);
        assert_eq!(result.score, 50.0);
    }

    #[test]
    fn test_grade_assessment_no_questions_passes() {
        let result = grade_assessment(&[], &[], &ScoringSystem::default());
        assert!(result.passed);
        assert_eq!(result.score, 100.0);
    }
}
