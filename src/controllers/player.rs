use std::collections::HashSet;

use serde::Serialize;
use utoipa::ToSchema;

// Scroll fractions gating the reading flow: the embedded activity appears
// once most of the lesson has been read, completion needs nearly all of it.
pub const ACTIVITY_OFFER_FRACTION: f32 = 0.8;
pub const LESSON_COMPLETE_FRACTION: f32 = 0.95;

#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LessonPhase {
    Reading,
    ActivityOffered,
    ActivityInProgress,
    ActivityComplete,
}

#[derive(Clone, Copy, Debug)]
pub struct LessonPlan {
    pub lesson_id: i32,
    pub objective_count: usize,
    pub question_count: usize,
}

#[derive(Serialize, Clone, Debug, PartialEq, ToSchema)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlayerEvent {
    ObjectiveReached { index: usize },
    ActivityOffered,
    LessonCompleted { lesson_id: i32 },
    CourseCompleted,
}

// Scroll-driven reading session over one course's ordered lessons.
//
// The completed set persists across navigation, so re-reading a finished
// lesson never emits LessonCompleted again. Everything else (scroll, phase,
// objective marks) is per-visit and resets when another lesson is selected.
#[derive(Clone, Debug)]
pub struct PlayerSession {
    lessons: Vec<LessonPlan>,
    current: usize,
    completed: HashSet<i32>,
    scroll: f32,
    phase: LessonPhase,
    objectives_reached: usize,
}

impl PlayerSession {
    // `lessons` must be non-empty and in display order.
    pub fn new(lessons: Vec<LessonPlan>) -> Self {
        Self {
            lessons,
            current: 0,
            completed: HashSet::new(),
            scroll: 0.0,
            phase: LessonPhase::Reading,
            objectives_reached: 0,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_lesson_id(&self) -> i32 {
        self.lessons[self.current].lesson_id
    }

    pub fn phase(&self) -> LessonPhase {
        self.phase
    }

    pub fn scroll_fraction(&self) -> f32 {
        self.scroll
    }

    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }

    pub fn completed_lesson_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.completed.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn progress_percentage(&self) -> f32 {
        self.completed.len() as f32 / self.lessons.len() as f32 * 100.0
    }

    // Reports a new scroll position within the current lesson and returns
    // every transition it caused, in order. A single report far down the
    // page walks through all of them at once; completion still fires at
    // most once per lesson however the fraction oscillates afterwards.
    pub fn on_scroll(&mut self, fraction: f32) -> Vec<PlayerEvent> {
        let fraction = fraction.clamp(0.0, 1.0);
        self.scroll = fraction;

        let plan = self.lessons[self.current];
        let mut events = Vec::new();

        // Objective thresholds sit evenly across [0, ACTIVITY_OFFER_FRACTION].
        while self.objectives_reached < plan.objective_count {
            let threshold = ((self.objectives_reached + 1) as f32 / plan.objective_count as f32)
                * ACTIVITY_OFFER_FRACTION;
            if fraction < threshold {
                break;
            }
            events.push(PlayerEvent::ObjectiveReached {
                index: self.objectives_reached,
            });
            self.objectives_reached += 1;
        }

        if fraction >= ACTIVITY_OFFER_FRACTION && self.phase == LessonPhase::Reading {
            self.phase = LessonPhase::ActivityOffered;
            events.push(PlayerEvent::ActivityOffered);
        }

        if fraction >= LESSON_COMPLETE_FRACTION
            && self.phase != LessonPhase::Reading
            && !self.completed.contains(&plan.lesson_id)
        {
            self.completed.insert(plan.lesson_id);
            events.push(PlayerEvent::LessonCompleted {
                lesson_id: plan.lesson_id,
            });
            if self.current + 1 == self.lessons.len() {
                events.push(PlayerEvent::CourseCompleted);
            }
        }

        events
    }

    // Moves the activity out of the offered state. An activity without
    // questions has nothing to answer and completes on the spot. Returns
    // None when no activity is on offer yet.
    pub fn start_activity(&mut self) -> Option<LessonPhase> {
        if self.phase != LessonPhase::ActivityOffered {
            return None;
        }
        let plan = self.lessons[self.current];
        self.phase = if plan.question_count == 0 {
            LessonPhase::ActivityComplete
        } else {
            LessonPhase::ActivityInProgress
        };
        Some(self.phase)
    }

    pub fn complete_activity(&mut self) {
        if self.phase == LessonPhase::ActivityInProgress {
            self.phase = LessonPhase::ActivityComplete;
        }
    }

    pub fn next(&mut self) -> usize {
        self.select(self.current.saturating_add(1))
    }

    pub fn previous(&mut self) -> usize {
        self.select(self.current.saturating_sub(1))
    }

    // Clamps into range and resets the per-visit state for the newly
    // selected lesson.
    pub fn select(&mut self, index: usize) -> usize {
        self.current = index.min(self.lessons.len() - 1);
        self.scroll = 0.0;
        self.phase = LessonPhase::Reading;
        self.objectives_reached = 0;
        self.current
    }
}

#[derive(Serialize, Clone, Debug, ToSchema)]
pub struct PlayerView {
    pub current_index: usize,
    pub lesson_id: i32,
    pub lesson_count: usize,
    pub phase: LessonPhase,
    pub scroll_fraction: f32,
    pub completed_lessons: Vec<i32>,
    pub progress_percentage: f32,
}

impl From<&PlayerSession> for PlayerView {
    fn from(session: &PlayerSession) -> Self {
        Self {
            current_index: session.current_index(),
            lesson_id: session.current_lesson_id(),
            lesson_count: session.lesson_count(),
            phase: session.phase(),
            scroll_fraction: session.scroll_fraction(),
            completed_lessons: session.completed_lesson_ids(),
            progress_percentage: session.progress_percentage(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(lesson_id: i32, objectives: usize, questions: usize) -> LessonPlan {
        LessonPlan {
            lesson_id,
            objective_count: objectives,
            question_count: questions,
        }
    }

    fn session_of(count: i32) -> PlayerSession {
        PlayerSession::new((1..=count).map(|i| plan(i, 2, 2)).collect())
    }

    fn completions(events: &[PlayerEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, PlayerEvent::LessonCompleted { .. }))
            .count()
    }

    #[test]
    fn test_objectives_complete_across_the_reading_band() {
        let mut session = PlayerSession::new(vec![plan(1, 4, 0)]);

        // Thresholds at 0.2, 0.4, 0.6, 0.8.
        let events = session.on_scroll(0.25);
        assert_eq!(events, vec![PlayerEvent::ObjectiveReached { index: 0 }]);

        let events = session.on_scroll(0.61);
        assert_eq!(
            events,
            vec![
                PlayerEvent::ObjectiveReached { index: 1 },
                PlayerEvent::ObjectiveReached { index: 2 },
            ]
        );

        // Scrolling back up re-marks nothing.
        assert!(session.on_scroll(0.1).is_empty());
    }

    #[test]
    fn test_activity_offered_at_threshold() {
        let mut session = session_of(2);
        assert!(session.on_scroll(0.79).iter().all(|e| matches!(e, PlayerEvent::ObjectiveReached { .. })));

        let events = session.on_scroll(0.8);
        assert!(events.contains(&PlayerEvent::ActivityOffered));
        assert_eq!(session.phase(), LessonPhase::ActivityOffered);

        // Only offered once.
        assert!(!session.on_scroll(0.85).contains(&PlayerEvent::ActivityOffered));
    }

    #[test]
    fn test_activity_is_offered_before_completion_in_one_update() {
        let mut session = session_of(2);

        let events = session.on_scroll(1.0);
        let offered = events
            .iter()
            .position(|e| *e == PlayerEvent::ActivityOffered)
            .unwrap();
        let completed = events
            .iter()
            .position(|e| matches!(e, PlayerEvent::LessonCompleted { .. }))
            .unwrap();
        assert!(offered < completed);
    }

    #[test]
    fn test_completion_fires_exactly_once_under_oscillation() {
        let mut session = session_of(2);
        session.on_scroll(0.85);

        let events = session.on_scroll(0.96);
        assert_eq!(completions(&events), 1);

        for fraction in [0.5, 0.97, 0.2, 1.0, 0.96] {
            assert_eq!(completions(&session.on_scroll(fraction)), 0);
        }
    }

    #[test]
    fn test_rapid_scroll_past_both_thresholds_fires_once() {
        let mut session = session_of(2);
        let events = session.on_scroll(1.0);
        assert_eq!(completions(&events), 1);
        assert_eq!(completions(&session.on_scroll(1.0)), 0);
    }

    #[test]
    fn test_revisiting_completed_lesson_does_not_refire() {
        let mut session = session_of(3);
        session.on_scroll(1.0);

        session.next();
        session.previous();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.phase(), LessonPhase::Reading);
        assert_eq!(completions(&session.on_scroll(1.0)), 0);
    }

    #[test]
    fn test_navigation_clamps_and_resets_flags() {
        let mut session = session_of(3);
        session.on_scroll(0.9);
        assert_eq!(session.phase(), LessonPhase::ActivityOffered);

        assert_eq!(session.previous(), 0);
        assert_eq!(session.select(99), 2);
        assert_eq!(session.phase(), LessonPhase::Reading);
        assert_eq!(session.scroll_fraction(), 0.0);

        assert_eq!(session.next(), 2);
    }

    #[test]
    fn test_zero_question_activity_is_trivially_complete() {
        let mut session = PlayerSession::new(vec![plan(1, 0, 0)]);
        session.on_scroll(0.85);
        assert_eq!(session.start_activity(), Some(LessonPhase::ActivityComplete));
    }

    #[test]
    fn test_activity_flow_with_questions() {
        let mut session = PlayerSession::new(vec![plan(1, 0, 3)]);
        assert_eq!(session.start_activity(), None);

        session.on_scroll(0.85);
        assert_eq!(session.start_activity(), Some(LessonPhase::ActivityInProgress));

        session.complete_activity();
        assert_eq!(session.phase(), LessonPhase::ActivityComplete);
    }

    #[test]
    fn test_progress_bar_counts_completed_lessons() {
        let mut session = session_of(5);
        for _ in 0..4 {
            session.on_scroll(1.0);
            session.next();
        }

        // Lessons 1-4 done, lesson 5 selected via the jump but untouched.
        session.select(4);
        assert_eq!(session.progress_percentage(), 80.0);
        assert_eq!(session.completed_lesson_ids(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_course_completes_on_last_lesson() {
        let mut session = session_of(2);
        let events = session.on_scroll(1.0);
        assert!(!events.contains(&PlayerEvent::CourseCompleted));

        session.next();
        let events = session.on_scroll(1.0);
        assert!(events.contains(&PlayerEvent::CourseCompleted));
        assert_eq!(session.progress_percentage(), 100.0);
    }
}
