use services::ClassProgress;
use skill_core::model::LessonId;

use crate::vm::time_fmt::format_clock;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LessonStatus {
    Locked,
    Available,
    Completed,
    Current,
}

impl LessonStatus {
    #[must_use]
    pub fn badge(self) -> Option<&'static str> {
        match self {
            Self::Locked => Some("Locked"),
            Self::Completed => Some("Completed"),
            Self::Current => Some("Now playing"),
            Self::Available => None,
        }
    }

    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Locked => "lesson-row lesson-row--locked",
            Self::Available => "lesson-row",
            Self::Completed => "lesson-row lesson-row--done",
            Self::Current => "lesson-row lesson-row--current",
        }
    }

    #[must_use]
    pub fn is_navigable(self) -> bool {
        !matches!(self, Self::Locked)
    }
}

/// One entry of the lesson list on the class and lesson pages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonRowVm {
    pub index: usize,
    pub id: LessonId,
    pub number: usize,
    pub title: String,
    pub duration: Option<String>,
    pub status: LessonStatus,
}

/// `current` marks the lesson that is open, if any. Completion wins over
/// the current marker.
#[must_use]
pub fn map_lesson_rows(progress: &ClassProgress, current: Option<usize>) -> Vec<LessonRowVm> {
    let state = progress.state();
    progress
        .lessons()
        .iter()
        .enumerate()
        .map(|(index, lesson)| {
            let status = if state.is_completed(index) {
                LessonStatus::Completed
            } else if Some(index) == current {
                LessonStatus::Current
            } else if state.is_unlocked(index) {
                LessonStatus::Available
            } else {
                LessonStatus::Locked
            };
            LessonRowVm {
                index,
                id: lesson.id,
                number: index + 1,
                title: lesson.title.clone(),
                duration: lesson.duration_seconds.map(|secs| format_clock(f64::from(secs))),
                status,
            }
        })
        .collect()
}

/// Previous/next buttons under the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LessonNavVm {
    pub previous: Option<usize>,
    pub next: Option<usize>,
    /// A following lesson exists but is still locked.
    pub next_locked: bool,
}

#[must_use]
pub fn lesson_nav(progress: &ClassProgress, index: usize) -> LessonNavVm {
    let state = progress.state();
    let next = state.next_navigable(index);
    LessonNavVm {
        previous: state.previous(index),
        next,
        next_locked: next.is_none() && index + 1 < state.lesson_count(),
    }
}

/// `"1:05 / 10:00"`.
#[must_use]
pub fn playback_label(current_time: f64, duration: f64) -> String {
    format!("{} / {}", format_clock(current_time), format_clock(duration))
}
