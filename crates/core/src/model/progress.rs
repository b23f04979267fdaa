use serde::{Deserialize, Serialize};

use crate::model::ids::LessonId;

/// The server's per-user, per-lesson watch state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgressRecord {
    pub lesson_id: LessonId,
    #[serde(default)]
    pub completed: bool,
    /// Seconds into the video.
    #[serde(default)]
    pub last_watched_position: f64,
    /// Percent watched, 0..=100.
    #[serde(default)]
    pub progress: f64,
}

impl LessonProgressRecord {
    #[must_use]
    pub fn completed(lesson_id: LessonId) -> Self {
        Self {
            lesson_id,
            completed: true,
            last_watched_position: 0.0,
            progress: 100.0,
        }
    }
}

/// Body of `POST /api/classes/{id}/progress/lessons/{lessonId}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub completed: bool,
    pub last_watched_position: f64,
    pub progress: f64,
}

impl ProgressUpdate {
    /// A watch-session update that does not complete the lesson.
    #[must_use]
    pub fn watching(position: f64, percent: f64) -> Self {
        Self {
            completed: false,
            last_watched_position: position.max(0.0),
            progress: percent.clamp(0.0, 100.0),
        }
    }

    #[must_use]
    pub fn completion(position: f64, percent: f64) -> Self {
        Self {
            completed: true,
            ..Self::watching(position, percent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_parses_api_shape() {
        let json = r#"{"lessonId": 12, "completed": true, "lastWatchedPosition": 310.5, "progress": 99.8}"#;
        let record: LessonProgressRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.lesson_id, LessonId::new(12));
        assert!(record.completed);
        assert!((record.last_watched_position - 310.5).abs() < f64::EPSILON);
    }

    #[test]
    fn watching_update_clamps_percent() {
        let update = ProgressUpdate::watching(-3.0, 140.0);
        assert!(!update.completed);
        assert!(update.last_watched_position.abs() < f64::EPSILON);
        assert!((update.progress - 100.0).abs() < f64::EPSILON);
    }
}
