use serde::{Deserialize, Serialize};

use crate::model::ids::LessonId;

/// A lesson of a class, in the order the API lists them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub duration_seconds: Option<u32>,
}

impl Lesson {
    #[must_use]
    pub fn new(id: LessonId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            video_url: None,
            duration_seconds: None,
        }
    }
}
