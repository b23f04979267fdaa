use std::sync::Arc;

use skill_core::Clock;
use skill_core::model::LessonId;
use storage::repository::{LessonNotes, NotesRepository};

use crate::error::NotesServiceError;

/// Private per-lesson notes kept on this device.
#[derive(Clone)]
pub struct NotesService {
    clock: Clock,
    notes: Arc<dyn NotesRepository>,
}

impl NotesService {
    #[must_use]
    pub fn new(clock: Clock, notes: Arc<dyn NotesRepository>) -> Self {
        Self { clock, notes }
    }

    /// Notes for the lesson; empty when none were saved.
    ///
    /// # Errors
    ///
    /// Returns `NotesServiceError::Storage` on backend failures.
    pub async fn load(&self, lesson_id: LessonId) -> Result<String, NotesServiceError> {
        Ok(self
            .notes
            .get_notes(lesson_id)
            .await?
            .map(|notes| notes.text)
            .unwrap_or_default())
    }

    /// Save the notes. Blank text deletes the entry.
    ///
    /// # Errors
    ///
    /// Returns `NotesServiceError::Storage` on backend failures.
    pub async fn save(&self, lesson_id: LessonId, text: &str) -> Result<(), NotesServiceError> {
        if text.trim().is_empty() {
            self.notes.delete_notes(lesson_id).await?;
            return Ok(());
        }
        let notes = LessonNotes {
            lesson_id,
            text: text.to_string(),
            updated_at: self.clock.now(),
        };
        self.notes.save_notes(&notes).await?;
        tracing::debug!(%lesson_id, "lesson notes saved");
        Ok(())
    }
}
