use async_trait::async_trait;
use skill_core::model::LessonId;

use super::SqliteRepository;
use super::kv;
use crate::repository::{LessonNotes, NotesRepository, StorageError, lesson_notes_key};

fn connection<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl NotesRepository for SqliteRepository {
    async fn get_notes(&self, lesson_id: LessonId) -> Result<Option<LessonNotes>, StorageError> {
        let mut conn = self.pool.acquire().await.map_err(connection)?;
        let entry = kv::get(&mut conn, &lesson_notes_key(lesson_id)).await?;
        Ok(entry.map(|entry| LessonNotes {
            lesson_id,
            text: entry.value,
            updated_at: entry.updated_at,
        }))
    }

    async fn save_notes(&self, notes: &LessonNotes) -> Result<(), StorageError> {
        let mut conn = self.pool.acquire().await.map_err(connection)?;
        kv::put(
            &mut conn,
            &lesson_notes_key(notes.lesson_id),
            &notes.text,
            notes.updated_at,
        )
        .await
    }

    async fn delete_notes(&self, lesson_id: LessonId) -> Result<(), StorageError> {
        let mut conn = self.pool.acquire().await.map_err(connection)?;
        kv::delete(&mut conn, &lesson_notes_key(lesson_id)).await
    }
}
