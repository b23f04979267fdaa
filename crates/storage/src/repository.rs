use async_trait::async_trait;
use chrono::{DateTime, Utc};
use skill_core::model::{LessonId, User};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Key of the bearer token entry.
pub const TOKEN_KEY: &str = "token";
/// Key of the serialized user profile entry.
pub const USER_KEY: &str = "user";

/// Key of the free-text notes entry for a lesson.
#[must_use]
pub fn lesson_notes_key(lesson_id: LessonId) -> String {
    format!("lesson-notes-{lesson_id}")
}

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted sign-in state: the `token` and `user` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub token: String,
    pub user: Option<User>,
    pub signed_in_at: DateTime<Utc>,
}

/// Free-text notes a learner keeps for one lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonNotes {
    pub lesson_id: LessonId,
    pub text: String,
    pub updated_at: DateTime<Utc>,
}

pub(crate) fn encode_user(user: &User) -> Result<String, StorageError> {
    serde_json::to_string(user).map_err(|e| StorageError::Serialization(e.to_string()))
}

pub(crate) fn decode_user(raw: &str) -> Result<User, StorageError> {
    serde_json::from_str(raw).map_err(|e| StorageError::Serialization(format!("user entry: {e}")))
}

/// Repository contract for the signed-in session.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Load the persisted session, if a token is stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored user entry is corrupt.
    async fn load_session(&self) -> Result<Option<SessionRecord>, StorageError>;

    /// Persist the token and user entries, replacing any previous session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entries cannot be written.
    async fn save_session(&self, session: &SessionRecord) -> Result<(), StorageError>;

    /// Remove the token and user entries.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entries cannot be removed.
    async fn clear_session(&self) -> Result<(), StorageError>;
}

/// Repository contract for per-lesson notes.
#[async_trait]
pub trait NotesRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_notes(&self, lesson_id: LessonId) -> Result<Option<LessonNotes>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn save_notes(&self, notes: &LessonNotes) -> Result<(), StorageError>;

    /// Deleting notes that do not exist is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn delete_notes(&self, lesson_id: LessonId) -> Result<(), StorageError>;
}

#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    updated_at: DateTime<Utc>,
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// Entries are keyed exactly like the persisted key/value store.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<HashMap<String, StoredValue>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a raw entry, bypassing encoding. Useful to simulate corrupt data.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn put_raw(
        &self,
        key: &str,
        value: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(
            key.to_string(),
            StoredValue {
                value: value.into(),
                updated_at: at,
            },
        );
        Ok(())
    }

    /// Read a raw entry.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).map(|stored| stored.value.clone()))
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn load_session(&self) -> Result<Option<SessionRecord>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let Some(token) = guard.get(TOKEN_KEY) else {
            return Ok(None);
        };
        let user = guard
            .get(USER_KEY)
            .map(|stored| decode_user(&stored.value))
            .transpose()?;
        Ok(Some(SessionRecord {
            token: token.value.clone(),
            user,
            signed_in_at: token.updated_at,
        }))
    }

    async fn save_session(&self, session: &SessionRecord) -> Result<(), StorageError> {
        let user = session.user.as_ref().map(encode_user).transpose()?;
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(
            TOKEN_KEY.to_string(),
            StoredValue {
                value: session.token.clone(),
                updated_at: session.signed_in_at,
            },
        );
        match user {
            Some(value) => {
                guard.insert(
                    USER_KEY.to_string(),
                    StoredValue {
                        value,
                        updated_at: session.signed_in_at,
                    },
                );
            }
            None => {
                guard.remove(USER_KEY);
            }
        }
        Ok(())
    }

    async fn clear_session(&self) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(TOKEN_KEY);
        guard.remove(USER_KEY);
        Ok(())
    }
}

#[async_trait]
impl NotesRepository for InMemoryRepository {
    async fn get_notes(&self, lesson_id: LessonId) -> Result<Option<LessonNotes>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .get(&lesson_notes_key(lesson_id))
            .map(|stored| LessonNotes {
                lesson_id,
                text: stored.value.clone(),
                updated_at: stored.updated_at,
            }))
    }

    async fn save_notes(&self, notes: &LessonNotes) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(
            lesson_notes_key(notes.lesson_id),
            StoredValue {
                value: notes.text.clone(),
                updated_at: notes.updated_at,
            },
        );
        Ok(())
    }

    async fn delete_notes(&self, lesson_id: LessonId) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&lesson_notes_key(lesson_id));
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub sessions: Arc<dyn SessionRepository>,
    pub notes: Arc<dyn NotesRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self::from_in_memory(&repo)
    }

    /// Share one in-memory backend across all repositories.
    #[must_use]
    pub fn from_in_memory(repo: &InMemoryRepository) -> Self {
        let sessions: Arc<dyn SessionRepository> = Arc::new(repo.clone());
        let notes: Arc<dyn NotesRepository> = Arc::new(repo.clone());
        Self { sessions, notes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skill_core::model::UserId;
    use skill_core::time::fixed_now;

    fn user() -> User {
        User {
            id: UserId::new(5),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            avatar_url: None,
            email_verified: true,
        }
    }

    #[tokio::test]
    async fn session_round_trips_through_token_and_user_keys() {
        let repo = InMemoryRepository::new();
        let record = SessionRecord {
            token: "jwt.token".into(),
            user: Some(user()),
            signed_in_at: fixed_now(),
        };
        repo.save_session(&record).await.unwrap();

        assert_eq!(repo.get_raw(TOKEN_KEY).unwrap().as_deref(), Some("jwt.token"));
        assert!(repo.get_raw(USER_KEY).unwrap().unwrap().contains("ada@example.com"));
        assert_eq!(repo.load_session().await.unwrap(), Some(record));

        repo.clear_session().await.unwrap();
        assert_eq!(repo.load_session().await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_user_entry_is_a_serialization_error() {
        let repo = InMemoryRepository::new();
        repo.put_raw(TOKEN_KEY, "jwt", fixed_now()).unwrap();
        repo.put_raw(USER_KEY, "{not json", fixed_now()).unwrap();
        let err = repo.load_session().await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[tokio::test]
    async fn notes_use_lesson_scoped_keys() {
        let repo = InMemoryRepository::new();
        let notes = LessonNotes {
            lesson_id: LessonId::new(17),
            text: "tension matters".into(),
            updated_at: fixed_now(),
        };
        repo.save_notes(&notes).await.unwrap();
        assert_eq!(
            repo.get_raw("lesson-notes-17").unwrap().as_deref(),
            Some("tension matters")
        );
        assert_eq!(repo.get_notes(LessonId::new(18)).await.unwrap(), None);

        repo.delete_notes(LessonId::new(17)).await.unwrap();
        assert_eq!(repo.get_notes(LessonId::new(17)).await.unwrap(), None);
    }
}
