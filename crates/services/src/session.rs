//! Explicit sign-in state shared by the HTTP client and the services.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use skill_core::Clock;
use skill_core::model::User;
use storage::repository::{SessionRecord, SessionRepository, StorageError};

use crate::error::SessionError;

/// The signed-in learner as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: Option<User>,
    pub signed_in_at: DateTime<Utc>,
}

impl From<SessionRecord> for Session {
    fn from(record: SessionRecord) -> Self {
        Self {
            token: record.token,
            user: record.user,
            signed_in_at: record.signed_in_at,
        }
    }
}

impl Session {
    fn to_record(&self) -> SessionRecord {
        SessionRecord {
            token: self.token.clone(),
            user: self.user.clone(),
            signed_in_at: self.signed_in_at,
        }
    }
}

/// Owns the in-memory session and keeps the persisted copy in sync.
///
/// Cloning is cheap; every clone observes the same session.
#[derive(Clone)]
pub struct SessionContext {
    clock: Clock,
    repo: Arc<dyn SessionRepository>,
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionContext {
    /// A signed-out context. Use [`SessionContext::init`] to restore a
    /// persisted session.
    #[must_use]
    pub fn new(clock: Clock, repo: Arc<dyn SessionRepository>) -> Self {
        Self {
            clock,
            repo,
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Restore the persisted session, if any.
    ///
    /// A corrupt user entry is dropped with a warning and the learner starts
    /// signed out.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the store cannot be read.
    pub async fn init(clock: Clock, repo: Arc<dyn SessionRepository>) -> Result<Self, SessionError> {
        let context = Self::new(clock, repo);
        match context.repo.load_session().await {
            Ok(Some(record)) => {
                tracing::debug!("restored persisted session");
                context.replace(Some(record.into()));
            }
            Ok(None) => {}
            Err(StorageError::Serialization(reason)) => {
                tracing::warn!(%reason, "discarding corrupt persisted session");
                context.repo.clear_session().await?;
            }
            Err(err) => return Err(err.into()),
        }
        Ok(context)
    }

    /// Persist a new session and make it current.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the session cannot be persisted;
    /// the in-memory state is left unchanged in that case.
    pub async fn establish(
        &self,
        token: impl Into<String>,
        user: Option<User>,
    ) -> Result<Session, SessionError> {
        let session = Session {
            token: token.into(),
            user,
            signed_in_at: self.clock.now(),
        };
        self.repo.save_session(&session.to_record()).await?;
        self.replace(Some(session.clone()));
        Ok(session)
    }

    /// Attach the fetched profile to the current session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the session cannot be persisted.
    pub async fn set_user(&self, user: User) -> Result<(), SessionError> {
        let Some(mut session) = self.current() else {
            return Ok(());
        };
        session.user = Some(user);
        self.repo.save_session(&session.to_record()).await?;
        self.replace(Some(session));
        Ok(())
    }

    /// Forget the session in memory and in storage.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the persisted entries cannot be
    /// removed. Memory is cleared regardless.
    pub async fn teardown(&self) -> Result<(), SessionError> {
        self.replace(None);
        self.repo.clear_session().await?;
        Ok(())
    }

    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn bearer_token(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|session| session.token.clone())
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(|session| session.user.clone())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.bearer_token().is_some()
    }

    fn replace(&self, next: Option<Session>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = next;
    }
}
