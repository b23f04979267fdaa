//! In-memory API fakes for tests and offline prototyping.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use skill_core::model::{
    AuthResponse, Class, ClassId, Credentials, Lesson, LessonId, LessonProgressRecord,
    LessonRating, ProgressUpdate, Rating, Registration, User, UserId,
};
use skill_core::wizard::ClassSubmission;

use super::{AuthApi, ClassApi};
use crate::error::ApiError;
use crate::session::SessionContext;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn not_found(what: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        message: format!("{what} not found"),
    }
}

fn unavailable() -> ApiError {
    ApiError::Status {
        status: 503,
        message: "Service unavailable".to_string(),
    }
}

/// One recorded `POST .../progress/lessons/{lessonId}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressPost {
    pub class_id: ClassId,
    pub lesson_id: LessonId,
    pub update: ProgressUpdate,
}

#[derive(Default)]
struct ClassState {
    classes: BTreeMap<ClassId, Class>,
    lessons: HashMap<ClassId, Vec<Lesson>>,
    records: HashMap<ClassId, Vec<LessonProgressRecord>>,
    enrolled: BTreeSet<ClassId>,
    ratings: HashMap<LessonId, Vec<u8>>,
    own_ratings: HashMap<LessonId, Rating>,
    progress_posts: Vec<ProgressPost>,
    submissions: Vec<ClassSubmission>,
    fail_progress_updates: bool,
    fail_all: bool,
    next_class_id: u64,
}

impl ClassState {
    fn check(&self) -> Result<(), ApiError> {
        if self.fail_all { Err(unavailable()) } else { Ok(()) }
    }

    fn class(&self, class_id: ClassId) -> Result<&Class, ApiError> {
        self.classes.get(&class_id).ok_or_else(|| not_found("Class"))
    }

    fn to_class(&self, class_id: ClassId, submission: &ClassSubmission) -> Class {
        let data = &submission.class_data;
        let thumbnail_url = match &submission.thumbnail {
            Some(upload) => Some(format!("memory://thumbnails/{}", upload.file_name)),
            None => data.thumbnail_url.clone(),
        };
        Class {
            id: class_id,
            title: data.title.clone(),
            description: data.description.clone(),
            thumbnail_url,
            category: Some(data.category.clone()),
            level: Some(data.level.clone()),
            duration_minutes: data.duration_minutes,
            requirements: data.requirements.clone(),
            sections: data.sections.clone(),
            instructor_name: None,
            contact_email: Some(data.contact_email.clone()),
            average_rating: None,
            enrolled: false,
        }
    }
}

/// `ClassApi` over process memory. Progress updates are applied like the
/// server does, so a later `get_progress` sees them.
#[derive(Clone, Default)]
pub struct InMemoryClassApi {
    state: Arc<Mutex<ClassState>>,
}

impl InMemoryClassApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a class with its ordered lessons.
    pub fn insert_class(&self, class: Class, lessons: Vec<Lesson>) {
        let mut state = lock(&self.state);
        state.next_class_id = state.next_class_id.max(class.id.value());
        state.lessons.insert(class.id, lessons);
        state.classes.insert(class.id, class);
    }

    pub fn set_progress(&self, class_id: ClassId, records: Vec<LessonProgressRecord>) {
        lock(&self.state).records.insert(class_id, records);
    }

    /// Reject every progress update with a 503.
    pub fn fail_progress_updates(&self, fail: bool) {
        lock(&self.state).fail_progress_updates = fail;
    }

    /// Reject every request with a 503.
    pub fn fail_all(&self, fail: bool) {
        lock(&self.state).fail_all = fail;
    }

    #[must_use]
    pub fn progress_posts(&self) -> Vec<ProgressPost> {
        lock(&self.state).progress_posts.clone()
    }

    #[must_use]
    pub fn submissions(&self) -> Vec<ClassSubmission> {
        lock(&self.state).submissions.clone()
    }

    #[must_use]
    pub fn is_enrolled(&self, class_id: ClassId) -> bool {
        lock(&self.state).enrolled.contains(&class_id)
    }
}

#[async_trait]
impl ClassApi for InMemoryClassApi {
    async fn list_classes(&self) -> Result<Vec<Class>, ApiError> {
        let state = lock(&self.state);
        state.check()?;
        Ok(state
            .classes
            .values()
            .map(|class| Class {
                enrolled: state.enrolled.contains(&class.id),
                ..class.clone()
            })
            .collect())
    }

    async fn get_class(&self, class_id: ClassId) -> Result<Class, ApiError> {
        let state = lock(&self.state);
        state.check()?;
        let class = state.class(class_id)?;
        Ok(Class {
            enrolled: state.enrolled.contains(&class_id),
            ..class.clone()
        })
    }

    async fn list_lessons(&self, class_id: ClassId) -> Result<Vec<Lesson>, ApiError> {
        let state = lock(&self.state);
        state.check()?;
        state.class(class_id)?;
        Ok(state.lessons.get(&class_id).cloned().unwrap_or_default())
    }

    async fn get_progress(
        &self,
        class_id: ClassId,
    ) -> Result<Vec<LessonProgressRecord>, ApiError> {
        let state = lock(&self.state);
        state.check()?;
        state.class(class_id)?;
        Ok(state.records.get(&class_id).cloned().unwrap_or_default())
    }

    async fn update_lesson_progress(
        &self,
        class_id: ClassId,
        lesson_id: LessonId,
        update: &ProgressUpdate,
    ) -> Result<(), ApiError> {
        let mut state = lock(&self.state);
        state.check()?;
        if state.fail_progress_updates {
            return Err(unavailable());
        }
        state.class(class_id)?;
        state.progress_posts.push(ProgressPost {
            class_id,
            lesson_id,
            update: *update,
        });
        let records = state.records.entry(class_id).or_default();
        match records.iter_mut().find(|r| r.lesson_id == lesson_id) {
            Some(record) => {
                record.completed |= update.completed;
                record.last_watched_position = update.last_watched_position;
                record.progress = record.progress.max(update.progress);
            }
            None => records.push(LessonProgressRecord {
                lesson_id,
                completed: update.completed,
                last_watched_position: update.last_watched_position,
                progress: update.progress,
            }),
        }
        Ok(())
    }

    async fn enroll(&self, class_id: ClassId) -> Result<(), ApiError> {
        let mut state = lock(&self.state);
        state.check()?;
        state.class(class_id)?;
        state.enrolled.insert(class_id);
        Ok(())
    }

    async fn list_enrolled(&self) -> Result<Vec<Class>, ApiError> {
        let state = lock(&self.state);
        state.check()?;
        Ok(state
            .enrolled
            .iter()
            .filter_map(|id| state.classes.get(id))
            .map(|class| Class {
                enrolled: true,
                ..class.clone()
            })
            .collect())
    }

    async fn rate_lesson(
        &self,
        class_id: ClassId,
        lesson_id: LessonId,
        rating: Rating,
    ) -> Result<(), ApiError> {
        let mut state = lock(&self.state);
        state.check()?;
        state.class(class_id)?;
        if let Some(previous) = state.own_ratings.insert(lesson_id, rating) {
            let ratings = state.ratings.entry(lesson_id).or_default();
            if let Some(pos) = ratings.iter().position(|&r| r == previous.value()) {
                ratings.remove(pos);
            }
        }
        state
            .ratings
            .entry(lesson_id)
            .or_default()
            .push(rating.value());
        Ok(())
    }

    async fn lesson_rating(
        &self,
        class_id: ClassId,
        lesson_id: LessonId,
    ) -> Result<LessonRating, ApiError> {
        let state = lock(&self.state);
        state.check()?;
        state.class(class_id)?;
        let ratings = state.ratings.get(&lesson_id).cloned().unwrap_or_default();
        let total = u32::try_from(ratings.len()).unwrap_or(u32::MAX);
        let average = if ratings.is_empty() {
            0.0
        } else {
            let sum: u32 = ratings.iter().map(|&r| u32::from(r)).sum();
            #[allow(clippy::cast_precision_loss)]
            let average = sum as f32 / total as f32;
            average
        };
        Ok(LessonRating {
            average_rating: average,
            total_ratings: total,
            user_rating: state.own_ratings.get(&lesson_id).copied(),
        })
    }

    async fn create_class(&self, submission: &ClassSubmission) -> Result<Class, ApiError> {
        let mut state = lock(&self.state);
        state.check()?;
        state.next_class_id += 1;
        let class = state.to_class(ClassId::new(state.next_class_id), submission);
        state.submissions.push(submission.clone());
        state.lessons.insert(class.id, Vec::new());
        state.classes.insert(class.id, class.clone());
        Ok(class)
    }

    async fn update_class(
        &self,
        class_id: ClassId,
        submission: &ClassSubmission,
    ) -> Result<Class, ApiError> {
        let mut state = lock(&self.state);
        state.check()?;
        state.class(class_id)?;
        let class = state.to_class(class_id, submission);
        state.submissions.push(submission.clone());
        state.classes.insert(class_id, class.clone());
        Ok(class)
    }
}

struct Account {
    password: String,
    user: User,
}

#[derive(Default)]
struct AuthState {
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, String>,
    verification_tokens: HashMap<String, String>,
    require_verification: bool,
    next_user_id: u64,
    next_token: u64,
}

impl AuthState {
    fn issue_token(&mut self, email: &str) -> String {
        self.next_token += 1;
        let token = format!("token-{}", self.next_token);
        self.tokens.insert(token.clone(), email.to_string());
        token
    }
}

/// `AuthApi` over process memory. `current_user` resolves the bearer token
/// of the shared [`SessionContext`], like the HTTP client does.
#[derive(Clone)]
pub struct InMemoryAuthApi {
    session: SessionContext,
    state: Arc<Mutex<AuthState>>,
}

impl InMemoryAuthApi {
    #[must_use]
    pub fn new(session: SessionContext) -> Self {
        Self {
            session,
            state: Arc::new(Mutex::new(AuthState::default())),
        }
    }

    /// Create a verified account.
    pub fn insert_account(&self, user: User, password: &str) {
        let mut state = lock(&self.state);
        state.next_user_id = state.next_user_id.max(user.id.value());
        state.accounts.insert(
            user.email.clone(),
            Account {
                password: password.to_string(),
                user,
            },
        );
    }

    /// Registration returns no token until the email is verified.
    pub fn require_verification(&self, required: bool) {
        lock(&self.state).require_verification = required;
    }

    /// Issue a token for `email`, as an OAuth provider redirect would.
    #[must_use]
    pub fn issue_token_for(&self, email: &str) -> String {
        lock(&self.state).issue_token(email)
    }

    /// The verification token mailed to `email`, if one is pending.
    #[must_use]
    pub fn verification_token(&self, email: &str) -> Option<String> {
        lock(&self.state)
            .verification_tokens
            .iter()
            .find(|(_, pending)| pending.as_str() == email)
            .map(|(token, _)| token.clone())
    }
}

#[async_trait]
impl AuthApi for InMemoryAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let mut state = lock(&self.state);
        let user = match state.accounts.get(&credentials.email) {
            Some(account) if account.password == credentials.password => account.user.clone(),
            _ => {
                return Err(ApiError::Status {
                    status: 400,
                    message: "Invalid email or password".to_string(),
                });
            }
        };
        let token = state.issue_token(&credentials.email);
        Ok(AuthResponse {
            token: Some(token),
            user: Some(user),
            message: None,
        })
    }

    async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        let mut state = lock(&self.state);
        if state.accounts.contains_key(&registration.email) {
            return Err(ApiError::Status {
                status: 409,
                message: "Email is already registered".to_string(),
            });
        }
        state.next_user_id += 1;
        let require_verification = state.require_verification;
        let user = User {
            id: UserId::new(state.next_user_id),
            name: registration.name.clone(),
            email: registration.email.clone(),
            avatar_url: None,
            email_verified: !require_verification,
        };
        state.accounts.insert(
            registration.email.clone(),
            Account {
                password: registration.password.clone(),
                user: user.clone(),
            },
        );
        if require_verification {
            let token = format!("verify-{}", user.id);
            state
                .verification_tokens
                .insert(token, registration.email.clone());
            return Ok(AuthResponse {
                token: None,
                user: None,
                message: Some("Check your inbox to verify your email address.".to_string()),
            });
        }
        // Omit the user so callers exercise the profile fetch.
        let token = state.issue_token(&registration.email);
        Ok(AuthResponse {
            token: Some(token),
            user: None,
            message: None,
        })
    }

    async fn verify_email(&self, token: &str) -> Result<String, ApiError> {
        let mut state = lock(&self.state);
        let Some(email) = state.verification_tokens.remove(token) else {
            return Err(ApiError::Status {
                status: 400,
                message: "Verification link is invalid or has expired".to_string(),
            });
        };
        if let Some(account) = state.accounts.get_mut(&email) {
            account.user.email_verified = true;
        }
        Ok("Your email address has been verified.".to_string())
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        let token = self.session.bearer_token().ok_or(ApiError::NotSignedIn)?;
        let state = lock(&self.state);
        state
            .tokens
            .get(&token)
            .and_then(|email| state.accounts.get(email))
            .map(|account| account.user.clone())
            .ok_or(ApiError::Unauthorized)
    }
}
