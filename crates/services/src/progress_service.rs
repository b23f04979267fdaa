use std::sync::Arc;

use skill_core::model::{Class, ClassId, Lesson, LessonProgressRecord, ProgressUpdate};
use skill_core::player::CompletionPolicy;
use skill_core::progress::{ProgressError, ProgressState, derive_progress};

use crate::api::ClassApi;
use crate::error::ProgressServiceError;

/// Lessons, raw records and the derived state for one class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassProgress {
    class_id: ClassId,
    lessons: Vec<Lesson>,
    records: Vec<LessonProgressRecord>,
    state: ProgressState,
}

impl ClassProgress {
    #[must_use]
    pub fn new(class_id: ClassId, lessons: Vec<Lesson>, records: Vec<LessonProgressRecord>) -> Self {
        let state = derive_progress(&lessons, &records);
        Self {
            class_id,
            lessons,
            records,
            state,
        }
    }

    #[must_use]
    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn lesson(&self, index: usize) -> Option<&Lesson> {
        self.lessons.get(index)
    }

    #[must_use]
    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    /// The server's record for the lesson at `index`, if any.
    #[must_use]
    pub fn record(&self, index: usize) -> Option<&LessonProgressRecord> {
        let lesson = self.lessons.get(index)?;
        self.records.iter().find(|r| r.lesson_id == lesson.id)
    }

    /// Saved playback position for the lesson at `index`, in seconds.
    #[must_use]
    pub fn resume_position(&self, index: usize) -> f64 {
        self.record(index)
            .filter(|record| !record.completed)
            .map_or(0.0, |record| record.last_watched_position)
    }

    fn lesson_at(&self, index: usize) -> Result<&Lesson, ProgressError> {
        self.lessons.get(index).ok_or(ProgressError::OutOfRange {
            index,
            count: self.lessons.len(),
        })
    }

    fn apply(&mut self, index: usize, update: &ProgressUpdate) {
        let Some(lesson_id) = self.lessons.get(index).map(|lesson| lesson.id) else {
            return;
        };
        match self.records.iter_mut().find(|r| r.lesson_id == lesson_id) {
            Some(record) => {
                record.completed |= update.completed;
                record.last_watched_position = update.last_watched_position;
                record.progress = record.progress.max(update.progress);
            }
            None => self.records.push(LessonProgressRecord {
                lesson_id,
                completed: update.completed,
                last_watched_position: update.last_watched_position,
                progress: update.progress,
            }),
        }
        if update.completed {
            self.state.mark_completed(index);
        }
    }

    /// Fold the records of `other`, a copy of this class that went through
    /// its own request, into `self`. Completion and watched percent only
    /// grow, so merges in any order converge.
    pub fn merge(&mut self, other: &ClassProgress) {
        if other.class_id != self.class_id {
            return;
        }
        for record in &other.records {
            let Some(index) = self.lessons.iter().position(|l| l.id == record.lesson_id) else {
                continue;
            };
            self.apply(
                index,
                &ProgressUpdate {
                    completed: record.completed,
                    last_watched_position: record.last_watched_position,
                    progress: record.progress,
                },
            );
        }
    }
}

/// What asked for the lesson to be completed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompletionTrigger {
    /// The video reached its natural end.
    Ended { position: f64 },
    /// The learner pressed "mark as complete".
    Manual { position: f64, percent: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Newly completed; `next` is the lesson it unlocked, if any.
    Completed { index: usize, next: Option<usize> },
    AlreadyCompleted,
}

/// Progress overview of one enrolled class.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrolledClass {
    pub class: Class,
    pub lesson_count: usize,
    pub completed_count: usize,
    pub percent_complete: u8,
    pub resume_index: usize,
}

/// Drives lesson progression against the server.
///
/// Local state only changes after the server accepted the update.
#[derive(Clone)]
pub struct ProgressService {
    api: Arc<dyn ClassApi>,
    policy: CompletionPolicy,
}

impl ProgressService {
    #[must_use]
    pub fn new(api: Arc<dyn ClassApi>, policy: CompletionPolicy) -> Self {
        Self { api, policy }
    }

    #[must_use]
    pub fn policy(&self) -> CompletionPolicy {
        self.policy
    }

    /// Fetch lessons and records and derive the progression.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Api` if either fetch fails.
    pub async fn load(&self, class_id: ClassId) -> Result<ClassProgress, ProgressServiceError> {
        let lessons = self.api.list_lessons(class_id).await?;
        let records = self.api.get_progress(class_id).await?;
        Ok(ClassProgress::new(class_id, lessons, records))
    }

    /// Replace `progress` with a fresh derivation from the server.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Api` if the fetch fails; `progress`
    /// is left untouched.
    pub async fn refresh(&self, progress: &mut ClassProgress) -> Result<(), ProgressServiceError> {
        *progress = self.load(progress.class_id).await?;
        Ok(())
    }

    /// Gate navigation to the lesson at `index`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Progress` for locked or unknown lessons.
    pub fn open_lesson<'a>(
        &self,
        progress: &'a ClassProgress,
        index: usize,
    ) -> Result<&'a Lesson, ProgressServiceError> {
        if let Err(err) = progress.state.ensure_navigable(index) {
            tracing::warn!(class_id = %progress.class_id, index, %err, "lesson navigation rejected");
            return Err(err.into());
        }
        Ok(progress.lesson_at(index)?)
    }

    /// Save the playback position without completing the lesson.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Progress` for locked lessons, or
    /// `ProgressServiceError::Api` if the update is rejected.
    pub async fn report_watch(
        &self,
        progress: &mut ClassProgress,
        index: usize,
        position: f64,
        percent: f64,
    ) -> Result<(), ProgressServiceError> {
        progress.state.ensure_navigable(index)?;
        let lesson_id = progress.lesson_at(index)?.id;
        // A completed lesson keeps its completed flag on the server.
        let update = ProgressUpdate {
            completed: progress.state.is_completed(index),
            ..ProgressUpdate::watching(position, percent)
        };
        self.api
            .update_lesson_progress(progress.class_id, lesson_id, &update)
            .await?;
        progress.apply(index, &update);
        Ok(())
    }

    /// Complete the lesson at `index`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Progress` for locked lessons,
    /// `ProgressServiceError::NotEligible` for manual completion below the
    /// threshold, or `ProgressServiceError::Api` if the server rejected the
    /// update. No local state changes on error.
    pub async fn complete_lesson(
        &self,
        progress: &mut ClassProgress,
        index: usize,
        trigger: CompletionTrigger,
    ) -> Result<CompletionOutcome, ProgressServiceError> {
        if let Err(err) = progress.state.ensure_navigable(index) {
            tracing::warn!(class_id = %progress.class_id, index, %err, "completion rejected");
            return Err(err.into());
        }
        if progress.state.is_completed(index) {
            return Ok(CompletionOutcome::AlreadyCompleted);
        }

        let update = match trigger {
            CompletionTrigger::Ended { position } => ProgressUpdate::completion(position, 100.0),
            CompletionTrigger::Manual { position, percent } => {
                if !self.policy.is_eligible(percent) {
                    return Err(ProgressServiceError::NotEligible {
                        percent,
                        threshold: self.policy.threshold_percent(),
                    });
                }
                ProgressUpdate::completion(position, percent)
            }
        };

        let lesson_id = progress.lesson_at(index)?.id;
        if let Err(err) = self
            .api
            .update_lesson_progress(progress.class_id, lesson_id, &update)
            .await
        {
            tracing::warn!(class_id = %progress.class_id, %lesson_id, %err, "failed to save lesson completion");
            return Err(err.into());
        }

        progress.apply(index, &update);
        let next = progress.state.next_navigable(index);
        tracing::info!(class_id = %progress.class_id, %lesson_id, ?next, "lesson completed");
        Ok(CompletionOutcome::Completed { index, next })
    }

    /// Completion overview for every enrolled class, fetched one class at a
    /// time.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Api` if any fetch fails.
    pub async fn enrolled_overview(&self) -> Result<Vec<EnrolledClass>, ProgressServiceError> {
        let classes = self.api.list_enrolled().await?;
        let mut overview = Vec::with_capacity(classes.len());
        for class in classes {
            let progress = self.load(class.id).await?;
            let state = progress.state();
            overview.push(EnrolledClass {
                lesson_count: state.lesson_count(),
                completed_count: state.completed_count().min(state.lesson_count()),
                percent_complete: state.percent_complete(),
                resume_index: state.resume_index(),
                class,
            });
        }
        Ok(overview)
    }
}
