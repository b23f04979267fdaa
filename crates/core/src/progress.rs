//! Lesson progression derived from the server's progress records.
//!
//! The state is never persisted client-side: every fetch rebuilds it from the
//! authoritative record list with [`derive_progress`].

use std::collections::BTreeSet;

use thiserror::Error;

use crate::model::{Lesson, LessonId, LessonProgressRecord};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("lesson {index} is locked; complete the previous lesson first")]
    Locked { index: usize },

    #[error("lesson {index} does not exist (class has {count} lessons)")]
    OutOfRange { index: usize, count: usize },
}

/// Unlocked and completed lesson indices for one user in one class.
///
/// Invariants:
/// - `0` is always unlocked.
/// - every completed index `i` has `i + 1` unlocked.
/// - `current` is the highest index unlocked by a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressState {
    lesson_count: usize,
    unlocked: BTreeSet<usize>,
    completed: BTreeSet<usize>,
    current: usize,
}

/// Build a `ProgressState` from the ordered lessons and the raw records.
///
/// Records referencing a lesson that is not in `lessons` are ignored, which
/// covers stale records left behind after a lesson was deleted or reordered.
#[must_use]
pub fn derive_progress(lessons: &[Lesson], records: &[LessonProgressRecord]) -> ProgressState {
    let mut state = ProgressState::empty(lessons.len());
    for record in records.iter().filter(|record| record.completed) {
        if let Some(index) = index_of(lessons, record.lesson_id) {
            state.mark_completed(index);
        }
    }
    state
}

fn index_of(lessons: &[Lesson], lesson_id: LessonId) -> Option<usize> {
    lessons.iter().position(|lesson| lesson.id == lesson_id)
}

impl ProgressState {
    /// Fresh state: only the first lesson is open.
    #[must_use]
    pub fn empty(lesson_count: usize) -> Self {
        Self {
            lesson_count,
            unlocked: BTreeSet::from([0]),
            completed: BTreeSet::new(),
            current: 0,
        }
    }

    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.lesson_count
    }

    #[must_use]
    pub fn unlocked(&self) -> &BTreeSet<usize> {
        &self.unlocked
    }

    #[must_use]
    pub fn completed(&self) -> &BTreeSet<usize> {
        &self.completed
    }

    /// Highest unlocked index reached through completions.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn is_unlocked(&self, index: usize) -> bool {
        self.unlocked.contains(&index)
    }

    #[must_use]
    pub fn is_completed(&self, index: usize) -> bool {
        self.completed.contains(&index)
    }

    /// Gate navigation to `index`. Never mutates the state.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::OutOfRange` if the class has no such lesson,
    /// or `ProgressError::Locked` if it is not unlocked yet.
    pub fn ensure_navigable(&self, index: usize) -> Result<(), ProgressError> {
        if index >= self.lesson_count {
            return Err(ProgressError::OutOfRange {
                index,
                count: self.lesson_count,
            });
        }
        if !self.is_unlocked(index) {
            return Err(ProgressError::Locked { index });
        }
        Ok(())
    }

    /// Record `index` as completed and unlock the next lesson.
    ///
    /// Returns `false` when the lesson was already completed; nothing changes
    /// in that case.
    pub fn mark_completed(&mut self, index: usize) -> bool {
        if !self.completed.insert(index) {
            return false;
        }
        let next = index + 1;
        self.unlocked.insert(next);
        self.current = self.current.max(next);
        true
    }

    /// The lesson after `index`, if it exists and is unlocked.
    #[must_use]
    pub fn next_navigable(&self, index: usize) -> Option<usize> {
        let next = index.checked_add(1)?;
        self.ensure_navigable(next).ok().map(|()| next)
    }

    /// The lesson before `index`. Earlier lessons stay reachable once `index` is.
    #[must_use]
    pub fn previous(&self, index: usize) -> Option<usize> {
        let prev = index.checked_sub(1)?;
        self.ensure_navigable(prev).ok().map(|()| prev)
    }

    /// The lesson a returning learner should resume at.
    #[must_use]
    pub fn resume_index(&self) -> usize {
        if self.lesson_count == 0 {
            return 0;
        }
        self.current.min(self.lesson_count - 1)
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Completed lessons as a whole percentage of the class.
    #[must_use]
    pub fn percent_complete(&self) -> u8 {
        if self.lesson_count == 0 {
            return 0;
        }
        let done = self.completed_count().min(self.lesson_count);
        let percent = done * 100 / self.lesson_count;
        u8::try_from(percent).unwrap_or(100)
    }

    #[must_use]
    pub fn is_class_complete(&self) -> bool {
        self.lesson_count > 0 && self.completed_count() >= self.lesson_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lessons(n: u64) -> Vec<Lesson> {
        (0..n)
            .map(|i| Lesson::new(LessonId::new(100 + i), format!("L{i}")))
            .collect()
    }

    fn done(id: u64) -> LessonProgressRecord {
        LessonProgressRecord::completed(LessonId::new(id))
    }

    fn set(items: &[usize]) -> BTreeSet<usize> {
        items.iter().copied().collect()
    }

    #[test]
    fn no_records_unlocks_only_first_lesson() {
        let state = derive_progress(&lessons(3), &[]);
        assert_eq!(state.unlocked(), &set(&[0]));
        assert!(state.completed().is_empty());
        assert_eq!(state.current_index(), 0);
    }

    #[test]
    fn first_lesson_completed_unlocks_second() {
        let state = derive_progress(&lessons(3), &[done(100)]);
        assert_eq!(state.unlocked(), &set(&[0, 1]));
        assert_eq!(state.completed(), &set(&[0]));
        assert_eq!(state.current_index(), 1);
    }

    #[test]
    fn two_completed_make_third_navigable() {
        let state = derive_progress(&lessons(3), &[done(100), done(101)]);
        assert_eq!(state.unlocked(), &set(&[0, 1, 2]));
        assert_eq!(state.completed(), &set(&[0, 1]));
        assert_eq!(state.current_index(), 2);
        assert!(state.ensure_navigable(2).is_ok());
    }

    #[test]
    fn unknown_lesson_records_are_ignored() {
        let state = derive_progress(&lessons(3), &[done(100), done(999)]);
        assert_eq!(state.unlocked(), &set(&[0, 1]));
        assert_eq!(state.completed(), &set(&[0]));
    }

    #[test]
    fn incomplete_records_do_not_unlock() {
        let mut partial = done(100);
        partial.completed = false;
        partial.progress = 64.0;
        let state = derive_progress(&lessons(3), &[partial]);
        assert_eq!(state.unlocked(), &set(&[0]));
    }

    #[test]
    fn out_of_order_completion_unlocks_each_successor() {
        let state = derive_progress(&lessons(4), &[done(102)]);
        assert_eq!(state.unlocked(), &set(&[0, 3]));
        assert_eq!(state.current_index(), 3);
        assert_eq!(
            state.ensure_navigable(2),
            Err(ProgressError::Locked { index: 2 })
        );
    }

    #[test]
    fn unlocked_matches_completed_successors_for_every_subset() {
        let n = 5_usize;
        let all = lessons(n as u64);
        for mask in 0_u32..(1 << n) {
            let subset: Vec<usize> = (0..n).filter(|i| mask & (1 << i) != 0).collect();
            let records: Vec<_> = subset.iter().map(|&i| done(100 + i as u64)).collect();
            let state = derive_progress(&all, &records);

            let mut expected = set(&[0]);
            expected.extend(subset.iter().map(|i| i + 1));
            assert_eq!(state.unlocked(), &expected, "mask {mask:#b}");
            assert!(state.unlocked().iter().all(|&i| i <= n));
            assert!(state.completed().iter().all(|i| state.is_unlocked(i + 1)));
        }
    }

    #[test]
    fn derivation_is_idempotent() {
        let all = lessons(4);
        let records = vec![done(101), done(100), done(101)];
        assert_eq!(derive_progress(&all, &records), derive_progress(&all, &records));
    }

    #[test]
    fn marking_completed_twice_changes_nothing() {
        let mut state = derive_progress(&lessons(3), &[done(100)]);
        let before = state.clone();
        assert!(!state.mark_completed(0));
        assert_eq!(state, before);
        assert_eq!(state.completed_count(), 1);
    }

    #[test]
    fn locked_navigation_leaves_state_untouched() {
        let state = derive_progress(&lessons(3), &[]);
        let before = state.clone();
        assert_eq!(
            state.ensure_navigable(1),
            Err(ProgressError::Locked { index: 1 })
        );
        assert_eq!(
            state.ensure_navigable(7),
            Err(ProgressError::OutOfRange { index: 7, count: 3 })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn navigation_helpers_respect_unlocks() {
        let state = derive_progress(&lessons(3), &[done(100)]);
        assert_eq!(state.next_navigable(0), Some(1));
        assert_eq!(state.next_navigable(1), None);
        assert_eq!(state.previous(1), Some(0));
        assert_eq!(state.previous(0), None);
    }

    #[test]
    fn resume_index_stays_within_class_after_finishing() {
        let state = derive_progress(&lessons(2), &[done(100), done(101)]);
        assert_eq!(state.current_index(), 2);
        assert_eq!(state.resume_index(), 1);
        assert!(state.is_class_complete());
        assert_eq!(state.percent_complete(), 100);
    }

    #[test]
    fn percent_complete_rounds_down() {
        let state = derive_progress(&lessons(3), &[done(100)]);
        assert_eq!(state.percent_complete(), 33);
        assert!(!state.is_class_complete());
        assert_eq!(ProgressState::empty(0).percent_complete(), 0);
    }
}
