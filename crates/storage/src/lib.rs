#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    InMemoryRepository, LessonNotes, NotesRepository, SessionRecord, SessionRepository, Storage,
    StorageError,
};
