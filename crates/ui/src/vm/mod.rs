mod auth_vm;
mod class_vm;
mod lesson_vm;
mod time_fmt;

pub use auth_vm::{CriterionVm, StrengthMeterVm, strength_meter};
pub use class_vm::{ClassCardVm, EnrolledCardVm, map_class_cards, map_enrolled_cards};
pub use lesson_vm::{
    LessonNavVm, LessonRowVm, LessonStatus, lesson_nav, map_lesson_rows, playback_label,
};
pub use time_fmt::{format_clock, format_minutes};
