//! Endpoint paths, relative to the API base URL.

use skill_core::model::{ClassId, LessonId};

pub const CLASSES: &str = "api/classes";
pub const ENROLLED_CLASSES: &str = "api/classes/enrolled";
pub const LOGIN: &str = "api/auth/login";
pub const REGISTER: &str = "api/auth/register";
pub const VERIFY_EMAIL: &str = "api/auth/verify-email";
pub const CURRENT_USER: &str = "api/users/me";

#[must_use]
pub fn class(class_id: ClassId) -> String {
    format!("{CLASSES}/{class_id}")
}

#[must_use]
pub fn lessons(class_id: ClassId) -> String {
    format!("{CLASSES}/{class_id}/lessons")
}

#[must_use]
pub fn progress(class_id: ClassId) -> String {
    format!("{CLASSES}/{class_id}/progress")
}

#[must_use]
pub fn lesson_progress(class_id: ClassId, lesson_id: LessonId) -> String {
    format!("{CLASSES}/{class_id}/progress/lessons/{lesson_id}")
}

#[must_use]
pub fn enroll(class_id: ClassId) -> String {
    format!("{CLASSES}/{class_id}/enroll")
}

#[must_use]
pub fn rate_lesson(class_id: ClassId, lesson_id: LessonId) -> String {
    format!("{CLASSES}/{class_id}/lessons/{lesson_id}/rate")
}

#[must_use]
pub fn lesson_rating(class_id: ClassId, lesson_id: LessonId) -> String {
    format!("{CLASSES}/{class_id}/lessons/{lesson_id}/rating")
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn paths_join_under_a_prefixed_base() {
        let base = Url::parse("https://skills.example.com/backend/").unwrap();
        let url = base
            .join(&lesson_progress(ClassId::new(4), LessonId::new(9)))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://skills.example.com/backend/api/classes/4/progress/lessons/9"
        );
        assert_eq!(
            base.join(ENROLLED_CLASSES).unwrap().path(),
            "/backend/api/classes/enrolled"
        );
    }
}
