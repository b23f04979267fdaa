use services::EnrolledClass;
use skill_core::model::{Class, ClassId};

use crate::vm::time_fmt::format_minutes;

/// Catalog card.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassCardVm {
    pub id: ClassId,
    pub title: String,
    pub summary: String,
    pub thumbnail_url: Option<String>,
    pub tags: Vec<String>,
    pub rating_label: Option<String>,
    pub enrolled: bool,
}

const SUMMARY_CHARS: usize = 140;

fn summarize(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= SUMMARY_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(SUMMARY_CHARS).collect();
    let cut = cut.rsplit_once(' ').map_or(cut.as_str(), |(head, _)| head);
    format!("{}…", cut.trim_end())
}

impl From<&Class> for ClassCardVm {
    fn from(class: &Class) -> Self {
        let mut tags: Vec<String> = [class.category.as_deref(), class.level.as_deref()]
            .into_iter()
            .flatten()
            .filter(|value| !value.trim().is_empty())
            .map(str::to_string)
            .collect();
        if let Some(minutes) = class.duration_minutes {
            tags.push(format_minutes(minutes));
        }
        Self {
            id: class.id,
            title: class.title.clone(),
            summary: summarize(&class.description),
            thumbnail_url: class.thumbnail_url.clone(),
            tags,
            rating_label: class.average_rating.map(|avg| format!("★ {avg:.1}")),
            enrolled: class.enrolled,
        }
    }
}

#[must_use]
pub fn map_class_cards(classes: &[Class]) -> Vec<ClassCardVm> {
    classes.iter().map(ClassCardVm::from).collect()
}

/// "Your classes" card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnrolledCardVm {
    pub id: ClassId,
    pub title: String,
    pub percent: u8,
    pub progress_label: String,
    pub resume_index: usize,
    pub cta: &'static str,
}

impl From<&EnrolledClass> for EnrolledCardVm {
    fn from(item: &EnrolledClass) -> Self {
        let cta = if item.lesson_count > 0 && item.completed_count >= item.lesson_count {
            "Review"
        } else if item.completed_count == 0 {
            "Start"
        } else {
            "Continue"
        };
        Self {
            id: item.class.id,
            title: item.class.title.clone(),
            percent: item.percent_complete,
            progress_label: format!(
                "{} of {} lessons completed",
                item.completed_count, item.lesson_count
            ),
            resume_index: item.resume_index,
            cta,
        }
    }
}

#[must_use]
pub fn map_enrolled_cards(items: &[EnrolledClass]) -> Vec<EnrolledCardVm> {
    items.iter().map(EnrolledCardVm::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(json: serde_json::Value) -> Class {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn card_collects_tags_and_rating() {
        let vm = ClassCardVm::from(&class(serde_json::json!({
            "id": 2,
            "title": "Calligraphy",
            "description": "Brush lettering",
            "category": "Art",
            "level": " ",
            "durationMinutes": 75,
            "averageRating": 4.3
        })));
        assert_eq!(vm.tags, vec!["Art".to_string(), "1h 15m".to_string()]);
        assert_eq!(vm.rating_label.as_deref(), Some("★ 4.3"));
    }

    #[test]
    fn long_descriptions_are_cut_at_a_word() {
        let description = "word ".repeat(60);
        let vm = ClassCardVm::from(&class(serde_json::json!({
            "id": 1, "title": "T", "description": description
        })));
        assert!(vm.summary.ends_with('…'));
        assert!(vm.summary.chars().count() <= SUMMARY_CHARS + 1);
        assert!(!vm.summary.contains("  "));
    }

    #[test]
    fn enrolled_cta_follows_progress() {
        let base = EnrolledClass {
            class: class(serde_json::json!({ "id": 4, "title": "Knitting" })),
            lesson_count: 4,
            completed_count: 0,
            percent_complete: 0,
            resume_index: 0,
        };
        assert_eq!(EnrolledCardVm::from(&base).cta, "Start");

        let halfway = EnrolledClass {
            completed_count: 2,
            percent_complete: 50,
            resume_index: 2,
            ..base.clone()
        };
        let vm = EnrolledCardVm::from(&halfway);
        assert_eq!(vm.cta, "Continue");
        assert_eq!(vm.progress_label, "2 of 4 lessons completed");

        let done = EnrolledClass {
            completed_count: 4,
            percent_complete: 100,
            ..base
        };
        assert_eq!(EnrolledCardVm::from(&done).cta, "Review");
    }
}
