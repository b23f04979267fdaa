use dioxus::prelude::*;
use skill_core::model::{ClassId, LessonId, LessonRating};

use crate::context::AppContext;
use crate::views::ViewError;

const STARS: [u8; 5] = [1, 2, 3, 4, 5];

fn summary_label(rating: &LessonRating) -> String {
    match rating.total_ratings {
        0 => "No ratings yet".to_string(),
        1 => format!("{:.1} from 1 rating", rating.average_rating),
        n => format!("{:.1} from {n} ratings", rating.average_rating),
    }
}

#[component]
pub(super) fn RatingPanel(class_id: ClassId, lesson_id: LessonId) -> Element {
    let ctx = use_context::<AppContext>();
    let ratings = ctx.ratings();
    let mut current = use_signal(|| None::<LessonRating>);
    let mut submitting = use_signal(|| false);
    let mut error = use_signal(|| None::<ViewError>);

    let loader = ratings.clone();
    use_future(move || {
        let ratings = loader.clone();
        async move {
            match ratings.lesson_rating(class_id, lesson_id).await {
                Ok(rating) => current.set(Some(rating)),
                Err(err) => error.set(Some(err.into())),
            }
        }
    });

    let rate = use_callback(move |stars: u8| {
        if submitting() {
            return;
        }
        submitting.set(true);
        let ratings = ratings.clone();
        spawn(async move {
            match ratings.rate_lesson(class_id, lesson_id, stars).await {
                Ok(rating) => {
                    error.set(None);
                    current.set(Some(rating));
                }
                Err(err) => error.set(Some(err.into())),
            }
            submitting.set(false);
        });
    });

    let chosen = current
        .read()
        .as_ref()
        .and_then(|rating| rating.user_rating)
        .map_or(0, |rating| rating.value());
    let summary = current.read().as_ref().map(summary_label);

    rsx! {
        section { class: "lesson-rating",
            h3 { "Rate this lesson" }
            div { class: "stars", role: "radiogroup",
                for stars in STARS {
                    button {
                        class: if stars <= chosen { "star star--on" } else { "star" },
                        disabled: submitting(),
                        title: "{stars} stars",
                        onclick: move |_| rate.call(stars),
                        "★"
                    }
                }
            }
            if let Some(summary) = summary {
                p { class: "rating-summary", "{summary}" }
            }
            if let Some(err) = error() {
                p { class: "field-error", "{err.message()}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_pluralizes() {
        let mut rating = LessonRating::default();
        assert_eq!(summary_label(&rating), "No ratings yet");
        rating.total_ratings = 1;
        rating.average_rating = 4.0;
        assert_eq!(summary_label(&rating), "4.0 from 1 rating");
        rating.total_ratings = 3;
        rating.average_rating = 3.5;
        assert_eq!(summary_label(&rating), "3.5 from 3 ratings");
    }
}
