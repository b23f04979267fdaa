use dioxus::prelude::*;
use skill_core::model::LessonId;

use crate::context::AppContext;
use crate::views::ViewError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SaveStatus {
    Clean,
    Dirty,
    Saving,
    Saved,
}

/// Private notes for one lesson, kept in local storage.
#[component]
pub(super) fn NotesPanel(lesson_id: LessonId) -> Element {
    let ctx = use_context::<AppContext>();
    let notes = ctx.notes();
    let mut text = use_signal(String::new);
    let mut status = use_signal(|| SaveStatus::Clean);
    let mut error = use_signal(|| None::<ViewError>);

    let loader = notes.clone();
    use_future(move || {
        let notes = loader.clone();
        async move {
            match notes.load(lesson_id).await {
                Ok(saved) => text.set(saved),
                Err(err) => error.set(Some(err.into())),
            }
        }
    });

    let on_save = move |_| {
        if status() == SaveStatus::Saving {
            return;
        }
        status.set(SaveStatus::Saving);
        let notes = notes.clone();
        let value = text();
        spawn(async move {
            match notes.save(lesson_id, &value).await {
                Ok(()) => {
                    error.set(None);
                    status.set(SaveStatus::Saved);
                }
                Err(err) => {
                    error.set(Some(err.into()));
                    status.set(SaveStatus::Dirty);
                }
            }
        });
    };

    let hint = match status() {
        SaveStatus::Clean | SaveStatus::Dirty => "",
        SaveStatus::Saving => "Saving...",
        SaveStatus::Saved => "Saved",
    };

    rsx! {
        section { class: "lesson-notes",
            h3 { "Your notes" }
            textarea {
                rows: "6",
                placeholder: "Only you can see these notes.",
                value: "{text}",
                oninput: move |evt| {
                    text.set(evt.value());
                    status.set(SaveStatus::Dirty);
                },
            }
            div { class: "notes-actions",
                button {
                    class: "btn btn-secondary",
                    disabled: matches!(status(), SaveStatus::Saving | SaveStatus::Clean),
                    onclick: on_save,
                    "Save notes"
                }
                span { class: "notes-status", "{hint}" }
            }
            if let Some(err) = error() {
                p { class: "field-error", "{err.message()}" }
            }
        }
    }
}
