use dioxus::document::eval;
use dioxus::prelude::*;
use serde::Deserialize;
use skill_core::validation::FormField;
use skill_core::wizard::{ClassWizard, ImageUpload, SectionDraft};

use super::scripts::{THUMBNAIL_INPUT_ID, thumbnail_bridge_script};
use crate::views::FieldMessage;

pub(super) const CATEGORIES: [&str; 8] = [
    "Art & Design",
    "Cooking",
    "Crafts",
    "Music",
    "Photography",
    "Technology",
    "Wellness",
    "Other",
];

pub(super) const LEVELS: [&str; 4] = ["Beginner", "Intermediate", "Advanced", "All levels"];

#[component]
pub(super) fn BasicInfoStep(wizard: Signal<ClassWizard>) -> Element {
    let mut wizard = wizard;
    let draft = wizard.read().draft().clone();
    let errors = wizard.read().errors().to_vec();

    rsx! {
        fieldset { class: "wizard-step",
            label { r#for: "class-title", "Title" }
            input {
                id: "class-title",
                value: "{draft.title}",
                oninput: move |evt| wizard.write().draft_mut().title = evt.value(),
            }
            FieldMessage { errors: errors.clone(), field: FormField::Title }

            label { r#for: "class-description", "Description" }
            textarea {
                id: "class-description",
                rows: "5",
                value: "{draft.description}",
                oninput: move |evt| wizard.write().draft_mut().description = evt.value(),
            }
            FieldMessage { errors: errors.clone(), field: FormField::Description }

            label { r#for: "class-category", "Category" }
            select {
                id: "class-category",
                value: "{draft.category}",
                onchange: move |evt| wizard.write().draft_mut().category = evt.value(),
                option { value: "", "Choose a category" }
                for category in CATEGORIES {
                    option { value: category, selected: draft.category == category, "{category}" }
                }
            }
            FieldMessage { errors: errors.clone(), field: FormField::Category }

            label { r#for: "class-level", "Level" }
            select {
                id: "class-level",
                value: "{draft.level}",
                onchange: move |evt| wizard.write().draft_mut().level = evt.value(),
                option { value: "", "Choose a level" }
                for level in LEVELS {
                    option { value: level, selected: draft.level == level, "{level}" }
                }
            }
            FieldMessage { errors: errors.clone(), field: FormField::Level }

            label { r#for: "class-duration", "Duration (minutes, optional)" }
            input {
                id: "class-duration",
                value: "{draft.duration_minutes}",
                oninput: move |evt| wizard.write().draft_mut().duration_minutes = evt.value(),
            }
            FieldMessage { errors: errors.clone(), field: FormField::Duration }

            label { r#for: "class-contact", "Contact email" }
            input {
                id: "class-contact",
                r#type: "email",
                value: "{draft.contact_email}",
                oninput: move |evt| wizard.write().draft_mut().contact_email = evt.value(),
            }
            FieldMessage { errors: errors.clone(), field: FormField::ContactEmail }
        }
    }
}

#[derive(Debug, Deserialize)]
struct PickedFile {
    name: String,
    #[serde(rename = "type")]
    content_type: String,
    bytes: Vec<u8>,
}

impl From<PickedFile> for ImageUpload {
    fn from(file: PickedFile) -> Self {
        Self {
            file_name: file.name,
            content_type: file.content_type,
            bytes: file.bytes,
        }
    }
}

#[component]
pub(super) fn ThumbnailStep(wizard: Signal<ClassWizard>) -> Element {
    let mut wizard = wizard;

    use_future(move || async move {
        let mut bridge = eval(&thumbnail_bridge_script(THUMBNAIL_INPUT_ID));
        loop {
            match bridge.recv::<PickedFile>().await {
                Ok(file) => {
                    tracing::debug!(name = %file.name, len = file.bytes.len(), "thumbnail picked");
                    wizard.write().draft_mut().thumbnail = Some(file.into());
                }
                Err(err) => {
                    tracing::debug!(?err, "thumbnail bridge stopped");
                    break;
                }
            }
        }
    });

    let draft = wizard.read().draft().clone();
    let errors = wizard.read().errors().to_vec();
    let picked = draft
        .thumbnail
        .as_ref()
        .map(|upload| format!("{} ({} KB)", upload.file_name, upload.bytes.len().div_ceil(1024)));

    rsx! {
        fieldset { class: "wizard-step",
            p { "Pick an image that represents your class." }
            if let Some(url) = draft.existing_thumbnail.as_deref() {
                if draft.thumbnail.is_none() {
                    img { class: "thumbnail-preview", src: "{url}", alt: "Current thumbnail" }
                }
            }
            input { id: THUMBNAIL_INPUT_ID, r#type: "file", accept: "image/*" }
            if let Some(label) = picked {
                p { class: "thumbnail-picked", "Selected: {label}" }
                button {
                    class: "btn btn-link",
                    onclick: move |_| wizard.write().draft_mut().thumbnail = None,
                    "Remove"
                }
            }
            FieldMessage { errors: errors.clone(), field: FormField::Thumbnail }
        }
    }
}

#[component]
pub(super) fn RequirementsStep(wizard: Signal<ClassWizard>) -> Element {
    let mut wizard = wizard;
    let requirements = wizard.read().draft().requirements.clone();
    let errors = wizard.read().errors().to_vec();

    rsx! {
        fieldset { class: "wizard-step",
            p { "What should learners bring or know before starting?" }
            ul { class: "editable-list",
                for (i, requirement) in requirements.into_iter().enumerate() {
                    li {
                        input {
                            value: "{requirement}",
                            placeholder: "e.g. A sketchbook",
                            oninput: move |evt| {
                                if let Some(slot) = wizard.write().draft_mut().requirements.get_mut(i) {
                                    *slot = evt.value();
                                }
                            },
                        }
                        button {
                            class: "btn btn-link",
                            onclick: move |_| {
                                let mut guard = wizard.write();
                                let list = &mut guard.draft_mut().requirements;
                                if i < list.len() {
                                    list.remove(i);
                                }
                            },
                            "Remove"
                        }
                        FieldMessage { errors: errors.clone(), field: FormField::Requirement(i) }
                    }
                }
            }
            button {
                class: "btn btn-secondary",
                onclick: move |_| wizard.write().draft_mut().requirements.push(String::new()),
                "Add requirement"
            }
            FieldMessage { errors: errors.clone(), field: FormField::Requirements }
        }
    }
}

#[component]
pub(super) fn SectionsStep(wizard: Signal<ClassWizard>) -> Element {
    let mut wizard = wizard;
    let sections = wizard.read().draft().sections.clone();
    let errors = wizard.read().errors().to_vec();

    rsx! {
        fieldset { class: "wizard-step",
            p { "Outline the sections learners will work through." }
            ol { class: "editable-list",
                for (i, section) in sections.into_iter().enumerate() {
                    li {
                        input {
                            value: "{section.title}",
                            placeholder: "Section title",
                            oninput: move |evt| {
                                if let Some(slot) = wizard.write().draft_mut().sections.get_mut(i) {
                                    slot.title = evt.value();
                                }
                            },
                        }
                        textarea {
                            rows: "2",
                            value: "{section.description}",
                            placeholder: "What happens in this section (optional)",
                            oninput: move |evt| {
                                if let Some(slot) = wizard.write().draft_mut().sections.get_mut(i) {
                                    slot.description = evt.value();
                                }
                            },
                        }
                        button {
                            class: "btn btn-link",
                            onclick: move |_| {
                                let mut guard = wizard.write();
                                let list = &mut guard.draft_mut().sections;
                                if i < list.len() {
                                    list.remove(i);
                                }
                            },
                            "Remove"
                        }
                        FieldMessage { errors: errors.clone(), field: FormField::SectionTitle(i) }
                    }
                }
            }
            button {
                class: "btn btn-secondary",
                onclick: move |_| wizard.write().draft_mut().sections.push(SectionDraft::default()),
                "Add section"
            }
            FieldMessage { errors: errors.clone(), field: FormField::Sections }
        }
    }
}
