mod scripts;
mod steps;

use dioxus::prelude::*;
use dioxus_router::use_navigator;
use skill_core::model::ClassId;
use skill_core::wizard::{ClassWizard, WizardStep};

use self::steps::{BasicInfoStep, RequirementsStep, SectionsStep, ThumbnailStep};
use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{AuthUi, SignInPrompt, ViewError, ViewState, view_state_from_resource};

#[component]
pub fn NewClassView() -> Element {
    let ctx = use_context::<AppContext>();
    let auth_ui = use_context::<AuthUi>();
    if !auth_ui.is_signed_in() {
        return rsx! {
            div { class: "page",
                SignInPrompt { message: "Sign in to create a class." }
            }
        };
    }
    let initial = ctx.authoring().new_wizard();
    rsx! {
        div { class: "page page--wizard",
            h2 { "Create a class" }
            WizardForm { initial }
        }
    }
}

#[component]
pub fn EditClassView(class_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let auth_ui = use_context::<AuthUi>();
    let authoring = ctx.authoring();
    let class_id = ClassId::new(class_id);

    let resource = use_resource(move || {
        let authoring = authoring.clone();
        let signed_in = auth_ui.is_signed_in();
        async move {
            if !signed_in {
                return Err(ViewError::SignInRequired);
            }
            authoring
                .load_for_edit(class_id)
                .await
                .map_err(ViewError::from)
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page page--wizard",
            h2 { "Edit class" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(initial) => rsx! {
                    WizardForm { initial }
                },
                ViewState::Error(ViewError::SignInRequired) => rsx! {
                    SignInPrompt { message: "Sign in to edit your class." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn WizardForm(initial: ClassWizard) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let authoring = ctx.authoring();
    let mut wizard = use_signal(move || initial);

    let step = wizard.read().step();
    let can_advance = wizard.read().can_advance();
    let submitting = wizard.read().is_submitting();
    let banner = wizard.read().banner().map(str::to_string);
    let submit_label = match (submitting, wizard.read().is_edit()) {
        (true, _) => "Saving...",
        (false, true) => "Save changes",
        (false, false) => "Publish class",
    };

    let labels: Vec<(WizardStep, String)> = WizardStep::ALL
        .into_iter()
        .map(|candidate| (candidate, format!("{}. {}", candidate.index() + 1, candidate.title())))
        .collect();

    let on_next = move |_| {
        if let Err(err) = wizard.write().next() {
            tracing::debug!(%err, "wizard step blocked");
        }
    };
    let on_back = move |_| {
        wizard.write().back();
    };
    let on_submit = move |_| {
        let submission = match wizard.write().begin_submit() {
            Ok(submission) => submission,
            Err(err) => {
                tracing::debug!(%err, "submission blocked");
                return;
            }
        };
        let authoring = authoring.clone();
        spawn(async move {
            let outcome = authoring
                .send(&submission)
                .await
                .map(|class| class.id)
                .map_err(|err| ViewError::from(err).message());
            wizard.write().finish_submit(outcome.clone());
            if let Ok(class_id) = outcome {
                navigator.push(Route::ClassDetails {
                    class_id: class_id.value(),
                });
            }
        });
    };

    rsx! {
        ol { class: "wizard-steps",
            for (candidate, label) in labels {
                li {
                    class: if candidate == step {
                        "wizard-step-label wizard-step-label--active"
                    } else if candidate.index() < step.index() {
                        "wizard-step-label wizard-step-label--done"
                    } else {
                        "wizard-step-label"
                    },
                    "{label}"
                }
            }
        }

        if let Some(message) = banner {
            div { class: "banner banner--error", role: "alert", "{message}" }
        }

        match step {
            WizardStep::BasicInfo => rsx! { BasicInfoStep { wizard } },
            WizardStep::Thumbnail => rsx! { ThumbnailStep { wizard } },
            WizardStep::Requirements => rsx! { RequirementsStep { wizard } },
            WizardStep::Sections => rsx! { SectionsStep { wizard } },
        }

        div { class: "wizard-actions",
            button {
                class: "btn btn-secondary",
                disabled: step == WizardStep::BasicInfo || submitting,
                onclick: on_back,
                "Back"
            }
            if step.is_last() {
                button {
                    class: "btn btn-primary",
                    disabled: submitting,
                    onclick: on_submit,
                    "{submit_label}"
                }
            } else {
                button {
                    class: "btn btn-primary",
                    disabled: !can_advance,
                    onclick: on_next,
                    "Next"
                }
            }
        }
    }
}
