use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{AuthUi, SignInPrompt, ViewError, ViewState, view_state_from_resource};
use crate::vm::{EnrolledCardVm, map_enrolled_cards};

#[component]
pub fn YourClassesView() -> Element {
    let ctx = use_context::<AppContext>();
    let auth_ui = use_context::<AuthUi>();
    let progress = ctx.progress();

    let resource = use_resource(move || {
        let progress = progress.clone();
        let signed_in = auth_ui.is_signed_in();
        async move {
            if !signed_in {
                return Err(ViewError::SignInRequired);
            }
            let overview = progress.enrolled_overview().await.map_err(ViewError::from)?;
            Ok::<_, ViewError>(map_enrolled_cards(&overview))
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Your classes" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(cards) => rsx! {
                    if cards.is_empty() {
                        p { "You haven't enrolled in any classes yet." }
                        Link { class: "btn btn-primary", to: Route::Catalog {}, "Browse classes" }
                    } else {
                        ul { class: "enrolled-list",
                            for card in cards {
                                EnrolledCard { card }
                            }
                        }
                    }
                },
                ViewState::Error(ViewError::SignInRequired) => rsx! {
                    SignInPrompt { message: "Sign in to see the classes you're taking." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
            }
        }
    }
}

#[component]
fn EnrolledCard(card: EnrolledCardVm) -> Element {
    rsx! {
        li { class: "enrolled-card",
            Link { to: Route::ClassDetails { class_id: card.id.value() },
                h3 { "{card.title}" }
            }
            div { class: "class-progress",
                progress { max: "100", value: "{card.percent}" }
                span { "{card.progress_label}" }
            }
            Link {
                class: "btn btn-primary",
                to: Route::Lesson { class_id: card.id.value(), index: card.resume_index },
                "{card.cta}"
            }
        }
    }
}
