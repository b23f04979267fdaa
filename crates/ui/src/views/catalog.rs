use std::collections::BTreeSet;

use dioxus::prelude::*;
use dioxus_router::Link;
use skill_core::model::ClassId;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{AuthMode, AuthUi, ViewError, ViewState, view_state_from_resource};
use crate::vm::{ClassCardVm, map_class_cards};

#[component]
pub fn CatalogView() -> Element {
    let ctx = use_context::<AppContext>();
    let auth_ui = use_context::<AuthUi>();
    let catalog = ctx.catalog();
    let mut enrolled = use_signal(BTreeSet::<ClassId>::new);
    let enrolling = use_signal(|| None::<ClassId>);
    let banner = use_signal(|| None::<String>);

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        // Reload when the signed-in user changes; `enrolled` flags are per user.
        let _user = auth_ui.user.read().as_ref().map(|user| user.id);
        async move {
            let classes = catalog.list_classes().await.map_err(ViewError::from)?;
            enrolled.set(classes.iter().filter(|c| c.enrolled).map(|c| c.id).collect());
            Ok::<_, ViewError>(map_class_cards(&classes))
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Browse classes" }
            if let Some(message) = banner() {
                div { class: "banner banner--error", role: "alert", "{message}" }
            }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(cards) => rsx! {
                    if cards.is_empty() {
                        p { "No classes have been published yet." }
                    } else {
                        ul { class: "class-grid",
                            for card in cards {
                                ClassCard {
                                    card,
                                    enrolled_ids: enrolled,
                                    enrolling,
                                    banner,
                                }
                            }
                        }
                    }
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
fn ClassCard(
    card: ClassCardVm,
    mut enrolled_ids: Signal<BTreeSet<ClassId>>,
    mut enrolling: Signal<Option<ClassId>>,
    mut banner: Signal<Option<String>>,
) -> Element {
    let ctx = use_context::<AppContext>();
    let mut auth_ui = use_context::<AuthUi>();
    let class_id = card.id;
    let enrolled = enrolled_ids.read().contains(&class_id);
    let busy = enrolling().is_some();

    let on_enroll = move |_| {
        if enrolling().is_some() {
            return;
        }
        if !auth_ui.is_signed_in() {
            auth_ui.open(AuthMode::SignIn);
            return;
        }
        enrolling.set(Some(class_id));
        banner.set(None);
        let catalog = ctx.catalog();
        spawn(async move {
            match catalog.enroll(class_id).await {
                Ok(_) => {
                    enrolled_ids.write().insert(class_id);
                }
                Err(err) => banner.set(Some(ViewError::from(err).message())),
            }
            enrolling.set(None);
        });
    };

    rsx! {
        li { class: "class-card",
            Link { to: Route::ClassDetails { class_id: class_id.value() },
                if let Some(url) = card.thumbnail_url.as_deref() {
                    img { class: "class-thumb", src: "{url}", alt: "" }
                } else {
                    div { class: "class-thumb class-thumb--empty" }
                }
                h3 { "{card.title}" }
            }
            p { class: "class-summary", "{card.summary}" }
            div { class: "class-tags",
                for tag in card.tags.iter() {
                    span { class: "tag", "{tag}" }
                }
                if let Some(rating) = card.rating_label.as_deref() {
                    span { class: "tag tag--rating", "{rating}" }
                }
            }
            if enrolled {
                Link {
                    class: "btn btn-secondary",
                    to: Route::ClassDetails { class_id: class_id.value() },
                    "Enrolled · Open"
                }
            } else {
                button {
                    class: "btn btn-primary",
                    disabled: busy,
                    onclick: on_enroll,
                    if enrolling() == Some(class_id) { "Enrolling..." } else { "Enroll" }
                }
            }
        }
    }
}
