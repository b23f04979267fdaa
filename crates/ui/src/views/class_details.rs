use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use services::ClassProgress;
use skill_core::model::{Class, ClassId};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{AuthMode, AuthUi, ViewError, ViewState, view_state_from_resource};
use crate::vm::{LessonRowVm, format_minutes, map_lesson_rows};

#[derive(Clone, Debug, PartialEq)]
struct DetailsData {
    class: Class,
    progress: Option<ClassProgress>,
    can_edit: bool,
}

#[component]
pub fn ClassDetailsView(class_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let auth_ui = use_context::<AuthUi>();
    let class_id = ClassId::new(class_id);
    let catalog = ctx.catalog();
    let progress_service = ctx.progress();

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        let progress_service = progress_service.clone();
        let user = auth_ui.user.read().clone();
        async move {
            let class = catalog.get_class(class_id).await.map_err(ViewError::from)?;
            let progress = if class.enrolled && user.is_some() {
                Some(progress_service.load(class_id).await.map_err(ViewError::from)?)
            } else {
                None
            };
            let can_edit = user.is_some_and(|user| {
                class
                    .contact_email
                    .as_deref()
                    .is_some_and(|email| email.eq_ignore_ascii_case(&user.email))
            });
            Ok::<_, ViewError>(DetailsData {
                class,
                progress,
                can_edit,
            })
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page page--class",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    ClassDetailsBody {
                        data,
                        on_enrolled: move |()| {
                            let mut resource = resource;
                            resource.restart();
                        },
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    Link { to: Route::Catalog {}, "Back to classes" }
                },
            }
        }
    }
}

#[component]
fn ClassDetailsBody(data: DetailsData, on_enrolled: EventHandler<()>) -> Element {
    let ctx = use_context::<AppContext>();
    let mut auth_ui = use_context::<AuthUi>();
    let mut enrolling = use_signal(|| false);
    let mut banner = use_signal(|| None::<String>);
    let class = data.class.clone();
    let class_id = class.id;

    let on_enroll = move |_| {
        if enrolling() {
            return;
        }
        if !auth_ui.is_signed_in() {
            auth_ui.open(AuthMode::SignIn);
            return;
        }
        enrolling.set(true);
        banner.set(None);
        let catalog = ctx.catalog();
        spawn(async move {
            match catalog.enroll(class_id).await {
                Ok(_) => on_enrolled.call(()),
                Err(err) => banner.set(Some(ViewError::from(err).message())),
            }
            enrolling.set(false);
        });
    };

    let rows = data
        .progress
        .as_ref()
        .map(|progress| map_lesson_rows(progress, None))
        .unwrap_or_default();
    let resume = data.progress.as_ref().map(|progress| {
        let state = progress.state();
        let label = if state.is_class_complete() {
            "Watch again"
        } else if state.completed_count() == 0 {
            "Start class"
        } else {
            "Continue"
        };
        (state.resume_index(), state.percent_complete(), label)
    });

    rsx! {
        header { class: "class-header",
            if let Some(url) = class.thumbnail_url.as_deref() {
                img { class: "class-hero", src: "{url}", alt: "" }
            }
            h2 { "{class.title}" }
            if let Some(name) = class.instructor_name.as_deref() {
                p { class: "class-instructor", "by {name}" }
            }
            div { class: "class-tags",
                if let Some(category) = class.category.as_deref() {
                    span { class: "tag", "{category}" }
                }
                if let Some(level) = class.level.as_deref() {
                    span { class: "tag", "{level}" }
                }
                if let Some(minutes) = class.duration_minutes {
                    span { class: "tag", "{format_minutes(minutes)}" }
                }
            }
            if data.can_edit {
                Link {
                    class: "btn btn-secondary",
                    to: Route::EditClass { class_id: class_id.value() },
                    "Edit class"
                }
            }
        }

        if let Some(message) = banner() {
            div { class: "banner banner--error", role: "alert", "{message}" }
        }

        match resume {
            Some((index, percent, label)) => rsx! {
                div { class: "class-progress",
                    progress { max: "100", value: "{percent}" }
                    span { "{percent}% complete" }
                    Link {
                        class: "btn btn-primary",
                        to: Route::Lesson { class_id: class_id.value(), index },
                        "{label}"
                    }
                }
            },
            None => rsx! {
                button {
                    class: "btn btn-primary",
                    disabled: enrolling(),
                    onclick: on_enroll,
                    if enrolling() { "Enrolling..." } else { "Enroll" }
                }
            },
        }

        section { class: "class-about",
            h3 { "About this class" }
            p { "{class.description}" }
        }

        if !class.requirements.is_empty() {
            section { class: "class-requirements",
                h3 { "Requirements" }
                ul {
                    for requirement in class.requirements.iter() {
                        li { "{requirement}" }
                    }
                }
            }
        }

        if !class.sections.is_empty() {
            section { class: "class-outline",
                h3 { "Outline" }
                ol {
                    for section in class.sections.iter() {
                        li {
                            strong { "{section.title}" }
                            if !section.description.is_empty() {
                                p { "{section.description}" }
                            }
                        }
                    }
                }
            }
        }

        if !rows.is_empty() {
            LessonList { class_id, rows, current: None }
        }
    }
}

/// Lesson list with lock/complete badges. Clicking a locked lesson shows the
/// gating warning instead of navigating.
#[component]
pub(crate) fn LessonList(class_id: ClassId, rows: Vec<LessonRowVm>, current: Option<usize>) -> Element {
    let warning = use_signal(|| None::<String>);

    rsx! {
        section { class: "lesson-list",
            h3 { "Lessons" }
            if let Some(message) = warning() {
                div { class: "banner banner--warning", role: "alert", "{message}" }
            }
            ol {
                for row in rows {
                    LessonRowItem { class_id, row, current, warning }
                }
            }
        }
    }
}

#[component]
fn LessonRowItem(
    class_id: ClassId,
    row: LessonRowVm,
    current: Option<usize>,
    mut warning: Signal<Option<String>>,
) -> Element {
    let navigator = use_navigator();
    let index = row.index;
    let navigable = row.status.is_navigable();

    rsx! {
        li {
            class: row.status.css_class(),
            onclick: move |_| {
                if !navigable {
                    warning.set(Some(ViewError::Locked.message()));
                    return;
                }
                warning.set(None);
                if current != Some(index) {
                    navigator.push(Route::Lesson {
                        class_id: class_id.value(),
                        index,
                    });
                }
            },
            span { class: "lesson-number", "{row.number}" }
            span { class: "lesson-title", "{row.title}" }
            if let Some(duration) = row.duration.as_deref() {
                span { class: "lesson-duration", "{duration}" }
            }
            if let Some(badge) = row.status.badge() {
                span { class: "badge", "{badge}" }
            }
        }
    }
}
