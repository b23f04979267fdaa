mod notes;
mod player;
mod rating;
mod scripts;

use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use services::{ClassProgress, CompletionOutcome, CompletionTrigger};
use skill_core::model::ClassId;

use self::notes::NotesPanel;
use self::player::{PlayerPanel, WatchKind, WatchTick};
use self::rating::RatingPanel;
use crate::context::AppContext;
use crate::routes::Route;
use crate::views::class_details::LessonList;
use crate::views::{AuthUi, SignInPrompt, ViewError, ViewState, view_state_from_resource};
use crate::vm::{lesson_nav, map_lesson_rows};

/// Remounts the page per lesson so player state and in-flight work never
/// leak into the next lesson.
#[component]
pub fn LessonView(class_id: u64, index: usize) -> Element {
    rsx! {
        LessonPage { key: "{class_id}-{index}", class_id, index }
    }
}

#[component]
fn LessonPage(class_id: u64, index: usize) -> Element {
    let ctx = use_context::<AppContext>();
    let auth_ui = use_context::<AuthUi>();
    let class_id = ClassId::new(class_id);
    let service = ctx.progress();
    let mut progress = use_signal(|| None::<ClassProgress>);

    let loader = service.clone();
    let resource = use_resource(move || {
        let service = loader.clone();
        let _user = auth_ui.user.read().as_ref().map(|user| user.id);
        async move {
            let loaded = service.load(class_id).await.map_err(ViewError::from)?;
            service.open_lesson(&loaded, index).map_err(ViewError::from)?;
            progress.set(Some(loaded));
            Ok::<_, ViewError>(())
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page page--lesson",
            Link {
                class: "back-link",
                to: Route::ClassDetails { class_id: class_id.value() },
                "← Back to class"
            }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(()) => rsx! {
                    if progress.read().is_some() {
                        LessonBody { index, progress }
                    }
                },
                ViewState::Error(ViewError::SignInRequired) => rsx! {
                    SignInPrompt { message: "Sign in to watch this lesson." }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "banner banner--warning", role: "alert", "{err.message()}" }
                },
            }
        }
    }
}

/// Fold a request's result into whatever the page shows now. Responses may
/// land in any order; earlier completions are never overwritten.
fn merge_into(mut progress: Signal<Option<ClassProgress>>, local: &ClassProgress) {
    if let Some(current) = progress.write().as_mut() {
        current.merge(local);
    }
}

#[component]
fn LessonBody(index: usize, mut progress: Signal<Option<ClassProgress>>) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let service = ctx.progress();
    let policy = service.policy();
    let celebration = ctx.config().celebration;

    let mut position = use_signal(|| 0.0_f64);
    let mut percent = use_signal(|| 0.0_f64);
    let mut completing = use_signal(|| false);
    let mut celebrating = use_signal(|| false);
    let mut banner = use_signal(|| None::<String>);

    let complete = {
        let service = service.clone();
        use_callback(move |trigger: CompletionTrigger| {
            if completing() {
                return;
            }
            let Some(mut local) = progress.read().clone() else {
                return;
            };
            completing.set(true);
            banner.set(None);
            let service = service.clone();
            spawn(async move {
                let result = service.complete_lesson(&mut local, index, trigger).await;
                completing.set(false);
                match result {
                    Ok(CompletionOutcome::Completed { .. }) => {
                        merge_into(progress, &local);
                        celebrating.set(true);
                        tokio::time::sleep(celebration).await;
                        celebrating.set(false);
                    }
                    Ok(CompletionOutcome::AlreadyCompleted) => {}
                    Err(err) => banner.set(Some(ViewError::from(err).message())),
                }
            });
        })
    };

    let report_pause = {
        let service = service.clone();
        use_callback(move |tick: WatchTick| {
            let Some(mut local) = progress.read().clone() else {
                return;
            };
            let service = service.clone();
            spawn(async move {
                match service
                    .report_watch(&mut local, index, tick.position, tick.percent)
                    .await
                {
                    Ok(()) => merge_into(progress, &local),
                    Err(err) => tracing::warn!(%err, "failed to save watch position"),
                }
            });
        })
    };

    let on_watch = move |tick: WatchTick| {
        position.set(tick.position);
        percent.set(tick.percent);
        match tick.kind {
            WatchKind::Progress => {}
            WatchKind::Paused => report_pause.call(tick),
            WatchKind::Ended => complete.call(CompletionTrigger::Ended {
                position: tick.position,
            }),
        }
    };

    let guard = progress.read();
    let Some(current) = guard.as_ref() else {
        return rsx! {};
    };
    let Some(lesson) = current.lesson(index).cloned() else {
        return rsx! {};
    };
    let class_id = current.class_id();
    let completed = current.state().is_completed(index);
    let resume_at = current.resume_position(index);
    let nav = lesson_nav(current, index);
    let rows = map_lesson_rows(current, Some(index));
    let lesson_count = current.lessons().len();
    let number = index + 1;
    drop(guard);

    let can_mark = !completed && !completing() && policy.is_eligible(percent());
    let threshold = policy.threshold_percent();

    rsx! {
        div { class: "lesson-layout",
            div { class: "lesson-main",
                h2 { "{lesson.title}" }
                p { class: "lesson-position", "Lesson {number} of {lesson_count}" }

                PlayerPanel { video_url: lesson.video_url.clone(), resume_at, on_watch }

                if celebrating() {
                    div { class: "celebration", role: "status",
                        strong { "Lesson complete!" }
                        if nav.next.is_some() {
                            span { " The next lesson is unlocked." }
                        }
                    }
                }
                if let Some(message) = banner() {
                    div { class: "banner banner--error", role: "alert", "{message}" }
                }

                div { class: "lesson-actions",
                    button {
                        class: "btn btn-secondary",
                        disabled: nav.previous.is_none(),
                        onclick: move |_| {
                            if let Some(prev) = nav.previous {
                                navigator.push(Route::Lesson { class_id: class_id.value(), index: prev });
                            }
                        },
                        "Previous"
                    }
                    if completed {
                        span { class: "badge badge--done", "Completed" }
                    } else {
                        button {
                            class: "btn btn-primary",
                            disabled: !can_mark,
                            title: "Watch at least {threshold}% to mark this lesson complete",
                            onclick: move |_| complete.call(CompletionTrigger::Manual {
                                position: position(),
                                percent: percent(),
                            }),
                            if completing() { "Saving..." } else { "Mark as complete" }
                        }
                    }
                    button {
                        class: "btn btn-secondary",
                        disabled: nav.next.is_none(),
                        title: if nav.next_locked { "Complete this lesson to unlock the next one" } else { "" },
                        onclick: move |_| {
                            if let Some(next) = nav.next {
                                navigator.push(Route::Lesson { class_id: class_id.value(), index: next });
                            }
                        },
                        "Next"
                    }
                }

                if !lesson.description.is_empty() {
                    p { class: "lesson-description", "{lesson.description}" }
                }
                RatingPanel { class_id, lesson_id: lesson.id }
                NotesPanel { lesson_id: lesson.id }
            }
            aside { class: "lesson-sidebar",
                LessonList { class_id, rows, current: Some(index) }
            }
        }
    }
}
