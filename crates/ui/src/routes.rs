use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};

use crate::context::AppContext;
use crate::views::{
    AuthModal, AuthMode, AuthUi, CatalogView, ClassDetailsView, EditClassView, LessonView,
    NewClassView, NotFoundView, VerifyEmailView, YourClassesView,
};

#[derive(Clone, Routable, PartialEq, Debug)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", CatalogView)] Catalog {},
        #[route("/classes/:class_id", ClassDetailsView)] ClassDetails { class_id: u64 },
        #[route("/classes/:class_id/lessons/:index", LessonView)] Lesson { class_id: u64, index: usize },
        #[route("/your-classes", YourClassesView)] YourClasses {},
        #[route("/teach/new", NewClassView)] NewClass {},
        #[route("/teach/:class_id/edit", EditClassView)] EditClass { class_id: u64 },
        #[route("/verify-email?:token", VerifyEmailView)] VerifyEmail { token: String },
        #[route("/:..segments", NotFoundView)] NotFound { segments: Vec<String> },
}

#[component]
fn Layout() -> Element {
    let auth_ui = use_context::<AuthUi>();
    let open = (auth_ui.modal)().is_some();

    rsx! {
        div { class: "app",
            Navbar {}
            main { class: "content",
                Outlet::<Route> {}
            }
            if open {
                AuthModal {}
            }
        }
    }
}

#[component]
fn Navbar() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut auth_ui = use_context::<AuthUi>();
    let mut signing_out = use_signal(|| false);
    let user = (auth_ui.user)();

    let on_sign_out = move |_| {
        if signing_out() {
            return;
        }
        signing_out.set(true);
        let auth = ctx.auth();
        spawn(async move {
            if let Err(err) = auth.sign_out().await {
                tracing::warn!(%err, "sign-out failed");
            }
            auth_ui.signed_out();
            signing_out.set(false);
            navigator.push(Route::Catalog {});
        });
    };

    rsx! {
        nav { class: "navbar",
            h1 { class: "brand",
                Link { to: Route::Catalog {}, "Skillshare" }
            }
            ul {
                li { Link { to: Route::Catalog {}, "Browse" } }
                if user.is_some() {
                    li { Link { to: Route::YourClasses {}, "Your classes" } }
                    li { Link { to: Route::NewClass {}, "Teach" } }
                }
            }
            div { class: "navbar-account",
                match user {
                    Some(user) => rsx! {
                        span { class: "navbar-user", "{user.name}" }
                        button {
                            class: "btn btn-secondary",
                            disabled: signing_out(),
                            onclick: on_sign_out,
                            "Sign out"
                        }
                    },
                    None => rsx! {
                        button {
                            class: "btn btn-secondary",
                            onclick: move |_| auth_ui.open(AuthMode::SignIn),
                            "Sign in"
                        }
                        button {
                            class: "btn btn-primary",
                            onclick: move |_| auth_ui.open(AuthMode::SignUp),
                            "Join"
                        }
                    },
                }
            }
        }
    }
}
