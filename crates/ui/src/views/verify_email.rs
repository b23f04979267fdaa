use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{AuthMode, AuthUi, ViewError, ViewState, view_state_from_resource};

/// Landing page of the emailed verification link.
#[component]
pub fn VerifyEmailView(token: String) -> Element {
    let ctx = use_context::<AppContext>();
    let mut auth_ui = use_context::<AuthUi>();
    let auth = ctx.auth();

    let resource = use_resource(move || {
        let auth = auth.clone();
        let token = token.clone();
        async move {
            if token.trim().is_empty() {
                return Err(ViewError::Message(
                    "This verification link is incomplete.".to_string(),
                ));
            }
            auth.verify_email(token.trim())
                .await
                .map_err(ViewError::from)
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page page--narrow",
            h2 { "Verify your email" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Verifying..." }
                },
                ViewState::Ready(message) => rsx! {
                    div { class: "banner banner--info", role: "status", "{message}" }
                    button {
                        class: "btn btn-primary",
                        onclick: move |_| auth_ui.open(AuthMode::SignIn),
                        "Sign in"
                    }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "banner banner--error", role: "alert", "{err.message()}" }
                    Link { to: Route::Catalog {}, "Back to classes" }
                },
            }
        }
    }
}
