use dioxus::prelude::*;
use services::{OAuthCancel, OAuthOutcome, cancel_pair};
use skill_core::model::OAuthProvider;

use super::AuthUi;
use crate::context::AppContext;
use crate::platform::WebviewPopupLauncher;
use crate::views::ViewError;

fn outcome_message(outcome: &OAuthOutcome) -> Option<String> {
    match outcome {
        OAuthOutcome::Success(_) | OAuthOutcome::Cancelled => None,
        OAuthOutcome::Closed => Some("The sign-in window was closed before finishing.".into()),
        OAuthOutcome::TimedOut => Some("Sign-in timed out. Please try again.".into()),
        OAuthOutcome::Denied(reason) => Some(format!("Sign-in was not completed: {reason}")),
    }
}

/// One button per provider. The running flow is cancelled when the modal
/// unmounts, which drops the stored [`OAuthCancel`].
#[component]
pub(super) fn SocialButtons() -> Element {
    let ctx = use_context::<AppContext>();
    let mut auth_ui = use_context::<AuthUi>();
    let mut pending = use_signal(|| None::<OAuthProvider>);
    let mut cancel = use_signal(|| None::<OAuthCancel>);
    let mut banner = use_signal(|| None::<String>);

    let start = use_callback(move |provider: OAuthProvider| {
        if pending().is_some() {
            return;
        }
        let (handle, signal) = cancel_pair();
        cancel.set(Some(handle));
        pending.set(Some(provider));
        banner.set(None);
        let oauth = ctx.oauth();
        spawn(async move {
            let result = oauth.run(&WebviewPopupLauncher, provider, signal).await;
            pending.set(None);
            cancel.set(None);
            match result {
                Ok(OAuthOutcome::Success(user)) => auth_ui.signed_in(user),
                Ok(outcome) => banner.set(outcome_message(&outcome)),
                Err(err) => banner.set(Some(ViewError::from(err).message())),
            }
        });
    });

    let on_cancel = move |_| {
        if let Some(handle) = cancel.write().take() {
            handle.cancel();
        }
    };

    let providers = OAuthProvider::ALL.map(|provider| {
        (provider, format!("btn btn-social btn-social--{}", provider.as_str()))
    });

    rsx! {
        div { class: "social-buttons",
            if let Some(message) = banner() {
                div { class: "banner banner--error", role: "alert", "{message}" }
            }
            for (provider, class) in providers {
                button {
                    key: "{provider}",
                    class: "{class}",
                    disabled: pending().is_some(),
                    onclick: move |_| start.call(provider),
                    if pending() == Some(provider) {
                        "Waiting for {provider}..."
                    } else {
                        "Continue with {provider}"
                    }
                }
            }
            if pending().is_some() {
                button { class: "btn btn-link", onclick: on_cancel, "Cancel" }
            }
        }
    }
}
