use dioxus::prelude::*;
use services::{AuthServiceError, SignUpOutcome};
use skill_core::validation::{FieldError, FormField, SignInForm, SignUpForm};

use super::social::SocialButtons;
use super::{AuthMode, AuthUi, FieldMessage};
use crate::context::AppContext;
use crate::views::ViewError;
use crate::vm::strength_meter;

#[component]
pub fn AuthModal() -> Element {
    let mut auth_ui = use_context::<AuthUi>();
    let Some(mode) = (auth_ui.modal)() else {
        return rsx! {};
    };
    let (title, switch_label, switch_to) = match mode {
        AuthMode::SignIn => ("Sign in", "New here? Create an account", AuthMode::SignUp),
        AuthMode::SignUp => ("Create your account", "Already have an account? Sign in", AuthMode::SignIn),
    };

    rsx! {
        div { class: "modal-backdrop", onclick: move |_| auth_ui.close(),
            div {
                class: "modal auth-modal",
                role: "dialog",
                onclick: move |evt| evt.stop_propagation(),
                header { class: "modal-header",
                    h2 { "{title}" }
                    button { class: "btn btn-icon", onclick: move |_| auth_ui.close(), "×" }
                }
                match mode {
                    AuthMode::SignIn => rsx! { SignInPanel {} },
                    AuthMode::SignUp => rsx! { SignUpPanel {} },
                }
                div { class: "auth-divider", "or" }
                SocialButtons {}
                button {
                    class: "btn btn-link",
                    onclick: move |_| auth_ui.open(switch_to),
                    "{switch_label}"
                }
            }
        }
    }
}

/// Field errors stay inline; everything else becomes the banner.
fn split_auth_error(err: AuthServiceError) -> (Vec<FieldError>, Option<String>) {
    match err {
        AuthServiceError::Invalid(errors) => (errors, None),
        other => (Vec::new(), Some(ViewError::from(other).message())),
    }
}

#[component]
fn SignInPanel() -> Element {
    let ctx = use_context::<AppContext>();
    let mut auth_ui = use_context::<AuthUi>();
    let mut form = use_signal(SignInForm::default);
    let mut errors = use_signal(Vec::<FieldError>::new);
    let mut banner = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        submitting.set(true);
        let auth = ctx.auth();
        let snapshot = form();
        spawn(async move {
            let result = auth.sign_in(&snapshot).await;
            submitting.set(false);
            match result {
                Ok(user) => auth_ui.signed_in(user),
                Err(err) => {
                    let (fields, message) = split_auth_error(err);
                    errors.set(fields);
                    banner.set(message);
                }
            }
        });
    };

    rsx! {
        form { class: "auth-form", onsubmit: on_submit,
            if let Some(message) = banner() {
                div { class: "banner banner--error", role: "alert", "{message}" }
            }
            label { r#for: "sign-in-email", "Email" }
            input {
                id: "sign-in-email",
                r#type: "email",
                value: "{form.read().email}",
                oninput: move |evt| form.write().email = evt.value(),
            }
            FieldMessage { errors: errors(), field: FormField::Email }
            label { r#for: "sign-in-password", "Password" }
            input {
                id: "sign-in-password",
                r#type: "password",
                value: "{form.read().password}",
                oninput: move |evt| form.write().password = evt.value(),
            }
            FieldMessage { errors: errors(), field: FormField::Password }
            button {
                class: "btn btn-primary",
                r#type: "submit",
                disabled: submitting(),
                if submitting() { "Signing in..." } else { "Sign in" }
            }
        }
    }
}

#[component]
fn SignUpPanel() -> Element {
    let ctx = use_context::<AppContext>();
    let mut auth_ui = use_context::<AuthUi>();
    let mut form = use_signal(SignUpForm::default);
    let mut errors = use_signal(Vec::<FieldError>::new);
    let mut banner = use_signal(|| None::<String>);
    let mut notice = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    let meter = strength_meter(&form.read().password);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        submitting.set(true);
        banner.set(None);
        let auth = ctx.auth();
        let snapshot = form();
        spawn(async move {
            let result = auth.sign_up(&snapshot).await;
            submitting.set(false);
            match result {
                Ok(SignUpOutcome::SignedIn(user)) => auth_ui.signed_in(user),
                Ok(SignUpOutcome::VerificationPending { message }) => {
                    errors.set(Vec::new());
                    notice.set(Some(message));
                }
                Err(err) => {
                    let (fields, message) = split_auth_error(err);
                    errors.set(fields);
                    banner.set(message);
                }
            }
        });
    };

    if let Some(message) = notice() {
        return rsx! {
            div { class: "banner banner--info", role: "status", "{message}" }
        };
    }

    rsx! {
        form { class: "auth-form", onsubmit: on_submit,
            if let Some(message) = banner() {
                div { class: "banner banner--error", role: "alert", "{message}" }
            }
            label { r#for: "sign-up-name", "Name" }
            input {
                id: "sign-up-name",
                value: "{form.read().name}",
                oninput: move |evt| form.write().name = evt.value(),
            }
            FieldMessage { errors: errors(), field: FormField::Name }
            label { r#for: "sign-up-email", "Email" }
            input {
                id: "sign-up-email",
                r#type: "email",
                value: "{form.read().email}",
                oninput: move |evt| form.write().email = evt.value(),
            }
            FieldMessage { errors: errors(), field: FormField::Email }
            label { r#for: "sign-up-password", "Password" }
            input {
                id: "sign-up-password",
                r#type: "password",
                value: "{form.read().password}",
                oninput: move |evt| form.write().password = evt.value(),
            }
            if let Some(meter) = meter {
                div { class: meter.css_class(),
                    div { class: "strength-bar",
                        div { class: "strength-fill", style: "width: {meter.fill_percent()}%" }
                    }
                    span { class: "strength-label", "{meter.label}" }
                    ul { class: "strength-criteria",
                        for criterion in &meter.criteria {
                            li {
                                class: if criterion.met { "criterion criterion--met" } else { "criterion" },
                                "{criterion.label}"
                            }
                        }
                    }
                }
            }
            FieldMessage { errors: errors(), field: FormField::Password }
            label { r#for: "sign-up-confirm", "Confirm password" }
            input {
                id: "sign-up-confirm",
                r#type: "password",
                value: "{form.read().confirm_password}",
                oninput: move |evt| form.write().confirm_password = evt.value(),
            }
            FieldMessage { errors: errors(), field: FormField::ConfirmPassword }
            button {
                class: "btn btn-primary",
                r#type: "submit",
                disabled: submitting(),
                if submitting() { "Creating account..." } else { "Create account" }
            }
        }
    }
}
