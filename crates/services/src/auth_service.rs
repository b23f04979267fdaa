use std::sync::Arc;

use skill_core::model::User;
use skill_core::validation::{SignInForm, SignUpForm};

use crate::api::AuthApi;
use crate::error::AuthServiceError;
use crate::session::SessionContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    SignedIn(User),
    /// Account created; the server mailed a verification link.
    VerificationPending { message: String },
}

/// Sign-in, sign-up and email verification.
#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn AuthApi>,
    session: SessionContext,
}

impl AuthService {
    #[must_use]
    pub fn new(api: Arc<dyn AuthApi>, session: SessionContext) -> Self {
        Self { api, session }
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// # Errors
    ///
    /// Returns `AuthServiceError::Invalid` before any request if a field is
    /// empty, otherwise the API or session error.
    pub async fn sign_in(&self, form: &SignInForm) -> Result<User, AuthServiceError> {
        let credentials = form.validate().map_err(AuthServiceError::Invalid)?;
        let response = self.api.login(&credentials).await.inspect_err(|err| {
            tracing::warn!(%err, "sign-in rejected");
        })?;
        let token = response.token.ok_or(AuthServiceError::MissingToken)?;
        let user = self.start_session(token, response.user).await?;
        tracing::info!(user_id = %user.id, "signed in");
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns `AuthServiceError::Invalid` before any request if the form is
    /// invalid (including a weak password), otherwise the API or session
    /// error.
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<SignUpOutcome, AuthServiceError> {
        let registration = form.validate().map_err(AuthServiceError::Invalid)?;
        let response = self.api.register(&registration).await.inspect_err(|err| {
            tracing::warn!(%err, "registration rejected");
        })?;
        let Some(token) = response.token else {
            tracing::info!("registered, email verification pending");
            let message = response
                .message
                .unwrap_or_else(|| "Check your inbox to verify your email address.".to_string());
            return Ok(SignUpOutcome::VerificationPending { message });
        };
        let user = self.start_session(token, response.user).await?;
        tracing::info!(user_id = %user.id, "registered and signed in");
        Ok(SignUpOutcome::SignedIn(user))
    }

    /// Exchange a token received out of band (OAuth redirect) for a session.
    ///
    /// # Errors
    ///
    /// Returns the API error if the profile cannot be fetched; the session
    /// is torn down in that case.
    pub async fn sign_in_with_token(&self, token: String) -> Result<User, AuthServiceError> {
        let user = self.start_session(token, None).await?;
        tracing::info!(user_id = %user.id, "signed in with provider");
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns `AuthServiceError::Api` if the token is invalid or expired.
    pub async fn verify_email(&self, token: &str) -> Result<String, AuthServiceError> {
        let message = self.api.verify_email(token).await?;
        tracing::info!("email verified");
        Ok(message)
    }

    /// # Errors
    ///
    /// Returns `AuthServiceError::Session` if the stored session cannot be
    /// removed.
    pub async fn sign_out(&self) -> Result<(), AuthServiceError> {
        self.session.teardown().await?;
        tracing::info!("signed out");
        Ok(())
    }

    /// Persist the token, then fetch the profile if the response lacks one.
    async fn start_session(
        &self,
        token: String,
        user: Option<User>,
    ) -> Result<User, AuthServiceError> {
        if let Some(user) = user {
            self.session.establish(token, Some(user.clone())).await?;
            return Ok(user);
        }
        self.session.establish(token, None).await?;
        match self.api.current_user().await {
            Ok(user) => {
                self.session.set_user(user.clone()).await?;
                Ok(user)
            }
            Err(err) => {
                tracing::warn!(%err, "failed to fetch profile, discarding session");
                self.session.teardown().await?;
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryAuthApi;
    use crate::error::ApiError;
    use skill_core::model::UserId;
    use skill_core::time::fixed_clock;
    use skill_core::validation::FormField;
    use storage::repository::InMemoryRepository;

    fn fixture() -> (InMemoryAuthApi, AuthService) {
        let session = SessionContext::new(fixed_clock(), Arc::new(InMemoryRepository::new()));
        let api = InMemoryAuthApi::new(session.clone());
        api.insert_account(
            User {
                id: UserId::new(1),
                name: "Ada".into(),
                email: "ada@example.com".into(),
                avatar_url: None,
                email_verified: true,
            },
            "Str0ng!pass",
        );
        let service = AuthService::new(Arc::new(api.clone()), session);
        (api, service)
    }

    fn sign_up_form(email: &str) -> SignUpForm {
        SignUpForm {
            name: "Linus".into(),
            email: email.into(),
            password: "Penguin#42".into(),
            confirm_password: "Penguin#42".into(),
        }
    }

    #[tokio::test]
    async fn sign_in_establishes_session() {
        let (_, service) = fixture();
        let form = SignInForm {
            email: "ada@example.com".into(),
            password: "Str0ng!pass".into(),
        };
        let user = service.sign_in(&form).await.unwrap();
        assert_eq!(user.id, UserId::new(1));
        assert!(service.session().is_authenticated());
        assert_eq!(service.session().current_user(), Some(user));
    }

    #[tokio::test]
    async fn empty_sign_in_never_calls_the_api() {
        let (_, service) = fixture();
        let err = service.sign_in(&SignInForm::default()).await.unwrap_err();
        assert_eq!(err.field_errors().len(), 2);
        assert!(!service.session().is_authenticated());
    }

    #[tokio::test]
    async fn wrong_password_surfaces_server_message() {
        let (_, service) = fixture();
        let form = SignInForm {
            email: "ada@example.com".into(),
            password: "nope".into(),
        };
        let err = service.sign_in(&form).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");
        assert!(!service.session().is_authenticated());
    }

    #[tokio::test]
    async fn weak_password_blocks_sign_up() {
        let (_, service) = fixture();
        let mut form = sign_up_form("linus@example.com");
        form.password = "penguin".into();
        form.confirm_password = "penguin".into();
        let err = service.sign_up(&form).await.unwrap_err();
        let fields: Vec<_> = err.field_errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![FormField::Password]);
    }

    #[tokio::test]
    async fn sign_up_fetches_profile_when_response_omits_it() {
        let (_, service) = fixture();
        let outcome = service.sign_up(&sign_up_form("linus@example.com")).await.unwrap();
        let SignUpOutcome::SignedIn(user) = outcome else {
            panic!("expected a signed-in outcome");
        };
        assert_eq!(user.email, "linus@example.com");
        assert_eq!(service.session().current_user(), Some(user));
    }

    #[tokio::test]
    async fn pending_verification_then_verify() {
        let (api, service) = fixture();
        api.require_verification(true);
        let outcome = service.sign_up(&sign_up_form("grace@example.com")).await.unwrap();
        assert!(matches!(outcome, SignUpOutcome::VerificationPending { .. }));
        assert!(!service.session().is_authenticated());

        let token = api.verification_token("grace@example.com").unwrap();
        service.verify_email(&token).await.unwrap();
        let err = service.verify_email(&token).await.unwrap_err();
        assert!(matches!(
            err,
            AuthServiceError::Api(ApiError::Status { status: 400, .. })
        ));
    }

    #[tokio::test]
    async fn unknown_provider_token_discards_session() {
        let (_, service) = fixture();
        let err = service
            .sign_in_with_token("forged".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthServiceError::Api(ApiError::Unauthorized)));
        assert!(!service.session().is_authenticated());
    }

    #[tokio::test]
    async fn sign_out_clears_session() {
        let (api, service) = fixture();
        let token = api.issue_token_for("ada@example.com");
        service.sign_in_with_token(token).await.unwrap();
        service.sign_out().await.unwrap();
        assert!(!service.session().is_authenticated());
    }
}
