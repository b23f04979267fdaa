//! Third-party sign-in through a provider popup.
//!
//! The popup ends at a backend page that posts `{ token }` back to the
//! opener. Only messages from the API origin are accepted. The flow settles
//! exactly once: success, popup closed, timeout or cancellation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use skill_core::model::{OAuthProvider, User};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use url::{Origin, Url};

use crate::auth_service::AuthService;
use crate::error::{ApiError, AuthServiceError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PopupError {
    #[error("the sign-in popup was blocked; allow popups for this app and try again")]
    Blocked,
    #[error("could not open the sign-in window: {0}")]
    Failed(String),
}

/// A message the popup posted to the opener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupMessage {
    pub origin: String,
    pub token: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupEvent {
    Message(PopupMessage),
    Closed,
}

/// An open popup. Dropping the handle tears down the message listener and
/// closes the window.
pub struct PopupHandle {
    events: mpsc::UnboundedReceiver<PopupEvent>,
    on_close: Option<Box<dyn FnOnce() + Send>>,
}

impl PopupHandle {
    #[must_use]
    pub fn new(events: mpsc::UnboundedReceiver<PopupEvent>) -> Self {
        Self {
            events,
            on_close: None,
        }
    }

    /// Run `close` when the flow settles.
    #[must_use]
    pub fn with_closer(mut self, close: impl FnOnce() + Send + 'static) -> Self {
        self.on_close = Some(Box::new(close));
        self
    }
}

impl Drop for PopupHandle {
    fn drop(&mut self) {
        self.events.close();
        if let Some(close) = self.on_close.take() {
            close();
        }
    }
}

/// Opens the provider page in a popup window.
///
/// Webview handles are not `Send`, so the flow runs on the UI executor.
#[async_trait(?Send)]
pub trait PopupLauncher {
    /// # Errors
    ///
    /// Returns `PopupError::Blocked` when the window could not be opened.
    async fn open(&self, url: &Url) -> Result<PopupHandle, PopupError>;
}

/// Cancels a running flow. Dropping the handle also cancels.
#[derive(Debug)]
pub struct OAuthCancel(oneshot::Sender<()>);

impl OAuthCancel {
    pub fn cancel(self) {
        let _ = self.0.send(());
    }
}

/// The receiving half handed to [`OAuthFlow::run`].
#[derive(Debug)]
pub struct CancelSignal(oneshot::Receiver<()>);

#[must_use]
pub fn cancel_pair() -> (OAuthCancel, CancelSignal) {
    let (tx, rx) = oneshot::channel();
    (OAuthCancel(tx), CancelSignal(rx))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OAuthOutcome {
    Success(User),
    /// The learner closed the popup before finishing.
    Closed,
    TimedOut,
    Cancelled,
    /// The provider reported an error, e.g. access denied.
    Denied(String),
}

enum Settled {
    Token(String),
    Done(OAuthOutcome),
}

#[derive(Clone)]
pub struct OAuthFlow {
    auth: Arc<AuthService>,
    api_base_url: Url,
    timeout: Duration,
}

impl OAuthFlow {
    #[must_use]
    pub fn new(auth: Arc<AuthService>, api_base_url: Url, timeout: Duration) -> Self {
        Self {
            auth,
            api_base_url,
            timeout,
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Authorization page for `provider`.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if the base URL cannot be joined.
    pub fn authorize_url(&self, provider: OAuthProvider) -> Result<Url, url::ParseError> {
        provider.authorize_url(&self.api_base_url)
    }

    /// Open the popup and wait for the token.
    ///
    /// # Errors
    ///
    /// Returns `AuthServiceError::Popup` if the popup could not be opened,
    /// or the API/session error if the received token cannot be exchanged
    /// for a profile.
    pub async fn run(
        &self,
        launcher: &dyn PopupLauncher,
        provider: OAuthProvider,
        cancel: CancelSignal,
    ) -> Result<OAuthOutcome, AuthServiceError> {
        let url = self.authorize_url(provider).map_err(ApiError::from)?;
        let popup = launcher.open(&url).await.inspect_err(|err| {
            tracing::warn!(%provider, %err, "failed to open sign-in popup");
        })?;

        let settled = self.await_popup(popup, cancel).await;
        match settled {
            Settled::Token(token) => {
                let user = self.auth.sign_in_with_token(token).await?;
                Ok(OAuthOutcome::Success(user))
            }
            Settled::Done(outcome) => {
                tracing::info!(%provider, ?outcome, "sign-in popup settled without a token");
                Ok(outcome)
            }
        }
    }

    /// Consumes the popup so the listener is gone before returning.
    async fn await_popup(&self, mut popup: PopupHandle, cancel: CancelSignal) -> Settled {
        let expected = self.api_base_url.origin();
        let deadline = tokio::time::sleep(self.timeout);
        tokio::pin!(deadline);
        let mut cancel = cancel.0;

        loop {
            tokio::select! {
                event = popup.events.recv() => match event {
                    Some(PopupEvent::Message(message)) => {
                        if !same_origin(&message.origin, &expected) {
                            tracing::debug!(origin = %message.origin, "ignoring message from foreign origin");
                            continue;
                        }
                        if let Some(error) = message.error {
                            return Settled::Done(OAuthOutcome::Denied(error));
                        }
                        if let Some(token) = message.token.filter(|t| !t.is_empty()) {
                            return Settled::Token(token);
                        }
                    }
                    Some(PopupEvent::Closed) | None => return Settled::Done(OAuthOutcome::Closed),
                },
                () = &mut deadline => return Settled::Done(OAuthOutcome::TimedOut),
                _ = &mut cancel => return Settled::Done(OAuthOutcome::Cancelled),
            }
        }
    }
}

fn same_origin(origin: &str, expected: &Origin) -> bool {
    Url::parse(origin).is_ok_and(|url| url.origin() == *expected)
}
