use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::model::user::User;

/// Body of `POST /api/auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /api/auth/register`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Login/register response. Registration may omit the token until the
/// email address is verified.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Third-party sign-in providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OAuthProvider {
    Google,
    Github,
    Facebook,
}

impl OAuthProvider {
    pub const ALL: [OAuthProvider; 3] = [Self::Google, Self::Github, Self::Facebook];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Github => "github",
            Self::Facebook => "facebook",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Github => "GitHub",
            Self::Facebook => "Facebook",
        }
    }

    /// Authorization redirect on the API host.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if the joined path cannot form a URL.
    pub fn authorize_url(self, api_base: &Url) -> Result<Url, url::ParseError> {
        api_base.join(&format!("/oauth2/authorization/{}", self.as_str()))
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials {
            email: "a@b.co".into(),
            password: "hunter2".into(),
        };
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn authorize_url_replaces_base_path() {
        let base = Url::parse("https://api.example.com/api/").unwrap();
        let url = OAuthProvider::Github.authorize_url(&base).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/oauth2/authorization/github"
        );
    }

    #[test]
    fn register_response_without_token_parses() {
        let json = r#"{"message": "Check your inbox"}"#;
        let response: AuthResponse = serde_json::from_str(json).unwrap();
        assert!(response.token.is_none());
        assert_eq!(response.message.as_deref(), Some("Check your inbox"));
    }
}
