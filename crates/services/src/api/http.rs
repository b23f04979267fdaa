use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use skill_core::model::{
    AuthResponse, Class, ClassId, Credentials, Lesson, LessonId, LessonProgressRecord,
    LessonRating, ProgressUpdate, Rating, Registration, User,
};
use skill_core::wizard::ClassSubmission;
use url::Url;

use super::{AuthApi, ClassApi, endpoints};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::SessionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    /// Attach the bearer token when signed in.
    Optional,
    /// Fail with `ApiError::NotSignedIn` when signed out.
    Required,
    None,
}

/// REST client for the skill-sharing backend.
///
/// The bearer token is read from the injected [`SessionContext`] for every
/// request, so sign-in and sign-out take effect immediately.
#[derive(Clone)]
pub struct HttpApi {
    base_url: Url,
    client: Client,
    session: SessionContext,
}

impl HttpApi {
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: SessionContext) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        tracing::debug!(base_url = %config.api_base_url, "creating HttpApi");
        Ok(Self {
            base_url: config.api_base_url.clone(),
            client,
            session,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    fn authorize(&self, req: RequestBuilder, auth: Auth) -> Result<RequestBuilder, ApiError> {
        match (auth, self.session.bearer_token()) {
            (Auth::None, _) | (Auth::Optional, None) => Ok(req),
            (Auth::Required, None) => Err(ApiError::NotSignedIn),
            (Auth::Optional | Auth::Required, Some(token)) => Ok(req.bearer_auth(token)),
        }
    }

    async fn send(&self, req: RequestBuilder, auth: Auth) -> Result<Response, ApiError> {
        let resp = self.authorize(req, auth)?.send().await?;
        check_status(resp).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        auth: Auth,
    ) -> Result<T, ApiError> {
        let body = self.send(req, auth).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, auth: Auth) -> Result<T, ApiError> {
        let url = self.url(path)?;
        tracing::debug!(%url, "GET");
        self.send_json(self.client.get(url), auth).await
    }

    async fn send_class(
        &self,
        req: RequestBuilder,
        submission: &ClassSubmission,
    ) -> Result<Class, ApiError> {
        let form = class_form(submission)?;
        self.send_json(req.multipart(form), Auth::Required).await
    }
}

/// Map non-success statuses onto `ApiError`, keeping the server's message.
async fn check_status(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == StatusCode::UNAUTHORIZED {
        tracing::warn!("request rejected as unauthorized");
        return Err(ApiError::Unauthorized);
    }
    let body = resp.text().await.unwrap_or_default();
    let message = server_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    tracing::warn!(status = status.as_u16(), %message, "request failed");
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn server_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .filter(|message| !message.trim().is_empty())
}

#[derive(Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: Option<String>,
}

/// `classData` as a JSON part plus the optional `thumbnail` file part.
fn class_form(submission: &ClassSubmission) -> Result<Form, ApiError> {
    let class_data = serde_json::to_string(&submission.class_data)?;
    let mut form = Form::new().part(
        "classData",
        Part::text(class_data).mime_str("application/json")?,
    );
    if let Some(upload) = &submission.thumbnail {
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)?;
        form = form.part("thumbnail", part);
    }
    Ok(form)
}

#[async_trait]
impl ClassApi for HttpApi {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn list_classes(&self) -> Result<Vec<Class>, ApiError> {
        self.get_json(endpoints::CLASSES, Auth::Optional).await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn get_class(&self, class_id: ClassId) -> Result<Class, ApiError> {
        self.get_json(&endpoints::class(class_id), Auth::Optional)
            .await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn list_lessons(&self, class_id: ClassId) -> Result<Vec<Lesson>, ApiError> {
        self.get_json(&endpoints::lessons(class_id), Auth::Optional)
            .await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn get_progress(
        &self,
        class_id: ClassId,
    ) -> Result<Vec<LessonProgressRecord>, ApiError> {
        self.get_json(&endpoints::progress(class_id), Auth::Required)
            .await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn update_lesson_progress(
        &self,
        class_id: ClassId,
        lesson_id: LessonId,
        update: &ProgressUpdate,
    ) -> Result<(), ApiError> {
        let url = self.url(&endpoints::lesson_progress(class_id, lesson_id))?;
        tracing::debug!(%url, completed = update.completed, "POST lesson progress");
        self.send(self.client.post(url).json(update), Auth::Required)
            .await?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn enroll(&self, class_id: ClassId) -> Result<(), ApiError> {
        let url = self.url(&endpoints::enroll(class_id))?;
        tracing::debug!(%url, "POST enroll");
        self.send(self.client.post(url), Auth::Required).await?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn list_enrolled(&self) -> Result<Vec<Class>, ApiError> {
        self.get_json(endpoints::ENROLLED_CLASSES, Auth::Required)
            .await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn rate_lesson(
        &self,
        class_id: ClassId,
        lesson_id: LessonId,
        rating: Rating,
    ) -> Result<(), ApiError> {
        let url = self.url(&endpoints::rate_lesson(class_id, lesson_id))?;
        tracing::debug!(%url, rating = rating.value(), "POST rating");
        let body = serde_json::json!({ "rating": rating });
        self.send(self.client.post(url).json(&body), Auth::Required)
            .await?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn lesson_rating(
        &self,
        class_id: ClassId,
        lesson_id: LessonId,
    ) -> Result<LessonRating, ApiError> {
        self.get_json(
            &endpoints::lesson_rating(class_id, lesson_id),
            Auth::Optional,
        )
        .await
    }

    #[tracing::instrument(level = "debug", skip(self, submission))]
    async fn create_class(&self, submission: &ClassSubmission) -> Result<Class, ApiError> {
        let url = self.url(endpoints::CLASSES)?;
        tracing::debug!(%url, "POST class");
        self.send_class(self.client.post(url), submission).await
    }

    #[tracing::instrument(level = "debug", skip(self, submission))]
    async fn update_class(
        &self,
        class_id: ClassId,
        submission: &ClassSubmission,
    ) -> Result<Class, ApiError> {
        let url = self.url(&endpoints::class(class_id))?;
        tracing::debug!(%url, "PUT class");
        self.send_class(self.client.put(url), submission).await
    }
}

#[async_trait]
impl AuthApi for HttpApi {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let url = self.url(endpoints::LOGIN)?;
        tracing::debug!(%url, "POST login");
        self.send_json(self.client.post(url).json(credentials), Auth::None)
            .await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        let url = self.url(endpoints::REGISTER)?;
        tracing::debug!(%url, "POST register");
        self.send_json(self.client.post(url).json(registration), Auth::None)
            .await
    }

    #[tracing::instrument(level = "debug", skip(self, token))]
    async fn verify_email(&self, token: &str) -> Result<String, ApiError> {
        let mut url = self.url(endpoints::VERIFY_EMAIL)?;
        url.query_pairs_mut().append_pair("token", token);
        tracing::debug!(path = url.path(), "GET verify email");
        let body: MessageBody = self.send_json(self.client.get(url), Auth::None).await?;
        Ok(body
            .message
            .unwrap_or_else(|| "Your email address has been verified.".to_string()))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn current_user(&self) -> Result<User, ApiError> {
        self.get_json(endpoints::CURRENT_USER, Auth::Required).await
    }
}
