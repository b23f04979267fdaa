use std::sync::Arc;

use skill_core::Clock;
use storage::repository::Storage;

use crate::api::{AuthApi, ClassApi, HttpApi};
use crate::auth_service::AuthService;
use crate::authoring_service::ClassAuthoringService;
use crate::catalog_service::CatalogService;
use crate::config::ClientConfig;
use crate::error::AppServicesError;
use crate::notes_service::NotesService;
use crate::oauth::OAuthFlow;
use crate::progress_service::ProgressService;
use crate::rating_service::RatingService;
use crate::session::SessionContext;

/// Assembles app-facing services around one session context.
#[derive(Clone)]
pub struct AppServices {
    config: ClientConfig,
    session: SessionContext,
    catalog: Arc<CatalogService>,
    progress: Arc<ProgressService>,
    auth: Arc<AuthService>,
    oauth: Arc<OAuthFlow>,
    authoring: Arc<ClassAuthoringService>,
    ratings: Arc<RatingService>,
    notes: Arc<NotesService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP API.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization, session restore
    /// or HTTP client setup fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        config: ClientConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let session = SessionContext::init(clock, Arc::clone(&storage.sessions)).await?;
        let http = Arc::new(HttpApi::new(&config, session.clone())?);
        let class_api: Arc<dyn ClassApi> = http.clone();
        let auth_api: Arc<dyn AuthApi> = http;
        Ok(Self::from_parts(
            clock, config, &storage, session, class_api, auth_api,
        ))
    }

    /// Wire services over the given backends.
    #[must_use]
    pub fn from_parts(
        clock: Clock,
        config: ClientConfig,
        storage: &Storage,
        session: SessionContext,
        class_api: Arc<dyn ClassApi>,
        auth_api: Arc<dyn AuthApi>,
    ) -> Self {
        let auth = Arc::new(AuthService::new(auth_api, session.clone()));
        let oauth = Arc::new(OAuthFlow::new(
            Arc::clone(&auth),
            config.api_base_url.clone(),
            config.oauth_timeout,
        ));
        Self {
            catalog: Arc::new(CatalogService::new(Arc::clone(&class_api))),
            progress: Arc::new(ProgressService::new(
                Arc::clone(&class_api),
                config.completion,
            )),
            authoring: Arc::new(ClassAuthoringService::new(Arc::clone(&class_api))),
            ratings: Arc::new(RatingService::new(class_api)),
            notes: Arc::new(NotesService::new(clock, Arc::clone(&storage.notes))),
            auth,
            oauth,
            session,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> SessionContext {
        self.session.clone()
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn oauth(&self) -> Arc<OAuthFlow> {
        Arc::clone(&self.oauth)
    }

    #[must_use]
    pub fn authoring(&self) -> Arc<ClassAuthoringService> {
        Arc::clone(&self.authoring)
    }

    #[must_use]
    pub fn ratings(&self) -> Arc<RatingService> {
        Arc::clone(&self.ratings)
    }

    #[must_use]
    pub fn notes(&self) -> Arc<NotesService> {
        Arc::clone(&self.notes)
    }
}
