use std::sync::Arc;

use services::{
    AuthService, CatalogService, ClassAuthoringService, ClientConfig, NotesService, OAuthFlow,
    ProgressService, RatingService, SessionContext,
};

pub trait UiApp: Send + Sync {
    fn config(&self) -> ClientConfig;
    fn session(&self) -> SessionContext;

    fn catalog(&self) -> Arc<CatalogService>;
    fn progress(&self) -> Arc<ProgressService>;
    fn auth(&self) -> Arc<AuthService>;
    fn oauth(&self) -> Arc<OAuthFlow>;
    fn authoring(&self) -> Arc<ClassAuthoringService>;
    fn ratings(&self) -> Arc<RatingService>;
    fn notes(&self) -> Arc<NotesService>;
}

#[derive(Clone)]
pub struct AppContext {
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

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            config: app.config(),
            session: app.session(),
            catalog: app.catalog(),
            progress: app.progress(),
            auth: app.auth(),
            oauth: app.oauth(),
            authoring: app.authoring(),
            ratings: app.ratings(),
            notes: app.notes(),
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

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
