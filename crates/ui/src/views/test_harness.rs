use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{
    AppServices, AuthService, CatalogService, ClassAuthoringService, ClientConfig,
    InMemoryAuthApi, InMemoryClassApi, NotesService, OAuthFlow, ProgressService, RatingService,
    SessionContext,
};
use skill_core::model::User;
use skill_core::time::fixed_clock;
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::{
    CatalogView, ClassDetailsView, NotFoundView, VerifyEmailView, YourClassesView,
    use_auth_ui_provider,
};

pub const TEST_PASSWORD: &str = "Str0ng!pass";

struct TestApp {
    services: Arc<AppServices>,
}

impl UiApp for TestApp {
    fn config(&self) -> ClientConfig {
        self.services.config().clone()
    }

    fn session(&self) -> SessionContext {
        self.services.session()
    }

    fn catalog(&self) -> Arc<CatalogService> {
        self.services.catalog()
    }

    fn progress(&self) -> Arc<ProgressService> {
        self.services.progress()
    }

    fn auth(&self) -> Arc<AuthService> {
        self.services.auth()
    }

    fn oauth(&self) -> Arc<OAuthFlow> {
        self.services.oauth()
    }

    fn authoring(&self) -> Arc<ClassAuthoringService> {
        self.services.authoring()
    }

    fn ratings(&self) -> Arc<RatingService> {
        self.services.ratings()
    }

    fn notes(&self) -> Arc<NotesService> {
        self.services.notes()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Catalog,
    ClassDetails(u64),
    YourClasses,
    VerifyEmail(String),
    NotFound(Vec<String>),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    use_auth_ui_provider();
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Catalog => rsx! { CatalogView {} },
        ViewKind::ClassDetails(class_id) => rsx! { ClassDetailsView { class_id } },
        ViewKind::YourClasses => rsx! { YourClassesView {} },
        ViewKind::VerifyEmail(token) => rsx! { VerifyEmailView { token } },
        ViewKind::NotFound(segments) => rsx! { NotFoundView { segments } },
    }
}

/// In-memory backends plus the services wired over them. Seed data and sign
/// in before mounting a view so the view sees the session on first render.
pub struct TestBackend {
    pub classes: InMemoryClassApi,
    pub accounts: InMemoryAuthApi,
    pub services: Arc<AppServices>,
}

impl TestBackend {
    pub fn new() -> Self {
        let storage = Storage::in_memory();
        let session = SessionContext::new(fixed_clock(), Arc::clone(&storage.sessions));
        let classes = InMemoryClassApi::new();
        let accounts = InMemoryAuthApi::new(session.clone());
        let services = AppServices::from_parts(
            fixed_clock(),
            ClientConfig::default(),
            &storage,
            session,
            Arc::new(classes.clone()),
            Arc::new(accounts.clone()),
        );
        Self {
            classes,
            accounts,
            services: Arc::new(services),
        }
    }

    pub async fn sign_in(&self, user: User) -> User {
        self.accounts.insert_account(user.clone(), TEST_PASSWORD);
        let token = self.accounts.issue_token_for(&user.email);
        self.services
            .auth()
            .sign_in_with_token(token)
            .await
            .expect("sign in")
    }

    pub fn mount(&self, view: ViewKind) -> ViewHarness {
        let app = Arc::new(TestApp {
            services: Arc::clone(&self.services),
        });
        let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });
        ViewHarness { dom }
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild, then let resources settle across a few rounds of work.
    pub async fn settle(&mut self) -> String {
        self.rebuild();
        for _ in 0..4 {
            self.drive_async().await;
        }
        self.render()
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}
