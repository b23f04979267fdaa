use std::fmt;
use std::path::Path;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{
    AppServices, AuthService, CatalogService, ClassAuthoringService, ClientConfig, Clock,
    NotesService, OAuthFlow, ProgressService, RatingService, SessionContext,
};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://skills.sqlite3";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidApiUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
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

struct Args {
    db_url: String,
    api_url: Option<String>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--api <base_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --api http://localhost:8080");
    eprintln!();
    eprintln!("Environment (also read from .env):");
    eprintln!("  SKILLS_DB_URL, SKILLS_API_BASE_URL, SKILLS_REQUEST_TIMEOUT_SECS,");
    eprintln!("  SKILLS_OAUTH_TIMEOUT_SECS, SKILLS_COMPLETION_THRESHOLD, SKILLS_CELEBRATION_SECS");
    eprintln!("  RUST_LOG");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("SKILLS_DB_URL")
            .ok()
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut api_url = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--api" => {
                    let value = require_value(args, "--api")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidApiUrl { raw: value });
                    }
                    api_url = Some(value);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, api_url })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise workspace crates log at info and the HTTP and
/// database stacks at warn.
fn init_tracing() {
    let fallback = "info,reqwest=warn,hyper=warn,hyper_util=warn,sqlx=warn";
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = [".env.local", ".env"].into_iter().find(|p| Path::new(p).exists()) {
        dotenvy::from_filename(path)?;
    }
    init_tracing();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting skills client");

    let mut iter = std::env::args().skip(1);
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let mut config = ClientConfig::from_env();
    if let Some(raw) = parsed.api_url.as_deref() {
        config = config
            .with_api_base_url(raw)
            .map_err(|_| ArgsError::InvalidApiUrl {
                raw: raw.to_string(),
            })?;
    }
    tracing::info!(api = %config.api_base_url, db = %parsed.db_url, "configuration loaded");

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url, Clock::default_clock(), config).await?;
    if let Some(user) = services.session().current_user() {
        tracing::info!(user_id = %user.id, "restored session");
    }

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    // Explicitly disable it so the app doesn't behave like a modal window.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Skillshare")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        tracing::error!(%err, "startup failed");
        eprintln!("{err}");
        std::process::exit(2);
    }
}
