use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::ai::HttpCompletionClient;
use services::{
    AppServices, ChatService, Clock, DEFAULT_USER_EMAIL, ProgressService, RoadmapService,
    ServicesConfig, VoteService,
};
use tracing_subscriber::EnvFilter;
use tutor_core::model::User;
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://tutor.sqlite3";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidEmail { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidEmail { raw } => write!(f, "invalid --email value: {raw}"),
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
    fn user(&self) -> User {
        self.services.user().clone()
    }

    fn chat(&self) -> Arc<ChatService> {
        self.services.chat()
    }

    fn progress(&self) -> Arc<ProgressService> {
        self.services.progress()
    }

    fn votes(&self) -> Arc<VoteService> {
        self.services.votes()
    }

    fn roadmaps(&self) -> Arc<RoadmapService> {
        self.services.roadmaps()
    }
}

struct Args {
    db_url: String,
    config: ServicesConfig,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--email <address>] [--model <id>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --email {DEFAULT_USER_EMAIL}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TUTOR_DB_URL, TUTOR_USER_EMAIL, TUTOR_LOG");
    eprintln!("  TUTOR_AI_API_KEY (required for replies), TUTOR_AI_BASE_URL, TUTOR_AI_MODEL");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut db_url = std::env::var("TUTOR_DB_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| DEFAULT_DB_URL.to_string(), normalize_sqlite_url);
        let mut config = ServicesConfig::default();
        if let Some(email) = std::env::var("TUTOR_USER_EMAIL")
            .ok()
            .filter(|value| !value.trim().is_empty())
        {
            config.user_email = email;
        }

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--email" => {
                    let value = require_value(args, "--email")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidEmail { raw: value });
                    }
                    config.user_email = value;
                }
                "--model" => {
                    config.chat_model = Some(require_value(args, "--model")?);
                }
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Some(Self { db_url, config }))
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
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TUTOR_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    // A second init (e.g. a dev-reload) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let Some(parsed) = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?
    else {
        print_usage();
        return Ok(());
    };

    init_tracing();

    prepare_sqlite_file(&parsed.db_url)?;
    let ai = Arc::new(HttpCompletionClient::from_env());
    let services =
        AppServices::new_sqlite(&parsed.db_url, Clock::default_clock(), &parsed.config, ai)
            .await?;
    tracing::info!(db = %parsed.db_url, user = %parsed.config.user_email, "starting tutor");

    let context = build_app_context(Arc::new(DesktopApp { services }));

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Tutor")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
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

    let path = std::path::Path::new(path);
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

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
