use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use eduhub_core::model::{CourseId, UserId};
use services::{ApiConfig, Clock, CourseTestsService, HttpTestApi, TakeTestService, TestApi};
use storage::Storage;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingUserId,
    InvalidUserId { raw: String },
    InvalidCourseId { raw: String },
    InvalidDbUrl { raw: String },
    InvalidApiUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingUserId => write!(f, "--user-id (or EDUHUB_USER_ID) is required"),
            ArgsError::InvalidUserId { raw } => write!(f, "invalid --user-id value: {raw:?}"),
            ArgsError::InvalidCourseId { raw } => write!(f, "invalid --course-id value: {raw:?}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api-url value: {raw}"),
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
    user_id: UserId,
    course_id: Option<CourseId>,
    take_test: Arc<TakeTestService>,
    course_tests: Arc<CourseTestsService>,
}

impl UiApp for DesktopApp {
    fn user_id(&self) -> UserId {
        self.user_id.clone()
    }

    fn default_course_id(&self) -> Option<CourseId> {
        self.course_id.clone()
    }

    fn take_test(&self) -> Arc<TakeTestService> {
        Arc::clone(&self.take_test)
    }

    fn course_tests(&self) -> Arc<CourseTestsService> {
        Arc::clone(&self.course_tests)
    }
}

struct Args {
    db_url: String,
    api: ApiConfig,
    user_id: Option<UserId>,
    course_id: Option<CourseId>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui    --user-id <id> [--course-id <id>] [--api-url <url>] [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- reset [--db <sqlite_url>]   # forget the in-progress attempt and cached result");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api-url http://localhost:8080/api");
    eprintln!("  --db sqlite://eduhub.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  EDUHUB_API_URL, EDUHUB_API_TIMEOUT_SECS, EDUHUB_DB_URL, EDUHUB_USER_ID, EDUHUB_COURSE_ID");
    eprintln!("  RUST_LOG (default: info)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Reset,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("EDUHUB_DB_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| "sqlite://eduhub.sqlite3".into(), normalize_sqlite_url);
        let mut api = ApiConfig::from_env();
        let mut user_id = std::env::var("EDUHUB_USER_ID")
            .ok()
            .and_then(|value| value.parse::<UserId>().ok());
        let mut course_id = std::env::var("EDUHUB_COURSE_ID")
            .ok()
            .and_then(|value| value.parse::<CourseId>().ok());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--api-url" => {
                    let value = require_value(args, "--api-url")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidApiUrl { raw: value });
                    }
                    api.base_url = value;
                }
                "--user-id" => {
                    let value = require_value(args, "--user-id")?;
                    let parsed = value
                        .parse::<UserId>()
                        .map_err(|_| ArgsError::InvalidUserId { raw: value.clone() })?;
                    user_id = Some(parsed);
                }
                "--course-id" => {
                    let value = require_value(args, "--course-id")?;
                    let parsed = value
                        .parse::<CourseId>()
                        .map_err(|_| ArgsError::InvalidCourseId { raw: value.clone() })?;
                    course_id = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        // Catch a malformed base URL before the window opens.
        api.endpoint(&[])
            .map_err(|_| ArgsError::InvalidApiUrl { raw: api.base_url.clone() })?;

        Ok(Self {
            db_url,
            api,
            user_id,
            course_id,
        })
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

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand means launching the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup; the services only see the `LocalStore` trait.
    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;
    tracing::info!(db = %parsed.db_url, "local store ready");

    let clock = Clock::system();
    let api: Arc<dyn TestApi> = Arc::new(HttpTestApi::new(parsed.api.clone())?);
    let take_test = Arc::new(TakeTestService::new(
        clock,
        Arc::clone(&api),
        Arc::clone(&storage.local),
    ));

    match cmd {
        Command::Ui => {
            let user_id = parsed.user_id.ok_or(ArgsError::MissingUserId)?;
            tracing::info!(api = %parsed.api.base_url, user = %user_id, "starting EduHub");

            let course_tests = Arc::new(CourseTestsService::new(api, Arc::clone(&storage.local)));
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                user_id,
                course_id: parsed.course_id,
                take_test,
                course_tests,
            });
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("EduHub")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Reset => {
            take_test.discard_local_state().await?;
            tracing::info!("cleared mirrored attempt and cached result");
            Ok(())
        }
    }
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

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        tracing::error!(error = %err, "eduhub exited with an error");
        eprintln!("{err}");
        std::process::exit(2);
    }
}
