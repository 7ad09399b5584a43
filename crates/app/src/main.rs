use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{
    AppServices, Clock, FactsService, HistoryBackend, HistoryService, ServiceConfig,
    SessionHandle, Topic, WikiService,
};
use ui::{App, UiApp, build_app_context};
use wonder_core::SiteBase;
use wonder_core::model::{Category, CategoryId};

mod play;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidBackend { raw: String },
    UnknownCategory { raw: String },
    MissingTarget,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidBackend { raw } => write!(f, "invalid --backend value: {raw}"),
            ArgsError::UnknownCategory { raw } => write!(f, "unknown category: {raw}"),
            ArgsError::MissingTarget => write!(f, "play needs --category <id|name> or --nature"),
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
    fn site_base(&self) -> SiteBase {
        self.services.site_base().clone()
    }

    fn history(&self) -> Arc<HistoryService> {
        self.services.history()
    }

    fn facts(&self) -> Arc<FactsService> {
        self.services.facts()
    }

    fn wiki(&self) -> Arc<WikiService> {
        self.services.wiki()
    }

    fn start_session(&self, topic: Topic) -> SessionHandle {
        self.services.start(topic)
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui      [storage flags]");
    eprintln!("  cargo run -p app -- play    [storage flags] (--category <id|name> | --nature)");
    eprintln!("  cargo run -p app -- history [storage flags]");
    eprintln!();
    eprintln!("Storage flags:");
    eprintln!("  --db <sqlite_url>          (default sqlite://dev.sqlite3)");
    eprintln!("  --backend <sqlite|json|memory>");
    eprintln!("  --history-file <path>      (json backend, default quizHistory.json)");
    eprintln!();
    eprintln!("Environment (also read from .env):");
    eprintln!("  WONDER_DB_URL, WONDER_HISTORY_BACKEND, WONDER_HISTORY_FILE,");
    eprintln!("  WONDER_QUIZ_SECONDS, WONDER_NATURE_SECONDS, WONDER_NATURE_ROUNDS,");
    eprintln!("  WONDER_SPECIMENS_FILE, WONDER_SITE_BASE, WONDER_SITE_URL, WONDER_SITE_REPO,");
    eprintln!("  WONDER_FACTS_ENDPOINT, WONDER_TRIVIA_URL, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Play,
    History,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "play" => Some(Self::Play),
            "history" => Some(Self::History),
            _ => None,
        }
    }
}

struct Args {
    config: ServiceConfig,
    target: Option<Topic>,
}

impl Args {
    fn parse(
        cmd: Command,
        args: &mut impl Iterator<Item = String>,
        mut config: ServiceConfig,
    ) -> Result<Self, ArgsError> {
        let mut target = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    config.db_url = normalize_sqlite_url(value);
                }
                "--backend" => {
                    let value = require_value(args, "--backend")?;
                    config.history_backend = value
                        .parse::<HistoryBackend>()
                        .map_err(|_| ArgsError::InvalidBackend { raw: value.clone() })?;
                }
                "--history-file" => {
                    config.history_file = PathBuf::from(require_value(args, "--history-file")?);
                }
                "--category" if cmd == Command::Play => {
                    let value = require_value(args, "--category")?;
                    let category = resolve_category(&value)
                        .ok_or(ArgsError::UnknownCategory { raw: value })?;
                    target = Some(Topic::category(category));
                }
                "--nature" if cmd == Command::Play => target = Some(Topic::NatureLab),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if cmd == Command::Play && target.is_none() {
            return Err(ArgsError::MissingTarget);
        }
        Ok(Self { config, target })
    }
}

/// Numeric trivia id, or a case-insensitive name match that is unambiguous.
fn resolve_category(raw: &str) -> Option<&'static Category> {
    if let Ok(id) = raw.trim().parse::<u32>() {
        return Category::find(CategoryId::new(id));
    }
    match Category::search(raw).as_slice() {
        [only] => Some(*only),
        _ => None,
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") || raw.starts_with("sqlite:file:") {
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
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    // A second init (e.g. a host that already installed one) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching UI when no subcommand is provided.
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

    let config = ServiceConfig::from_env()?;
    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter, config).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Keep file preparation in the binary glue so core/services stay pure.
    if parsed.config.history_backend == HistoryBackend::Sqlite {
        prepare_sqlite_file(&parsed.config.db_url)?;
    }
    let services = AppServices::from_config(&parsed.config, Clock::system()).await?;
    tracing::info!(?cmd, "services ready");

    match (cmd, parsed.target) {
        (Command::Ui, _) => {
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
            let context = build_app_context(&app);

            // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Wonder Learning")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        (Command::Play, Some(topic)) => play::play(&services, topic).await,
        (Command::Play, None) => Err(ArgsError::MissingTarget.into()),
        (Command::History, _) => play::print_history(&services).await,
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" || db_url.starts_with("sqlite:file:") {
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
    let _ = dotenvy::dotenv();
    init_tracing();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
