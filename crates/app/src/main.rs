use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use quiz_core::model::{
    EvaluatorSettings, PersonaCatalog, QuizProfile, QuizSettings, QuizSettingsDraft,
};
use services::evaluator::settings_from_env;
use services::{AppServices, Clock, QuizLoopService};
use storage::repository::Storage;
use storage::seed::seed_questions;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidProfile { raw: String },
    InvalidMaxQuestions { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidProfile { raw } => {
                write!(f, "invalid --profile value: {raw} (expected standard or extended)")
            }
            ArgsError::InvalidMaxQuestions { raw } => {
                write!(f, "invalid --max-questions value: {raw}")
            }
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
    quiz_loop: Arc<QuizLoopService>,
    settings: QuizSettings,
    catalog: PersonaCatalog,
}

impl UiApp for DesktopApp {
    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    fn settings(&self) -> QuizSettings {
        self.settings.clone()
    }

    fn catalog(&self) -> PersonaCatalog {
        self.catalog.clone()
    }
}

struct Args {
    db_url: String,
    profile: QuizProfile,
    max_questions: Option<u32>,
    tsv: Option<PathBuf>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui   [--db <sqlite_url>] [--profile <name>] [--max-questions <n>]");
    eprintln!("  cargo run -p app -- seed [--db <sqlite_url>] [--tsv <path>]");
    eprintln!();
    eprintln!("Defaults for ui:");
    eprintln!("  --db sqlite://quiz.sqlite3");
    eprintln!("  --profile standard   (15 questions, one persona)");
    eprintln!("            extended   (20 questions, several personas)");
    eprintln!();
    eprintln!("seed replaces the question table with --tsv (columns 質問, 選択肢A, 選択肢B, 選択肢C)");
    eprintln!("or with the built-in sample questions.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_PROFILE, QUIZ_MAX_QUESTIONS, QUIZ_SEED_TSV");
    eprintln!("  QUIZ_AI_API_KEY, QUIZ_AI_BASE_URL, QUIZ_AI_MODEL");
    eprintln!("  RUST_LOG (default: info)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Seed,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "seed" => Some(Self::Seed),
            _ => None,
        }
    }
}

impl Args {
    fn parse(cmd: Command, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://quiz.sqlite3".into(), normalize_sqlite_url);
        let mut profile = match std::env::var("QUIZ_PROFILE") {
            Ok(raw) => parse_profile(raw)?,
            Err(_) => QuizProfile::default(),
        };
        let mut max_questions = match std::env::var("QUIZ_MAX_QUESTIONS") {
            Ok(raw) => Some(parse_max_questions(raw)?),
            Err(_) => None,
        };
        let mut tsv = std::env::var("QUIZ_SEED_TSV").ok().map(PathBuf::from);

        while let Some(arg) = args.next() {
            match (cmd, arg.as_str()) {
                (_, "--db") => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                (Command::Ui, "--profile") => {
                    profile = parse_profile(require_value(args, "--profile")?)?;
                }
                (Command::Ui, "--max-questions") => {
                    let value = require_value(args, "--max-questions")?;
                    max_questions = Some(parse_max_questions(value)?);
                }
                (Command::Seed, "--tsv") => {
                    tsv = Some(PathBuf::from(require_value(args, "--tsv")?));
                }
                (_, "--help" | "-h") => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            profile,
            max_questions,
            tsv,
        })
    }

    fn quiz_settings(&self) -> Result<QuizSettings, quiz_core::Error> {
        let mut draft = QuizSettingsDraft::from_profile(self.profile);
        if let Some(max) = self.max_questions {
            draft.max_questions = Some(max);
        }
        Ok(draft.validate()?)
    }

    fn evaluator_settings(&self) -> Result<EvaluatorSettings, quiz_core::Error> {
        Ok(settings_from_env()?)
    }
}

fn parse_profile(raw: String) -> Result<QuizProfile, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidProfile { raw })
}

fn parse_max_questions(raw: String) -> Result<u32, ArgsError> {
    match raw.trim().parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ArgsError::InvalidMaxQuestions { raw }),
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
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
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
    let parsed = Args::parse(cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&parsed.db_url)?;

    match cmd {
        Command::Ui => {
            let settings = parsed.quiz_settings()?;
            let evaluator_settings = parsed.evaluator_settings()?;
            if !evaluator_settings.is_enabled() {
                log::warn!("QUIZ_AI_API_KEY is not set; answers cannot be graded");
            }
            log::info!(
                "starting quiz: profile={}, max_questions={}, db={}",
                parsed.profile,
                settings.max_questions(),
                parsed.db_url
            );

            let services = AppServices::new_sqlite(
                &parsed.db_url,
                Clock::system(),
                settings,
                &evaluator_settings,
            )
            .await?;

            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                quiz_loop: services.quiz_loop(),
                settings: services.settings().clone(),
                catalog: services.catalog().clone(),
            });
            let context = build_app_context(&app);

            // Some tao setups default to always-on-top; keep a normal window.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("海外旅行の基礎知識Check")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Seed => {
            let storage = Storage::sqlite(&parsed.db_url).await?;
            let count = seed_questions(storage.questions.as_ref(), parsed.tsv.as_deref()).await?;
            println!("Seeded {count} questions into {}", parsed.db_url);
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

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run().await {
        log::error!("{err}");
        std::process::exit(2);
    }
}
