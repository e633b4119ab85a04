use crate::bank::DEFAULT_QUESTIONS_PER_RUN;
use crate::progress::DEFAULT_PROGRESS_FILE;
use crate::timer::TimeLimit;
use dotenvy::dotenv;
use log::LevelFilter;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Json,
    Sqlite,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bank_path: PathBuf,
    pub progress_path: PathBuf,
    pub store: StoreKind,
    pub db_path: Option<PathBuf>,
    pub time_limit: TimeLimit,
    pub questions_per_run: usize,
    pub seed: Option<u64>,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    /// Problems found while reading the environment, reported once logging is up.
    pub warnings: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bank_path: PathBuf::from("questions.json"),
            progress_path: PathBuf::from(DEFAULT_PROGRESS_FILE),
            store: StoreKind::Json,
            db_path: None,
            time_limit: TimeLimit::default(),
            questions_per_run: DEFAULT_QUESTIONS_PER_RUN,
            seed: None,
            log_file: PathBuf::from("quiz.log"),
            log_level: LevelFilter::Info,
            warnings: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("QUIZ_BANK_PATH") {
            config.bank_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("QUIZ_PROGRESS_PATH") {
            config.progress_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("QUIZ_DB_PATH") {
            config.db_path = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("QUIZ_LOG_FILE") {
            config.log_file = PathBuf::from(path);
        }

        if let Some(store) = lookup("QUIZ_STORE") {
            match store.trim().to_lowercase().as_str() {
                "json" => config.store = StoreKind::Json,
                "sqlite" => config.store = StoreKind::Sqlite,
                other => config
                    .warnings
                    .push(format!("QUIZ_STORE '{}' not recognised, using json", other)),
            }
        }

        if let Some(seconds) = parse_number::<u64>(&lookup, "QUIZ_TIME_LIMIT", &mut config.warnings) {
            config.time_limit = TimeLimit::from_configured(seconds);
        }
        if let Some(count) =
            parse_number::<usize>(&lookup, "QUIZ_QUESTIONS_PER_RUN", &mut config.warnings)
        {
            config.questions_per_run = count;
        }
        config.seed = parse_number::<u64>(&lookup, "QUIZ_SEED", &mut config.warnings);

        if let Some(level) = lookup("RUST_LOG") {
            match LevelFilter::from_str(level.trim()) {
                Ok(level) => config.log_level = level,
                Err(_) => config
                    .warnings
                    .push(format!("RUST_LOG '{}' not recognised, using info", level)),
            }
        }

        config
    }
}

fn parse_number<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    warnings: &mut Vec<String>,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warnings.push(format!("{} '{}' is not a valid number, using default", key, raw));
            None
        }
    }
}
