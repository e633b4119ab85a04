use log::{error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::Write;
use std::process::ExitCode;
use timed_quiz::{
    Config, Console, Difficulty, InputPrompt, JsonFileStore, LineSource, ProgressStore, Quiz,
    SqliteStore, StdinLines, StoreKind, db, load_bank, logger,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = Config::from_env();
    if let Err(e) = logger::init(&config.log_file, config.log_level) {
        eprintln!("Logging disabled: cannot open {}: {}", config.log_file.display(), e);
    }
    for warning in &config.warnings {
        warn!("{}", warning);
    }
    info!("Starting timed-quiz with {:?}", config);

    let mut console = Console::stdout();
    let mut lines = match StdinLines::spawn() {
        Ok(lines) => lines,
        Err(e) => {
            error!("Cannot read stdin: {}", e);
            console.show_error(&format!("Cannot read input: {}", e));
            return ExitCode::FAILURE;
        }
    };

    let Some(difficulty) = choose_difficulty(&mut lines, &mut console).await else {
        info!("No difficulty chosen, exiting");
        return ExitCode::SUCCESS;
    };

    let store = open_store(&config);
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let bank_path = config.bank_path.clone();
    let mut quiz = Quiz::new(store, InputPrompt::new(lines), console, config.time_limit)
        .with_questions_per_run(config.questions_per_run);

    match quiz.run(difficulty, || load_bank(&bank_path), &mut rng).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Quiz aborted: {}", e);
            let mut console = Console::stdout();
            console.show_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn choose_difficulty<S, W>(lines: &mut S, console: &mut Console<W>) -> Option<Difficulty>
where
    S: LineSource,
    W: Write,
{
    console.show_difficulty_menu();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match line.parse::<Difficulty>() {
                Ok(difficulty) => return Some(difficulty),
                Err(_) => console.show_unknown_difficulty(&line),
            },
            Ok(None) => return None,
            Err(e) => {
                warn!("Reading difficulty failed: {}", e);
                return None;
            }
        }
    }
}

fn open_store(config: &Config) -> Box<dyn ProgressStore> {
    match config.store {
        StoreKind::Json => Box::new(JsonFileStore::new(&config.progress_path)),
        StoreKind::Sqlite => {
            let db_path = config.db_path.clone().unwrap_or_else(db::get_db_path);
            match SqliteStore::open(&db_path) {
                Ok(store) => Box::new(store),
                Err(e) => {
                    warn!(
                        "Cannot open {}: {}; falling back to {}",
                        db_path.display(),
                        e,
                        config.progress_path.display()
                    );
                    Box::new(JsonFileStore::new(&config.progress_path))
                }
            }
        }
    }
}
