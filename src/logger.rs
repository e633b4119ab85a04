//! File-backed `log` backend. The terminal belongs to the quiz, so log
//! records only ever go to the log file.

use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

lazy_static::lazy_static! {
    static ref LOGGER: Mutex<Option<File>> = Mutex::new(None);
}

struct FileLogger;

static FILE_LOGGER: FileLogger = FileLogger;

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut guard) = LOGGER.lock()
            && let Some(file) = guard.as_mut()
        {
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let _ = writeln!(
                file,
                "[{}] {:<5} {}: {}",
                timestamp,
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut guard) = LOGGER.lock()
            && let Some(file) = guard.as_mut()
        {
            let _ = file.flush();
        }
    }
}

/// Opens `path` for appending and installs the logger. Safe to call more
/// than once; later calls only swap the file and level.
pub fn init(path: &Path, level: LevelFilter) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    if let Ok(mut guard) = LOGGER.lock() {
        *guard = Some(file);
    }
    // Already installed on a second call; that is fine.
    let _ = log::set_logger(&FILE_LOGGER);
    log::set_max_level(level);
    Ok(())
}
