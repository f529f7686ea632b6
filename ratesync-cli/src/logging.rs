use log::{LevelFilter, Log, Metadata, Record};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

const LOG_CAPACITY: usize = 500;

pub type LogBuffer = Arc<Mutex<VecDeque<String>>>;

struct SharedLogger {
    level: LevelFilter,
    buffer: LogBuffer,
    // Off while the TUI owns the terminal.
    echo_stderr: AtomicBool,
}

impl Log for SharedLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format!("[{}] {}", record.level(), record.args());
        if self.echo_stderr.load(Ordering::Relaxed) {
            eprintln!("{}", line);
        }

        let mut buffer = match self.buffer.lock() {
            Ok(buffer) => buffer,
            Err(poisoned) => poisoned.into_inner(),
        };
        if buffer.len() >= LOG_CAPACITY {
            buffer.pop_front();
        }
        buffer.push_back(line);
    }

    fn flush(&self) {}
}

static LOG_BUFFER: OnceLock<LogBuffer> = OnceLock::new();
static LOGGER: OnceLock<SharedLogger> = OnceLock::new();

/// Install the process logger and return its line buffer.
///
/// Level comes from `RUST_LOG` (default `info`); records are echoed to
/// stderr unless `RATESYNC_LOG_STDERR=0`.
pub fn init() -> LogBuffer {
    let buffer = LOG_BUFFER
        .get_or_init(|| Arc::new(Mutex::new(VecDeque::with_capacity(LOG_CAPACITY))))
        .clone();

    let level = match std::env::var("RUST_LOG") {
        Ok(level) => parse_level(&level),
        Err(_) => LevelFilter::Info,
    };

    let echo_stderr = std::env::var("RATESYNC_LOG_STDERR")
        .map(|value| value != "0")
        .unwrap_or(true);

    let logger_ref = LOGGER.get_or_init(|| SharedLogger {
        level,
        buffer: buffer.clone(),
        echo_stderr: AtomicBool::new(echo_stderr),
    });
    if log::set_logger(logger_ref).is_ok() {
        log::set_max_level(level);
    }

    buffer
}

/// Stop or resume echoing records to stderr.
pub fn set_stderr_echo(enabled: bool) {
    if let Some(logger) = LOGGER.get() {
        logger.echo_stderr.store(enabled, Ordering::Relaxed);
    }
}

pub fn snapshot(buffer: &LogBuffer) -> Vec<String> {
    match buffer.lock() {
        Ok(buffer) => buffer.iter().cloned().collect(),
        Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
    }
}

fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}
