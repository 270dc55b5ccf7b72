//! Diagnostics for hook processes.
//!
//! Records go to stderr and, when configured, to a log file with 1MB
//! rotation. Stdout is never touched: it belongs to the hook's JSON answer.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogConfig;

const MAX_LOG_SIZE: u64 = 1_048_576; // 1MB

/// Install the global subscriber. Safe to call more than once; only the
/// first call takes effect.
pub fn init(config: &LogConfig) {
    let _ = subscriber(config).try_init();
}

/// The subscriber [`init`] installs, for scoped use with
/// `tracing::subscriber::with_default`.
pub fn subscriber(config: &LogConfig) -> impl Subscriber + Send + Sync + 'static {
    let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|err| {
        eprintln!("Invalid log filter {:?}: {err}", config.filter);
        EnvFilter::new("info")
    });

    let stderr_layer = fmt::layer().with_writer(io::stderr).with_target(false);

    let file_layer = config.file.as_deref().and_then(|path| match open_log_file(path) {
        Ok(file) => Some(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false)),
        Err(err) => {
            eprintln!("Logging to stderr only, cannot open {}: {err}", path.display());
            None
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
}

/// Open `path` for appending, creating parent directories and rotating it
/// first when it has grown past the size limit.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    if needs_rotation(path) {
        rotate_log(path)?;
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// `<file>.old`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".old");
    PathBuf::from(name)
}

fn needs_rotation(path: &Path) -> bool {
    fs::metadata(path)
        .map(|metadata| metadata.len() >= MAX_LOG_SIZE)
        .unwrap_or(false)
}

/// Rename to `.old`, replacing any previous backup.
fn rotate_log(path: &Path) -> io::Result<()> {
    let old_path = backup_path(path);
    if old_path.exists() {
        fs::remove_file(&old_path)?;
    }
    fs::rename(path, &old_path)
}
