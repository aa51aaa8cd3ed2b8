use std::{fs::OpenOptions, path::Path, sync::Mutex};

use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "airrace.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Logs to stderr. Used by the headless commands.
pub fn init_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

/// Logs to `<data_dir>/airrace.log`, since stderr would corrupt the TUI.
///
/// Logging stays off if the file cannot be opened.
pub fn init_file(data_dir: &Path) {
    let path = data_dir.join(LOG_FILE_NAME);
    let file = std::fs::create_dir_all(data_dir).and_then(|()| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
    });
    let Ok(file) = file else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    tracing::info!(path = %path.display(), "logging to file");
}
