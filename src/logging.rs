use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "speech-coach.log";

/// Keeps the background file writer alive; drop it last.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// Daily-rolling log file location, present only when file logging is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLogSettings {
    pub dir: PathBuf,
}

impl FileLogSettings {
    pub fn from_env() -> Option<Self> {
        let enabled = std::env::var("ENABLE_FILE_LOGS")
            .map(|v| is_truthy(&v))
            .unwrap_or(false);
        if !enabled {
            return None;
        }

        let dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string());
        Some(Self { dir: dir.into() })
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

pub fn init_tracing(log_level: &str) -> Option<FileLogGuard> {
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(true);

    if let Some(settings) = FileLogSettings::from_env() {
        match std::fs::create_dir_all(&settings.dir) {
            Ok(()) => {
                let appender =
                    RollingFileAppender::new(Rotation::DAILY, &settings.dir, LOG_FILE_PREFIX);
                let (file_writer, guard) = tracing_appender::non_blocking(appender);
                let file_layer = fmt::layer()
                    .with_writer(file_writer)
                    .with_ansi(false)
                    .with_target(true);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(stdout_layer)
                    .with(file_layer)
                    .init();

                return Some(FileLogGuard { _guard: guard });
            }
            Err(err) => {
                eprintln!("failed to create log directory {}: {err}", settings.dir.display());
            }
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .init();

    None
}
