// Copyright 2022-2023 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use std::io::IsTerminal;
use thiserror::Error;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::TryInitError;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to install the global tracing subscriber: {source}")]
    Init {
        #[from]
        source: TryInitError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Level used for all targets whenever `RUST_LOG` is not set.
    pub default_level: LevelFilter,

    /// Whether to display source code file paths and line numbers.
    pub source_locations: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            default_level: LevelFilter::INFO,
            source_locations: true,
        }
    }
}

// don't call init so that we could attach additional layers
pub fn build_tracing_logger(
    settings: LoggingSettings,
) -> impl tracing::Subscriber + for<'a> LookupSpan<'a> + Send + Sync + 'static {
    tracing_subscriber::registry()
        .with(default_tracing_fmt_layer(settings, std::io::stderr))
        .with(default_tracing_env_filter(settings))
}

pub fn default_tracing_env_filter(settings: LoggingSettings) -> EnvFilter {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_env_filter(directives.as_deref(), settings.default_level)
}

fn tracing_env_filter(directives: Option<&str>, default_level: LevelFilter) -> EnvFilter {
    match directives {
        Some(directives) => EnvFilter::builder().parse_lossy(directives),
        // if the env value was not found, use the configured level rather than `ERROR`
        None => EnvFilter::builder()
            .with_default_directive(default_level.into())
            .parse_lossy(""),
    }
}

pub fn default_tracing_fmt_layer<S, W>(
    settings: LoggingSettings,
    writer: W,
) -> impl tracing_subscriber::Layer<S> + Sync + Send + 'static
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'writer> MakeWriter<'writer> + Sync + Send + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(std::io::stderr().is_terminal())
        .compact()
        .with_file(settings.source_locations)
        .with_line_number(settings.source_locations)
        .with_target(false)
}

pub fn setup_tracing_logger(settings: LoggingSettings) -> Result<(), LoggingError> {
    use tracing_subscriber::util::SubscriberInitExt;
    build_tracing_logger(settings).try_init()?;
    Ok(())
}

pub fn banner(crate_name: &str, crate_version: &str) -> String {
    format!(
        r#"
     ({crate_name} - version {crate_version})

     send SIGINT or SIGTERM to begin a graceful shutdown
    "#
    )
}

pub fn maybe_print_banner(crate_name: &str, crate_version: &str) {
    if std::io::stdout().is_terminal() {
        println!("{}", banner(crate_name, crate_version))
    }
}
