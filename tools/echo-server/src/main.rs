// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::cli::Cli;
use bin_common::logging::{maybe_print_banner, setup_tracing_logger, LoggingSettings};
use clap::Parser;
use tracing::trace;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing_logger(LoggingSettings::default())?;
    let cli = Cli::parse();
    trace!("args: {cli:#?}");

    if !cli.no_banner {
        maybe_print_banner(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    }

    cli.execute().await
}
