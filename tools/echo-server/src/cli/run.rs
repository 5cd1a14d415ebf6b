// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::cli::env::vars::*;
use echo_server::EchoServer;
use std::net::SocketAddr;
use std::time::Duration;
use system_context::{tracing_callback, SystemContext};
use tracing::info;

#[derive(clap::Args, Debug)]
pub(crate) struct Args {
    /// Socket address the server is going to listen on
    #[clap(
        long,
        env = ECHO_SERVER_LISTEN_ADDRESS_ARG,
        default_value = "127.0.0.1:9000"
    )]
    pub(crate) listen_address: SocketAddr,

    /// Time during which new connections are still accepted after receiving a termination signal,
    /// e.g. to let load balancers stop routing traffic to this instance
    #[clap(
        long,
        env = ECHO_SERVER_GRACE_DELAY_ARG,
        value_parser = humantime::parse_duration,
        default_value = "5s"
    )]
    pub(crate) grace_delay: Duration,

    /// Maximum time to wait for the open connections to close once the server stops accepting new ones
    #[clap(
        long,
        env = ECHO_SERVER_SHUTDOWN_TIMEOUT_ARG,
        value_parser = humantime::parse_duration,
        default_value = "10s"
    )]
    pub(crate) shutdown_timeout: Duration,
}

pub(crate) async fn execute(args: Args) -> anyhow::Result<()> {
    let context = SystemContext::builder(SystemContext::new())
        .with_delay(args.grace_delay)
        .with_callback(tracing_callback())
        .build()?;

    EchoServer::bind(args.listen_address, context, args.shutdown_timeout)
        .await?
        .run()
        .await;

    info!("echo server has shut down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn parses_durations() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from([
            "echo-server",
            "run",
            "--listen-address",
            "0.0.0.0:1789",
            "--grace-delay",
            "1m 30s",
            "--shutdown-timeout",
            "250ms",
        ])?;

        let Commands::Run(args) = cli.command;
        assert_eq!(args.listen_address, "0.0.0.0:1789".parse()?);
        assert_eq!(args.grace_delay, Duration::from_secs(90));
        assert_eq!(args.shutdown_timeout, Duration::from_millis(250));
        Ok(())
    }
}
