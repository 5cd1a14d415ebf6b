// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::time::Duration;
use system_context::{SystemContext, TerminationSignal};
use tokio::sync::mpsc;
use tokio::time::timeout;

#[tokio::test]
async fn system_context_callback_is_called() -> anyhow::Result<()> {
    let (callback_tx, mut callback_rx) = mpsc::channel(1);

    let _ctx = SystemContext::builder(SystemContext::new())
        .with_callback(move |_: &SystemContext, signal: TerminationSignal| {
            let _ = callback_tx.try_send(signal.to_string());
        })
        .build()?;

    kill(Pid::this(), Signal::SIGTERM)?;

    let received = timeout(Duration::from_secs(3), callback_rx.recv()).await?;
    assert_eq!(received.as_deref(), Some("SIGTERM"));
    Ok(())
}
