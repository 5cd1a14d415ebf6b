// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use system_context::{SystemContext, TerminationSignal};
use tokio::sync::Notify;
use tokio::time::{timeout, Instant};

#[tokio::test]
async fn only_first_signal_matters() -> anyhow::Result<()> {
    let delay = Duration::from_millis(500);
    let invocations = Arc::new(AtomicUsize::new(0));
    let notified = Arc::new(Notify::new());

    let callback_invocations = invocations.clone();
    let callback_notified = notified.clone();
    let ctx = SystemContext::builder(SystemContext::new())
        .with_delay(delay)
        .with_callback(move |_: &SystemContext, _: TerminationSignal| {
            callback_invocations.fetch_add(1, Ordering::SeqCst);
            callback_notified.notify_one();
        })
        .build()?;

    let start = Instant::now();
    kill(Pid::this(), Signal::SIGTERM)?;
    timeout(Duration::from_secs(1), notified.notified()).await?;

    // further signals during the grace period are ignored
    kill(Pid::this(), Signal::SIGINT)?;
    kill(Pid::this(), Signal::SIGTERM)?;

    let res = timeout(Duration::from_millis(200), ctx.cancelled()).await;
    assert!(res.is_err());

    timeout(Duration::from_secs(2), ctx.cancelled()).await?;
    assert!(start.elapsed() >= delay);
    assert_eq!(ctx.cause(), Some(TerminationSignal::Terminate));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(invocations.load(Ordering::SeqCst), 1);
    Ok(())
}
