// Copyright 2022 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::SystemContextError;
use std::fmt::{self, Display, Formatter};

#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};

/// Process termination signals that trigger the cancellation of a [SystemContext](crate::SystemContext).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationSignal {
    /// `SIGINT`, i.e. ctrl-c
    Interrupt,

    /// `SIGTERM`
    Terminate,
}

impl TerminationSignal {
    pub const ALL: [TerminationSignal; 2] =
        [TerminationSignal::Interrupt, TerminationSignal::Terminate];

    /// Conventional POSIX number of the signal.
    pub const fn number(&self) -> i32 {
        match self {
            TerminationSignal::Interrupt => 2,
            TerminationSignal::Terminate => 15,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            TerminationSignal::Interrupt => "SIGINT",
            TerminationSignal::Terminate => "SIGTERM",
        }
    }

    #[cfg(unix)]
    pub fn kind(&self) -> SignalKind {
        match self {
            TerminationSignal::Interrupt => SignalKind::interrupt(),
            TerminationSignal::Terminate => SignalKind::terminate(),
        }
    }
}

impl Display for TerminationSignal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Process-wide subscription to the [termination signals](TerminationSignal).
///
/// The subscription is established as soon as the listener is registered rather than when it's
/// first polled, so a signal delivered before anyone calls [recv](Self::recv) is retained
/// by the runtime signal driver. Repeated deliveries of the same kind coalesce, so the
/// delivering side never blocks.
///
/// On non-unix platforms only the interrupt (ctrl-c) is observed.
#[derive(Debug)]
pub struct SignalListener {
    #[cfg(unix)]
    interrupt: Signal,

    #[cfg(unix)]
    terminate: Signal,

    #[cfg(windows)]
    interrupt: tokio::signal::windows::CtrlC,
}

impl SignalListener {
    /// Register interest in all termination signals.
    ///
    /// Must be called from within a tokio runtime.
    pub fn register() -> Result<Self, SystemContextError> {
        cfg_if::cfg_if! {
            if #[cfg(unix)] {
                Ok(SignalListener {
                    interrupt: Self::subscribe(TerminationSignal::Interrupt)?,
                    terminate: Self::subscribe(TerminationSignal::Terminate)?,
                })
            } else {
                let interrupt = tokio::signal::windows::ctrl_c().map_err(|source| {
                    SystemContextError::SignalRegistration {
                        signal: TerminationSignal::Interrupt,
                        source,
                    }
                })?;
                Ok(SignalListener { interrupt })
            }
        }
    }

    #[cfg(unix)]
    fn subscribe(termination_signal: TerminationSignal) -> Result<Signal, SystemContextError> {
        signal(termination_signal.kind()).map_err(|source| {
            SystemContextError::SignalRegistration {
                signal: termination_signal,
                source,
            }
        })
    }

    /// Wait for the next termination signal.
    ///
    /// Returns `None` if the underlying signal driver has shut down and no further signals
    /// could ever be received.
    pub async fn recv(&mut self) -> Option<TerminationSignal> {
        cfg_if::cfg_if! {
            if #[cfg(unix)] {
                tokio::select! {
                    Some(_) = self.interrupt.recv() => Some(TerminationSignal::Interrupt),
                    Some(_) = self.terminate.recv() => Some(TerminationSignal::Terminate),
                    else => None,
                }
            } else {
                self.interrupt.recv().await.map(|_| TerminationSignal::Interrupt)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn signal_names() {
        assert_eq!(TerminationSignal::Interrupt.to_string(), "SIGINT");
        assert_eq!(TerminationSignal::Terminate.to_string(), "SIGTERM");
    }

    #[test]
    fn signal_numbers() {
        assert_eq!(TerminationSignal::Interrupt.number(), 2);
        assert_eq!(TerminationSignal::Terminate.number(), 15);
    }

    #[cfg(unix)]
    #[test]
    fn signal_kinds_match_numbers() {
        for sig in TerminationSignal::ALL {
            assert_eq!(sig.kind().as_raw_value(), sig.number());
        }
    }

    #[tokio::test]
    async fn listener_waits_without_signal() -> anyhow::Result<()> {
        let mut listener = SignalListener::register()?;
        let res = tokio::time::timeout(Duration::from_millis(50), listener.recv()).await;
        assert!(res.is_err());
        Ok(())
    }
}
