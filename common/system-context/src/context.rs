// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::signal::TerminationSignal;
use crate::watcher::SystemContextBuilder;
use std::future::Future;
use std::sync::{Arc, OnceLock};
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture, WaitForCancellationFutureOwned};

/// A cloneable handle signalling that the work holding it should stop.
///
/// All clones share the same underlying cancellation state, while contexts obtained via
/// [child_context](Self::child_context) get cancelled whenever their parent is,
/// but not the other way around. Once cancelled, a context stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct SystemContext {
    token: CancellationToken,

    /// The termination signal that led to this context being cancelled, if any.
    cause: Arc<OnceLock<TerminationSignal>>,
}

impl From<CancellationToken> for SystemContext {
    fn from(token: CancellationToken) -> Self {
        SystemContext {
            token,
            cause: Default::default(),
        }
    }
}

impl SystemContext {
    /// Create a new root context that is never cancelled unless explicitly asked to.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a signal-gated context derived from the provided parent.
    pub fn builder(parent: SystemContext) -> SystemContextBuilder {
        SystemContextBuilder::new(parent)
    }

    /// Obtain a new context that is going to get cancelled alongside this one.
    /// Note that cancelling the child does not affect its parent.
    #[must_use]
    pub fn child_context(&self) -> SystemContext {
        self.token.child_token().into()
    }

    /// Cancel this context and all of its children.
    pub fn cancel(&self) {
        self.token.cancel()
    }

    pub(crate) fn cancel_with_cause(&self, signal: TerminationSignal) {
        if self.token.is_cancelled() {
            return;
        }
        let _ = self.cause.set(signal);
        self.token.cancel()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Returns a future that gets fulfilled when cancellation is requested.
    /// If the context is already cancelled, it resolves immediately.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    /// Owned variant of [cancelled](Self::cancelled) that can be moved into spawned tasks.
    pub fn cancelled_owned(self) -> WaitForCancellationFutureOwned {
        self.token.cancelled_owned()
    }

    /// Returns the termination signal that triggered the cancellation.
    ///
    /// It's `None` if the context has not been cancelled yet or if it was cancelled
    /// by other means, such as its parent being cancelled.
    pub fn cause(&self) -> Option<TerminationSignal> {
        self.cause.get().copied()
    }

    /// Run the provided future until it either completes or this context gets cancelled.
    /// Returns `None` in the latter case.
    pub async fn run_until_cancelled<F>(&self, fut: F) -> Option<F::Output>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            res = fut => Some(res),
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn into_token(self) -> CancellationToken {
        self.token
    }
}
