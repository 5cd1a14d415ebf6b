// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::callback::SignalCallback;
use crate::context::SystemContext;
use crate::error::SystemContextError;
use crate::signal::{SignalListener, TerminationSignal};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Create a new [SystemContext] derived from `parent` that is going to get cancelled
/// once `SIGINT` or `SIGTERM` is received, after waiting for the specified `delay`.
///
/// All `callbacks` get invoked, each in a separate task, immediately after the signal
/// is received, i.e. before the delay.
///
/// The delay exists for the environments where the process might get told to terminate
/// while load balancers still route traffic towards it. Cancelling straight away would
/// result in connection errors for the clients during that window.
///
/// # Panics
///
/// Panics if the signal handlers could not be registered or if called outside a tokio runtime.
/// Use [try_new_system_context] to handle the registration failure instead.
#[allow(clippy::expect_used)]
#[track_caller]
pub fn new_system_context<I>(parent: SystemContext, delay: Duration, callbacks: I) -> SystemContext
where
    I: IntoIterator<Item = Arc<dyn SignalCallback>>,
{
    try_new_system_context(parent, delay, callbacks)
        .expect("failed to register the termination signal handlers")
}

/// Fallible variant of [new_system_context].
#[track_caller]
pub fn try_new_system_context<I>(
    parent: SystemContext,
    delay: Duration,
    callbacks: I,
) -> Result<SystemContext, SystemContextError>
where
    I: IntoIterator<Item = Arc<dyn SignalCallback>>,
{
    callbacks
        .into_iter()
        .fold(
            SystemContextBuilder::new(parent).with_delay(delay),
            SystemContextBuilder::with_shared_callback,
        )
        .build()
}

/// Builder for a [SystemContext] that gets cancelled upon receiving a termination signal.
#[must_use]
pub struct SystemContextBuilder {
    parent: SystemContext,

    /// Time to wait between receiving the signal and cancelling the context.
    delay: Duration,

    callbacks: Vec<Arc<dyn SignalCallback>>,
}

impl SystemContextBuilder {
    pub fn new(parent: SystemContext) -> Self {
        SystemContextBuilder {
            parent,
            delay: Duration::ZERO,
            callbacks: Vec::new(),
        }
    }

    /// Set the grace period between receiving the signal and cancelling the context.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Register additional callback to be invoked upon receiving the signal.
    pub fn with_callback<C>(self, callback: C) -> Self
    where
        C: SignalCallback,
    {
        self.with_shared_callback(Arc::new(callback))
    }

    pub fn with_shared_callback(mut self, callback: Arc<dyn SignalCallback>) -> Self {
        self.callbacks.push(callback);
        self
    }

    /// Subscribe to the process termination signals and start the background watcher.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[track_caller]
    pub fn build(self) -> Result<SystemContext, SystemContextError> {
        let mut listener = SignalListener::register()?;

        Ok(self.build_with_signal(async move {
            match listener.recv().await {
                Some(signal) => signal,
                None => {
                    warn!("the signal driver has shut down - no termination signal will ever be received");
                    std::future::pending().await
                }
            }
        }))
    }

    /// Start the background watcher using the provided future as the source of the termination signal
    /// rather than subscribing to the process signals.
    ///
    /// Useful if the signals are already multiplexed elsewhere in the process.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[track_caller]
    pub fn build_with_signal<F>(self, signal: F) -> SystemContext
    where
        F: Future<Output = TerminationSignal> + Send + 'static,
    {
        let context = self.parent.child_context();
        let watcher = SignalWatcher {
            context: context.clone(),
            delay: self.delay,
            callbacks: self.callbacks,
        };
        tokio::spawn(watcher.run(signal));
        context
    }
}

struct SignalWatcher {
    context: SystemContext,
    delay: Duration,
    callbacks: Vec<Arc<dyn SignalCallback>>,
}

impl SignalWatcher {
    async fn run<F>(self, signal: F)
    where
        F: Future<Output = TerminationSignal>,
    {
        debug!(
            "waiting for termination signal ({} callbacks, {:?} delay)",
            self.callbacks.len(),
            self.delay
        );

        let signal = tokio::select! {
            biased;
            _ = self.context.cancelled() => {
                debug!("the system context got cancelled before receiving any termination signal");
                return;
            }
            signal = signal => signal,
        };

        info!("received {signal}");
        self.notify(signal);

        if !self.delay.is_zero() {
            debug!("waiting {:?} before cancelling the system context", self.delay);
            if self
                .context
                .run_until_cancelled(sleep(self.delay))
                .await
                .is_none()
            {
                debug!("the system context got cancelled during the grace period");
                return;
            }
        }

        debug!("cancelling the system context");
        self.context.cancel_with_cause(signal);
    }

    // each callback is detached so that a slow or panicking one
    // can't hold back the cancellation or any other callback
    fn notify(&self, signal: TerminationSignal) {
        for callback in &self.callbacks {
            let callback = Arc::clone(callback);
            let context = self.context.clone();
            tokio::spawn(async move { callback.on_signal(&context, signal) });
        }
    }
}
