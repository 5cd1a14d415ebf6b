// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::context::SystemContext;
use crate::signal::TerminationSignal;
use std::sync::Arc;
use tracing::info;

/// Notification invoked as soon as a termination signal is received,
/// before the grace delay starts and thus before the context is cancelled.
///
/// Every callback is run in its own task and nothing waits for it to complete,
/// so there's no guarantee it finishes before the process exits.
/// A callback that performs critical work, such as flushing buffers,
/// has to provide its own synchronisation.
pub trait SignalCallback: Send + Sync + 'static {
    fn on_signal(&self, context: &SystemContext, signal: TerminationSignal);
}

impl<F> SignalCallback for F
where
    F: Fn(&SystemContext, TerminationSignal) + Send + Sync + 'static,
{
    fn on_signal(&self, context: &SystemContext, signal: TerminationSignal) {
        self(context, signal)
    }
}

/// Anything capable of recording an informational message.
/// It's going to be called concurrently with other callbacks.
pub trait InfoSink: Send + Sync + 'static {
    fn info(&self, context: &SystemContext, message: &str);
}

impl<S> InfoSink for Arc<S>
where
    S: InfoSink + ?Sized,
{
    fn info(&self, context: &SystemContext, message: &str) {
        (**self).info(context, message)
    }
}

/// [InfoSink] emitting `INFO` level `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl InfoSink for TracingSink {
    fn info(&self, _: &SystemContext, message: &str) {
        info!("{message}")
    }
}

fn signal_message(signal: TerminationSignal) -> String {
    format!(
        "system signal {} ({signal}) received, context will be cancelled shortly",
        signal.number()
    )
}

/// Create a [SignalCallback] that records the received signal in the provided sink.
pub fn logging_callback<S>(sink: S) -> impl SignalCallback
where
    S: InfoSink,
{
    move |ctx: &SystemContext, signal: TerminationSignal| sink.info(ctx, &signal_message(signal))
}

/// Create a [SignalCallback] that logs the received signal using `tracing`.
pub fn tracing_callback() -> impl SignalCallback {
    logging_callback(TracingSink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        fn messages(&self) -> Vec<String> {
            self.messages
                .lock()
                .map(|guard| guard.clone())
                .unwrap_or_default()
        }
    }

    impl InfoSink for RecordingSink {
        fn info(&self, _: &SystemContext, message: &str) {
            if let Ok(mut guard) = self.messages.lock() {
                guard.push(message.to_string())
            }
        }
    }

    #[test]
    fn logging_callback_describes_signal() {
        let sink = Arc::new(RecordingSink::default());
        let callback = logging_callback(sink.clone());

        let ctx = SystemContext::new();
        callback.on_signal(&ctx, TerminationSignal::Terminate);
        callback.on_signal(&ctx, TerminationSignal::Interrupt);

        assert_eq!(
            sink.messages(),
            vec![
                "system signal 15 (SIGTERM) received, context will be cancelled shortly",
                "system signal 2 (SIGINT) received, context will be cancelled shortly",
            ]
        );
    }

    #[test]
    fn logging_callback_does_not_cancel() {
        let sink = Arc::new(RecordingSink::default());
        let ctx = SystemContext::new();

        logging_callback(sink).on_signal(&ctx, TerminationSignal::Interrupt);
        assert!(!ctx.is_cancelled());
    }

    #[test]
    fn trait_object_sinks() {
        let sink: Arc<dyn InfoSink> = Arc::new(TracingSink);
        let callback = logging_callback(sink);
        callback.on_signal(&SystemContext::new(), TerminationSignal::Terminate);
    }

    #[test]
    fn closures_are_callbacks() {
        let seen = Arc::new(Mutex::new(None));
        let seen_clone = seen.clone();
        let callback = move |_: &SystemContext, signal: TerminationSignal| {
            if let Ok(mut guard) = seen_clone.lock() {
                *guard = Some(signal)
            }
        };

        callback.on_signal(&SystemContext::new(), TerminationSignal::Interrupt);
        assert_eq!(
            seen.lock().ok().and_then(|guard| *guard),
            Some(TerminationSignal::Interrupt)
        );
    }
}
