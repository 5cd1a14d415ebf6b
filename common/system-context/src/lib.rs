// Copyright 2022 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

//! Cancellation context bridged to the process termination signals.
//!
//! [`SystemContext`] is a cancellation handle that gets cancelled once the process receives
//! either `SIGINT` or `SIGTERM`, optionally after a grace delay. Any registered
//! [`SignalCallback`] is invoked, each in its own task, as soon as the signal arrives and
//! before the delay starts, so that e.g. a load balancer can be informed while the service
//! is still accepting traffic.
//!
//! ```no_run
//! use std::time::Duration;
//! use system_context::{tracing_callback, SystemContext};
//!
//! # async fn run() -> Result<(), system_context::SystemContextError> {
//! let ctx = SystemContext::builder(SystemContext::new())
//!     .with_delay(Duration::from_secs(5))
//!     .with_callback(tracing_callback())
//!     .build()?;
//!
//! ctx.cancelled().await;
//! # Ok(())
//! # }
//! ```

pub mod callback;
pub mod context;
pub mod error;
pub mod signal;
pub mod watcher;

pub use callback::{logging_callback, tracing_callback, InfoSink, SignalCallback, TracingSink};
pub use context::SystemContext;
pub use error::SystemContextError;
pub use signal::{SignalListener, TerminationSignal};
pub use watcher::{new_system_context, try_new_system_context, SystemContextBuilder};
