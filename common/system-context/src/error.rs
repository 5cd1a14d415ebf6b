// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::signal::TerminationSignal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SystemContextError {
    #[error("failed to register the {signal} handler: {source}")]
    SignalRegistration {
        signal: TerminationSignal,
        #[source]
        source: std::io::Error,
    },
}
