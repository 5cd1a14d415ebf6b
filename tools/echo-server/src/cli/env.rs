// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

pub(crate) mod vars {
    pub(crate) const ECHO_SERVER_LISTEN_ADDRESS_ARG: &str = "ECHO_SERVER_LISTEN_ADDRESS";
    pub(crate) const ECHO_SERVER_GRACE_DELAY_ARG: &str = "ECHO_SERVER_GRACE_DELAY";
    pub(crate) const ECHO_SERVER_SHUTDOWN_TIMEOUT_ARG: &str = "ECHO_SERVER_SHUTDOWN_TIMEOUT";
}
