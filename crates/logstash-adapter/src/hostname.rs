// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Host identity attached to every event.

use std::env;
use tracing::{debug, error};

/// Resolves the host identity once per stream.
///
/// 1. `HOSTNAME` environment variable, when set and non-empty
/// 2. the system hostname
/// 3. an empty string when the system lookup fails
#[must_use]
pub fn resolve_hostname() -> String {
    if let Ok(hostname) = env::var("HOSTNAME") {
        if !hostname.is_empty() {
            return hostname;
        }
    }

    debug!("logstash: Defaulting to container hostname.");
    match nix::unistd::gethostname() {
        Ok(hostname) => hostname.to_string_lossy().into_owned(),
        Err(e) => {
            error!("logstash_hostname: {}", e);
            String::new()
        }
    }
}
