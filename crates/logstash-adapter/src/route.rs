// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Route descriptors handed to adapter factories by the log router.

use std::collections::HashMap;

/// Where and how a stream of container logs should be shipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    /// Adapter name, optionally suffixed with a transport: `logstash` or `logstash+tcp`.
    pub adapter: String,
    /// Destination endpoint, e.g. `logstash.internal:5000`.
    pub address: String,
    /// Passed through to the transport dialer untouched, except for adapter-level keys.
    pub options: HashMap<String, String>,
}

impl Route {
    pub fn new(adapter: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            adapter: adapter.into(),
            address: address.into(),
            options: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// The adapter name without any transport suffix.
    #[must_use]
    pub fn adapter_name(&self) -> &str {
        self.adapter
            .split_once('+')
            .map_or(self.adapter.as_str(), |(name, _)| name)
    }

    /// The transport named after `+` in the adapter, or `default` when there is none.
    #[must_use]
    pub fn adapter_transport<'a>(&'a self, default: &'a str) -> &'a str {
        match self.adapter.split_once('+') {
            Some((_, transport)) => transport,
            None => default,
        }
    }
}
