// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Errors returned while building an adapter from a route.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The route names a transport that is not in the registry.
    #[error("unable to find adapter: {adapter}")]
    UnknownTransport { adapter: String },

    /// The transport was found but dialing the address failed.
    #[error(transparent)]
    Dial(#[from] std::io::Error),

    /// A route option was present but could not be used.
    #[error("invalid value '{value}' for route option '{key}'")]
    InvalidOption { key: String, value: String },

    /// No factory is registered under the route's adapter name.
    #[error("no adapter factory registered for '{0}'")]
    UnknownAdapter(String),
}

/// Errors raised while emitting one event. None of these stop the stream.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("{0}")]
    Marshal(#[from] serde_json::Error),

    #[error("{0}")]
    Write(std::io::Error),
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
