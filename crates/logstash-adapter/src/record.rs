// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Log records as delivered by the log router, one per container line.

use serde::Deserialize;

/// The container stream a line was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Stdout,
    Stderr,
}

impl Source {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Stdout => "stdout",
            Source::Stderr => "stderr",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContainerConfig {
    pub image: String,
    pub hostname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Container {
    pub id: String,
    /// Container name as reported by the runtime, usually with a leading `/`.
    pub name: String,
    pub config: ContainerConfig,
}

/// A single log line with the metadata of the container that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogRecord {
    pub data: String,
    pub source: Source,
    pub container: Container,
}

impl LogRecord {
    #[must_use]
    pub fn container_id(&self) -> &str {
        &self.container.id
    }
}
