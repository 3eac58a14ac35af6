// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The JSON document shipped to Logstash for every coalesced event.

use serde::Serialize;

use crate::record::LogRecord;

/// Tag attached to events built from more than one line.
pub const MULTILINE_TAG: &str = "multiline";

/// One enriched log event. The serialized keys are consumed by Logstash pipelines and must not
/// change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub message: String,
    #[serde(rename = "container_name")]
    pub name: String,
    #[serde(rename = "container_id")]
    pub id: String,
    #[serde(rename = "image_name")]
    pub image: String,
    #[serde(rename = "container_hostname")]
    pub hostname: String,
    pub host: String,
    pub stream: String,
    pub tags: Vec<String>,
}

impl Event {
    /// Builds an event from flushed `lines`, taking container metadata from the record that
    /// triggered the flush.
    #[must_use]
    pub fn build(lines: &[String], record: &LogRecord, host: &str) -> Self {
        Event {
            message: lines.join("\n"),
            name: record.container.name.trim_start_matches('/').to_string(),
            id: record.container.id.clone(),
            image: record.container.config.image.clone(),
            hostname: record.container.config.hostname.clone(),
            host: host.to_string(),
            stream: record.source.as_str().to_string(),
            tags: tags(lines.len()),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

// An empty tag stands for "no tag" downstream; single-line events still carry one element.
fn tags(line_count: usize) -> Vec<String> {
    if line_count > 1 {
        vec![MULTILINE_TAG.to_string()]
    } else {
        vec![String::new()]
    }
}
