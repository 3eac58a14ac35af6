// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Per-container multi-line coalescing.
//!
//! Each container id owns an ordered buffer of pending lines. Continuation lines are appended;
//! a head line arriving on a non-empty buffer completes the pending event and flushes it:
//!
//! - a buffer holding a single head line is flushed alone and the arriving line seeds the next
//!   buffer
//! - a buffer holding a single continuation line is flushed alone and the arriving line is dropped
//! - a buffer holding several lines takes the arriving line as its last line, then flushes empty
//!
//! Buffers that never see a closing head line are not flushed when the stream ends.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use crate::multiline::Classifier;
use crate::record::LogRecord;

#[derive(Debug, Default)]
pub struct Coalescer {
    classifier: Classifier,
    buffers: HashMap<String, Vec<String>>,
    max_lines: Option<NonZeroUsize>,
}

impl Coalescer {
    #[must_use]
    pub fn new(classifier: Classifier, max_lines: Option<NonZeroUsize>) -> Self {
        Self {
            classifier,
            buffers: HashMap::new(),
            max_lines,
        }
    }

    /// Feeds one record into its container's buffer.
    ///
    /// Returns the lines of a completed event when this record closes one, in the order they
    /// were received. Metadata for the event comes from `record`, the caller owns it.
    pub fn ingest(&mut self, record: &LogRecord) -> Option<Vec<String>> {
        let line = &record.data;
        let is_continuation = self.classifier.is_continuation(line);
        let buffer = self
            .buffers
            .entry(record.container_id().to_owned())
            .or_default();

        if is_continuation || buffer.is_empty() {
            buffer.push(line.clone());
            if self
                .max_lines
                .is_some_and(|max| buffer.len() >= max.get())
            {
                return Some(std::mem::take(buffer));
            }
            return None;
        }

        if buffer.len() == 1 {
            if self.classifier.is_continuation(&buffer[0]) {
                return Some(std::mem::take(buffer));
            }
            return Some(std::mem::replace(buffer, vec![line.clone()]));
        }

        buffer.push(line.clone());
        Some(std::mem::take(buffer))
    }

    /// Lines currently buffered for `container_id`, if the container has been seen.
    #[must_use]
    pub fn pending(&self, container_id: &str) -> Option<&[String]> {
        self.buffers.get(container_id).map(Vec::as_slice)
    }

    /// Number of containers with a buffer, empty or not.
    #[must_use]
    pub fn containers(&self) -> usize {
        self.buffers.len()
    }
}
