// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Multi-line classification.
//!
//! A line is a continuation when it belongs to the logical event started by an earlier line,
//! e.g. an indented stack frame. Patterns are probed in order and the first match wins.

use regex::Regex;

/// Patterns that mark a line as a continuation of the previous event.
pub const CONTINUATION_PATTERNS: &[&str] = &[
    // indented continuation
    r"^\s",
    // interpreted-language traceback frame
    r"line \d+, in .+",
    // traceback header attaches to whatever preceded it
    r"^Traceback ",
    // SQL error context
    r"LINE \d+:",
];

/// Stateless predicate deciding whether a line continues the prior event.
#[derive(Debug, Clone)]
pub struct Classifier {
    patterns: Vec<Regex>,
}

impl Classifier {
    /// Compiles `patterns` in order. Fails on the first invalid expression.
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    #[must_use]
    pub fn is_continuation(&self, line: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(line))
    }
}

impl Default for Classifier {
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        Self::new(CONTINUATION_PATTERNS).expect("built-in continuation patterns must compile")
    }
}
