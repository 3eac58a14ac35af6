// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Logstash adapter for the log router.
//!
//! The adapter consumes container log records from a channel, coalesces multi-line events per
//! container, enriches them with container metadata and writes each one as a compact JSON
//! document to the dialed transport (UDP unless the route says otherwise).

use async_trait::async_trait;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, trace};

use crate::coalescer::Coalescer;
use crate::errors::{AdapterError, EmitError};
use crate::event::Event;
use crate::hostname::resolve_hostname;
use crate::multiline::Classifier;
use crate::record::LogRecord;
use crate::route::Route;
use crate::transport::{Transport, TransportRegistry};

/// Name the adapter is registered under.
pub const ADAPTER_NAME: &str = "logstash";
/// Transport used when the route does not name one.
pub const DEFAULT_TRANSPORT: &str = "udp";
/// Route option capping the number of lines buffered per container.
pub const MAX_LINES_OPTION: &str = "max_lines";

/// Consumes a stream of records until the sending side is closed.
#[async_trait]
pub trait LogAdapter: Send {
    async fn stream(&mut self, logstream: mpsc::Receiver<LogRecord>);
}

/// Builds an adapter for a route.
#[async_trait]
pub trait AdapterFactory: Send + Sync {
    async fn build(
        &self,
        route: &Route,
        transports: &TransportRegistry,
    ) -> Result<Box<dyn LogAdapter>, AdapterError>;
}

/// Adapter factories keyed by adapter name.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    factories: HashMap<String, Arc<dyn AdapterFactory>>,
}

impl AdapterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, factory: Arc<dyn AdapterFactory>) {
        self.factories.insert(name.into(), factory);
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn AdapterFactory>> {
        self.factories.get(name).cloned()
    }

    /// Builds the adapter named by `route`, ignoring any `+transport` suffix.
    pub async fn build(
        &self,
        route: &Route,
        transports: &TransportRegistry,
    ) -> Result<Box<dyn LogAdapter>, AdapterError> {
        let name = route.adapter_name();
        let factory = self
            .lookup(name)
            .ok_or_else(|| AdapterError::UnknownAdapter(name.to_string()))?;
        factory.build(route, transports).await
    }
}

/// Registers the logstash adapter factory.
pub fn register(registry: &mut AdapterRegistry) {
    registry.register(ADAPTER_NAME, Arc::new(LogstashFactory));
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogstashFactory;

#[async_trait]
impl AdapterFactory for LogstashFactory {
    async fn build(
        &self,
        route: &Route,
        transports: &TransportRegistry,
    ) -> Result<Box<dyn LogAdapter>, AdapterError> {
        let adapter = LogstashAdapter::new(route, transports).await?;
        Ok(Box::new(adapter))
    }
}

pub struct LogstashAdapter {
    transport: Box<dyn Transport>,
    max_lines: Option<NonZeroUsize>,
}

impl LogstashAdapter {
    /// Resolves the route's transport and dials its address.
    pub async fn new(route: &Route, transports: &TransportRegistry) -> Result<Self, AdapterError> {
        let dialer = transports
            .lookup(route.adapter_transport(DEFAULT_TRANSPORT))
            .ok_or_else(|| AdapterError::UnknownTransport {
                adapter: route.adapter.clone(),
            })?;
        let max_lines = parse_max_lines(&route.options)?;
        let transport = dialer.dial(&route.address, &route.options).await?;

        Ok(Self::with_transport(transport, max_lines))
    }

    #[must_use]
    pub fn with_transport(transport: Box<dyn Transport>, max_lines: Option<NonZeroUsize>) -> Self {
        Self {
            transport,
            max_lines,
        }
    }

    /// Serializes one event and writes it in a single call.
    async fn emit(&self, event: &Event) -> Result<usize, EmitError> {
        let payload = event.to_json()?;
        self.transport
            .write(&payload)
            .await
            .map_err(EmitError::Write)
    }
}

#[async_trait]
impl LogAdapter for LogstashAdapter {
    async fn stream(&mut self, mut logstream: mpsc::Receiver<LogRecord>) {
        let host = resolve_hostname();
        let mut coalescer = Coalescer::new(Classifier::default(), self.max_lines);

        while let Some(record) = logstream.recv().await {
            let Some(lines) = coalescer.ingest(&record) else {
                continue;
            };

            let event = Event::build(&lines, &record, &host);
            match self.emit(&event).await {
                Ok(written) => trace!(
                    "logstash: sent {} bytes for container {}",
                    written,
                    event.id
                ),
                Err(EmitError::Marshal(e)) => error!("logstash_marshal: {}", e),
                Err(EmitError::Write(e)) => error!("logstash_write: {}", e),
            }
        }

        debug!(
            "logstash: record stream closed with {} containers tracked",
            coalescer.containers()
        );
    }
}

fn parse_max_lines(options: &HashMap<String, String>) -> Result<Option<NonZeroUsize>, AdapterError> {
    options
        .get(MAX_LINES_OPTION)
        .map(|value| {
            value
                .trim()
                .parse::<NonZeroUsize>()
                .map_err(|_| AdapterError::InvalidOption {
                    key: MAX_LINES_OPTION.to_string(),
                    value: value.clone(),
                })
        })
        .transpose()
}
