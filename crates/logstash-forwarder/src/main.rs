// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use logstash_adapter::{
    adapter::{self, AdapterRegistry},
    config::ForwarderConfig,
    record::LogRecord,
    transport::TransportRegistry,
};

#[tokio::main]
pub async fn main() {
    let config = match ForwarderConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("logstash: {e}");
            std::process::exit(1);
        }
    };

    let env_filter = format!("logstash_forwarder={0},logstash_adapter={0}", config.log_level);

    #[allow(clippy::expect_used)]
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(env_filter).expect("could not parse log level in configuration"),
        )
        .with_writer(std::io::stderr)
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .without_time()
        .finish();

    #[allow(clippy::expect_used)]
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    debug!("Logging subsystem enabled");

    let mut adapters = AdapterRegistry::new();
    adapter::register(&mut adapters);

    let route = config.route();
    let mut adapter = match adapters
        .build(&route, &TransportRegistry::with_defaults())
        .await
    {
        Ok(adapter) => adapter,
        Err(e) => {
            error!("logstash: {e}");
            std::process::exit(1);
        }
    };
    info!("logstash: forwarding to {} via {}", route.address, route.adapter);

    let (tx, rx) = mpsc::channel(config.channel_capacity);
    let reader = tokio::spawn(read_records(tx));

    adapter.stream(rx).await;

    if let Err(e) = reader.await {
        error!("logstash: record reader failed: {e}");
    }
    debug!("logstash: shutting down");
}

/// Reads newline-delimited JSON records from stdin until EOF or interrupt. Dropping `tx` on
/// return closes the adapter's stream.
async fn read_records(tx: mpsc::Sender<LogRecord>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => {
                info!("logstash: interrupted, closing record stream");
                return;
            }
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => return,
            Err(e) => {
                error!("logstash: failed to read records: {e}");
                return;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<LogRecord>(&line) {
            Ok(record) => {
                if tx.send(record).await.is_err() {
                    return;
                }
            }
            Err(e) => warn!("logstash: skipping malformed record: {e}"),
        }
    }
}
