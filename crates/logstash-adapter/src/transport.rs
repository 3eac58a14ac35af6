// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Transports that carry serialized events to Logstash.
//!
//! A [`Transport`] is an already-dialed sink taking one payload per write. A [`Dialer`] opens
//! one for an address, and the [`TransportRegistry`] resolves dialers by route transport name.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpStream, UdpSocket};
use tokio::sync::Mutex;
use tracing::debug;

/// A connected byte sink. Each call writes one whole payload.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn write(&self, payload: &[u8]) -> io::Result<usize>;
}

/// Opens a [`Transport`] to an address.
#[async_trait]
pub trait Dialer: Send + Sync {
    async fn dial(
        &self,
        address: &str,
        options: &HashMap<String, String>,
    ) -> io::Result<Box<dyn Transport>>;
}

async fn resolve(address: &str) -> io::Result<SocketAddr> {
    tokio::net::lookup_host(address).await?.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no addresses resolved for {address}"),
        )
    })
}

/// Sends every payload as a single datagram.
#[derive(Debug, Clone, Copy, Default)]
pub struct UdpDialer;

pub struct UdpTransport {
    socket: UdpSocket,
}

#[async_trait]
impl Dialer for UdpDialer {
    async fn dial(
        &self,
        address: &str,
        _options: &HashMap<String, String>,
    ) -> io::Result<Box<dyn Transport>> {
        let remote = resolve(address).await?;
        let local: SocketAddr = if remote.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(remote).await?;
        debug!("logstash: udp transport connected to {}", remote);
        Ok(Box::new(UdpTransport { socket }))
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn write(&self, payload: &[u8]) -> io::Result<usize> {
        self.socket.send(payload).await
    }
}

/// Writes payloads back to back on one stream connection, with no delimiter between them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpDialer;

pub struct TcpTransport {
    stream: Mutex<TcpStream>,
}

#[async_trait]
impl Dialer for TcpDialer {
    async fn dial(
        &self,
        address: &str,
        _options: &HashMap<String, String>,
    ) -> io::Result<Box<dyn Transport>> {
        let stream = TcpStream::connect(address).await?;
        debug!("logstash: tcp transport connected to {}", address);
        Ok(Box::new(TcpTransport {
            stream: Mutex::new(stream),
        }))
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn write(&self, payload: &[u8]) -> io::Result<usize> {
        let mut stream = self.stream.lock().await;
        stream.write_all(payload).await?;
        Ok(payload.len())
    }
}

/// Dialers keyed by transport name.
#[derive(Clone, Default)]
pub struct TransportRegistry {
    dialers: HashMap<String, Arc<dyn Dialer>>,
}

impl TransportRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the `udp` and `tcp` transports.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("udp", Arc::new(UdpDialer));
        registry.register("tcp", Arc::new(TcpDialer));
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, dialer: Arc<dyn Dialer>) {
        self.dialers.insert(name.into(), dialer);
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Dialer>> {
        self.dialers.get(name).cloned()
    }
}
