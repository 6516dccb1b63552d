// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Per-request trace hooks
//!
//! The transport calls these synchronously while a request is in flight.
//! Every method has a no-op default so observers implement only what they need.

use std::net::SocketAddr;

use parking_lot::Mutex;
use url::Url;

use super::request::Request;

/// Observer of connection lifecycle events
pub trait TraceObserver: Send + Sync {
    /// About to connect to `host:port`
    fn on_connect_start(&self, _host: &str, _port: u16) {}

    /// Request line and headers handed to the transport
    fn on_headers_sent(&self, _request: &Request) {}

    /// Connection established; `addr` is the peer when the transport reports it
    fn on_connected(&self, _url: &Url, _addr: Option<SocketAddr>) {}

    /// TLS handshake finished for `url`
    fn on_tls_complete(&self, _url: &Url) {}
}

/// Logs connection progress the way `-v` shows it
#[derive(Debug, Default)]
pub struct VerboseTracer {
    connections: Mutex<u32>,
}

impl VerboseTracer {
    /// Create a tracer
    pub fn new() -> Self {
        Self::default()
    }
}

impl TraceObserver for VerboseTracer {
    fn on_connect_start(&self, host: &str, _port: u16) {
        tracing::info!("   Trying {}...", host);
    }

    fn on_headers_sent(&self, request: &Request) {
        tracing::debug!("> {} {} HTTP/1.1", request.method, request.url.path());
        for (name, value) in request.headers.iter() {
            tracing::debug!("> {}: {}", name, value.to_str().unwrap_or("<binary>"));
        }
    }

    fn on_connected(&self, url: &Url, addr: Option<SocketAddr>) {
        let mut connections = self.connections.lock();
        let host = url.host_str().unwrap_or("");
        match addr {
            Some(addr) => tracing::info!(
                " Connected to {} ({}) port {} (#{})",
                host,
                addr.ip(),
                addr.port(),
                *connections
            ),
            None => tracing::info!(" Connected to {} (#{})", host, *connections),
        }
        *connections += 1;
    }

    fn on_tls_complete(&self, url: &Url) {
        tracing::info!(" TLS handshake finished for {}", url.host_str().unwrap_or(""));
    }
}
