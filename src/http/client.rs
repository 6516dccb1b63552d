// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client implementation

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use super::headers::HOST;
use super::redirect::RedirectPolicy;
use super::request::Request;
use super::response::Response;
use super::trace::TraceObserver;
use crate::error::Result;
use crate::options::Options;

/// HTTP client configuration
#[derive(Debug, Clone, Default)]
pub struct HttpClientConfig {
    /// Whole-request timeout, none by default
    pub timeout: Option<Duration>,
    /// Accept invalid certificates (dangerous!)
    pub accept_invalid_certs: bool,
    /// Redirect handling
    pub redirect: RedirectPolicy,
}

impl HttpClientConfig {
    /// Configuration derived from command-line options
    pub fn from_options(options: &Options) -> Self {
        Self {
            timeout: options.timeout,
            accept_invalid_certs: options.insecure,
            redirect: RedirectPolicy::new(options.follow_redirects, options.max_redirects),
        }
    }
}

/// Transport context that sends prepared requests
///
/// Headers, cookies and bodies are fully decided by the request builder; the
/// client only adds the connection, TLS and the redirect policy.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    observer: Option<Arc<dyn TraceObserver>>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .redirect(config.redirect.to_reqwest())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .no_gzip()
            .no_brotli();

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            config,
            observer: None,
        })
    }

    /// Client configured from command-line options
    pub fn from_options(options: &Options) -> Result<Self> {
        Self::with_config(HttpClientConfig::from_options(options))
    }

    /// Attach a trace observer
    pub fn observer(mut self, observer: Arc<dyn TraceObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Redirect hops taken so far
    pub fn redirects_taken(&self) -> usize {
        self.config.redirect.taken()
    }

    /// Execute a request
    pub async fn execute(&self, request: Request) -> Result<Response> {
        if let Some(observer) = &self.observer {
            let port = request.url.port_or_known_default().unwrap_or(80);
            observer.on_connect_start(request.url.host_str().unwrap_or_default(), port);
            observer.on_headers_sent(&request);
        }

        let default_host = request.host();
        let Request {
            method,
            url,
            mut headers,
            body,
        } = request;

        // An untouched Host header would be carried across cross-host redirects
        if headers.get(HOST).and_then(|v| v.to_str().ok()) == Some(default_host.as_str()) {
            headers.remove(HOST);
        }

        let mut builder = self.client.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body.open().await?);
        }

        let response = builder.send().await?;

        if let Some(observer) = &self.observer {
            observer.on_connected(response.url(), response.remote_addr());
            if response.url().scheme() == "https" {
                observer.on_tls_complete(response.url());
            }
        }

        Ok(Response::new(response))
    }
}
