// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! One complete transfer: request out, body to the output, cookies back to the jar

use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::StatusCode;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};
use crate::http::{
    parse_target, persist_cookies, HttpClient, ProgressFn, Request, RequestBuilder, Response,
    VerboseTracer,
};
use crate::options::Options;
use crate::output::{remote_file_name, resume_offset, stamp_modified, Output};

/// Outcome of a finished transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSummary {
    /// Final response status
    pub status: u16,
    /// Bytes written to the output
    pub bytes_written: u64,
    /// Redirect hops seen
    pub redirects: usize,
    /// Cookies written to the jar
    pub cookies_saved: usize,
}

/// Request and destination, ready to go
#[derive(Debug)]
pub struct Prepared {
    pub request: Request,
    pub output: Output,
    pub offset: u64,
}

/// Drives a single transfer for a set of options
pub struct Transfer<'a> {
    options: &'a Options,
    client: HttpClient,
    progress: Option<ProgressFn>,
}

impl<'a> Transfer<'a> {
    /// Create a transfer; `-v` attaches the verbose tracer
    pub fn new(options: &'a Options) -> Result<Self> {
        let mut client = HttpClient::from_options(options)?;
        if options.verbose {
            client = client.observer(Arc::new(VerboseTracer::new()));
        }
        Ok(Self {
            options,
            client,
            progress: None,
        })
    }

    /// Report upload and download progress to `progress`
    pub fn progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Resolve the resume offset, build the request and open the output
    ///
    /// Nothing touches the network here. The output is only opened once the
    /// request is built, so a bad option never leaves an empty file behind.
    pub async fn prepare(&self, target: &str) -> Result<Prepared> {
        let url = parse_target(target)?;
        let output_path = self.output_path(&url)?;

        let resume = self.options.resume()?;
        let offset = resume_offset(output_path.as_deref(), resume).await?;

        let mut builder = RequestBuilder::new(self.options);
        if let Some(progress) = &self.progress {
            builder = builder.progress(progress.clone());
        }
        let request = builder.build(url.as_str(), offset)?;

        let mut output = Output::open(output_path.as_deref()).await?;
        output.seek_to(offset).await?;

        Ok(Prepared {
            request,
            output,
            offset,
        })
    }

    /// Run the transfer against `target`
    pub async fn run(&self, target: &str) -> Result<TransferSummary> {
        let Prepared {
            request,
            mut output,
            offset,
        } = self.prepare(target).await?;
        let request_url = request.url.clone();

        let mut response = self.client.execute(request).await?;
        log_response(&response);

        if offset > 0 && response.status == StatusCode::RANGE_NOT_SATISFIABLE {
            return Err(Error::InvalidRange {
                url: request_url.to_string(),
                status: response.status_code(),
            });
        }

        let bytes_written = if self.options.head {
            let block = response.header_block();
            output.writer().write_all(block.as_bytes()).await?;
            block.len() as u64
        } else {
            response
                .copy_to(output.writer(), self.progress.as_ref())
                .await?
        };

        let output_path = output.path().map(Path::to_path_buf);
        output.finish().await?;

        if self.options.remote_time {
            if let Some(path) = output_path {
                apply_remote_time(&path, &response);
            }
        }

        Ok(TransferSummary {
            status: response.status_code(),
            bytes_written,
            redirects: self.client.redirects_taken(),
            cookies_saved: self.save_cookies(&response, &request_url),
        })
    }

    fn output_path(&self, url: &url::Url) -> Result<Option<PathBuf>> {
        match (&self.options.output, self.options.remote_name) {
            (Some(path), _) => Ok(Some(path.clone())),
            (None, true) => remote_file_name(url).map(Some),
            (None, false) => Ok(None),
        }
    }

    /// Write received cookies to the jar; failures only warn
    fn save_cookies(&self, response: &Response, request_url: &url::Url) -> usize {
        let Some(jar) = &self.options.cookie_jar else {
            return 0;
        };
        let cookies = response.received_cookies(request_url);
        if cookies.is_empty() {
            return 0;
        }

        let count = cookies.len();
        match persist_cookies(jar, cookies) {
            Ok(()) => count,
            Err(e) => {
                tracing::warn!("Warning: {}", e);
                0
            }
        }
    }
}

/// Run one transfer with `options`
pub async fn fetch(target: &str, options: &Options) -> Result<TransferSummary> {
    Transfer::new(options)?.run(target).await
}

fn log_response(response: &Response) {
    tracing::debug!("< {}", response.status_line());
    for (name, value) in response.headers.iter() {
        tracing::debug!("< {}: {}", name, String::from_utf8_lossy(value.as_bytes()));
    }
}

fn apply_remote_time(path: &Path, response: &Response) {
    let Some(modified) = response.last_modified() else {
        tracing::debug!("No usable Last-Modified header, keeping local time");
        return;
    };
    if let Err(e) = stamp_modified(path, modified) {
        tracing::warn!("Warning: unable to set remote time: {}", e);
    }
}
