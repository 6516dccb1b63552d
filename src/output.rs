// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Download destination
//!
//! A file target is opened without truncation so that `-C -` can read its
//! current length. The stale tail past the written bytes is cut when the
//! transfer finishes.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncSeekExt, AsyncWrite, AsyncWriteExt, Stdout};
use url::Url;

use crate::error::{Error, ErrorContext, Result};
use crate::options::ResumeOffset;

/// Where the response body goes
#[derive(Debug)]
pub enum Output {
    /// Standard output
    Stdout(Stdout),
    /// Local file
    File { file: File, path: PathBuf },
}

impl Output {
    /// Open `path`, or stdout when no path is given
    pub async fn open(path: Option<&Path>) -> Result<Self> {
        match path {
            None => Ok(Output::Stdout(tokio::io::stdout())),
            Some(path) => {
                let file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .open(path)
                    .await
                    .with_path(path)?;
                Ok(Output::File {
                    file,
                    path: path.to_path_buf(),
                })
            }
        }
    }

    /// Local path, if writing to a file
    pub fn path(&self) -> Option<&Path> {
        match self {
            Output::Stdout(_) => None,
            Output::File { path, .. } => Some(path),
        }
    }

    /// Position the file at `offset` before any bytes are written
    pub async fn seek_to(&mut self, offset: u64) -> Result<()> {
        if let Output::File { file, path } = self {
            file.seek(SeekFrom::Start(offset)).await.with_path(path)?;
        }
        Ok(())
    }

    /// Current write position; always 0 for stdout
    pub async fn position(&mut self) -> Result<u64> {
        match self {
            Output::Stdout(_) => Ok(0),
            Output::File { file, path } => Ok(file.stream_position().await.with_path(path)?),
        }
    }

    /// Sink for body bytes
    pub fn writer(&mut self) -> &mut (dyn AsyncWrite + Send + Unpin) {
        match self {
            Output::Stdout(stdout) => stdout,
            Output::File { file, .. } => file,
        }
    }

    /// Flush and drop anything past the last written byte
    pub async fn finish(self) -> Result<()> {
        match self {
            Output::Stdout(mut stdout) => stdout.flush().await?,
            Output::File { mut file, path } => {
                file.flush().await.with_path(&path)?;
                let end = file.stream_position().await.with_path(&path)?;
                file.set_len(end).await.with_path(&path)?;
            }
        }
        Ok(())
    }
}

/// Turn a resume token into a byte offset for the output at `path`
///
/// `-` reads the current file size; a file that does not exist yet resumes at 0.
pub async fn resume_offset(path: Option<&Path>, resume: Option<ResumeOffset>) -> Result<u64> {
    match (resume, path) {
        (None, _) => Ok(0),
        (Some(ResumeOffset::At(offset)), _) => Ok(offset),
        (Some(ResumeOffset::Auto), Some(path)) => match tokio::fs::metadata(path).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e).with_path(path),
        },
        (Some(ResumeOffset::Auto), None) => Err(Error::config(
            "unable to set the resume offset automatically without an output file",
        )),
    }
}

/// File name taken from the last path segment of `url`
pub fn remote_file_name(url: &Url) -> Result<PathBuf> {
    let name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    if name.is_empty() {
        return Err(Error::config(format!(
            "remote file name has no length in {}",
            url
        )));
    }
    Ok(PathBuf::from(name))
}

/// Set the modification time of `path`
pub fn stamp_modified(path: &Path, time: DateTime<Utc>) -> Result<()> {
    let file = std::fs::File::options()
        .write(true)
        .open(path)
        .with_path(path)?;
    file.set_modified(SystemTime::from(time)).with_path(path)?;
    Ok(())
}
