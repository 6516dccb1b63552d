// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Kurly CLI - curl-style HTTP transfers

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use kurly::{spawn_deadline, Error, Options, ProgressFn, Transfer, TIMEOUT_EXIT_CODE};

/// Transfer a URL, curl style.
#[derive(Parser, Debug)]
#[command(name = "kurly", version, about, long_about = None)]
struct Args {
    /// URL to transfer
    url: Option<String>,

    /// Write output to <file> instead of stdout
    #[arg(short, long, value_name = "file")]
    output: Option<PathBuf>,

    /// Write output to a file named like the remote file
    #[arg(short = 'O', long)]
    remote_name: bool,

    /// Transfer <file> to the destination
    #[arg(short = 'T', long, value_name = "file")]
    upload_file: Option<PathBuf>,

    /// Resumed transfer offset, or '-' to use the output file size
    #[arg(short = 'C', long, value_name = "offset", allow_hyphen_values = true)]
    continue_at: Option<String>,

    /// Make the operation more talkative
    #[arg(short, long)]
    verbose: bool,

    /// Maximum time allowed for the transfer, in seconds
    #[arg(short, long, value_name = "seconds")]
    max_time: Option<f64>,

    /// Set the remote file's time on the local output
    #[arg(short = 'R', long)]
    remote_time: bool,

    /// Send cookies from a string ("name=value") or a jar file
    #[arg(short = 'b', long, value_name = "data|filename")]
    cookie: Option<String>,

    /// Write cookies to <filename> after the operation
    #[arg(short = 'c', long, value_name = "filename")]
    cookie_jar: Option<PathBuf>,

    /// Follow redirects
    #[arg(short = 'L', long)]
    location: bool,

    /// Maximum number of redirects allowed
    #[arg(long, value_name = "num", default_value_t = 10)]
    max_redirs: usize,

    /// Silent mode
    #[arg(short, long)]
    silent: bool,

    /// Specify request method to use
    #[arg(short = 'X', long, value_name = "method")]
    request: Option<String>,

    /// Send User-Agent <name> to server
    #[arg(short = 'A', long, value_name = "name")]
    user_agent: Option<String>,

    /// Server user and password
    #[arg(short, long, value_name = "user:password")]
    user: Option<String>,

    /// Pass custom header(s) to server
    #[arg(short = 'H', long, value_name = "header")]
    header: Vec<String>,

    /// HTTP POST data
    #[arg(short, long, value_name = "data")]
    data: Vec<String>,

    /// HTTP POST ASCII data
    #[arg(long, value_name = "data")]
    data_ascii: Vec<String>,

    /// HTTP POST data, '@' allowed
    #[arg(long, value_name = "data")]
    data_raw: Vec<String>,

    /// HTTP POST binary data
    #[arg(long, value_name = "data")]
    data_binary: Vec<String>,

    /// HTTP POST data url encoded
    #[arg(long, value_name = "data")]
    data_urlencode: Vec<String>,

    /// Specify multipart MIME data
    #[arg(short = 'F', long, value_name = "name=content")]
    form: Vec<String>,

    /// Show document info only
    #[arg(short = 'I', long)]
    head: bool,

    /// Allow insecure server connections
    #[arg(short = 'k', long)]
    insecure: bool,
}

impl Args {
    fn into_options(self) -> Result<Options, Error> {
        let mut options = Options::new();
        options.output = self.output;
        options.remote_name = self.remote_name;
        options.upload_file = self.upload_file;
        options.continue_at = self.continue_at;
        options.verbose = self.verbose;
        options.max_time = match self.max_time.filter(|secs| *secs > 0.0) {
            Some(secs) => Some(Duration::try_from_secs_f64(secs).map_err(|_| {
                Error::config(format!("--max-time {} is out of range", secs))
            })?),
            None => None,
        };
        options.remote_time = self.remote_time;
        options.cookie = self.cookie;
        options.cookie_jar = self.cookie_jar;
        options.follow_redirects = self.location;
        options.max_redirects = self.max_redirs;
        options.silent = self.silent;
        options.method = self.request;
        options.headers = self.header;
        if let Some(user_agent) = self.user_agent {
            options.user_agent = user_agent;
        }
        options.user = self.user;
        options.data = self.data;
        options.data_ascii = self.data_ascii;
        options.data_raw = self.data_raw;
        options.data_binary = self.data_binary;
        options.data_urlencode = self.data_urlencode;
        options.form = self.form;
        options.head = self.head;
        options.insecure = self.insecure;
        Ok(options)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.silent {
        "kurly=error"
    } else if args.verbose {
        "kurly=debug"
    } else {
        "kurly=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let Some(url) = args.url.clone() else {
        // Best effort, nothing useful to do if stdout is gone.
        let _ = Args::command().print_help();
        return ExitCode::from(2);
    };

    let options = match args.into_options() {
        Ok(options) => options,
        Err(e) => return report(&e),
    };
    let deadline = options.max_time.map(spawn_deadline);

    let mut transfer = match Transfer::new(&options) {
        Ok(transfer) => transfer,
        Err(e) => return report(&e),
    };
    if !options.silent {
        let progress: ProgressFn = Arc::new(|done, total| {
            tracing::trace!(done, total, "transfer progress");
        });
        transfer = transfer.progress(progress);
    }

    let result = transfer.run(&url).await;
    if let Some(deadline) = deadline {
        deadline.abort();
    }

    match result {
        Ok(summary) => {
            tracing::debug!(
                "Finished with status {} after {} redirect(s), {} bytes written",
                summary.status,
                summary.redirects,
                summary.bytes_written
            );
            ExitCode::SUCCESS
        }
        Err(e) => report(&e),
    }
}

fn report(err: &Error) -> ExitCode {
    eprintln!("kurly: {}", err);
    let code = match err {
        Error::InvalidRange { .. } => 33,
        Error::Transport(e) if e.is_timeout() => TIMEOUT_EXIT_CODE as u8,
        _ => 1,
    };
    ExitCode::from(code)
}
