/*
 * main.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Tinyget, a minimal HTTP/1.1 GET client.
 *
 * Tinyget is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Tinyget is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Tinyget.  If not, see <http://www.gnu.org/licenses/>.
 */

//! tinyget: fetch one URL over plain HTTP/1.1 and write the response body to stdout or a file.

mod error;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tinyget_core::{parse, DownloadOptions, Downloader, Flow, TransferObserver};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(name = "tinyget")]
#[command(about = "Fetch a URL over HTTP/1.1", long_about = None)]
#[command(version)]
struct Cli {
    /// URL to fetch: [scheme://][user[:pass]@]host[:port][/path]
    url: String,

    /// Write the body to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Echo the request to stderr as it is sent
    #[arg(long, default_value_t = false)]
    show_request: bool,

    /// Connect timeout per address in milliseconds (0 = none)
    #[arg(long, env = "TINYGET_CONNECT_TIMEOUT", default_value_t = 0)]
    connect_timeout: u64,

    /// Send timeout in milliseconds (0 = none)
    #[arg(long, env = "TINYGET_WRITE_TIMEOUT", default_value_t = 0)]
    write_timeout: u64,

    /// Receive timeout in milliseconds (0 = none)
    #[arg(long, env = "TINYGET_READ_TIMEOUT", default_value_t = 0)]
    read_timeout: u64,
}

impl Cli {
    fn options(&self) -> DownloadOptions {
        DownloadOptions::from_millis(self.connect_timeout, self.write_timeout, self.read_timeout)
    }
}

/// Logs progress and copies the body to `sink`. A failed write to the sink vetoes the
/// download; the error is kept for reporting.
struct Progress<W: Write> {
    sink: W,
    show_request: bool,
    sink_error: Option<io::Error>,
    body_bytes: u64,
}

impl<W: Write> Progress<W> {
    fn new(sink: W, show_request: bool) -> Self {
        Self {
            sink,
            show_request,
            sink_error: None,
            body_bytes: 0,
        }
    }

    fn finish(mut self) -> Result<u64, CliError> {
        if let Some(e) = self.sink_error.take() {
            return Err(CliError::Output(e));
        }
        self.sink.flush().map_err(CliError::Output)?;
        Ok(self.body_bytes)
    }
}

impl<W: Write> TransferObserver for Progress<W> {
    fn on_resolve(&mut self, host: &str) -> Flow {
        info!("resolving {}", host);
        Flow::Continue
    }

    fn on_connect(&mut self, addr: &SocketAddr) -> Flow {
        info!("connecting to {}", addr);
        Flow::Continue
    }

    fn on_write(&mut self, data: &[u8]) -> Flow {
        if self.show_request {
            if let Err(e) = io::stderr().write_all(data) {
                warn!("cannot echo request: {}", e);
            }
        }
        Flow::Continue
    }

    fn on_read(&mut self, data: &[u8]) -> Flow {
        match self.sink.write_all(data) {
            Ok(()) => {
                self.body_bytes += data.len() as u64;
                Flow::Continue
            }
            Err(e) => {
                self.sink_error = Some(e);
                Flow::Abort
            }
        }
    }
}

/// Initialize tracing subscriber with optional JSON formatting
fn init_tracing() {
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tinyget=info"));

    // Logs go to stderr; stdout carries the body.
    if json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
}

fn fetch<W: Write>(cli: &Cli, sink: W) -> Result<u64, CliError> {
    let url = parse(&cli.url)?;
    let mut progress = Progress::new(sink, cli.show_request);
    let outcome = Downloader::new(cli.options()).download(&url, &mut progress);
    // A sink failure is the root cause of the resulting cancellation.
    if progress.sink_error.is_some() {
        return progress.finish();
    }
    outcome?;
    progress.finish()
}

fn run(cli: &Cli) -> Result<u64, CliError> {
    match &cli.output {
        Some(path) => {
            let file = File::create(path).map_err(|source| CliError::CreateOutput {
                path: path.clone(),
                source,
            })?;
            fetch(cli, BufWriter::new(file))
        }
        None => fetch(cli, io::stdout().lock()),
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(bytes) => info!("received {} body bytes", bytes),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
