/*
 * download.rs
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

//! Download orchestration: establish, send, receive, close.

use tracing::{debug, debug_span};

use crate::error::{DownloadError, Result};
use crate::http::{read_response, send_request};
use crate::net::{connect, Connection, Resolver, SystemResolver};
use crate::observer::TransferObserver;
use crate::options::DownloadOptions;
use crate::url::{parse, ParsedUrl};

/// Runs downloads with fixed options and a resolver. Holds no per-download state, so one
/// `Downloader` may serve any number of sequential downloads.
#[derive(Debug, Clone, Default)]
pub struct Downloader<R = SystemResolver> {
    options: DownloadOptions,
    resolver: R,
}

impl Downloader<SystemResolver> {
    pub fn new(options: DownloadOptions) -> Self {
        Self {
            options,
            resolver: SystemResolver,
        }
    }
}

impl<R: Resolver> Downloader<R> {
    pub fn with_resolver(options: DownloadOptions, resolver: R) -> Self {
        Self { options, resolver }
    }

    /// Fetch `url`, passing body chunks to `observer`. The connection is closed before this
    /// returns, whatever the outcome.
    pub fn download<O>(&self, url: &ParsedUrl, observer: &mut O) -> Result<()>
    where
        O: TransferObserver + ?Sized,
    {
        let span = debug_span!("download", host = url.host());
        let _enter = span.enter();

        let mut conn = connect(url, &self.options, &self.resolver, observer)?;
        let result = exchange(url, &mut conn, observer);
        let peer = conn.peer();
        conn.close();
        match &result {
            Ok(()) => debug!("download complete"),
            Err(e) => debug!(error = %e, "download failed"),
        }
        result.map_err(|e| with_peer(e, peer))
    }

    /// Parse `url` and fetch it.
    pub fn get<O>(&self, url: &str, observer: &mut O) -> Result<()>
    where
        O: TransferObserver + ?Sized,
    {
        self.download(&parse(url)?, observer)
    }
}

fn exchange<O>(url: &ParsedUrl, conn: &mut Connection, observer: &mut O) -> Result<()>
where
    O: TransferObserver + ?Sized,
{
    send_request(url, conn, observer)?;
    read_response(conn, observer)?;
    Ok(())
}

/// Attach the peer address to a socket timeout raised after connecting.
fn with_peer(err: DownloadError, peer: std::net::SocketAddr) -> DownloadError {
    match err {
        DownloadError::Timeout { addr: None, source } => DownloadError::Timeout {
            addr: Some(peer),
            source,
        },
        other => other,
    }
}

/// Fetch `url` with the system resolver.
pub fn download<O>(url: &ParsedUrl, options: &DownloadOptions, observer: &mut O) -> Result<()>
where
    O: TransferObserver + ?Sized,
{
    Downloader::new(*options).download(url, observer)
}

/// Parse `url` and fetch it with the system resolver.
pub fn get<O>(url: &str, options: &DownloadOptions, observer: &mut O) -> Result<()>
where
    O: TransferObserver + ?Sized,
{
    Downloader::new(*options).get(url, observer)
}
