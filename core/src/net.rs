/*
 * net.rs
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

//! Connection establishment: resolve the host, then try each candidate address in order
//! until one connects. Timeouts are applied by the socket, not polled.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};

use tracing::{debug, warn};

use crate::error::{is_timeout, DownloadError, Result, Stage};
use crate::observer::TransferObserver;
use crate::options::DownloadOptions;
use crate::url::ParsedUrl;

/// Name resolution capability. Returns candidates in the order they should be tried.
pub trait Resolver {
    fn resolve(&self, host: &str, port: u16) -> io::Result<Vec<SocketAddr>>;
}

/// Resolver backed by the system (getaddrinfo via `ToSocketAddrs`). Both IPv4 and IPv6
/// results are returned, in system order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl Resolver for SystemResolver {
    fn resolve(&self, host: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
        Ok((host, port).to_socket_addrs()?.collect())
    }
}

impl<R: Resolver + ?Sized> Resolver for &R {
    fn resolve(&self, host: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
        (**self).resolve(host, port)
    }
}

/// An established TCP connection, exclusively owned by one download.
#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
}

impl Connection {
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Shut down both directions and release the socket.
    pub fn close(self) {
        match self.stream.shutdown(Shutdown::Both) {
            Ok(()) => debug!(peer = %self.peer, "connection closed"),
            // Peer already gone; the socket is released on drop either way.
            Err(e) => debug!(peer = %self.peer, error = %e, "connection shutdown failed"),
        }
    }
}

impl Read for Connection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Write for Connection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

/// Resolve `url`'s host and connect to the first candidate that accepts.
///
/// The observer is consulted before resolution and before every attempt; an abort at either
/// point ends the whole establishment with `Cancelled`.
pub fn connect<R, O>(
    url: &ParsedUrl,
    options: &DownloadOptions,
    resolver: &R,
    observer: &mut O,
) -> Result<Connection>
where
    R: Resolver + ?Sized,
    O: TransferObserver + ?Sized,
{
    let host = url.host();
    if observer.on_resolve(host).is_abort() {
        return Err(DownloadError::cancelled(Stage::Resolve));
    }

    let unreachable = |attempts, last| DownloadError::HostUnreachable {
        host: host.to_string(),
        attempts,
        last,
    };

    // A port that is not a number cannot be resolved.
    let port: u16 = url
        .effective_port()
        .parse()
        .map_err(|_| unreachable(0, None))?;

    let candidates = resolver.resolve(host, port).map_err(|e| {
        debug!(host, port, error = %e, "resolution failed");
        unreachable(0, Some(e))
    })?;
    debug!(host, port, count = candidates.len(), "resolved");

    let mut last = None;
    for (attempt, addr) in candidates.iter().enumerate() {
        if observer.on_connect(addr).is_abort() {
            return Err(DownloadError::cancelled(Stage::Connect));
        }
        debug!(%addr, attempt, "connecting");
        match open(addr, options) {
            Ok(stream) => return configure(stream, *addr, options),
            Err(e) => {
                if is_timeout(&e) {
                    warn!(%addr, "connect timed out, trying next address");
                } else {
                    warn!(%addr, error = %e, "connect failed, trying next address");
                }
                last = Some(e);
            }
        }
    }

    Err(unreachable(candidates.len(), last))
}

fn open(addr: &SocketAddr, options: &DownloadOptions) -> io::Result<TcpStream> {
    match options.effective_connect() {
        Some(timeout) => TcpStream::connect_timeout(addr, timeout),
        None => TcpStream::connect(addr),
    }
}

fn configure(stream: TcpStream, peer: SocketAddr, options: &DownloadOptions) -> Result<Connection> {
    stream
        .set_write_timeout(options.effective_write())
        .and_then(|()| stream.set_read_timeout(options.effective_read()))
        .map_err(DownloadError::Io)?;
    debug!(%peer, "connected");
    Ok(Connection { stream, peer })
}
