/*
 * error.rs
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

//! Download errors.

use std::fmt;
use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Stage of a download at which an observer vetoed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolve,
    Connect,
    Write,
    Read,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Resolve => write!(f, "resolve"),
            Stage::Connect => write!(f, "connect"),
            Stage::Write => write!(f, "write"),
            Stage::Read => write!(f, "read"),
        }
    }
}

/// Flat error kind, for callers that only need to branch on the condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    OutOfMemory,
    Cancelled,
    HostUnreachable,
    Timeout,
    Overflow,
    Io,
}

/// Errors from URL parsing or any stage of a download.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("out of memory allocating {requested} bytes")]
    OutOfMemory { requested: usize },

    #[error("cancelled by {stage} callback")]
    Cancelled { stage: Stage },

    #[error("host unreachable: {host} ({attempts} address(es) tried)")]
    HostUnreachable {
        host: String,
        attempts: usize,
        #[source]
        last: Option<io::Error>,
    },

    #[error("timed out{}", .addr.map(|a| format!(" talking to {}", a)).unwrap_or_default())]
    Timeout {
        addr: Option<SocketAddr>,
        #[source]
        source: io::Error,
    },

    #[error("{what} does not fit in {capacity} bytes")]
    Overflow {
        what: &'static str,
        capacity: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

impl DownloadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DownloadError::InvalidInput(_) => ErrorKind::InvalidInput,
            DownloadError::OutOfMemory { .. } => ErrorKind::OutOfMemory,
            DownloadError::Cancelled { .. } => ErrorKind::Cancelled,
            DownloadError::HostUnreachable { .. } => ErrorKind::HostUnreachable,
            DownloadError::Timeout { .. } => ErrorKind::Timeout,
            DownloadError::Overflow { .. } => ErrorKind::Overflow,
            DownloadError::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn cancelled(stage: Stage) -> Self {
        DownloadError::Cancelled { stage }
    }

    /// Classify a transport error. Socket timeouts surface as `TimedOut` or, on Unix
    /// blocking sockets with SO_RCVTIMEO/SO_SNDTIMEO, as `WouldBlock`.
    pub(crate) fn from_io(err: io::Error, addr: Option<SocketAddr>) -> Self {
        if is_timeout(&err) {
            DownloadError::Timeout { addr, source: err }
        } else {
            DownloadError::Io(err)
        }
    }
}

impl From<io::Error> for DownloadError {
    fn from(e: io::Error) -> Self {
        DownloadError::from_io(e, None)
    }
}

pub(crate) fn is_timeout(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}

pub type Result<T> = std::result::Result<T, DownloadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn would_block_is_a_timeout() {
        let e = DownloadError::from(io::Error::from(io::ErrorKind::WouldBlock));
        assert_eq!(e.kind(), ErrorKind::Timeout);
        let e = DownloadError::from(io::Error::from(io::ErrorKind::TimedOut));
        assert_eq!(e.kind(), ErrorKind::Timeout);
    }

    #[test]
    fn other_io_errors_stay_io() {
        let e = DownloadError::from(io::Error::from(io::ErrorKind::ConnectionReset));
        assert_eq!(e.kind(), ErrorKind::Io);
    }

    #[test]
    fn display_names_the_stage() {
        let e = DownloadError::cancelled(Stage::Connect);
        assert_eq!(e.to_string(), "cancelled by connect callback");
    }

    #[test]
    fn timeout_display_includes_address() {
        let addr: SocketAddr = "127.0.0.1:80".parse().unwrap();
        let e = DownloadError::from_io(io::Error::from(io::ErrorKind::TimedOut), Some(addr));
        assert_eq!(e.to_string(), "timed out talking to 127.0.0.1:80");
    }
}
