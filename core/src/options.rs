/*
 * options.rs
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

//! Per-download configuration.

use std::time::Duration;

/// Timeouts for one download. `None` means unbounded. A zero duration is treated as `None`
/// because sockets reject a zero timeout.
///
/// ```
/// use std::time::Duration;
/// use tinyget_core::DownloadOptions;
///
/// let options = DownloadOptions::default()
///     .connect_timeout(Duration::from_secs(5))
///     .read_timeout(Duration::from_secs(30));
/// assert_eq!(options.write_timeout, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DownloadOptions {
    /// Bound on each connection attempt.
    pub connect_timeout: Option<Duration>,
    /// Bound on each send once connected.
    pub write_timeout: Option<Duration>,
    /// Bound on each receive once connected.
    pub read_timeout: Option<Duration>,
}

impl DownloadOptions {
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = bounded(timeout);
        self
    }

    #[must_use]
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = bounded(timeout);
        self
    }

    #[must_use]
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = bounded(timeout);
        self
    }

    /// Build from millisecond values where 0 means no timeout (C API and CLI form).
    pub fn from_millis(connect: u64, write: u64, read: u64) -> Self {
        Self {
            connect_timeout: bounded(Duration::from_millis(connect)),
            write_timeout: bounded(Duration::from_millis(write)),
            read_timeout: bounded(Duration::from_millis(read)),
        }
    }

    pub(crate) fn effective_connect(&self) -> Option<Duration> {
        self.connect_timeout.filter(|d| !d.is_zero())
    }

    pub(crate) fn effective_write(&self) -> Option<Duration> {
        self.write_timeout.filter(|d| !d.is_zero())
    }

    pub(crate) fn effective_read(&self) -> Option<Duration> {
        self.read_timeout.filter(|d| !d.is_zero())
    }
}

fn bounded(timeout: Duration) -> Option<Duration> {
    if timeout.is_zero() {
        None
    } else {
        Some(timeout)
    }
}
