/*
 * observer.rs
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

//! Transfer observer: the four veto points of a download.
//!
//! Events: on_resolve → on_connect (×candidates tried) → on_write (×n) → on_read (×n).

use std::net::SocketAddr;

/// Decision returned by every observer method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    #[default]
    Continue,
    Abort,
}

impl Flow {
    pub fn is_abort(self) -> bool {
        self == Flow::Abort
    }
}

/// Receives download events and may veto at each of them. `Abort` stops the download with
/// `Cancelled` at the next safe point. Unimplemented methods continue.
pub trait TransferObserver {
    /// Called once, before the host name is resolved.
    fn on_resolve(&mut self, _host: &str) -> Flow {
        Flow::Continue
    }

    /// Called before each connection attempt. Aborting here stops the whole download,
    /// not just this candidate.
    fn on_connect(&mut self, _addr: &SocketAddr) -> Flow {
        Flow::Continue
    }

    /// Called after each successful send with exactly the bytes that send wrote.
    fn on_write(&mut self, _data: &[u8]) -> Flow {
        Flow::Continue
    }

    /// Called with each non-empty chunk of response body. Header bytes are never passed here.
    fn on_read(&mut self, _data: &[u8]) -> Flow {
        Flow::Continue
    }
}

/// Observer that never vetoes and ignores all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TransferObserver for NoopObserver {}

impl<T: TransferObserver + ?Sized> TransferObserver for &mut T {
    fn on_resolve(&mut self, host: &str) -> Flow {
        (**self).on_resolve(host)
    }

    fn on_connect(&mut self, addr: &SocketAddr) -> Flow {
        (**self).on_connect(addr)
    }

    fn on_write(&mut self, data: &[u8]) -> Flow {
        (**self).on_write(data)
    }

    fn on_read(&mut self, data: &[u8]) -> Flow {
        (**self).on_read(data)
    }
}

type ResolveFn<'a> = Box<dyn FnMut(&str) -> Flow + 'a>;
type ConnectFn<'a> = Box<dyn FnMut(&SocketAddr) -> Flow + 'a>;
type DataFn<'a> = Box<dyn FnMut(&[u8]) -> Flow + 'a>;

/// Closure slots for the four events. Each closure carries its own context by capture.
/// Empty slots continue.
///
/// ```
/// use tinyget_core::{Callbacks, Flow};
///
/// let mut body = Vec::new();
/// let callbacks = Callbacks::new().with_read(|chunk| {
///     body.extend_from_slice(chunk);
///     Flow::Continue
/// });
/// # drop(callbacks);
/// ```
#[derive(Default)]
pub struct Callbacks<'a> {
    resolve: Option<ResolveFn<'a>>,
    connect: Option<ConnectFn<'a>>,
    write: Option<DataFn<'a>>,
    read: Option<DataFn<'a>>,
}

impl<'a> Callbacks<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_resolve(mut self, f: impl FnMut(&str) -> Flow + 'a) -> Self {
        self.resolve = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn with_connect(mut self, f: impl FnMut(&SocketAddr) -> Flow + 'a) -> Self {
        self.connect = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn with_write(mut self, f: impl FnMut(&[u8]) -> Flow + 'a) -> Self {
        self.write = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn with_read(mut self, f: impl FnMut(&[u8]) -> Flow + 'a) -> Self {
        self.read = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for Callbacks<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("resolve", &self.resolve.is_some())
            .field("connect", &self.connect.is_some())
            .field("write", &self.write.is_some())
            .field("read", &self.read.is_some())
            .finish()
    }
}

impl TransferObserver for Callbacks<'_> {
    fn on_resolve(&mut self, host: &str) -> Flow {
        self.resolve.as_mut().map_or(Flow::Continue, |f| f(host))
    }

    fn on_connect(&mut self, addr: &SocketAddr) -> Flow {
        self.connect.as_mut().map_or(Flow::Continue, |f| f(addr))
    }

    fn on_write(&mut self, data: &[u8]) -> Flow {
        self.write.as_mut().map_or(Flow::Continue, |f| f(data))
    }

    fn on_read(&mut self, data: &[u8]) -> Flow {
        self.read.as_mut().map_or(Flow::Continue, |f| f(data))
    }
}
