/*
 * lib.rs
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

//! Tinyget core: a minimal, blocking HTTP/1.1 GET client.
//!
//! - [`parse`] splits a URL of the form `[scheme://][user[:pass]@]host[:port][/path]` into
//!   optional segments, without validation or percent-decoding.
//! - [`download`] resolves the host, connects to the first candidate that accepts, sends one
//!   request and streams the response body to a [`TransferObserver`] until the peer closes.
//! - Every stage can be vetoed by the observer; the result is a [`DownloadError`] naming the
//!   condition.
//!
//! Plain TCP only: no TLS, redirects, chunked decoding or connection reuse.

pub mod buffer;
pub mod download;
pub mod error;
pub mod http;
pub mod net;
pub mod observer;
pub mod options;
pub mod url;

pub use buffer::{TransferBuffer, TRANSFER_BUFFER_CAPACITY};
pub use download::{download, get, Downloader};
pub use error::{DownloadError, ErrorKind, Result, Stage};
pub use http::{build_request, read_response, send_request};
pub use net::{connect, Connection, Resolver, SystemResolver};
pub use observer::{Callbacks, Flow, NoopObserver, TransferObserver};
pub use options::DownloadOptions;
pub use url::{parse, ParsedUrl};
