/*
 * request.rs
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

//! HTTP/1.1 GET request: built whole into a bounded buffer, then written in as many sends
//! as the stream needs.

use std::io::{self, Write};

use tracing::debug;

use crate::buffer::TransferBuffer;
use crate::error::{DownloadError, Result, Stage};
use crate::observer::TransferObserver;
use crate::url::ParsedUrl;

/// Headers sent with every request, in order, after `Host`.
const FIXED_HEADERS: [(&str, &str); 2] = [("Connection", "close"), ("Accept-Encoding", "identity")];

/// Serialize the request for `url` into `buf`. Fails with `Overflow` if it does not fit;
/// on failure the buffer content is unspecified and must not be sent.
pub fn build_request(url: &ParsedUrl, buf: &mut TransferBuffer) -> Result<()> {
    let overflow = DownloadError::Overflow {
        what: "request",
        capacity: buf.capacity(),
    };
    let mut line = |parts: &[&str]| {
        parts
            .iter()
            .map(|p| p.as_bytes())
            .chain([&b"\r\n"[..]])
            .try_for_each(|bytes| buf.append(bytes))
    };

    line(&["GET ", url.request_target(), " HTTP/1.1"])
        .and_then(|()| line(&["Host: ", url.host()]))
        .and_then(|()| {
            FIXED_HEADERS
                .iter()
                .try_for_each(|&(name, value)| line(&[name, ": ", value]))
        })
        .and_then(|()| line(&[""]))
        .map_err(|_| overflow)
}

/// Build and send the request. `on_write` sees exactly the bytes of each successful send.
pub fn send_request<W, O>(url: &ParsedUrl, stream: &mut W, observer: &mut O) -> Result<()>
where
    W: Write + ?Sized,
    O: TransferObserver + ?Sized,
{
    let mut buf = TransferBuffer::new();
    build_request(url, &mut buf)?;
    let request = buf.as_slice();
    debug!(bytes = request.len(), target = url.request_target(), "sending request");

    let mut sent = 0;
    while sent < request.len() {
        let n = match stream.write(&request[sent..]) {
            Ok(0) => return Err(DownloadError::Io(io::Error::from(io::ErrorKind::WriteZero))),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(DownloadError::from(e)),
        };
        if observer.on_write(&request[sent..sent + n]).is_abort() {
            return Err(DownloadError::cancelled(Stage::Write));
        }
        sent += n;
    }
    stream.flush()?;
    Ok(())
}
