/*
 * response.rs
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

//! HTTP/1.1 response reader: accumulate until the end of headers, drop the headers, then
//! stream the body until the peer closes. No Content-Length or chunked accounting.

use std::io::{self, Read};

use tracing::{debug, trace};

use crate::buffer::TransferBuffer;
use crate::error::{DownloadError, Result, Stage};
use crate::observer::TransferObserver;

/// End of the header block.
pub const BOUNDARY: &[u8] = b"\r\n\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState {
    Headers,
    Body,
    Done,
}

/// Find the header/body boundary in `buf`; returns the offset of the first body byte.
pub fn find_boundary(buf: &[u8]) -> Option<usize> {
    buf.windows(BOUNDARY.len())
        .position(|w| w == BOUNDARY)
        .map(|i| i + BOUNDARY.len())
}

/// Find CRLF in buf; return number of bytes to the start of CRLF, or None if not found.
fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}

/// Split the header block (boundary excluded) into lines. Lines are logged, not interpreted.
fn scan_headers(mut block: &[u8]) {
    let mut first = true;
    while let Some(end) = find_crlf(block) {
        let line = String::from_utf8_lossy(&block[..end]);
        if first {
            debug!(status = %line, "response");
            first = false;
        } else {
            trace!(header = %line, "response header");
        }
        block = &block[end + 2..];
    }
}

/// Drives a stream through the header and body phases, forwarding body bytes to the observer.
pub struct ResponseReader {
    state: ReadState,
    buf: TransferBuffer,
    body_bytes: u64,
}

impl ResponseReader {
    pub fn new() -> Self {
        Self::with_buffer(TransferBuffer::new())
    }

    pub fn with_buffer(buf: TransferBuffer) -> Self {
        Self {
            state: ReadState::Headers,
            buf,
            body_bytes: 0,
        }
    }

    pub fn state(&self) -> ReadState {
        self.state
    }

    /// Read until end of stream. Returns the number of body bytes delivered.
    pub fn run<R, O>(&mut self, stream: &mut R, observer: &mut O) -> Result<u64>
    where
        R: Read + ?Sized,
        O: TransferObserver + ?Sized,
    {
        while self.state != ReadState::Done {
            match self.state {
                ReadState::Headers => self.read_headers(stream, observer)?,
                ReadState::Body => self.read_body(stream, observer)?,
                ReadState::Done => {}
            }
        }
        debug!(bytes = self.body_bytes, "response complete");
        Ok(self.body_bytes)
    }

    /// One header-phase read. The whole accumulated buffer is searched each time, so a
    /// boundary split across reads is still found.
    fn read_headers<R, O>(&mut self, stream: &mut R, observer: &mut O) -> Result<()>
    where
        R: Read + ?Sized,
        O: TransferObserver + ?Sized,
    {
        if self.buf.is_full() {
            return Err(DownloadError::Overflow {
                what: "response headers",
                capacity: self.buf.capacity(),
            });
        }
        let n = self.buf.fill_from(stream)?;
        if n == 0 {
            return Err(DownloadError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed before end of headers",
            )));
        }
        let Some(body_start) = find_boundary(self.buf.as_slice()) else {
            return Ok(());
        };

        let accumulated = self.buf.as_slice();
        scan_headers(&accumulated[..body_start - 2]);
        debug!(header_bytes = body_start, "end of headers");
        self.state = ReadState::Body;

        let rest = &accumulated[body_start..];
        if !rest.is_empty() {
            self.body_bytes += rest.len() as u64;
            if observer.on_read(rest).is_abort() {
                return Err(DownloadError::cancelled(Stage::Read));
            }
        }
        self.buf.clear();
        Ok(())
    }

    fn read_body<R, O>(&mut self, stream: &mut R, observer: &mut O) -> Result<()>
    where
        R: Read + ?Sized,
        O: TransferObserver + ?Sized,
    {
        self.buf.clear();
        let n = self.buf.fill_from(stream)?;
        if n == 0 {
            self.state = ReadState::Done;
            return Ok(());
        }
        self.body_bytes += n as u64;
        if observer.on_read(self.buf.as_slice()).is_abort() {
            return Err(DownloadError::cancelled(Stage::Read));
        }
        Ok(())
    }
}

impl Default for ResponseReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a whole response from `stream`, delivering body chunks to `observer`.
pub fn read_response<R, O>(stream: &mut R, observer: &mut O) -> Result<u64>
where
    R: Read + ?Sized,
    O: TransferObserver + ?Sized,
{
    ResponseReader::new().run(stream, observer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::observer::{Callbacks, Flow};
    use std::collections::VecDeque;

    /// Reader that yields the given pieces, one per read call, then end of stream.
    struct Pieces(VecDeque<Vec<u8>>);

    impl Pieces {
        fn new(pieces: &[&[u8]]) -> Self {
            Self(pieces.iter().map(|p| p.to_vec()).collect())
        }
    }

    impl Read for Pieces {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let Some(mut piece) = self.0.pop_front() else {
                return Ok(0);
            };
            let n = piece.len().min(buf.len());
            buf[..n].copy_from_slice(&piece[..n]);
            if n < piece.len() {
                self.0.push_front(piece.split_off(n));
            }
            Ok(n)
        }
    }

    fn collect(pieces: &[&[u8]]) -> (Result<u64>, Vec<Vec<u8>>) {
        let mut chunks = Vec::new();
        let result = {
            let mut cbs = Callbacks::new().with_read(|d| {
                chunks.push(d.to_vec());
                Flow::Continue
            });
            read_response(&mut Pieces::new(pieces), &mut cbs)
        };
        (result, chunks)
    }

    #[test]
    fn finds_boundary() {
        assert_eq!(find_boundary(b"HTTP/1.1 200 OK\r\n\r\nbody"), Some(19));
        assert_eq!(find_boundary(b"HTTP/1.1 200 OK\r\n\r"), None);
    }

    #[test]
    fn body_in_same_read_as_headers() {
        let (r, chunks) = collect(&[b"HTTP/1.1 200 OK\r\nA: b\r\n\r\nhello", b" world"]);
        assert_eq!(r.unwrap(), 11);
        assert_eq!(chunks, vec![b"hello".to_vec(), b" world".to_vec()]);
    }

    #[test]
    fn boundary_split_across_reads() {
        let (r, chunks) = collect(&[b"HTTP/1.1 200 OK\r\nX: y\r\n\r", b"\nbody", b"more"]);
        assert_eq!(r.unwrap(), 8);
        assert_eq!(chunks.concat(), b"bodymore");
        assert!(chunks[0].starts_with(b"body"));
    }

    #[test]
    fn empty_remainder_is_not_delivered() {
        let (r, chunks) = collect(&[b"HTTP/1.1 204 No Content\r\n\r\n"]);
        assert_eq!(r.unwrap(), 0);
        assert!(chunks.is_empty());
    }

    #[test]
    fn headers_larger_than_buffer_overflow() {
        let mut big = b"HTTP/1.1 200 OK\r\n".to_vec();
        big.resize(big.len() + 2 * crate::buffer::TRANSFER_BUFFER_CAPACITY, b'x');
        let (r, chunks) = collect(&[&big]);
        assert_eq!(r.unwrap_err().kind(), ErrorKind::Overflow);
        assert!(chunks.is_empty());
    }

    #[test]
    fn eof_inside_headers_is_io_error() {
        let (r, _) = collect(&[b"HTTP/1.1 200 OK\r\nPartial"]);
        let err = r.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn read_veto_on_first_chunk_cancels() {
        let mut cbs = Callbacks::new().with_read(|_| Flow::Abort);
        let err = read_response(&mut Pieces::new(&[b"HTTP/1.1 200 OK\r\n\r\nx"]), &mut cbs)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn chunks_never_exceed_one_read() {
        let body = vec![b'z'; 10_000];
        let (r, chunks) = collect(&[b"HTTP/1.1 200 OK\r\n\r\n", &body]);
        assert_eq!(r.unwrap(), 10_000);
        assert!(chunks
            .iter()
            .all(|c| c.len() <= crate::buffer::TRANSFER_BUFFER_CAPACITY));
        assert_eq!(chunks.concat(), body);
    }

    #[test]
    fn state_reaches_done() {
        let mut reader = ResponseReader::new();
        assert_eq!(reader.state(), ReadState::Headers);
        let n = reader
            .run(&mut Pieces::new(&[b"HTTP/1.1 200 OK\r\n\r\nab"]), &mut Callbacks::new())
            .unwrap();
        assert_eq!(reader.state(), ReadState::Done);
        assert_eq!(n, 2);
    }

    #[test]
    fn small_buffer_overflows_on_long_status_line() {
        let mut reader = ResponseReader::with_buffer(TransferBuffer::with_capacity(64));
        let status = format!("HTTP/1.1 200 {}\r\n\r\nbody", "O".repeat(80));
        let err = reader
            .run(&mut Pieces::new(&[status.as_bytes()]), &mut Callbacks::new())
            .unwrap_err();
        assert!(matches!(
            err,
            DownloadError::Overflow { what: "response headers", capacity: 64 }
        ));
        assert_eq!(reader.state(), ReadState::Headers);
    }

    #[test]
    fn small_buffer_still_streams_long_body() {
        let mut reader = ResponseReader::with_buffer(TransferBuffer::with_capacity(64));
        let body = vec![b'b'; 500];
        let mut got = Vec::new();
        let mut cbs = Callbacks::new().with_read(|d| {
            assert!(d.len() <= 64);
            got.extend_from_slice(d);
            Flow::Continue
        });
        let n = reader
            .run(&mut Pieces::new(&[b"HTTP/1.1 200 OK\r\n\r\n", &body]), &mut cbs)
            .unwrap();
        drop(cbs);
        assert_eq!(n, 500);
        assert_eq!(got, body);
    }
}
