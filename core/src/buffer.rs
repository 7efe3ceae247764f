/*
 * buffer.rs
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

//! Fixed-capacity transfer buffer (BytesMut underneath, never grown past its capacity).

use std::io::{self, Read};

use bytes::{BufMut, BytesMut};

/// Capacity of request and response buffers.
pub const TRANSFER_BUFFER_CAPACITY: usize = 4096;

/// Byte buffer that refuses to hold more than `capacity` bytes.
#[derive(Debug)]
pub struct TransferBuffer {
    buf: BytesMut,
    capacity: usize,
}

/// Returned by [`TransferBuffer::append`] when the data would not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full;

impl TransferBuffer {
    pub fn new() -> Self {
        Self::with_capacity(TRANSFER_BUFFER_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.buf.len() >= self.capacity
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Append all of `data` or nothing.
    pub fn append(&mut self, data: &[u8]) -> Result<(), Full> {
        if data.len() > self.capacity - self.buf.len() {
            return Err(Full);
        }
        self.buf.put_slice(data);
        Ok(())
    }

    /// One read from `reader` into the free space. Returns the number of bytes added;
    /// 0 means end of stream (or a full buffer, which callers check first).
    /// Interrupted reads are retried.
    pub fn fill_from<R: Read + ?Sized>(&mut self, reader: &mut R) -> io::Result<usize> {
        let start = self.buf.len();
        if start >= self.capacity {
            return Ok(0);
        }
        self.buf.resize(self.capacity, 0);
        let result = loop {
            match reader.read(&mut self.buf[start..]) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => break other,
            }
        };
        match result {
            Ok(n) => {
                self.buf.truncate(start + n);
                Ok(n)
            }
            Err(e) => {
                self.buf.truncate(start);
                Err(e)
            }
        }
    }
}

impl Default for TransferBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_is_all_or_nothing() {
        let mut b = TransferBuffer::with_capacity(8);
        b.append(b"hello").unwrap();
        assert_eq!(b.append(b"world"), Err(Full));
        assert_eq!(b.as_slice(), b"hello");
        b.append(b"abc").unwrap();
        assert!(b.is_full());
    }

    #[test]
    fn fill_never_exceeds_capacity() {
        let mut b = TransferBuffer::with_capacity(4);
        let mut src: &[u8] = b"0123456789";
        assert_eq!(b.fill_from(&mut src).unwrap(), 4);
        assert_eq!(b.as_slice(), b"0123");
        assert_eq!(b.fill_from(&mut src).unwrap(), 0);
        assert_eq!(src, b"456789");
    }

    #[test]
    fn fill_appends_after_existing_bytes() {
        let mut b = TransferBuffer::with_capacity(16);
        b.append(b"ab").unwrap();
        let mut src: &[u8] = b"cd";
        assert_eq!(b.fill_from(&mut src).unwrap(), 2);
        assert_eq!(b.as_slice(), b"abcd");
    }
}
