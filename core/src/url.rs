/*
 * url.rs
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

//! URL segmentation: `[scheme://][user[:pass]@]host[:port][/path]`.
//!
//! This is a segmentation pass, not a validator. Each segment is a range into one owned copy
//! of the input; segments never overlap and the path keeps its leading `/`.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::error::{DownloadError, Result};

/// A URL split into its segments. Absent segments are `None`, never empty strings
/// (except `user` and `port`, which are present-but-empty when their delimiter is).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    original: String,
    scheme: Option<Range<usize>>,
    user: Option<Range<usize>>,
    pass: Option<Range<usize>>,
    host: Range<usize>,
    port: Option<Range<usize>>,
    path: Option<Range<usize>>,
}

/// Parse `input` into its segments. Fails with `InvalidInput` when the input is empty or
/// leaves no host, and with `OutOfMemory` when the backing copy cannot be allocated.
pub fn parse(input: &str) -> Result<ParsedUrl> {
    if input.is_empty() {
        return Err(DownloadError::InvalidInput("empty URL"));
    }

    let mut original = String::new();
    original
        .try_reserve_exact(input.len())
        .map_err(|_| DownloadError::OutOfMemory { requested: input.len() })?;
    original.push_str(input);

    let s = original.as_str();
    let mut pos = 0;
    let mut end = s.len();

    let mut scheme = None;
    if let Some(i) = s[pos..].find("://") {
        scheme = Some(pos..pos + i);
        pos += i + 3;
    }

    // Path keeps its '/'; the authority ends just before it.
    let mut path = None;
    if let Some(i) = s[pos..].find('/') {
        path = Some(pos + i..end);
        end = pos + i;
    }

    let mut user = None;
    let mut pass = None;
    if let Some(i) = s[pos..end].find('@') {
        let info = pos..pos + i;
        pos += i + 1;
        match s[info.clone()].find(':') {
            Some(j) => {
                user = Some(info.start..info.start + j);
                let p = info.start + j + 1..info.end;
                if !p.is_empty() {
                    pass = Some(p);
                }
            }
            None => user = Some(info),
        }
    }

    let mut port = None;
    if let Some(i) = s[pos..end].find(':') {
        port = Some(pos + i + 1..end);
        end = pos + i;
    }

    let host = pos..end;
    if host.is_empty() {
        return Err(DownloadError::InvalidInput("URL has no host"));
    }

    Ok(ParsedUrl {
        original,
        scheme,
        user,
        pass,
        host,
        port,
        path,
    })
}

impl ParsedUrl {
    fn segment(&self, range: &Option<Range<usize>>) -> Option<&str> {
        range.as_ref().map(|r| &self.original[r.clone()])
    }

    pub fn scheme(&self) -> Option<&str> {
        self.segment(&self.scheme)
    }

    pub fn user(&self) -> Option<&str> {
        self.segment(&self.user)
    }

    pub fn pass(&self) -> Option<&str> {
        self.segment(&self.pass)
    }

    pub fn host(&self) -> &str {
        &self.original[self.host.clone()]
    }

    pub fn port(&self) -> Option<&str> {
        self.segment(&self.port)
    }

    pub fn path(&self) -> Option<&str> {
        self.segment(&self.path)
    }

    /// Port to connect to: the explicit port, else 443 for https and 80 for anything else.
    pub fn effective_port(&self) -> &str {
        match self.port() {
            Some(p) => p,
            None if self
                .scheme()
                .is_some_and(|s| s.eq_ignore_ascii_case("https")) =>
            {
                "443"
            }
            None => "80",
        }
    }

    /// Request target for the request line.
    pub fn request_target(&self) -> &str {
        self.path().unwrap_or("/")
    }
}

impl FromStr for ParsedUrl {
    type Err = DownloadError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

/// Reassembles the present segments with their delimiters.
impl fmt::Display for ParsedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = self.scheme() {
            write!(f, "{}://", scheme)?;
        }
        if let Some(user) = self.user() {
            f.write_str(user)?;
            if let Some(pass) = self.pass() {
                write!(f, ":{}", pass)?;
            }
            f.write_str("@")?;
        }
        f.write_str(self.host())?;
        if let Some(port) = self.port() {
            write!(f, ":{}", port)?;
        }
        if let Some(path) = self.path() {
            f.write_str(path)?;
        }
        Ok(())
    }
}
