/*
 * mod.rs
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

//! HTTP/1.1 GET over an established byte stream.
//!
//! - Request: fixed header set, built whole into a 4096-byte buffer before any send.
//! - Response: headers accumulated in the same bounded buffer and discarded; body streamed
//!   to the observer in chunks of at most one read, until the peer closes.

mod request;
mod response;

pub use request::{build_request, send_request};
pub use response::{find_boundary, read_response, ReadState, ResponseReader, BOUNDARY};
