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

//! C FFI for tinyget core. Failing calls return NULL or -1 and set errno; a message for
//! the last failure on the calling thread is available from tinyget_last_error.
//! All string parameters are UTF-8 NUL-terminated.

use libc::{c_char, c_int, c_void, size_t};
use std::ffi::{CStr, CString};
use std::net::SocketAddr;
use std::ptr;
use tinyget_core::{
    parse, DownloadError, DownloadOptions, Downloader, ErrorKind, Flow, ParsedUrl,
    TransferObserver,
};

/// Veto value for every callback.
pub const TINYGET_ABORT: c_int = -1;

type OnResolve = extern "C" fn(*const c_char, *mut c_void) -> c_int;
type OnConnect = extern "C" fn(*const c_char, *mut c_void) -> c_int;
type OnData = extern "C" fn(*const u8, size_t, *mut c_void) -> c_int;

/// Download callbacks. Any callback may be NULL. Returning TINYGET_ABORT (-1) stops the
/// download, which then fails with ECANCELED. Each callback receives its own data pointer.
#[repr(C)]
pub struct TinygetCallbacks {
    /// Before resolution; receives the host.
    pub resolve: Option<OnResolve>,
    pub resolve_data: *mut c_void,
    /// Before each connection attempt; receives the candidate as "ip:port".
    pub connect: Option<OnConnect>,
    pub connect_data: *mut c_void,
    /// After each send, with the bytes that send wrote.
    pub write: Option<OnData>,
    pub write_data: *mut c_void,
    /// With each chunk of response body.
    pub read: Option<OnData>,
    pub read_data: *mut c_void,
}

/// Timeouts in milliseconds. 0 means no timeout.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct TinygetTimeouts {
    pub connect_ms: u64,
    pub write_ms: u64,
    pub read_ms: u64,
}

/// Parsed URL. Segment strings are owned by the handle; free it with tinyget_url_free.
pub struct TinygetUrl {
    url: ParsedUrl,
    scheme: Option<CString>,
    user: Option<CString>,
    pass: Option<CString>,
    host: CString,
    port: Option<CString>,
    path: Option<CString>,
}

/// Copy of a segment taken from NUL-terminated input, so it holds no interior NUL.
fn c_segment(s: &str) -> CString {
    CString::new(s).unwrap_or_default()
}

impl TinygetUrl {
    fn new(url: ParsedUrl) -> Self {
        Self {
            scheme: url.scheme().map(c_segment),
            user: url.user().map(c_segment),
            pass: url.pass().map(c_segment),
            host: c_segment(url.host()),
            port: url.port().map(c_segment),
            path: url.path().map(c_segment),
            url,
        }
    }
}

thread_local! {
    static LAST_ERROR: std::cell::RefCell<Option<CString>> = std::cell::RefCell::new(None);
}

fn set_last_error(message: String) {
    let msg = CString::new(message).unwrap_or_else(|_| c"(error)".to_owned());
    LAST_ERROR.with(|e| *e.borrow_mut() = Some(msg));
}

fn clear_last_error() {
    LAST_ERROR.with(|e| *e.borrow_mut() = None);
}

#[cfg(any(target_os = "linux", target_os = "emscripten", target_os = "fuchsia"))]
unsafe fn errno_location() -> *mut c_int {
    libc::__errno_location()
}

#[cfg(any(target_os = "android", target_os = "netbsd", target_os = "openbsd"))]
unsafe fn errno_location() -> *mut c_int {
    libc::__errno()
}

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly"
))]
unsafe fn errno_location() -> *mut c_int {
    libc::__error()
}

#[cfg(any(
    target_os = "linux",
    target_os = "emscripten",
    target_os = "fuchsia",
    target_os = "android",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly"
))]
fn set_errno(code: c_int) {
    // SAFETY: errno_location returns the calling thread's errno slot.
    unsafe { *errno_location() = code }
}

/// No errno slot on this target; tinyget_last_error still reports the failure.
#[cfg(not(any(
    target_os = "linux",
    target_os = "emscripten",
    target_os = "fuchsia",
    target_os = "android",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly"
)))]
fn set_errno(_code: c_int) {}

fn errno_for(err: &DownloadError) -> c_int {
    match err.kind() {
        ErrorKind::InvalidInput => libc::EINVAL,
        ErrorKind::OutOfMemory => libc::ENOMEM,
        ErrorKind::Cancelled => libc::ECANCELED,
        ErrorKind::HostUnreachable => libc::EHOSTUNREACH,
        ErrorKind::Timeout => libc::ETIMEDOUT,
        ErrorKind::Overflow => libc::EOVERFLOW,
        ErrorKind::Io => match err {
            DownloadError::Io(e) => e.raw_os_error().unwrap_or(libc::EIO),
            _ => libc::EIO,
        },
    }
}

fn fail(err: &DownloadError) {
    set_last_error(err.to_string());
    set_errno(errno_for(err));
}

fn invalid(message: &str) {
    set_last_error(message.to_string());
    set_errno(libc::EINVAL);
}

/// Adapts C callbacks to the core observer.
struct CObserver<'a> {
    cbs: Option<&'a TinygetCallbacks>,
}

fn flow(rc: c_int) -> Flow {
    if rc == TINYGET_ABORT {
        Flow::Abort
    } else {
        Flow::Continue
    }
}

impl TransferObserver for CObserver<'_> {
    fn on_resolve(&mut self, host: &str) -> Flow {
        let Some((cb, data)) = self.cbs.and_then(|c| c.resolve.map(|f| (f, c.resolve_data))) else {
            return Flow::Continue;
        };
        match CString::new(host) {
            Ok(host) => flow(cb(host.as_ptr(), data)),
            Err(_) => Flow::Abort,
        }
    }

    fn on_connect(&mut self, addr: &SocketAddr) -> Flow {
        let Some((cb, data)) = self.cbs.and_then(|c| c.connect.map(|f| (f, c.connect_data))) else {
            return Flow::Continue;
        };
        match CString::new(addr.to_string()) {
            Ok(addr) => flow(cb(addr.as_ptr(), data)),
            Err(_) => Flow::Abort,
        }
    }

    fn on_write(&mut self, bytes: &[u8]) -> Flow {
        self.cbs
            .and_then(|c| c.write.map(|f| (f, c.write_data)))
            .map_or(Flow::Continue, |(cb, data)| flow(cb(bytes.as_ptr(), bytes.len(), data)))
    }

    fn on_read(&mut self, bytes: &[u8]) -> Flow {
        self.cbs
            .and_then(|c| c.read.map(|f| (f, c.read_data)))
            .map_or(Flow::Continue, |(cb, data)| flow(cb(bytes.as_ptr(), bytes.len(), data)))
    }
}

/// Version string (static, do not free).
#[no_mangle]
pub extern "C" fn tinyget_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}

/// Last error message from a failed call on this thread. Valid until the next call.
/// Do not free.
#[no_mangle]
pub extern "C" fn tinyget_last_error() -> *const c_char {
    LAST_ERROR.with(|e| {
        e.borrow()
            .as_ref()
            .map(|s| s.as_ptr())
            .unwrap_or(ptr::null())
    })
}

// ---------- URL ----------

/// Parse `s` into a URL handle. Returns NULL and sets errno (EINVAL, ENOMEM) on error.
#[no_mangle]
pub unsafe extern "C" fn tinyget_url_parse(s: *const c_char) -> *mut TinygetUrl {
    if s.is_null() {
        invalid("url is null");
        return ptr::null_mut();
    }
    let Ok(text) = CStr::from_ptr(s).to_str() else {
        invalid("url is not valid UTF-8");
        return ptr::null_mut();
    };
    match parse(text) {
        Ok(url) => {
            clear_last_error();
            Box::into_raw(Box::new(TinygetUrl::new(url)))
        }
        Err(e) => {
            fail(&e);
            ptr::null_mut()
        }
    }
}

/// Free a handle from tinyget_url_parse. No-op if url is NULL.
#[no_mangle]
pub unsafe extern "C" fn tinyget_url_free(url: *mut TinygetUrl) {
    if !url.is_null() {
        drop(Box::from_raw(url));
    }
}

unsafe fn segment(
    url: *const TinygetUrl,
    pick: impl FnOnce(&TinygetUrl) -> Option<&CString>,
) -> *const c_char {
    url.as_ref()
        .and_then(pick)
        .map_or(ptr::null(), |s| s.as_ptr())
}

/// Scheme, or NULL if absent. Owned by the handle.
#[no_mangle]
pub unsafe extern "C" fn tinyget_url_scheme(url: *const TinygetUrl) -> *const c_char {
    segment(url, |u| u.scheme.as_ref())
}

/// User, or NULL if absent. May be empty.
#[no_mangle]
pub unsafe extern "C" fn tinyget_url_user(url: *const TinygetUrl) -> *const c_char {
    segment(url, |u| u.user.as_ref())
}

/// Password, or NULL if absent or empty.
#[no_mangle]
pub unsafe extern "C" fn tinyget_url_pass(url: *const TinygetUrl) -> *const c_char {
    segment(url, |u| u.pass.as_ref())
}

/// Host; never NULL for a valid handle.
#[no_mangle]
pub unsafe extern "C" fn tinyget_url_host(url: *const TinygetUrl) -> *const c_char {
    segment(url, |u| Some(&u.host))
}

/// Port text as written, or NULL if absent. Not validated.
#[no_mangle]
pub unsafe extern "C" fn tinyget_url_port(url: *const TinygetUrl) -> *const c_char {
    segment(url, |u| u.port.as_ref())
}

/// Path including the leading '/', or NULL if absent.
#[no_mangle]
pub unsafe extern "C" fn tinyget_url_path(url: *const TinygetUrl) -> *const c_char {
    segment(url, |u| u.path.as_ref())
}

// ---------- Download ----------

/// Download `url`. cbs and timeouts may be NULL (no callbacks, no timeouts).
/// Returns 0 on success, otherwise -1 with errno set: EINVAL, ECANCELED, EHOSTUNREACH,
/// ETIMEDOUT, EOVERFLOW, or the OS error of a failed send/receive (EIO if none).
#[no_mangle]
pub unsafe extern "C" fn tinyget_download(
    url: *const TinygetUrl,
    cbs: *const TinygetCallbacks,
    timeouts: *const TinygetTimeouts,
) -> c_int {
    let Some(url) = url.as_ref() else {
        invalid("url is null");
        return -1;
    };
    let t = timeouts.as_ref().copied().unwrap_or_default();
    let options = DownloadOptions::from_millis(t.connect_ms, t.write_ms, t.read_ms);
    let mut observer = CObserver { cbs: cbs.as_ref() };
    match Downloader::new(options).download(&url.url, &mut observer) {
        Ok(()) => {
            clear_last_error();
            0
        }
        Err(e) => {
            fail(&e);
            -1
        }
    }
}
