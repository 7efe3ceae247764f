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

//! CLI error types

use std::io;
use std::path::PathBuf;

use tinyget_core::DownloadError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Download failed
    #[error("download failed: {0}")]
    Download(#[from] DownloadError),

    /// Output file could not be created
    #[error("cannot create {path:?}: {source}")]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the body failed
    #[error("output error: {0}")]
    Output(#[source] io::Error),
}
