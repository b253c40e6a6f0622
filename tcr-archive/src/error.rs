// Copyright 2019-2021 The tcr-archive Authors.
// This file is part of tcr-archive.

// tcr-archive is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// tcr-archive is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with tcr-archive.  If not, see <http://www.gnu.org/licenses/>.

use std::{env, fmt, io};
use thiserror::Error;

use tcr_archive_gateway::GatewayError;

pub type Result<T, E = ArchiveError> = std::result::Result<T, E>;

/// tcr-archive Error Enum
#[derive(Debug, Error)]
pub enum ArchiveError {
	// Rust std io error
	#[error(transparent)]
	Io(#[from] io::Error),
	#[error(transparent)]
	Env(#[from] env::VarError),
	#[error(transparent)]
	Fmt(#[from] fmt::Error),

	// encoding error
	#[error(transparent)]
	Serialization(#[from] serde_json::Error),

	// database error
	#[error("sqlx error: {0}")]
	Sql(#[from] sqlx::Error),
	#[error("migration error: {0}")]
	Migration(#[from] sqlx::migrate::MigrateError),

	/// malformed or incomplete event payload
	#[error("event payload: {0}")]
	Event(#[from] tcr_archive_common::Error),

	// contract read error
	#[error("gateway error: {0}")]
	Gateway(#[from] GatewayError),

	// metadata scrape error
	#[error(transparent)]
	Http(#[from] reqwest::Error),

	// channel error
	#[error("Sending on a disconnected channel")]
	Channel,

	#[error("{0}")]
	General(String),
}

impl From<&str> for ArchiveError {
	fn from(e: &str) -> Self {
		ArchiveError::General(e.to_string())
	}
}

impl From<String> for ArchiveError {
	fn from(e: String) -> Self {
		ArchiveError::General(e)
	}
}

impl<T> From<flume::SendError<T>> for ArchiveError {
	fn from(_: flume::SendError<T>) -> Self {
		Self::Channel
	}
}
