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

use std::io;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while handling raw crawler events.
#[derive(Error, Debug)]
pub enum Error {
	#[error(transparent)]
	Io(#[from] io::Error),
	#[error(transparent)]
	Serialization(#[from] serde_json::Error),
	/// a required payload key was absent from the decoded log
	#[error("missing payload field `{0}`")]
	MissingField(String),
	/// a payload key was present but carried the wrong ABI type
	#[error("payload field `{key}` is not a {expected}")]
	FieldType { key: String, expected: &'static str },
	#[error("could not parse `{0}`")]
	Parse(String),
	#[error("{0}")]
	General(String),
}

impl From<&str> for Error {
	fn from(e: &str) -> Error {
		Error::General(e.to_string())
	}
}

impl From<String> for Error {
	fn from(e: String) -> Error {
		Error::General(e)
	}
}
