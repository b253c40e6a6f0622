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

use thiserror::Error;

pub type Result<T, E = GatewayError> = std::result::Result<T, E>;

/// Errors from the contract read path.
#[derive(Error, Debug)]
pub enum GatewayError {
	#[error("http transport: {0}")]
	Http(#[from] reqwest::Error),
	#[error("abi: {0}")]
	Abi(#[from] ethabi::Error),
	#[error("hex: {0}")]
	Hex(#[from] hex::FromHexError),
	/// the node answered with a JSON-RPC level error
	#[error("rpc error {code}: {message}")]
	Rpc { code: i64, message: String },
	#[error("unexpected eth_call response: {0}")]
	UnexpectedResponse(String),
}
