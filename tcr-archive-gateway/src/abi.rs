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

//! Hand-written ABI plumbing for the gateway's read calls.
//!
//! The call surface is small and fixed, so calls are encoded from plain
//! signature strings rather than generated bindings.

pub use ethabi::{ParamType, Token};

use tcr_archive_common::{util, Address, H256, U256};

use crate::error::{GatewayError, Result};

/// First four bytes of the keccak of the canonical signature.
pub fn selector(signature: &str) -> [u8; 4] {
	let hash = util::keccak256(signature.as_bytes());
	[hash[0], hash[1], hash[2], hash[3]]
}

/// Calldata for `signature` with `args` appended.
pub fn encode_call(signature: &str, args: &[Token]) -> Vec<u8> {
	let mut data = selector(signature).to_vec();
	data.extend(ethabi::encode(args));
	data
}

/// Decode raw return data into an [`Outputs`] cursor over the expected
/// parameter types.
pub fn decode_output(kinds: &[ParamType], data: &[u8]) -> Result<Outputs> {
	let tokens = ethabi::decode(kinds, data)?;
	Ok(Outputs(tokens.into_iter()))
}

/// Cursor over decoded return values, consumed left to right.
pub struct Outputs(std::vec::IntoIter<Token>);

impl Outputs {
	fn next(&mut self, expected: &'static str) -> Result<Token> {
		self.0
			.next()
			.ok_or_else(|| GatewayError::UnexpectedResponse(format!("return data ended, wanted {}", expected)))
	}

	pub fn uint(&mut self) -> Result<U256> {
		match self.next("uint")? {
			Token::Uint(u) => Ok(u),
			other => Err(unexpected("uint", &other)),
		}
	}

	pub fn address(&mut self) -> Result<Address> {
		match self.next("address")? {
			Token::Address(a) => Ok(a),
			other => Err(unexpected("address", &other)),
		}
	}

	pub fn boolean(&mut self) -> Result<bool> {
		match self.next("bool")? {
			Token::Bool(b) => Ok(b),
			other => Err(unexpected("bool", &other)),
		}
	}

	pub fn string(&mut self) -> Result<String> {
		match self.next("string")? {
			Token::String(s) => Ok(s),
			other => Err(unexpected("string", &other)),
		}
	}

	pub fn bytes(&mut self) -> Result<Vec<u8>> {
		match self.next("bytes")? {
			Token::Bytes(b) => Ok(b),
			other => Err(unexpected("bytes", &other)),
		}
	}

	pub fn fixed32(&mut self) -> Result<H256> {
		match self.next("bytes32")? {
			Token::FixedBytes(b) if b.len() == 32 => Ok(H256::from_slice(&b)),
			other => Err(unexpected("bytes32", &other)),
		}
	}

	pub fn address_array(&mut self) -> Result<Vec<Address>> {
		match self.next("address[]")? {
			Token::Array(items) => items
				.into_iter()
				.map(|t| match t {
					Token::Address(a) => Ok(a),
					other => Err(unexpected("address", &other)),
				})
				.collect(),
			other => Err(unexpected("address[]", &other)),
		}
	}
}

fn unexpected(expected: &str, got: &Token) -> GatewayError {
	GatewayError::UnexpectedResponse(format!("wanted {}, got {:?}", expected, got))
}
