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

//! hashing and hex-formatting utilities

use tiny_keccak::{Hasher as _, Keccak};

use crate::error::{Error, Result};
use crate::types::{Address, H256, U256};

/// Keccak-256 of `data`.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
	let mut keccak = Keccak::v256();
	let mut out = [0u8; 32];
	keccak.update(data);
	keccak.finalize(&mut out);
	out
}

/// Lowercase `0x`-prefixed hex.
pub fn hex_prefixed(data: &[u8]) -> String {
	format!("0x{}", hex::encode(data))
}

/// Canonical string form of an address: lowercase hex with `0x` prefix.
/// Address comparisons on stored strings are case-insensitive by virtue of
/// every writer going through this.
pub fn address_string(addr: &Address) -> String {
	hex_prefixed(addr.as_bytes())
}

pub fn h256_string(hash: &H256) -> String {
	hex_prefixed(hash.as_bytes())
}

/// Parse an address from hex, with or without the `0x` prefix, any case.
pub fn parse_address(s: &str) -> Result<Address> {
	let stripped = s.trim_start_matches("0x").trim_start_matches("0X");
	let bytes = hex::decode(stripped).map_err(|_| Error::Parse(s.to_string()))?;
	if bytes.len() != 20 {
		return Err(Error::Parse(s.to_string()));
	}
	Ok(Address::from_slice(&bytes))
}

pub fn parse_h256(s: &str) -> Result<H256> {
	let stripped = s.trim_start_matches("0x").trim_start_matches("0X");
	let bytes = hex::decode(stripped).map_err(|_| Error::Parse(s.to_string()))?;
	if bytes.len() != 32 {
		return Err(Error::Parse(s.to_string()));
	}
	Ok(H256::from_slice(&bytes))
}

/// Parse a base-10 big integer as stored in the database.
pub fn parse_u256(s: &str) -> Result<U256> {
	U256::from_dec_str(s).map_err(|_| Error::Parse(s.to_string()))
}
