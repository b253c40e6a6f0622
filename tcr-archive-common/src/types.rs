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

//! The raw event model handed to the engine by the upstream crawler.
//! An [`Event`] is one decoded contract log: which contract family emitted
//! it, the decoded ABI payload as a name -> value map, and the coordinates
//! of the log on chain. Events are immutable once constructed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use primitive_types::{H160, H256, U256};

use crate::error::{Error, Result};
use crate::util;

/// A 20-byte contract or account address.
pub type Address = H160;

/// The contract family an event was emitted by.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContractKind {
	Newsroom,
	Registry,
	Voting,
	Parameterizer,
	Government,
	Token,
	MultiSigFactory,
	MultiSig,
}

/// How the crawler obtained the event. Only `LiveWatch` events trigger
/// downstream notifications.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RetrievalMethod {
	HistoricalFilter,
	LiveWatch,
}

/// One decoded ABI value from a log payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbiValue {
	Address(Address),
	Uint(U256),
	Fixed32(H256),
	Bytes(Vec<u8>),
	String(String),
	Bool(bool),
}

/// The decoded payload of a log: event parameter name -> value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload(pub BTreeMap<String, AbiValue>);

impl Payload {
	pub fn new() -> Self {
		Self(BTreeMap::new())
	}

	pub fn insert(&mut self, key: impl Into<String>, value: AbiValue) {
		self.0.insert(key.into(), value);
	}

	pub fn get(&self, key: &str) -> Option<&AbiValue> {
		self.0.get(key)
	}

	pub fn address(&self, key: &str) -> Result<Address> {
		match self.required(key)? {
			AbiValue::Address(a) => Ok(*a),
			_ => Err(Error::FieldType { key: key.to_string(), expected: "address" }),
		}
	}

	pub fn uint(&self, key: &str) -> Result<U256> {
		match self.required(key)? {
			AbiValue::Uint(u) => Ok(*u),
			_ => Err(Error::FieldType { key: key.to_string(), expected: "uint" }),
		}
	}

	/// A uint payload value interpreted as a unix timestamp.
	pub fn timestamp(&self, key: &str) -> Result<i64> {
		Ok(self.uint(key)?.low_u64() as i64)
	}

	pub fn fixed32(&self, key: &str) -> Result<H256> {
		match self.required(key)? {
			AbiValue::Fixed32(h) => Ok(*h),
			_ => Err(Error::FieldType { key: key.to_string(), expected: "bytes32" }),
		}
	}

	pub fn string(&self, key: &str) -> Result<String> {
		match self.required(key)? {
			AbiValue::String(s) => Ok(s.clone()),
			_ => Err(Error::FieldType { key: key.to_string(), expected: "string" }),
		}
	}

	pub fn boolean(&self, key: &str) -> Result<bool> {
		match self.required(key)? {
			AbiValue::Bool(b) => Ok(*b),
			_ => Err(Error::FieldType { key: key.to_string(), expected: "bool" }),
		}
	}

	fn required(&self, key: &str) -> Result<&AbiValue> {
		self.0.get(key).ok_or_else(|| Error::MissingField(key.to_string()))
	}
}

/// Raw coordinates of the log within the chain.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMeta {
	pub block_number: u64,
	pub tx_hash: H256,
	pub tx_index: u64,
	pub block_hash: H256,
	pub log_index: u64,
}

/// A single decoded contract log as delivered by the crawler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
	pub contract: ContractKind,
	pub contract_address: Address,
	/// Event name as emitted; solidity sources prefix these with `_`.
	pub event_type: String,
	pub payload: Payload,
	/// Block timestamp, whole seconds since the epoch.
	pub timestamp: i64,
	pub retrieval: RetrievalMethod,
	pub log: LogMeta,
}

impl Event {
	/// The event name with any leading underscore trimmed.
	pub fn name(&self) -> &str {
		self.event_type.trim_start_matches('_')
	}

	/// A stable identifier for this log, used to key governance events and
	/// the cron watermark. Two deliveries of the same log hash identically.
	pub fn hash(&self) -> String {
		let mut buf = Vec::with_capacity(20 + 32 + 8 + self.event_type.len());
		buf.extend_from_slice(self.contract_address.as_bytes());
		buf.extend_from_slice(self.log.tx_hash.as_bytes());
		buf.extend_from_slice(&self.log.log_index.to_be_bytes());
		buf.extend_from_slice(self.name().as_bytes());
		util::hex_prefixed(&util::keccak256(&buf))
	}
}
