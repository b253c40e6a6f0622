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

//! Minimal JSON-RPC client for the `eth_call` surface the gateway needs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Deserialize;

use tcr_archive_common::{util, Address};

use crate::error::{GatewayError, Result};

#[derive(Clone, Debug)]
pub struct RpcClient {
	http: reqwest::Client,
	url: String,
	id: Arc<AtomicU64>,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
	result: Option<String>,
	error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
	code: i64,
	message: String,
}

impl RpcClient {
	pub fn new(url: impl Into<String>) -> Self {
		Self { http: reqwest::Client::new(), url: url.into(), id: Arc::new(AtomicU64::new(1)) }
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	/// Execute a read-only call against latest state and return the raw
	/// return data.
	pub async fn eth_call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>> {
		let id = self.id.fetch_add(1, Ordering::Relaxed);
		let body = serde_json::json!({
			"jsonrpc": "2.0",
			"id": id,
			"method": "eth_call",
			"params": [
				{ "to": util::address_string(&to), "data": util::hex_prefixed(&data) },
				"latest",
			],
		});
		log::trace!("eth_call to={} data={}", util::address_string(&to), util::hex_prefixed(&data));
		let resp: RpcResponse = self.http.post(&self.url).json(&body).send().await?.json().await?;
		if let Some(err) = resp.error {
			return Err(GatewayError::Rpc { code: err.code, message: err.message });
		}
		let result = resp.result.ok_or_else(|| GatewayError::UnexpectedResponse("neither result nor error".into()))?;
		Ok(hex::decode(result.trim_start_matches("0x"))?)
	}
}
