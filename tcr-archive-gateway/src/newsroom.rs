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

//! Reads against a newsroom contract: identity, ownership and the
//! content/revision tree (content id 0 is the charter).

use async_trait::async_trait;

use tcr_archive_common::{Address, H256, U256};

use crate::abi::{self, ParamType, Token};
use crate::error::Result;
use crate::EthGateway;

/// The latest revision of one content item, as `getContent` returns it.
#[derive(Clone, Debug, PartialEq)]
pub struct NewsroomContent {
	pub content_hash: H256,
	pub uri: String,
	pub timestamp: i64,
	pub author: Address,
}

/// A specific revision of a content item. Signature is empty when the
/// revision was never countersigned.
#[derive(Clone, Debug, PartialEq)]
pub struct NewsroomRevision {
	pub content_hash: H256,
	pub uri: String,
	pub timestamp: i64,
	pub author: Address,
	pub signature: Vec<u8>,
}

#[async_trait]
pub trait NewsroomGateway: Send + Sync {
	async fn name(&self, newsroom: Address) -> Result<String>;
	async fn owner(&self, newsroom: Address) -> Result<Address>;
	async fn content(&self, newsroom: Address, content_id: U256) -> Result<NewsroomContent>;
	async fn revision(&self, newsroom: Address, content_id: U256, revision_id: U256) -> Result<NewsroomRevision>;
	async fn revision_count(&self, newsroom: Address, content_id: U256) -> Result<U256>;
}

#[async_trait]
impl NewsroomGateway for EthGateway {
	async fn name(&self, newsroom: Address) -> Result<String> {
		let raw = self.rpc().eth_call(newsroom, abi::encode_call("name()", &[])).await?;
		abi::decode_output(&[ParamType::String], &raw)?.string()
	}

	async fn owner(&self, newsroom: Address) -> Result<Address> {
		let raw = self.rpc().eth_call(newsroom, abi::encode_call("owner()", &[])).await?;
		abi::decode_output(&[ParamType::Address], &raw)?.address()
	}

	async fn content(&self, newsroom: Address, content_id: U256) -> Result<NewsroomContent> {
		let data = abi::encode_call("getContent(uint256)", &[Token::Uint(content_id)]);
		let raw = self.rpc().eth_call(newsroom, data).await?;
		let kinds = [ParamType::FixedBytes(32), ParamType::String, ParamType::Uint(256), ParamType::Address];
		let mut out = abi::decode_output(&kinds, &raw)?;
		Ok(NewsroomContent {
			content_hash: out.fixed32()?,
			uri: out.string()?,
			timestamp: out.uint()?.low_u64() as i64,
			author: out.address()?,
		})
	}

	async fn revision(&self, newsroom: Address, content_id: U256, revision_id: U256) -> Result<NewsroomRevision> {
		let data =
			abi::encode_call("getRevision(uint256,uint256)", &[Token::Uint(content_id), Token::Uint(revision_id)]);
		let raw = self.rpc().eth_call(newsroom, data).await?;
		let kinds = [
			ParamType::FixedBytes(32),
			ParamType::String,
			ParamType::Uint(256),
			ParamType::Address,
			ParamType::Bytes,
		];
		let mut out = abi::decode_output(&kinds, &raw)?;
		Ok(NewsroomRevision {
			content_hash: out.fixed32()?,
			uri: out.string()?,
			timestamp: out.uint()?.low_u64() as i64,
			author: out.address()?,
			signature: out.bytes()?,
		})
	}

	async fn revision_count(&self, newsroom: Address, content_id: U256) -> Result<U256> {
		let data = abi::encode_call("revisionCount(uint256)", &[Token::Uint(content_id)]);
		let raw = self.rpc().eth_call(newsroom, data).await?;
		abi::decode_output(&[ParamType::Uint(256)], &raw)?.uint()
	}
}
