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

//! Proposal reads shared by the parameterizer and government contracts,
//! which expose the same `proposals(bytes32)` storage shape.

use async_trait::async_trait;

use tcr_archive_common::{Address, H256, U256};

use crate::abi::{self, ParamType, Token};
use crate::error::Result;
use crate::EthGateway;

/// A reparameterization proposal as stored on chain.
#[derive(Clone, Debug, PartialEq)]
pub struct ContractProposal {
	pub app_expiry: U256,
	pub challenge_id: U256,
	pub deposit: U256,
	pub name: String,
	pub owner: Address,
	pub process_by: U256,
	pub value: U256,
}

#[async_trait]
pub trait ParameterizerGateway: Send + Sync {
	async fn proposal(&self, parameterizer: Address, prop_id: H256) -> Result<ContractProposal>;
}

#[async_trait]
impl ParameterizerGateway for EthGateway {
	async fn proposal(&self, parameterizer: Address, prop_id: H256) -> Result<ContractProposal> {
		let data = abi::encode_call("proposals(bytes32)", &[Token::FixedBytes(prop_id.as_bytes().to_vec())]);
		let raw = self.rpc().eth_call(parameterizer, data).await?;
		let kinds = [
			ParamType::Uint(256),
			ParamType::Uint(256),
			ParamType::Uint(256),
			ParamType::String,
			ParamType::Address,
			ParamType::Uint(256),
			ParamType::Uint(256),
		];
		let mut out = abi::decode_output(&kinds, &raw)?;
		Ok(ContractProposal {
			app_expiry: out.uint()?,
			challenge_id: out.uint()?,
			deposit: out.uint()?,
			name: out.string()?,
			owner: out.address()?,
			process_by: out.uint()?,
			value: out.uint()?,
		})
	}
}
