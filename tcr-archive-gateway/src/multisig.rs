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

use async_trait::async_trait;

use tcr_archive_common::Address;

use crate::abi::{self, ParamType};
use crate::error::Result;
use crate::EthGateway;

#[async_trait]
pub trait MultiSigGateway: Send + Sync {
	/// The current owner set of a multi-signature wallet.
	async fn owners(&self, wallet: Address) -> Result<Vec<Address>>;
}

#[async_trait]
impl MultiSigGateway for EthGateway {
	async fn owners(&self, wallet: Address) -> Result<Vec<Address>> {
		let raw = self.rpc().eth_call(wallet, abi::encode_call("getOwners()", &[])).await?;
		abi::decode_output(&[ParamType::Array(Box::new(ParamType::Address))], &raw)?.address_array()
	}
}
