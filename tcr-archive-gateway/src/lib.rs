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

//! Read-only gateway into the on-chain contracts backing the registry.
//!
//! Every call is a plain `eth_call` against the latest state: the gateway
//! holds no cache and no write path. Each contract family gets a trait so
//! the engine can be driven by canned values in tests; [`EthGateway`] is the
//! JSON-RPC implementation of all of them.

pub mod abi;
mod error;
pub mod multisig;
pub mod newsroom;
pub mod parameterizer;
pub mod registry;
pub mod rpc;

pub use self::error::{GatewayError, Result};
pub use self::multisig::MultiSigGateway;
pub use self::newsroom::{NewsroomContent, NewsroomGateway, NewsroomRevision};
pub use self::parameterizer::{ContractProposal, ParameterizerGateway};
pub use self::registry::{RegistryAppeal, RegistryChallenge, RegistryGateway, RegistryListing};
pub use self::rpc::RpcClient;

/// Gateway backed by an Ethereum JSON-RPC endpoint.
#[derive(Clone, Debug)]
pub struct EthGateway {
	rpc: RpcClient,
}

impl EthGateway {
	pub fn new(url: impl Into<String>) -> Self {
		Self { rpc: RpcClient::new(url) }
	}

	pub fn with_client(rpc: RpcClient) -> Self {
		Self { rpc }
	}

	pub(crate) fn rpc(&self) -> &RpcClient {
		&self.rpc
	}
}
