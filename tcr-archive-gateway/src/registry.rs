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

//! Reads against the token-curated registry contract. These back the lazy
//! backfill paths: a processor that sees an event for an unknown listing or
//! challenge reconstructs it from here.

use async_trait::async_trait;

use tcr_archive_common::{Address, U256};

use crate::abi::{self, ParamType, Token};
use crate::error::Result;
use crate::EthGateway;

/// `listings(address)` result.
#[derive(Clone, Debug, PartialEq)]
pub struct RegistryListing {
	pub application_expiry: U256,
	pub whitelisted: bool,
	pub owner: Address,
	pub unstaked_deposit: U256,
	pub challenge_id: U256,
}

/// `challenges(uint256)` result. Appeal challenges share this shape.
#[derive(Clone, Debug, PartialEq)]
pub struct RegistryChallenge {
	pub reward_pool: U256,
	pub challenger: Address,
	pub resolved: bool,
	pub stake: U256,
	pub total_tokens: U256,
}

/// `appeals(uint256)` result, keyed by the original challenge id.
#[derive(Clone, Debug, PartialEq)]
pub struct RegistryAppeal {
	pub requester: Address,
	pub appeal_fee_paid: U256,
	pub appeal_phase_expiry: U256,
	pub appeal_granted: bool,
	pub appeal_open_to_challenge_expiry: U256,
	pub appeal_challenge_id: U256,
}

#[async_trait]
pub trait RegistryGateway: Send + Sync {
	async fn listing(&self, registry: Address, listing: Address) -> Result<RegistryListing>;
	async fn challenge(&self, registry: Address, challenge_id: U256) -> Result<RegistryChallenge>;
	async fn appeal(&self, registry: Address, challenge_id: U256) -> Result<RegistryAppeal>;
	async fn request_appeal_expiry(&self, registry: Address, challenge_id: U256) -> Result<U256>;
	async fn determine_reward(&self, registry: Address, challenge_id: U256) -> Result<U256>;
}

#[async_trait]
impl RegistryGateway for EthGateway {
	async fn listing(&self, registry: Address, listing: Address) -> Result<RegistryListing> {
		let data = abi::encode_call("listings(address)", &[Token::Address(listing)]);
		let raw = self.rpc().eth_call(registry, data).await?;
		let kinds =
			[ParamType::Uint(256), ParamType::Bool, ParamType::Address, ParamType::Uint(256), ParamType::Uint(256)];
		let mut out = abi::decode_output(&kinds, &raw)?;
		Ok(RegistryListing {
			application_expiry: out.uint()?,
			whitelisted: out.boolean()?,
			owner: out.address()?,
			unstaked_deposit: out.uint()?,
			challenge_id: out.uint()?,
		})
	}

	async fn challenge(&self, registry: Address, challenge_id: U256) -> Result<RegistryChallenge> {
		let data = abi::encode_call("challenges(uint256)", &[Token::Uint(challenge_id)]);
		let raw = self.rpc().eth_call(registry, data).await?;
		let kinds =
			[ParamType::Uint(256), ParamType::Address, ParamType::Bool, ParamType::Uint(256), ParamType::Uint(256)];
		let mut out = abi::decode_output(&kinds, &raw)?;
		Ok(RegistryChallenge {
			reward_pool: out.uint()?,
			challenger: out.address()?,
			resolved: out.boolean()?,
			stake: out.uint()?,
			total_tokens: out.uint()?,
		})
	}

	async fn appeal(&self, registry: Address, challenge_id: U256) -> Result<RegistryAppeal> {
		let data = abi::encode_call("appeals(uint256)", &[Token::Uint(challenge_id)]);
		let raw = self.rpc().eth_call(registry, data).await?;
		let kinds = [
			ParamType::Address,
			ParamType::Uint(256),
			ParamType::Uint(256),
			ParamType::Bool,
			ParamType::Uint(256),
			ParamType::Uint(256),
		];
		let mut out = abi::decode_output(&kinds, &raw)?;
		Ok(RegistryAppeal {
			requester: out.address()?,
			appeal_fee_paid: out.uint()?,
			appeal_phase_expiry: out.uint()?,
			appeal_granted: out.boolean()?,
			appeal_open_to_challenge_expiry: out.uint()?,
			appeal_challenge_id: out.uint()?,
		})
	}

	async fn request_appeal_expiry(&self, registry: Address, challenge_id: U256) -> Result<U256> {
		let data = abi::encode_call("challengeRequestAppealExpiries(uint256)", &[Token::Uint(challenge_id)]);
		let raw = self.rpc().eth_call(registry, data).await?;
		abi::decode_output(&[ParamType::Uint(256)], &raw)?.uint()
	}

	async fn determine_reward(&self, registry: Address, challenge_id: U256) -> Result<U256> {
		let data = abi::encode_call("determineReward(uint256)", &[Token::Uint(challenge_id)]);
		let raw = self.rpc().eth_call(registry, data).await?;
		abi::decode_output(&[ParamType::Uint(256)], &raw)?.uint()
	}
}
