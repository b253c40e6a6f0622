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

//! Capability traits over persistence, one per entity family.
//!
//! Updates take the full entity plus the list of fields the caller
//! actually changed; an implementation must only write those fields, so
//! that processors touching disjoint fields of the same row compose.
//! [`NullStore`] satisfies every trait and persists nothing.

use async_trait::async_trait;

use tcr_archive_common::{Address, H256, U256};

use crate::error::Result;
use crate::types::{
	Appeal, AppealField, Challenge, ChallengeField, ContentRevision, CronWatermark, GovernanceEvent, Listing,
	ListingField, MultiSig, MultiSigOwner, Parameter, ParameterProposal, Poll, PollField, ProposalField, TokenTransfer,
};

#[async_trait]
pub trait ListingStore: Send + Sync {
	async fn listing(&self, address: Address) -> Result<Option<Listing>>;
	async fn create_listing(&self, listing: &Listing) -> Result<()>;
	async fn update_listing(&self, listing: &Listing, fields: &[ListingField]) -> Result<()>;
}

#[async_trait]
pub trait RevisionStore: Send + Sync {
	async fn revision(&self, listing: Address, content_id: U256, revision_id: U256) -> Result<Option<ContentRevision>>;
	async fn create_revision(&self, revision: &ContentRevision) -> Result<()>;
}

#[async_trait]
pub trait GovernanceEventStore: Send + Sync {
	/// Insert if the hash is new. Returns false for a duplicate, which is
	/// not an error.
	async fn record_governance_event(&self, event: &GovernanceEvent) -> Result<bool>;
}

#[async_trait]
pub trait ChallengeStore: Send + Sync {
	async fn challenge(&self, id: U256) -> Result<Option<Challenge>>;
	async fn create_challenge(&self, challenge: &Challenge) -> Result<()>;
	async fn update_challenge(&self, challenge: &Challenge, fields: &[ChallengeField]) -> Result<()>;
}

#[async_trait]
pub trait AppealStore: Send + Sync {
	async fn appeal(&self, challenge_id: U256) -> Result<Option<Appeal>>;
	async fn create_appeal(&self, appeal: &Appeal) -> Result<()>;
	async fn update_appeal(&self, appeal: &Appeal, fields: &[AppealField]) -> Result<()>;
}

#[async_trait]
pub trait PollStore: Send + Sync {
	async fn poll(&self, id: U256) -> Result<Option<Poll>>;
	async fn create_poll(&self, poll: &Poll) -> Result<()>;
	async fn update_poll(&self, poll: &Poll, fields: &[PollField]) -> Result<()>;
}

#[async_trait]
pub trait TransferStore: Send + Sync {
	async fn create_transfer(&self, transfer: &TokenTransfer) -> Result<()>;
}

#[async_trait]
pub trait ParameterStore: Send + Sync {
	async fn parameter(&self, name: &str) -> Result<Option<Parameter>>;
	async fn set_parameter(&self, parameter: &Parameter) -> Result<()>;
}

#[async_trait]
pub trait ProposalStore: Send + Sync {
	async fn proposal(&self, prop_id: H256) -> Result<Option<ParameterProposal>>;
	async fn create_proposal(&self, proposal: &ParameterProposal) -> Result<()>;
	async fn update_proposal(&self, proposal: &ParameterProposal, fields: &[ProposalField]) -> Result<()>;
}

#[async_trait]
pub trait MultiSigStore: Send + Sync {
	async fn multisig(&self, address: Address) -> Result<Option<MultiSig>>;
	async fn create_multisig(&self, multisig: &MultiSig) -> Result<()>;
	async fn update_multisig(&self, multisig: &MultiSig) -> Result<()>;
	async fn multisig_owner(&self, owner: Address, multisig: Address) -> Result<Option<MultiSigOwner>>;
	async fn create_multisig_owner(&self, owner: &MultiSigOwner) -> Result<()>;
	async fn delete_multisig_owner(&self, owner: &MultiSigOwner) -> Result<()>;
}

#[async_trait]
pub trait CronStore: Send + Sync {
	async fn watermark(&self) -> Result<CronWatermark>;
	async fn save_watermark(&self, watermark: &CronWatermark) -> Result<()>;
}

/// Store that accepts every write and remembers nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullStore;

#[async_trait]
impl ListingStore for NullStore {
	async fn listing(&self, _address: Address) -> Result<Option<Listing>> {
		Ok(None)
	}

	async fn create_listing(&self, _listing: &Listing) -> Result<()> {
		Ok(())
	}

	async fn update_listing(&self, _listing: &Listing, _fields: &[ListingField]) -> Result<()> {
		Ok(())
	}
}

#[async_trait]
impl RevisionStore for NullStore {
	async fn revision(
		&self,
		_listing: Address,
		_content_id: U256,
		_revision_id: U256,
	) -> Result<Option<ContentRevision>> {
		Ok(None)
	}

	async fn create_revision(&self, _revision: &ContentRevision) -> Result<()> {
		Ok(())
	}
}

#[async_trait]
impl GovernanceEventStore for NullStore {
	async fn record_governance_event(&self, _event: &GovernanceEvent) -> Result<bool> {
		Ok(true)
	}
}

#[async_trait]
impl ChallengeStore for NullStore {
	async fn challenge(&self, _id: U256) -> Result<Option<Challenge>> {
		Ok(None)
	}

	async fn create_challenge(&self, _challenge: &Challenge) -> Result<()> {
		Ok(())
	}

	async fn update_challenge(&self, _challenge: &Challenge, _fields: &[ChallengeField]) -> Result<()> {
		Ok(())
	}
}

#[async_trait]
impl AppealStore for NullStore {
	async fn appeal(&self, _challenge_id: U256) -> Result<Option<Appeal>> {
		Ok(None)
	}

	async fn create_appeal(&self, _appeal: &Appeal) -> Result<()> {
		Ok(())
	}

	async fn update_appeal(&self, _appeal: &Appeal, _fields: &[AppealField]) -> Result<()> {
		Ok(())
	}
}

#[async_trait]
impl PollStore for NullStore {
	async fn poll(&self, _id: U256) -> Result<Option<Poll>> {
		Ok(None)
	}

	async fn create_poll(&self, _poll: &Poll) -> Result<()> {
		Ok(())
	}

	async fn update_poll(&self, _poll: &Poll, _fields: &[PollField]) -> Result<()> {
		Ok(())
	}
}

#[async_trait]
impl TransferStore for NullStore {
	async fn create_transfer(&self, _transfer: &TokenTransfer) -> Result<()> {
		Ok(())
	}
}

#[async_trait]
impl ParameterStore for NullStore {
	async fn parameter(&self, _name: &str) -> Result<Option<Parameter>> {
		Ok(None)
	}

	async fn set_parameter(&self, _parameter: &Parameter) -> Result<()> {
		Ok(())
	}
}

#[async_trait]
impl ProposalStore for NullStore {
	async fn proposal(&self, _prop_id: H256) -> Result<Option<ParameterProposal>> {
		Ok(None)
	}

	async fn create_proposal(&self, _proposal: &ParameterProposal) -> Result<()> {
		Ok(())
	}

	async fn update_proposal(&self, _proposal: &ParameterProposal, _fields: &[ProposalField]) -> Result<()> {
		Ok(())
	}
}

#[async_trait]
impl MultiSigStore for NullStore {
	async fn multisig(&self, _address: Address) -> Result<Option<MultiSig>> {
		Ok(None)
	}

	async fn create_multisig(&self, _multisig: &MultiSig) -> Result<()> {
		Ok(())
	}

	async fn update_multisig(&self, _multisig: &MultiSig) -> Result<()> {
		Ok(())
	}

	async fn multisig_owner(&self, _owner: Address, _multisig: Address) -> Result<Option<MultiSigOwner>> {
		Ok(None)
	}

	async fn create_multisig_owner(&self, _owner: &MultiSigOwner) -> Result<()> {
		Ok(())
	}

	async fn delete_multisig_owner(&self, _owner: &MultiSigOwner) -> Result<()> {
		Ok(())
	}
}

#[async_trait]
impl CronStore for NullStore {
	async fn watermark(&self) -> Result<CronWatermark> {
		Ok(CronWatermark::default())
	}

	async fn save_watermark(&self, _watermark: &CronWatermark) -> Result<()> {
		Ok(())
	}
}
