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

//! Processor for reparameterization proposals.
//!
//! The parameterizer and government contracts share this machinery: both
//! maintain a table of live parameters and a table of proposals, and a
//! passed proposal copies its value into the live table. The government
//! flavor additionally reflects the poll outcome onto the poll row.

use std::sync::Arc;

use async_trait::async_trait;

use tcr_archive_common::{ContractKind, Event, H256, U256};
use tcr_archive_gateway::ParameterizerGateway;

use crate::error::Result;
use crate::events::ProposalEvent;
use crate::processors::EventProcessor;
use crate::stores::{ParameterStore, PollStore, ProposalStore};
use crate::types::{Parameter, ParameterProposal, PollField, ProposalField};

/// Parameter names controlling the proposal voting window.
const COMMIT_STAGE_LEN: &str = "pCommitStageLen";
const REVEAL_STAGE_LEN: &str = "pRevealStageLen";

/// Seconds a settled proposal stays processable on chain.
const PROCESS_BY: i64 = 604_800;

pub struct ParameterizerProcessor {
	contract: ContractKind,
	parameters: Arc<dyn ParameterStore>,
	proposals: Arc<dyn ProposalStore>,
	gateway: Arc<dyn ParameterizerGateway>,
	/// Set for the government flavor only.
	polls: Option<Arc<dyn PollStore>>,
}

impl ParameterizerProcessor {
	pub fn new(
		parameters: Arc<dyn ParameterStore>,
		proposals: Arc<dyn ProposalStore>,
		gateway: Arc<dyn ParameterizerGateway>,
	) -> Self {
		Self { contract: ContractKind::Parameterizer, parameters, proposals, gateway, polls: None }
	}

	pub(crate) fn for_government(
		parameters: Arc<dyn ParameterStore>,
		proposals: Arc<dyn ProposalStore>,
		polls: Arc<dyn PollStore>,
		gateway: Arc<dyn ParameterizerGateway>,
	) -> Self {
		Self { contract: ContractKind::Government, parameters, proposals, gateway, polls: Some(polls) }
	}

	async fn stage_len(&self, name: &str) -> Result<i64> {
		match self.parameters.parameter(name).await? {
			Some(parameter) => Ok(parameter.value.low_u64() as i64),
			None => {
				log::warn!("parameter {} not yet materialized, assuming 0", name);
				Ok(0)
			}
		}
	}

	async fn proposed(
		&self,
		event: &Event,
		name: String,
		value: U256,
		prop_id: H256,
		poll_id: U256,
	) -> Result<()> {
		let commit = self.stage_len(COMMIT_STAGE_LEN).await?;
		let reveal = self.stage_len(REVEAL_STAGE_LEN).await?;
		let app_expiry = event.timestamp + commit + reveal + PROCESS_BY;
		let proposal = ParameterProposal {
			prop_id,
			id: ParameterProposal::synthesize_id(&name, value, app_expiry),
			name,
			value,
			poll_id,
			app_expiry,
			accepted: false,
			expired: false,
			active: true,
			last_updated_ts: event.timestamp,
		};
		self.proposals.create_proposal(&proposal).await
	}

	/// Fetch a proposal, rehydrating from the contract when its originating
	/// event was missed.
	async fn proposal_or_rehydrate(&self, event: &Event, prop_id: H256) -> Result<ParameterProposal> {
		if let Some(proposal) = self.proposals.proposal(prop_id).await? {
			return Ok(proposal);
		}
		let on_chain = self.gateway.proposal(event.contract_address, prop_id).await?;
		let app_expiry = on_chain.app_expiry.low_u64() as i64;
		let proposal = ParameterProposal {
			prop_id,
			id: ParameterProposal::synthesize_id(&on_chain.name, on_chain.value, app_expiry),
			name: on_chain.name,
			value: on_chain.value,
			poll_id: on_chain.challenge_id,
			app_expiry,
			accepted: false,
			expired: false,
			active: true,
			last_updated_ts: event.timestamp,
		};
		self.proposals.create_proposal(&proposal).await?;
		Ok(proposal)
	}

	async fn passed(&self, event: &Event, prop_id: H256) -> Result<()> {
		let mut proposal = self.proposal_or_rehydrate(event, prop_id).await?;
		self.parameters.set_parameter(&Parameter { name: proposal.name.clone(), value: proposal.value }).await?;
		proposal.accepted = true;
		proposal.expired = true;
		proposal.last_updated_ts = event.timestamp;
		self.proposals.update_proposal(&proposal, &[ProposalField::Accepted, ProposalField::Expired]).await?;
		self.reflect_poll(proposal.poll_id, true).await
	}

	async fn settled_without_effect(&self, event: &Event, prop_id: H256) -> Result<()> {
		let mut proposal = self.proposal_or_rehydrate(event, prop_id).await?;
		proposal.expired = true;
		proposal.last_updated_ts = event.timestamp;
		self.proposals.update_proposal(&proposal, &[ProposalField::Expired]).await?;
		self.reflect_poll(proposal.poll_id, false).await
	}

	/// Government proposals mirror their outcome onto the poll row.
	async fn reflect_poll(&self, poll_id: U256, passed: bool) -> Result<()> {
		let polls = match &self.polls {
			Some(polls) if !poll_id.is_zero() => polls,
			_ => return Ok(()),
		};
		let mut poll = match polls.poll(poll_id).await? {
			Some(poll) => poll,
			None => {
				log::warn!("proposal settled but poll {} was never recorded", poll_id);
				return Ok(());
			}
		};
		poll.is_passed = passed;
		polls.update_poll(&poll, &[PollField::IsPassed]).await
	}
}

#[async_trait]
impl EventProcessor for ParameterizerProcessor {
	fn name(&self) -> &'static str {
		match self.contract {
			ContractKind::Government => "government",
			_ => "parameterizer",
		}
	}

	async fn process(&self, event: &Event) -> Result<bool> {
		let decoded = match ProposalEvent::decode(event, self.contract)? {
			Some(decoded) => decoded,
			None => return Ok(false),
		};
		match decoded {
			ProposalEvent::ReparameterizationProposal { name, value, prop_id, poll_id } => {
				self.proposed(event, name, value, prop_id, poll_id).await?
			}
			ProposalEvent::ProposalPassed { prop_id } => self.passed(event, prop_id).await?,
			ProposalEvent::ProposalFailed { prop_id } | ProposalEvent::ProposalExpired { prop_id } => {
				self.settled_without_effect(event, prop_id).await?
			}
		}
		Ok(true)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_util::{EventBuilder, MemoryStore, MockGateway};
	use tcr_archive_common::Address;
	use tcr_archive_gateway::ContractProposal;

	const PARAMETERIZER: u8 = 0xDD;

	fn setup(gateway: MockGateway) -> (Arc<MemoryStore>, ParameterizerProcessor) {
		let store = Arc::new(MemoryStore::default());
		let processor = ParameterizerProcessor::new(store.clone(), store.clone(), Arc::new(gateway));
		(store, processor)
	}

	fn proposal_event(prop_id: H256) -> EventBuilder {
		EventBuilder::new(ContractKind::Parameterizer, Address::repeat_byte(PARAMETERIZER), "ReparameterizationProposal")
			.string_field("Name", "minDeposit")
			.uint_field("Value", 5000u64)
			.fixed32_field("PropID", prop_id)
	}

	#[tokio::test]
	async fn proposal_computes_expiry_from_stage_parameters() {
		let (store, processor) = setup(MockGateway::default());
		store.seed_parameter(COMMIT_STAGE_LEN, 600u64);
		store.seed_parameter(REVEAL_STAGE_LEN, 400u64);

		let prop_id = H256::repeat_byte(0x21);
		processor.process(&proposal_event(prop_id).ts(1_000_000).build()).await.unwrap();

		let proposal = store.get_proposal(prop_id);
		let expected_expiry = 1_000_000 + 600 + 400 + PROCESS_BY;
		assert_eq!(proposal.app_expiry, expected_expiry);
		assert_eq!(proposal.id, format!("minDeposit5000{}", expected_expiry));
		assert!(!proposal.accepted);
		assert!(!proposal.expired);
		assert!(proposal.active);
	}

	#[tokio::test]
	async fn missing_stage_parameters_default_to_zero() {
		let (store, processor) = setup(MockGateway::default());
		let prop_id = H256::repeat_byte(0x22);
		processor.process(&proposal_event(prop_id).ts(1_000_000).build()).await.unwrap();
		assert_eq!(store.get_proposal(prop_id).app_expiry, 1_000_000 + PROCESS_BY);
	}

	#[tokio::test]
	async fn passed_proposal_mutates_the_live_parameter() {
		let (store, processor) = setup(MockGateway::default());
		let prop_id = H256::repeat_byte(0x23);
		processor.process(&proposal_event(prop_id).build()).await.unwrap();

		let passed =
			EventBuilder::new(ContractKind::Parameterizer, Address::repeat_byte(PARAMETERIZER), "ProposalPassed")
				.fixed32_field("PropID", prop_id)
				.build();
		processor.process(&passed).await.unwrap();

		assert_eq!(store.get_parameter("minDeposit").value, U256::from(5000u64));
		let proposal = store.get_proposal(prop_id);
		assert!(proposal.accepted);
		assert!(proposal.expired);
	}

	#[tokio::test]
	async fn passed_proposal_rehydrates_from_contract_when_unseen() {
		let prop_id = H256::repeat_byte(0x24);
		let gateway = MockGateway::default().with_proposal(
			prop_id,
			ContractProposal {
				app_expiry: U256::from(2_000_000u64),
				challenge_id: U256::zero(),
				deposit: U256::zero(),
				name: "applyStageLen".into(),
				owner: Address::repeat_byte(0x31),
				process_by: U256::zero(),
				value: U256::from(777u64),
			},
		);
		let (store, processor) = setup(gateway);

		let passed =
			EventBuilder::new(ContractKind::Parameterizer, Address::repeat_byte(PARAMETERIZER), "ProposalPassed")
				.fixed32_field("PropID", prop_id)
				.build();
		processor.process(&passed).await.unwrap();

		assert_eq!(store.get_parameter("applyStageLen").value, U256::from(777u64));
		let proposal = store.get_proposal(prop_id);
		assert_eq!(proposal.app_expiry, 2_000_000);
		assert!(proposal.accepted);
	}

	#[tokio::test]
	async fn failed_and_expired_only_expire() {
		let (store, processor) = setup(MockGateway::default());
		let prop_id = H256::repeat_byte(0x25);
		processor.process(&proposal_event(prop_id).build()).await.unwrap();

		for name in ["ProposalFailed", "ProposalExpired"] {
			let event = EventBuilder::new(ContractKind::Parameterizer, Address::repeat_byte(PARAMETERIZER), name)
				.fixed32_field("PropID", prop_id)
				.build();
			processor.process(&event).await.unwrap();
		}

		let proposal = store.get_proposal(prop_id);
		assert!(proposal.expired);
		assert!(!proposal.accepted);
		assert!(store.try_get_parameter("minDeposit").is_none());
	}
}
