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

//! Processor for government parameter events. Identical machinery to the
//! parameterizer, pointed at the government tables, plus the reflection of
//! proposal outcomes onto poll rows.

use std::sync::Arc;

use async_trait::async_trait;

use tcr_archive_common::Event;
use tcr_archive_gateway::ParameterizerGateway;

use crate::error::Result;
use crate::processors::{EventProcessor, ParameterizerProcessor};
use crate::stores::{ParameterStore, PollStore, ProposalStore};

pub struct GovernmentProcessor {
	inner: ParameterizerProcessor,
}

impl GovernmentProcessor {
	pub fn new(
		parameters: Arc<dyn ParameterStore>,
		proposals: Arc<dyn ProposalStore>,
		polls: Arc<dyn PollStore>,
		gateway: Arc<dyn ParameterizerGateway>,
	) -> Self {
		Self { inner: ParameterizerProcessor::for_government(parameters, proposals, polls, gateway) }
	}
}

#[async_trait]
impl EventProcessor for GovernmentProcessor {
	fn name(&self) -> &'static str {
		self.inner.name()
	}

	async fn process(&self, event: &Event) -> Result<bool> {
		self.inner.process(event).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_util::{EventBuilder, MemoryStore, MockGateway};
	use crate::types::Poll;
	use tcr_archive_common::{Address, ContractKind, H256, U256};

	const GOVERNMENT: u8 = 0xBB;

	fn setup() -> (Arc<MemoryStore>, GovernmentProcessor) {
		let store = Arc::new(MemoryStore::default());
		let processor =
			GovernmentProcessor::new(store.clone(), store.clone(), store.clone(), Arc::new(MockGateway::default()));
		(store, processor)
	}

	fn govt_proposal(prop_id: H256, poll_id: u64) -> tcr_archive_common::Event {
		EventBuilder::new(ContractKind::Government, Address::repeat_byte(GOVERNMENT), "GovtReparameterizationProposal")
			.string_field("Name", "judgeAppealLen")
			.uint_field("Value", 86_400u64)
			.fixed32_field("PropID", prop_id)
			.uint_field("PollID", poll_id)
			.build()
	}

	#[tokio::test]
	async fn parameterizer_events_are_not_claimed() {
		let (_, processor) = setup();
		let foreign =
			EventBuilder::new(ContractKind::Parameterizer, Address::repeat_byte(0xDD), "ReparameterizationProposal")
				.string_field("Name", "minDeposit")
				.uint_field("Value", 10u64)
				.fixed32_field("PropID", H256::repeat_byte(0x41))
				.build();
		assert!(!processor.process(&foreign).await.unwrap());
	}

	#[tokio::test]
	async fn passed_government_proposal_marks_the_poll() {
		let (store, processor) = setup();
		let prop_id = H256::repeat_byte(0x42);
		store.seed_poll(Poll { id: U256::from(9u64), ..Default::default() });

		processor.process(&govt_proposal(prop_id, 9)).await.unwrap();
		let passed = EventBuilder::new(ContractKind::Government, Address::repeat_byte(GOVERNMENT), "ProposalPassed")
			.fixed32_field("PropID", prop_id)
			.build();
		processor.process(&passed).await.unwrap();

		assert_eq!(store.get_parameter("judgeAppealLen").value, U256::from(86_400u64));
		assert!(store.get_poll(9u64.into()).is_passed);
	}

	#[tokio::test]
	async fn failed_government_proposal_clears_the_poll_flag() {
		let (store, processor) = setup();
		let prop_id = H256::repeat_byte(0x43);
		store.seed_poll(Poll { id: U256::from(10u64), is_passed: true, ..Default::default() });

		processor.process(&govt_proposal(prop_id, 10)).await.unwrap();
		let failed = EventBuilder::new(ContractKind::Government, Address::repeat_byte(GOVERNMENT), "ProposalFailed")
			.fixed32_field("PropID", prop_id)
			.build();
		processor.process(&failed).await.unwrap();

		assert!(!store.get_poll(10u64.into()).is_passed);
		assert!(store.try_get_parameter("judgeAppealLen").is_none());
	}
}
