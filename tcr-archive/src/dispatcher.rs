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

//! Top-level event dispatch.
//!
//! A batch is walked in caller order; each event goes to the first
//! processor that claims it. Per-event failures are logged and the batch
//! keeps going; the most recent error is returned after the watermark has
//! been advanced, so progress is monotonic and the operator decides about
//! re-ingestion.

use std::sync::Arc;

use async_trait::async_trait;

use tcr_archive_common::{util, AbiValue, Address, ContractKind, Event, RetrievalMethod};

use crate::error::Result;
use crate::processors::EventProcessor;
use crate::stores::{CronStore, GovernanceEventStore};
use crate::types::{CronWatermark, GovernanceEvent};

/// Logical notification channels for downstream consumers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Channel {
	GovernanceEvents,
	TokenEvents,
}

impl Channel {
	pub fn as_str(self) -> &'static str {
		match self {
			Channel::GovernanceEvents => "governance_events",
			Channel::TokenEvents => "token_events",
		}
	}
}

/// Wake-up signal sink. Messages carry only the transaction hash.
#[async_trait]
pub trait Publisher: Send + Sync {
	async fn publish(&self, channel: Channel, tx_hash: &str) -> Result<()>;
}

pub struct Dispatcher {
	processors: Vec<Box<dyn EventProcessor>>,
	governance_events: Arc<dyn GovernanceEventStore>,
	cron: Arc<dyn CronStore>,
	publisher: Option<Arc<dyn Publisher>>,
}

impl Dispatcher {
	/// `processors` are tried in the order given; keep the newsroom →
	/// registry → voting → parameterizer → government → token → multi-sig
	/// order so families with overlapping event names resolve the same way
	/// on every run.
	pub fn new(
		processors: Vec<Box<dyn EventProcessor>>,
		governance_events: Arc<dyn GovernanceEventStore>,
		cron: Arc<dyn CronStore>,
	) -> Self {
		Self { processors, governance_events, cron, publisher: None }
	}

	#[must_use]
	pub fn with_publisher(mut self, publisher: Arc<dyn Publisher>) -> Self {
		self.publisher = Some(publisher);
		self
	}

	/// Process one batch in order. Returns the watermark failure if the
	/// final save fails, otherwise the most recent per-event error.
	pub async fn process_events(&self, events: &[Event]) -> Result<()> {
		if events.is_empty() {
			return Ok(());
		}
		let mut watermark = self.cron.watermark().await?;
		let mut last_error = None;
		for event in events {
			watermark.observe(event.timestamp, event.hash());
			if let Err(e) = self.route(event).await {
				log::error!("failed to process {} from {:?}: {}", event.name(), event.contract, e);
				last_error = Some(e);
			}
		}
		self.cron.save_watermark(&watermark).await?;
		match last_error {
			Some(e) => Err(e),
			None => Ok(()),
		}
	}

	/// Drop events the persisted watermark already covers. Lets the
	/// crawler redeliver at-least-once without reprocessing cost.
	pub fn filter_seen(watermark: &CronWatermark, events: Vec<Event>) -> Vec<Event> {
		events.into_iter().filter(|e| !watermark.covers(e.timestamp, &e.hash())).collect()
	}

	async fn route(&self, event: &Event) -> Result<()> {
		for processor in &self.processors {
			if !processor.process(event).await? {
				continue;
			}
			log::debug!("{} handled {} at ts {}", processor.name(), event.name(), event.timestamp);
			if processor.records_governance_events() {
				self.record_governance_event(event).await?;
			}
			if event.retrieval == RetrievalMethod::LiveWatch {
				self.notify(event).await?;
			}
			return Ok(());
		}
		// an unrecognized event is a no-op, never an error
		log::debug!("no processor claimed {} from {:?}", event.name(), event.contract);
		Ok(())
	}

	async fn record_governance_event(&self, event: &Event) -> Result<()> {
		let listing_address = match event.payload.get("ListingAddress") {
			Some(AbiValue::Address(address)) => *address,
			// newsroom events never carry one; the newsroom contract
			// address is the listing key
			_ if event.contract == ContractKind::Newsroom => event.contract_address,
			_ => Address::zero(),
		};
		let governance_event = GovernanceEvent {
			event_hash: event.hash(),
			listing_address,
			sender_address: event.contract_address,
			event_type: event.name().to_string(),
			payload: serde_json::to_value(&event.payload)?,
			created_ts: event.timestamp,
			last_updated_ts: event.timestamp,
			log: event.log,
		};
		if !self.governance_events.record_governance_event(&governance_event).await? {
			log::debug!("governance event {} already recorded", governance_event.event_hash);
		}
		Ok(())
	}

	async fn notify(&self, event: &Event) -> Result<()> {
		let publisher = match &self.publisher {
			Some(publisher) => publisher,
			None => return Ok(()),
		};
		let channel =
			if event.contract == ContractKind::Token { Channel::TokenEvents } else { Channel::GovernanceEvents };
		publisher.publish(channel, &util::h256_string(&event.log.tx_hash)).await
	}
}
