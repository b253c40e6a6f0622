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

//! Processor for the registry contract: the application / challenge /
//! appeal lifecycle of listings.
//!
//! Events may arrive in any order and more than once. Any event that names
//! a listing we have never seen backfills it from the newsroom and
//! registry contracts before its own effect is applied, and a lifecycle
//! state that forbids an open challenge always clears the challenge id.

use std::sync::Arc;

use async_trait::async_trait;

use tcr_archive_common::{Address, Event, U256};
use tcr_archive_gateway::{NewsroomGateway, RegistryGateway};

use crate::error::Result;
use crate::events::RegistryEvent;
use crate::processors::EventProcessor;
use crate::stores::{AppealStore, ChallengeStore, ListingStore};
use crate::types::{Appeal, AppealField, Challenge, ChallengeField, GovernanceState, Listing, ListingField};

pub struct RegistryProcessor {
	listings: Arc<dyn ListingStore>,
	challenges: Arc<dyn ChallengeStore>,
	appeals: Arc<dyn AppealStore>,
	newsroom: Arc<dyn NewsroomGateway>,
	registry: Arc<dyn RegistryGateway>,
}

impl RegistryProcessor {
	pub fn new(
		listings: Arc<dyn ListingStore>,
		challenges: Arc<dyn ChallengeStore>,
		appeals: Arc<dyn AppealStore>,
		newsroom: Arc<dyn NewsroomGateway>,
		registry: Arc<dyn RegistryGateway>,
	) -> Self {
		Self { listings, challenges, appeals, newsroom, registry }
	}

	/// Fetch the listing, reconstructing it from the newsroom and registry
	/// contracts when the originating `Application` was missed.
	async fn listing_or_backfill(&self, registry: Address, address: Address, timestamp: i64) -> Result<Listing> {
		if let Some(listing) = self.listings.listing(address).await? {
			return Ok(listing);
		}
		let name = self.newsroom.name(address).await?;
		let owner = self.newsroom.owner(address).await?;
		let on_chain = self.registry.listing(registry, address).await?;
		let listing = Listing {
			address,
			name,
			owner_addresses: vec![owner],
			whitelisted: on_chain.whitelisted,
			unstaked_deposit: on_chain.unstaked_deposit,
			app_expiry: on_chain.application_expiry.low_u64() as i64,
			challenge_id: on_chain.challenge_id,
			created_ts: timestamp,
			last_updated_ts: timestamp,
			..Default::default()
		};
		self.listings.create_listing(&listing).await?;
		Ok(listing)
	}

	/// Fetch a challenge, reconstructing it from the contract when its
	/// originating `Challenge` event was missed.
	async fn challenge_or_backfill(
		&self,
		registry: Address,
		id: U256,
		listing_address: Address,
		timestamp: i64,
	) -> Result<Challenge> {
		if let Some(challenge) = self.challenges.challenge(id).await? {
			return Ok(challenge);
		}
		let on_chain = self.registry.challenge(registry, id).await?;
		let request_appeal_expiry = self.registry.request_appeal_expiry(registry, id).await?;
		let challenge = Challenge {
			id,
			listing_address,
			reward_pool: on_chain.reward_pool,
			challenger: on_chain.challenger,
			resolved: on_chain.resolved,
			stake: on_chain.stake,
			total_tokens: on_chain.total_tokens,
			request_appeal_expiry: request_appeal_expiry.low_u64() as i64,
			last_updated_ts: timestamp,
			..Default::default()
		};
		self.challenges.create_challenge(&challenge).await?;
		Ok(challenge)
	}

	async fn set_listing_state(
		&self,
		mut listing: Listing,
		state: GovernanceState,
		timestamp: i64,
		extra: &[ListingField],
	) -> Result<()> {
		listing.set_state(state);
		listing.last_updated_ts = timestamp;
		let mut fields = vec![ListingField::LastGovernanceState];
		if state.clears_challenge() {
			fields.push(ListingField::ChallengeId);
		}
		fields.extend_from_slice(extra);
		self.listings.update_listing(&listing, &fields).await
	}

	/// Mark a challenge resolved with the tokens revealed against it. When
	/// `sync_stakes` is set and no appeal was granted, the reward pool and
	/// stake are refreshed from the contract (a granted appeal re-splits
	/// them on chain, so they must not be overwritten then).
	async fn resolve_challenge(
		&self,
		registry: Address,
		id: U256,
		listing_address: Address,
		total_tokens: U256,
		sync_stakes: bool,
		timestamp: i64,
	) -> Result<()> {
		let mut challenge = self.challenge_or_backfill(registry, id, listing_address, timestamp).await?;
		challenge.resolved = true;
		challenge.total_tokens = total_tokens;
		challenge.last_updated_ts = timestamp;
		let mut fields = vec![ChallengeField::Resolved, ChallengeField::TotalTokens];
		if sync_stakes {
			let granted = self.appeals.appeal(id).await?.map(|a| a.appeal_granted).unwrap_or(false);
			if !granted {
				let on_chain = self.registry.challenge(registry, id).await?;
				challenge.reward_pool = on_chain.reward_pool;
				challenge.stake = on_chain.stake;
				fields.push(ChallengeField::RewardPool);
				fields.push(ChallengeField::Stake);
			}
		}
		self.challenges.update_challenge(&challenge, &fields).await
	}

	async fn application(
		&self,
		event: &Event,
		listing_address: Address,
		deposit: U256,
		app_end_date: i64,
	) -> Result<()> {
		let existing = self.listings.listing(listing_address).await?;
		match existing {
			Some(mut listing) => {
				listing.unstaked_deposit = deposit;
				listing.app_expiry = app_end_date;
				listing.whitelisted = false;
				listing.application_ts = event.timestamp;
				listing.set_state(GovernanceState::Applied);
				listing.last_updated_ts = event.timestamp;
				self.listings
					.update_listing(
						&listing,
						&[
							ListingField::UnstakedDeposit,
							ListingField::AppExpiry,
							ListingField::Whitelisted,
							ListingField::ApplicationTimestamp,
							ListingField::LastGovernanceState,
						],
					)
					.await
			}
			None => {
				let name = self.newsroom.name(listing_address).await?;
				let owner = self.newsroom.owner(listing_address).await?;
				let listing = Listing {
					address: listing_address,
					name,
					owner_addresses: vec![owner],
					whitelisted: false,
					last_governance_state: GovernanceState::Applied,
					unstaked_deposit: deposit,
					app_expiry: app_end_date,
					created_ts: event.timestamp,
					application_ts: event.timestamp,
					last_updated_ts: event.timestamp,
					..Default::default()
				};
				self.listings.create_listing(&listing).await
			}
		}
	}

	async fn challenge(
		&self,
		event: &Event,
		listing_address: Address,
		id: U256,
		challenger: Address,
		data: String,
	) -> Result<()> {
		let registry = event.contract_address;
		let on_chain = self.registry.challenge(registry, id).await?;
		let request_appeal_expiry = self.registry.request_appeal_expiry(registry, id).await?;
		let challenge = Challenge {
			id,
			listing_address,
			statement: data,
			reward_pool: on_chain.reward_pool,
			challenger: if challenger.is_zero() { on_chain.challenger } else { challenger },
			resolved: false,
			stake: on_chain.stake,
			total_tokens: U256::zero(),
			request_appeal_expiry: request_appeal_expiry.low_u64() as i64,
			last_updated_ts: event.timestamp,
		};
		self.challenges.create_challenge(&challenge).await?;

		let mut listing = self.listing_or_backfill(registry, listing_address, event.timestamp).await?;
		listing.challenge_id = id;
		listing.unstaked_deposit = listing.unstaked_deposit.saturating_sub(on_chain.stake);
		self.set_listing_state(
			listing,
			GovernanceState::Challenged,
			event.timestamp,
			&[ListingField::ChallengeId, ListingField::UnstakedDeposit],
		)
		.await
	}

	async fn appeal_requested(
		&self,
		event: &Event,
		listing_address: Address,
		challenge_id: U256,
		appeal_fee_paid: U256,
		requester: Address,
		data: String,
	) -> Result<()> {
		let registry = event.contract_address;
		let on_chain = self.registry.appeal(registry, challenge_id).await?;
		let appeal = Appeal {
			challenge_id,
			requester,
			appeal_fee_paid,
			appeal_phase_expiry: on_chain.appeal_phase_expiry.low_u64() as i64,
			appeal_granted: false,
			statement: data,
			last_updated_ts: event.timestamp,
			..Default::default()
		};
		self.appeals.create_appeal(&appeal).await?;

		let listing = self.listing_or_backfill(registry, listing_address, event.timestamp).await?;
		self.set_listing_state(listing, GovernanceState::AppealRequested, event.timestamp, &[]).await
	}

	async fn appeal_granted(&self, event: &Event, listing_address: Address, challenge_id: U256) -> Result<()> {
		let registry = event.contract_address;
		let on_chain = self.registry.appeal(registry, challenge_id).await?;
		let mut appeal = match self.appeals.appeal(challenge_id).await? {
			Some(appeal) => appeal,
			// request event missed; rebuild the row from the contract
			None => {
				let appeal = Appeal {
					challenge_id,
					requester: on_chain.requester,
					appeal_fee_paid: on_chain.appeal_fee_paid,
					appeal_phase_expiry: on_chain.appeal_phase_expiry.low_u64() as i64,
					last_updated_ts: event.timestamp,
					..Default::default()
				};
				self.appeals.create_appeal(&appeal).await?;
				appeal
			}
		};
		appeal.appeal_granted = true;
		appeal.appeal_open_to_challenge_expiry = on_chain.appeal_open_to_challenge_expiry.low_u64() as i64;
		appeal.last_updated_ts = event.timestamp;
		self.appeals
			.update_appeal(&appeal, &[AppealField::AppealGranted, AppealField::AppealOpenToChallengeExpiry])
			.await?;

		let listing = self.listing_or_backfill(registry, listing_address, event.timestamp).await?;
		self.set_listing_state(listing, GovernanceState::AppealGranted, event.timestamp, &[]).await
	}

	async fn granted_appeal_challenged(
		&self,
		event: &Event,
		listing_address: Address,
		challenge_id: U256,
		appeal_challenge_id: U256,
		data: String,
	) -> Result<()> {
		let registry = event.contract_address;
		let on_chain = self.registry.challenge(registry, appeal_challenge_id).await?;
		let request_appeal_expiry = self.registry.request_appeal_expiry(registry, appeal_challenge_id).await?;
		let appeal_challenge = Challenge {
			id: appeal_challenge_id,
			listing_address,
			statement: data,
			reward_pool: on_chain.reward_pool,
			challenger: on_chain.challenger,
			resolved: false,
			stake: on_chain.stake,
			total_tokens: U256::zero(),
			request_appeal_expiry: request_appeal_expiry.low_u64() as i64,
			last_updated_ts: event.timestamp,
		};
		self.challenges.create_challenge(&appeal_challenge).await?;

		if let Some(mut appeal) = self.appeals.appeal(challenge_id).await? {
			appeal.appeal_challenge_id = appeal_challenge_id;
			appeal.last_updated_ts = event.timestamp;
			self.appeals.update_appeal(&appeal, &[AppealField::AppealChallengeId]).await?;
		} else {
			log::warn!("granted appeal challenged but appeal {} was never recorded", challenge_id);
		}

		let listing = self.listing_or_backfill(registry, listing_address, event.timestamp).await?;
		self.set_listing_state(listing, GovernanceState::GrantedAppealChallenged, event.timestamp, &[]).await
	}

	async fn reward_claimed(&self, event: &Event, challenge_id: U256) -> Result<()> {
		let registry = event.contract_address;
		let on_chain = self.registry.challenge(registry, challenge_id).await?;
		// the claim event does not name a listing; an unknown challenge is
		// keyed to the zero address until a richer event fills it
		let mut challenge =
			self.challenge_or_backfill(registry, challenge_id, Address::zero(), event.timestamp).await?;
		challenge.total_tokens = on_chain.total_tokens;
		challenge.reward_pool = on_chain.reward_pool;
		challenge.last_updated_ts = event.timestamp;
		self.challenges
			.update_challenge(&challenge, &[ChallengeField::TotalTokens, ChallengeField::RewardPool])
			.await
	}
}

#[async_trait]
impl EventProcessor for RegistryProcessor {
	fn name(&self) -> &'static str {
		"registry"
	}

	fn records_governance_events(&self) -> bool {
		true
	}

	async fn process(&self, event: &Event) -> Result<bool> {
		let decoded = match RegistryEvent::decode(event)? {
			Some(decoded) => decoded,
			None => return Ok(false),
		};
		let registry = event.contract_address;
		let ts = event.timestamp;
		match decoded {
			RegistryEvent::Application { listing, deposit, app_end_date, .. } => {
				self.application(event, listing, deposit, app_end_date).await?
			}
			RegistryEvent::ApplicationWhitelisted { listing } => {
				let mut listing = self.listing_or_backfill(registry, listing, ts).await?;
				listing.whitelisted = true;
				listing.approval_ts = ts;
				self.set_listing_state(
					listing,
					GovernanceState::AppWhitelisted,
					ts,
					&[ListingField::Whitelisted, ListingField::ApprovalTimestamp],
				)
				.await?
			}
			RegistryEvent::ApplicationRemoved { listing } | RegistryEvent::ListingRemoved { listing } => {
				let state = if event.name() == "ApplicationRemoved" {
					GovernanceState::ApplicationRemoved
				} else {
					GovernanceState::ListingRemoved
				};
				let mut listing = self.listing_or_backfill(registry, listing, ts).await?;
				listing.unstaked_deposit = U256::zero();
				listing.app_expiry = 0;
				listing.whitelisted = false;
				self.set_listing_state(
					listing,
					state,
					ts,
					&[ListingField::UnstakedDeposit, ListingField::AppExpiry, ListingField::Whitelisted],
				)
				.await?
			}
			RegistryEvent::TouchAndRemoved { listing } => {
				let listing = self.listing_or_backfill(registry, listing, ts).await?;
				self.set_listing_state(listing, GovernanceState::TouchRemoved, ts, &[]).await?
			}
			RegistryEvent::Deposit { listing, amount } => {
				let mut listing = self.listing_or_backfill(registry, listing, ts).await?;
				listing.unstaked_deposit = listing.unstaked_deposit + amount;
				listing.last_updated_ts = ts;
				self.listings.update_listing(&listing, &[ListingField::UnstakedDeposit]).await?
			}
			RegistryEvent::Withdrawal { listing, amount } => {
				let mut listing = self.listing_or_backfill(registry, listing, ts).await?;
				listing.unstaked_deposit = listing.unstaked_deposit.saturating_sub(amount);
				listing.last_updated_ts = ts;
				self.listings.update_listing(&listing, &[ListingField::UnstakedDeposit]).await?
			}
			RegistryEvent::Challenge { listing, challenge_id, challenger, data } => {
				self.challenge(event, listing, challenge_id, challenger, data).await?
			}
			RegistryEvent::ChallengeFailed { listing, challenge_id, total_tokens } => {
				self.resolve_challenge(registry, challenge_id, listing, total_tokens, true, ts).await?;
				let reward = self.registry.determine_reward(registry, challenge_id).await?;
				let mut listing = self.listing_or_backfill(registry, listing, ts).await?;
				listing.unstaked_deposit = listing.unstaked_deposit + reward;
				self.set_listing_state(
					listing,
					GovernanceState::ChallengeFailed,
					ts,
					&[ListingField::UnstakedDeposit],
				)
				.await?
			}
			RegistryEvent::ChallengeSucceeded { listing, challenge_id, total_tokens } => {
				self.resolve_challenge(registry, challenge_id, listing, total_tokens, true, ts).await?;
				let listing = self.listing_or_backfill(registry, listing, ts).await?;
				self.set_listing_state(listing, GovernanceState::ChallengeSucceeded, ts, &[]).await?
			}
			RegistryEvent::FailedChallengeOverturned { listing, challenge_id, total_tokens } => {
				self.resolve_challenge(registry, challenge_id, listing, total_tokens, false, ts).await?;
				let listing = self.listing_or_backfill(registry, listing, ts).await?;
				self.set_listing_state(listing, GovernanceState::FailedChallengeOverturned, ts, &[]).await?
			}
			RegistryEvent::SuccessfulChallengeOverturned { listing, challenge_id, total_tokens } => {
				self.resolve_challenge(registry, challenge_id, listing, total_tokens, false, ts).await?;
				let reward = self.registry.determine_reward(registry, challenge_id).await?;
				let mut listing = self.listing_or_backfill(registry, listing, ts).await?;
				listing.unstaked_deposit = listing.unstaked_deposit + reward;
				self.set_listing_state(
					listing,
					GovernanceState::SuccessfulChallengeOverturned,
					ts,
					&[ListingField::UnstakedDeposit],
				)
				.await?
			}
			RegistryEvent::AppealRequested { listing, challenge_id, appeal_fee_paid, requester, data } => {
				self.appeal_requested(event, listing, challenge_id, appeal_fee_paid, requester, data).await?
			}
			RegistryEvent::AppealGranted { listing, challenge_id } => {
				self.appeal_granted(event, listing, challenge_id).await?
			}
			RegistryEvent::GrantedAppealChallenged { listing, challenge_id, appeal_challenge_id, data } => {
				self.granted_appeal_challenged(event, listing, challenge_id, appeal_challenge_id, data).await?
			}
			RegistryEvent::GrantedAppealConfirmed { listing, appeal_challenge_id, total_tokens, .. } => {
				self.resolve_challenge(registry, appeal_challenge_id, listing, total_tokens, false, ts).await?;
				let listing = self.listing_or_backfill(registry, listing, ts).await?;
				self.set_listing_state(listing, GovernanceState::GrantedAppealConfirmed, ts, &[]).await?
			}
			RegistryEvent::GrantedAppealOverturned { listing, appeal_challenge_id, total_tokens, .. } => {
				self.resolve_challenge(registry, appeal_challenge_id, listing, total_tokens, false, ts).await?;
				let listing = self.listing_or_backfill(registry, listing, ts).await?;
				self.set_listing_state(listing, GovernanceState::GrantedAppealOverturned, ts, &[]).await?
			}
			RegistryEvent::RewardClaimed { challenge_id, .. } => self.reward_claimed(event, challenge_id).await?,
		}
		Ok(true)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_util::{registry_event, EventBuilder, MemoryStore, MockGateway};
	use tcr_archive_common::ContractKind;

	const REGISTRY: u8 = 0xEE;

	fn setup(gateway: MockGateway) -> (Arc<MemoryStore>, RegistryProcessor) {
		let store = Arc::new(MemoryStore::default());
		let gateway = Arc::new(gateway);
		let processor =
			RegistryProcessor::new(store.clone(), store.clone(), store.clone(), gateway.clone(), gateway);
		(store, processor)
	}

	fn application(listing: Address, deposit: u64, app_end: i64) -> tcr_archive_common::Event {
		registry_event(REGISTRY, "Application", listing)
			.uint_field("Deposit", deposit)
			.uint_field("AppEndDate", app_end as u64)
			.ts(app_end - 1000)
			.build()
	}

	#[tokio::test]
	async fn application_creates_the_listing() {
		let n = Address::repeat_byte(0x10);
		let gateway = MockGateway::default().with_name(n, "The Sun").with_newsroom_owner(n, Address::repeat_byte(1));
		let (store, processor) = setup(gateway);

		processor.process(&application(n, 1000, 1_653_860_896)).await.unwrap();

		let listing = store.get_listing(n);
		assert_eq!(listing.last_governance_state, GovernanceState::Applied);
		assert_eq!(listing.unstaked_deposit, U256::from(1000u64));
		assert_eq!(listing.app_expiry, 1_653_860_896);
		assert!(!listing.whitelisted);
		assert_eq!(listing.approval_ts, 0);
		assert_eq!(listing.name, "The Sun");
	}

	#[tokio::test]
	async fn whitelisting_clears_the_challenge_id() {
		let n = Address::repeat_byte(0x11);
		let (store, processor) = setup(MockGateway::default());

		processor.process(&application(n, 1000, 1_653_860_896)).await.unwrap();
		let whitelisted = registry_event(REGISTRY, "ApplicationWhitelisted", n).ts(1_653_861_000).build();
		processor.process(&whitelisted).await.unwrap();

		let listing = store.get_listing(n);
		assert!(listing.whitelisted);
		assert_eq!(listing.last_governance_state, GovernanceState::AppWhitelisted);
		assert_eq!(listing.challenge_id, U256::zero());
		assert_eq!(listing.approval_ts, 1_653_861_000);
	}

	#[tokio::test]
	async fn challenge_records_both_sides() {
		let n = Address::repeat_byte(0x12);
		let challenger = Address::repeat_byte(0x99);
		let gateway = MockGateway::default()
			.with_registry_challenge(120u64, challenger, 400u64, 250u64)
			.with_request_appeal_expiry(120u64, 1_700_000_000u64);
		let (store, processor) = setup(gateway);

		processor.process(&application(n, 1000, 1_653_860_896)).await.unwrap();
		let challenge = registry_event(REGISTRY, "Challenge", n)
			.uint_field("ChallengeID", 120u64)
			.string_field("Data", "statement of challenge")
			.build();
		processor.process(&challenge).await.unwrap();

		let listing = store.get_listing(n);
		assert_eq!(listing.challenge_id, U256::from(120u64));
		assert_eq!(listing.last_governance_state, GovernanceState::Challenged);
		// the on-chain stake moved out of the unstaked deposit
		assert_eq!(listing.unstaked_deposit, U256::from(1000u64 - 250));

		let stored = store.get_challenge(120u64.into());
		assert_eq!(stored.listing_address, n);
		assert_eq!(stored.challenger, challenger);
		assert_eq!(stored.stake, U256::from(250u64));
		assert_eq!(stored.reward_pool, U256::from(400u64));
		assert_eq!(stored.statement, "statement of challenge");
		assert_eq!(stored.request_appeal_expiry, 1_700_000_000);
		assert!(!stored.resolved);
	}

	#[tokio::test]
	async fn challenge_failed_resolves_and_rewards() {
		let n = Address::repeat_byte(0x13);
		let gateway = MockGateway::default()
			.with_registry_challenge(120u64, Address::repeat_byte(0x99), 400u64, 250u64)
			.with_reward(120u64, 200u64);
		let (store, processor) = setup(gateway);

		processor.process(&application(n, 1000, 1_653_860_896)).await.unwrap();
		processor
			.process(&registry_event(REGISTRY, "Challenge", n).uint_field("ChallengeID", 120u64).build())
			.await
			.unwrap();
		let failed = registry_event(REGISTRY, "ChallengeFailed", n)
			.uint_field("ChallengeID", 120u64)
			.uint_field("TotalTokens", 100u64)
			.build();
		processor.process(&failed).await.unwrap();

		let challenge = store.get_challenge(120u64.into());
		assert!(challenge.resolved);
		assert_eq!(challenge.total_tokens, U256::from(100u64));
		let listing = store.get_listing(n);
		assert_eq!(listing.last_governance_state, GovernanceState::ChallengeFailed);
		// 1000 - 250 stake + 200 reward
		assert_eq!(listing.unstaked_deposit, U256::from(950u64));
	}

	#[tokio::test]
	async fn full_appeal_sequence() {
		let n = Address::repeat_byte(0x14);
		let requester = Address::repeat_byte(0x77);
		let gateway = MockGateway::default()
			.with_registry_challenge(120u64, Address::repeat_byte(0x99), 400u64, 250u64)
			.with_registry_challenge(130u64, Address::repeat_byte(0x88), 300u64, 150u64)
			.with_registry_appeal(120u64, requester, 1000u64, 1_700_000_100u64, 1_700_000_200u64);
		let (store, processor) = setup(gateway);

		let events = vec![
			application(n, 1000, 1_653_860_896),
			registry_event(REGISTRY, "Challenge", n).uint_field("ChallengeID", 120u64).build(),
			registry_event(REGISTRY, "ChallengeSucceeded", n)
				.uint_field("ChallengeID", 120u64)
				.uint_field("TotalTokens", 90u64)
				.build(),
			registry_event(REGISTRY, "AppealRequested", n)
				.uint_field("ChallengeID", 120u64)
				.uint_field("AppealFeePaid", 1000u64)
				.address_field("Requester", requester)
				.build(),
			registry_event(REGISTRY, "AppealGranted", n).uint_field("ChallengeID", 120u64).build(),
			registry_event(REGISTRY, "GrantedAppealChallenged", n)
				.uint_field("ChallengeID", 120u64)
				.uint_field("AppealChallengeID", 130u64)
				.build(),
			registry_event(REGISTRY, "GrantedAppealOverturned", n)
				.uint_field("ChallengeID", 120u64)
				.uint_field("AppealChallengeID", 130u64)
				.uint_field("TotalTokens", 40u64)
				.build(),
		];
		for event in &events {
			processor.process(event).await.unwrap();
		}

		assert!(store.get_challenge(120u64.into()).resolved);
		let appeal_challenge = store.get_challenge(130u64.into());
		assert!(appeal_challenge.resolved);
		assert_eq!(appeal_challenge.total_tokens, U256::from(40u64));
		assert_eq!(appeal_challenge.challenger, Address::repeat_byte(0x88));

		let appeal = store.get_appeal(120u64.into());
		assert!(appeal.appeal_granted);
		assert_eq!(appeal.appeal_challenge_id, U256::from(130u64));
		assert_eq!(appeal.requester, requester);
		assert_eq!(appeal.appeal_fee_paid, U256::from(1000u64));
		assert_eq!(appeal.appeal_phase_expiry, 1_700_000_100);
		assert_eq!(appeal.appeal_open_to_challenge_expiry, 1_700_000_200);

		assert_eq!(store.get_listing(n).last_governance_state, GovernanceState::GrantedAppealOverturned);
	}

	#[tokio::test]
	async fn deposit_and_withdrawal_adjust_by_exact_amounts() {
		let n = Address::repeat_byte(0x15);
		let (store, processor) = setup(MockGateway::default());

		processor.process(&application(n, 1000, 1_653_860_896)).await.unwrap();
		processor
			.process(&registry_event(REGISTRY, "Deposit", n).uint_field("Amount", 300u64).build())
			.await
			.unwrap();
		assert_eq!(store.get_listing(n).unstaked_deposit, U256::from(1300u64));
		processor
			.process(&registry_event(REGISTRY, "Withdrawal", n).uint_field("Amount", 500u64).build())
			.await
			.unwrap();
		assert_eq!(store.get_listing(n).unstaked_deposit, U256::from(800u64));
	}

	#[tokio::test]
	async fn removal_resets_registry_fields() {
		let n = Address::repeat_byte(0x16);
		let (store, processor) = setup(MockGateway::default());

		processor.process(&application(n, 1000, 1_653_860_896)).await.unwrap();
		processor.process(&registry_event(REGISTRY, "ListingRemoved", n).build()).await.unwrap();

		let listing = store.get_listing(n);
		assert_eq!(listing.last_governance_state, GovernanceState::ListingRemoved);
		assert_eq!(listing.unstaked_deposit, U256::zero());
		assert_eq!(listing.app_expiry, 0);
		assert_eq!(listing.challenge_id, U256::zero());
		assert!(!listing.whitelisted);
	}

	#[tokio::test]
	async fn event_for_unknown_listing_backfills_from_contracts() {
		let n = Address::repeat_byte(0x17);
		let gateway = MockGateway::default()
			.with_name(n, "Backfilled")
			.with_newsroom_owner(n, Address::repeat_byte(2))
			.with_registry_listing(n, 1_653_999_999u64, true, 800u64, 0u64);
		let (store, processor) = setup(gateway);

		// whitelist arrives before the application was ever seen
		processor.process(&registry_event(REGISTRY, "ApplicationWhitelisted", n).build()).await.unwrap();

		let listing = store.get_listing(n);
		assert_eq!(listing.name, "Backfilled");
		assert_eq!(listing.unstaked_deposit, U256::from(800u64));
		assert!(listing.whitelisted);
		assert_eq!(listing.last_governance_state, GovernanceState::AppWhitelisted);
	}

	#[tokio::test]
	async fn replaying_a_prefix_is_idempotent() {
		let n = Address::repeat_byte(0x18);
		let gateway = MockGateway::default().with_registry_challenge(120u64, Address::repeat_byte(0x99), 400u64, 250u64);
		let (store, processor) = setup(gateway);

		let events = vec![
			application(n, 1000, 1_653_860_896),
			registry_event(REGISTRY, "Challenge", n).uint_field("ChallengeID", 120u64).build(),
		];
		for event in &events {
			processor.process(event).await.unwrap();
		}
		let snapshot = (store.get_listing(n), store.get_challenge(120u64.into()));
		// deliver the whole prefix again
		for event in &events {
			processor.process(event).await.unwrap();
		}
		assert_eq!(snapshot, (store.get_listing(n), store.get_challenge(120u64.into())));
	}

	#[tokio::test]
	async fn reward_claimed_updates_challenge_only() {
		let gateway = MockGateway::default().with_registry_challenge(120u64, Address::repeat_byte(0x99), 444u64, 250u64);
		let (store, processor) = setup(gateway);

		let claim = EventBuilder::new(ContractKind::Registry, Address::repeat_byte(REGISTRY), "RewardClaimed")
			.uint_field("ChallengeID", 120u64)
			.uint_field("Reward", 10u64)
			.build();
		processor.process(&claim).await.unwrap();

		let challenge = store.get_challenge(120u64.into());
		assert_eq!(challenge.reward_pool, U256::from(444u64));
	}
}
