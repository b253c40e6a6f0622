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

//! Hermetic test fixtures: an in-memory implementation of every store
//! trait (with real field-mask semantics, so masked updates are exercised,
//! not faked), a canned-response gateway, and event builders.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use tcr_archive_common::{AbiValue, Address, ContractKind, Event, LogMeta, Payload, RetrievalMethod, H256, U256};
use tcr_archive_gateway::{
	ContractProposal, MultiSigGateway, NewsroomContent, NewsroomGateway, NewsroomRevision, ParameterizerGateway,
	RegistryAppeal, RegistryChallenge, RegistryGateway, RegistryListing,
};

use crate::dispatcher::{Channel, Publisher};
use crate::error::Result;
use crate::stores::{
	AppealStore, ChallengeStore, CronStore, GovernanceEventStore, ListingStore, MultiSigStore, ParameterStore,
	PollStore, ProposalStore, RevisionStore, TransferStore,
};
use crate::types::{
	Appeal, AppealField, Challenge, ChallengeField, ContentRevision, CronWatermark, GovernanceEvent, Listing,
	ListingField, MultiSig, MultiSigOwner, Parameter, ParameterProposal, Poll, PollField, ProposalField, TokenTransfer,
};

static INIT: std::sync::Once = std::sync::Once::new();

/// Guard to call at the beginning of a test that should emit logs.
pub fn initialize() {
	INIT.call_once(|| {
		let _ = pretty_env_logger::try_init();
	});
}

// ---------------------------------------------------------------- events

static NEXT_TX: AtomicU64 = AtomicU64::new(1);

pub struct EventBuilder {
	contract: ContractKind,
	contract_address: Address,
	event_type: String,
	payload: Payload,
	timestamp: i64,
	retrieval: RetrievalMethod,
	log: LogMeta,
}

impl EventBuilder {
	pub fn new(contract: ContractKind, contract_address: Address, event_type: &str) -> Self {
		// unique tx hash per built event unless overridden, so hashes of
		// distinct test events never collide
		let tx = NEXT_TX.fetch_add(1, Ordering::Relaxed);
		Self {
			contract,
			contract_address,
			event_type: event_type.to_string(),
			payload: Payload::new(),
			timestamp: 1_600_000_000,
			retrieval: RetrievalMethod::HistoricalFilter,
			log: LogMeta { block_number: 1, tx_hash: H256::from_low_u64_be(tx), ..Default::default() },
		}
	}

	pub fn ts(mut self, timestamp: i64) -> Self {
		self.timestamp = timestamp;
		self
	}

	pub fn live(mut self) -> Self {
		self.retrieval = RetrievalMethod::LiveWatch;
		self
	}

	pub fn tx_hash(mut self, tx_hash: H256) -> Self {
		self.log.tx_hash = tx_hash;
		self
	}

	pub fn log_index(mut self, log_index: u64) -> Self {
		self.log.log_index = log_index;
		self
	}

	pub fn address_field(mut self, key: &str, value: Address) -> Self {
		self.payload.insert(key, AbiValue::Address(value));
		self
	}

	pub fn uint_field(mut self, key: &str, value: u64) -> Self {
		self.payload.insert(key, AbiValue::Uint(value.into()));
		self
	}

	pub fn uint_field_u256(mut self, key: &str, value: U256) -> Self {
		self.payload.insert(key, AbiValue::Uint(value));
		self
	}

	pub fn string_field(mut self, key: &str, value: &str) -> Self {
		self.payload.insert(key, AbiValue::String(value.to_string()));
		self
	}

	pub fn fixed32_field(mut self, key: &str, value: H256) -> Self {
		self.payload.insert(key, AbiValue::Fixed32(value));
		self
	}

	pub fn build(self) -> Event {
		Event {
			contract: self.contract,
			contract_address: self.contract_address,
			event_type: self.event_type,
			payload: self.payload,
			timestamp: self.timestamp,
			retrieval: self.retrieval,
			log: self.log,
		}
	}
}

/// Builder for a registry event that names a listing.
pub fn registry_event(registry_byte: u8, name: &str, listing: Address) -> EventBuilder {
	EventBuilder::new(ContractKind::Registry, Address::repeat_byte(registry_byte), name)
		.address_field("ListingAddress", listing)
}

// ---------------------------------------------------------------- stores

/// In-memory implementation of every store trait.
#[derive(Default)]
pub struct MemoryStore {
	listings: Mutex<HashMap<Address, Listing>>,
	revisions: Mutex<HashMap<(Address, U256, U256), ContentRevision>>,
	governance_events: Mutex<HashMap<String, GovernanceEvent>>,
	challenges: Mutex<HashMap<U256, Challenge>>,
	appeals: Mutex<HashMap<U256, Appeal>>,
	polls: Mutex<HashMap<U256, Poll>>,
	transfers: Mutex<HashMap<(H256, u64), TokenTransfer>>,
	parameters: Mutex<HashMap<String, Parameter>>,
	proposals: Mutex<HashMap<H256, ParameterProposal>>,
	multisigs: Mutex<HashMap<Address, MultiSig>>,
	multisig_owners: Mutex<HashMap<String, MultiSigOwner>>,
	watermark: Mutex<CronWatermark>,
}

impl MemoryStore {
	pub fn get_listing(&self, address: Address) -> Listing {
		self.try_get_listing(address).expect("listing missing")
	}

	pub fn try_get_listing(&self, address: Address) -> Option<Listing> {
		self.listings.lock().unwrap().get(&address).cloned()
	}

	pub fn get_revision(&self, listing: Address, content_id: U256, revision_id: U256) -> ContentRevision {
		self.revisions.lock().unwrap().get(&(listing, content_id, revision_id)).cloned().expect("revision missing")
	}

	pub fn governance_event_count(&self) -> usize {
		self.governance_events.lock().unwrap().len()
	}

	pub fn get_governance_event(&self, hash: &str) -> GovernanceEvent {
		self.governance_events.lock().unwrap().get(hash).cloned().expect("governance event missing")
	}

	pub fn get_challenge(&self, id: U256) -> Challenge {
		self.challenges.lock().unwrap().get(&id).cloned().expect("challenge missing")
	}

	pub fn get_appeal(&self, challenge_id: U256) -> Appeal {
		self.appeals.lock().unwrap().get(&challenge_id).cloned().expect("appeal missing")
	}

	pub fn get_poll(&self, id: U256) -> Poll {
		self.try_get_poll(id).expect("poll missing")
	}

	pub fn try_get_poll(&self, id: U256) -> Option<Poll> {
		self.polls.lock().unwrap().get(&id).cloned()
	}

	pub fn seed_poll(&self, poll: Poll) {
		self.polls.lock().unwrap().insert(poll.id, poll);
	}

	pub fn get_transfer(&self, tx_hash: H256, log_index: u64) -> TokenTransfer {
		self.transfers.lock().unwrap().get(&(tx_hash, log_index)).cloned().expect("transfer missing")
	}

	pub fn get_parameter(&self, name: &str) -> Parameter {
		self.try_get_parameter(name).expect("parameter missing")
	}

	pub fn try_get_parameter(&self, name: &str) -> Option<Parameter> {
		self.parameters.lock().unwrap().get(name).cloned()
	}

	pub fn seed_parameter(&self, name: &str, value: u64) {
		self.parameters.lock().unwrap().insert(name.to_string(), Parameter { name: name.to_string(), value: value.into() });
	}

	pub fn get_proposal(&self, prop_id: H256) -> ParameterProposal {
		self.proposals.lock().unwrap().get(&prop_id).cloned().expect("proposal missing")
	}

	pub fn get_multisig(&self, address: Address) -> MultiSig {
		self.multisigs.lock().unwrap().get(&address).cloned().expect("multisig missing")
	}

	pub fn seed_multisig(&self, multisig: MultiSig) {
		self.multisigs.lock().unwrap().insert(multisig.address, multisig);
	}

	pub fn seed_multisig_owner(&self, owner: MultiSigOwner) {
		self.multisig_owners.lock().unwrap().insert(owner.key(), owner);
	}

	pub fn try_get_multisig_owner(&self, owner: Address, multisig: Address) -> Option<MultiSigOwner> {
		let key = MultiSigOwner { owner, multisig }.key();
		self.multisig_owners.lock().unwrap().get(&key).cloned()
	}

	pub fn get_watermark(&self) -> CronWatermark {
		self.watermark.lock().unwrap().clone()
	}
}

fn apply_listing_fields(stored: &mut Listing, updated: &Listing, fields: &[ListingField]) {
	for field in fields {
		match field {
			ListingField::Name => stored.name = updated.name.clone(),
			ListingField::Url => stored.url = updated.url.clone(),
			ListingField::Charter => stored.charter = updated.charter.clone(),
			ListingField::OwnerAddresses => stored.owner_addresses = updated.owner_addresses.clone(),
			ListingField::ContributorAddresses => {
				stored.contributor_addresses = updated.contributor_addresses.clone()
			}
			ListingField::Whitelisted => stored.whitelisted = updated.whitelisted,
			ListingField::LastGovernanceState => stored.last_governance_state = updated.last_governance_state,
			ListingField::UnstakedDeposit => stored.unstaked_deposit = updated.unstaked_deposit,
			ListingField::AppExpiry => stored.app_expiry = updated.app_expiry,
			ListingField::ChallengeId => stored.challenge_id = updated.challenge_id,
			ListingField::ApplicationTimestamp => stored.application_ts = updated.application_ts,
			ListingField::ApprovalTimestamp => stored.approval_ts = updated.approval_ts,
		}
	}
	stored.last_updated_ts = updated.last_updated_ts;
}

fn apply_challenge_fields(stored: &mut Challenge, updated: &Challenge, fields: &[ChallengeField]) {
	for field in fields {
		match field {
			ChallengeField::RewardPool => stored.reward_pool = updated.reward_pool,
			ChallengeField::Challenger => stored.challenger = updated.challenger,
			ChallengeField::Resolved => stored.resolved = updated.resolved,
			ChallengeField::Stake => stored.stake = updated.stake,
			ChallengeField::TotalTokens => stored.total_tokens = updated.total_tokens,
			ChallengeField::RequestAppealExpiry => stored.request_appeal_expiry = updated.request_appeal_expiry,
		}
	}
	stored.last_updated_ts = updated.last_updated_ts;
}

fn apply_appeal_fields(stored: &mut Appeal, updated: &Appeal, fields: &[AppealField]) {
	for field in fields {
		match field {
			AppealField::AppealGranted => stored.appeal_granted = updated.appeal_granted,
			AppealField::AppealOpenToChallengeExpiry => {
				stored.appeal_open_to_challenge_expiry = updated.appeal_open_to_challenge_expiry
			}
			AppealField::AppealChallengeId => stored.appeal_challenge_id = updated.appeal_challenge_id,
		}
	}
	stored.last_updated_ts = updated.last_updated_ts;
}

fn apply_poll_fields(stored: &mut Poll, updated: &Poll, fields: &[PollField]) {
	for field in fields {
		match field {
			PollField::VotesFor => stored.votes_for = updated.votes_for,
			PollField::VotesAgainst => stored.votes_against = updated.votes_against,
			PollField::IsPassed => stored.is_passed = updated.is_passed,
		}
	}
}

fn apply_proposal_fields(stored: &mut ParameterProposal, updated: &ParameterProposal, fields: &[ProposalField]) {
	for field in fields {
		match field {
			ProposalField::Accepted => stored.accepted = updated.accepted,
			ProposalField::Expired => stored.expired = updated.expired,
			ProposalField::Active => stored.active = updated.active,
		}
	}
	stored.last_updated_ts = updated.last_updated_ts;
}

#[async_trait]
impl ListingStore for MemoryStore {
	async fn listing(&self, address: Address) -> Result<Option<Listing>> {
		Ok(self.try_get_listing(address))
	}

	async fn create_listing(&self, listing: &Listing) -> Result<()> {
		self.listings.lock().unwrap().entry(listing.address).or_insert_with(|| listing.clone());
		Ok(())
	}

	async fn update_listing(&self, listing: &Listing, fields: &[ListingField]) -> Result<()> {
		if let Some(stored) = self.listings.lock().unwrap().get_mut(&listing.address) {
			apply_listing_fields(stored, listing, fields);
		}
		Ok(())
	}
}

#[async_trait]
impl RevisionStore for MemoryStore {
	async fn revision(&self, listing: Address, content_id: U256, revision_id: U256) -> Result<Option<ContentRevision>> {
		Ok(self.revisions.lock().unwrap().get(&(listing, content_id, revision_id)).cloned())
	}

	async fn create_revision(&self, revision: &ContentRevision) -> Result<()> {
		self.revisions
			.lock()
			.unwrap()
			.entry((revision.listing_address, revision.content_id, revision.revision_id))
			.or_insert_with(|| revision.clone());
		Ok(())
	}
}

#[async_trait]
impl GovernanceEventStore for MemoryStore {
	async fn record_governance_event(&self, event: &GovernanceEvent) -> Result<bool> {
		let mut events = self.governance_events.lock().unwrap();
		if events.contains_key(&event.event_hash) {
			return Ok(false);
		}
		events.insert(event.event_hash.clone(), event.clone());
		Ok(true)
	}
}

#[async_trait]
impl ChallengeStore for MemoryStore {
	async fn challenge(&self, id: U256) -> Result<Option<Challenge>> {
		Ok(self.challenges.lock().unwrap().get(&id).cloned())
	}

	async fn create_challenge(&self, challenge: &Challenge) -> Result<()> {
		self.challenges.lock().unwrap().entry(challenge.id).or_insert_with(|| challenge.clone());
		Ok(())
	}

	async fn update_challenge(&self, challenge: &Challenge, fields: &[ChallengeField]) -> Result<()> {
		if let Some(stored) = self.challenges.lock().unwrap().get_mut(&challenge.id) {
			apply_challenge_fields(stored, challenge, fields);
		}
		Ok(())
	}
}

#[async_trait]
impl AppealStore for MemoryStore {
	async fn appeal(&self, challenge_id: U256) -> Result<Option<Appeal>> {
		Ok(self.appeals.lock().unwrap().get(&challenge_id).cloned())
	}

	async fn create_appeal(&self, appeal: &Appeal) -> Result<()> {
		self.appeals.lock().unwrap().entry(appeal.challenge_id).or_insert_with(|| appeal.clone());
		Ok(())
	}

	async fn update_appeal(&self, appeal: &Appeal, fields: &[AppealField]) -> Result<()> {
		if let Some(stored) = self.appeals.lock().unwrap().get_mut(&appeal.challenge_id) {
			apply_appeal_fields(stored, appeal, fields);
		}
		Ok(())
	}
}

#[async_trait]
impl PollStore for MemoryStore {
	async fn poll(&self, id: U256) -> Result<Option<Poll>> {
		Ok(self.try_get_poll(id))
	}

	async fn create_poll(&self, poll: &Poll) -> Result<()> {
		self.polls.lock().unwrap().entry(poll.id).or_insert_with(|| poll.clone());
		Ok(())
	}

	async fn update_poll(&self, poll: &Poll, fields: &[PollField]) -> Result<()> {
		if let Some(stored) = self.polls.lock().unwrap().get_mut(&poll.id) {
			apply_poll_fields(stored, poll, fields);
		}
		Ok(())
	}
}

#[async_trait]
impl TransferStore for MemoryStore {
	async fn create_transfer(&self, transfer: &TokenTransfer) -> Result<()> {
		self.transfers
			.lock()
			.unwrap()
			.entry((transfer.tx_hash, transfer.log_index))
			.or_insert_with(|| transfer.clone());
		Ok(())
	}
}

#[async_trait]
impl ParameterStore for MemoryStore {
	async fn parameter(&self, name: &str) -> Result<Option<Parameter>> {
		Ok(self.try_get_parameter(name))
	}

	async fn set_parameter(&self, parameter: &Parameter) -> Result<()> {
		self.parameters.lock().unwrap().insert(parameter.name.clone(), parameter.clone());
		Ok(())
	}
}

#[async_trait]
impl ProposalStore for MemoryStore {
	async fn proposal(&self, prop_id: H256) -> Result<Option<ParameterProposal>> {
		Ok(self.proposals.lock().unwrap().get(&prop_id).cloned())
	}

	async fn create_proposal(&self, proposal: &ParameterProposal) -> Result<()> {
		self.proposals.lock().unwrap().entry(proposal.prop_id).or_insert_with(|| proposal.clone());
		Ok(())
	}

	async fn update_proposal(&self, proposal: &ParameterProposal, fields: &[ProposalField]) -> Result<()> {
		if let Some(stored) = self.proposals.lock().unwrap().get_mut(&proposal.prop_id) {
			apply_proposal_fields(stored, proposal, fields);
		}
		Ok(())
	}
}

#[async_trait]
impl MultiSigStore for MemoryStore {
	async fn multisig(&self, address: Address) -> Result<Option<MultiSig>> {
		Ok(self.multisigs.lock().unwrap().get(&address).cloned())
	}

	async fn create_multisig(&self, multisig: &MultiSig) -> Result<()> {
		self.multisigs.lock().unwrap().entry(multisig.address).or_insert_with(|| multisig.clone());
		Ok(())
	}

	async fn update_multisig(&self, multisig: &MultiSig) -> Result<()> {
		self.multisigs.lock().unwrap().insert(multisig.address, multisig.clone());
		Ok(())
	}

	async fn multisig_owner(&self, owner: Address, multisig: Address) -> Result<Option<MultiSigOwner>> {
		Ok(self.try_get_multisig_owner(owner, multisig))
	}

	async fn create_multisig_owner(&self, owner: &MultiSigOwner) -> Result<()> {
		self.multisig_owners.lock().unwrap().insert(owner.key(), owner.clone());
		Ok(())
	}

	async fn delete_multisig_owner(&self, owner: &MultiSigOwner) -> Result<()> {
		self.multisig_owners.lock().unwrap().remove(&owner.key());
		Ok(())
	}
}

#[async_trait]
impl CronStore for MemoryStore {
	async fn watermark(&self) -> Result<CronWatermark> {
		Ok(self.get_watermark())
	}

	async fn save_watermark(&self, watermark: &CronWatermark) -> Result<()> {
		*self.watermark.lock().unwrap() = watermark.clone();
		Ok(())
	}
}

// --------------------------------------------------------------- gateway

/// Gateway with canned responses. Anything not seeded answers like a
/// contract with zeroed storage.
#[derive(Default)]
pub struct MockGateway {
	names: HashMap<Address, String>,
	newsroom_owners: HashMap<Address, Address>,
	contents: HashMap<(Address, U256), NewsroomContent>,
	newsroom_revisions: HashMap<(Address, U256, U256), NewsroomRevision>,
	revision_counts: HashMap<(Address, U256), U256>,
	registry_listings: HashMap<Address, RegistryListing>,
	registry_challenges: HashMap<U256, RegistryChallenge>,
	registry_appeals: HashMap<U256, RegistryAppeal>,
	request_appeal_expiries: HashMap<U256, U256>,
	rewards: HashMap<U256, U256>,
	proposals: HashMap<H256, ContractProposal>,
	wallet_owners: HashMap<Address, Vec<Address>>,
}

impl MockGateway {
	pub fn with_name(mut self, newsroom: Address, name: &str) -> Self {
		self.names.insert(newsroom, name.to_string());
		self
	}

	pub fn with_newsroom_owner(mut self, newsroom: Address, owner: Address) -> Self {
		self.newsroom_owners.insert(newsroom, owner);
		self
	}

	pub fn with_content(mut self, newsroom: Address, content_id: u64, content_hash: H256) -> Self {
		let content =
			NewsroomContent { content_hash, uri: String::new(), timestamp: 0, author: Address::zero() };
		self.contents.insert((newsroom, content_id.into()), content);
		self
	}

	#[allow(clippy::too_many_arguments)]
	pub fn with_revision(
		mut self,
		newsroom: Address,
		content_id: u64,
		revision_id: u64,
		content_hash: H256,
		uri: &str,
		author: Address,
		signature: Vec<u8>,
		timestamp: i64,
	) -> Self {
		let revision = NewsroomRevision { content_hash, uri: uri.to_string(), timestamp, author, signature };
		self.newsroom_revisions.insert((newsroom, content_id.into(), revision_id.into()), revision);
		let count = self.revision_counts.entry((newsroom, content_id.into())).or_insert_with(U256::zero);
		if *count <= U256::from(revision_id) {
			*count = U256::from(revision_id) + U256::one();
		}
		self
	}

	pub fn with_registry_listing(
		mut self,
		listing: Address,
		application_expiry: u64,
		whitelisted: bool,
		unstaked_deposit: u64,
		challenge_id: u64,
	) -> Self {
		let on_chain = RegistryListing {
			application_expiry: application_expiry.into(),
			whitelisted,
			owner: Address::zero(),
			unstaked_deposit: unstaked_deposit.into(),
			challenge_id: challenge_id.into(),
		};
		self.registry_listings.insert(listing, on_chain);
		self
	}

	pub fn with_registry_challenge(mut self, id: u64, challenger: Address, reward_pool: u64, stake: u64) -> Self {
		let challenge = RegistryChallenge {
			reward_pool: reward_pool.into(),
			challenger,
			resolved: false,
			stake: stake.into(),
			total_tokens: U256::zero(),
		};
		self.registry_challenges.insert(id.into(), challenge);
		self
	}

	pub fn with_registry_appeal(
		mut self,
		id: u64,
		requester: Address,
		appeal_fee_paid: u64,
		appeal_phase_expiry: u64,
		appeal_open_to_challenge_expiry: u64,
	) -> Self {
		let appeal = RegistryAppeal {
			requester,
			appeal_fee_paid: appeal_fee_paid.into(),
			appeal_phase_expiry: appeal_phase_expiry.into(),
			appeal_granted: false,
			appeal_open_to_challenge_expiry: appeal_open_to_challenge_expiry.into(),
			appeal_challenge_id: U256::zero(),
		};
		self.registry_appeals.insert(id.into(), appeal);
		self
	}

	pub fn with_request_appeal_expiry(mut self, id: u64, expiry: u64) -> Self {
		self.request_appeal_expiries.insert(id.into(), expiry.into());
		self
	}

	pub fn with_reward(mut self, id: u64, reward: u64) -> Self {
		self.rewards.insert(id.into(), reward.into());
		self
	}

	pub fn with_proposal(mut self, prop_id: H256, proposal: ContractProposal) -> Self {
		self.proposals.insert(prop_id, proposal);
		self
	}

	pub fn with_wallet_owners(mut self, wallet: Address, owners: Vec<Address>) -> Self {
		self.wallet_owners.insert(wallet, owners);
		self
	}
}

type GatewayResult<T> = std::result::Result<T, tcr_archive_gateway::GatewayError>;

#[async_trait]
impl NewsroomGateway for MockGateway {
	async fn name(&self, newsroom: Address) -> GatewayResult<String> {
		Ok(self.names.get(&newsroom).cloned().unwrap_or_default())
	}

	async fn owner(&self, newsroom: Address) -> GatewayResult<Address> {
		Ok(self.newsroom_owners.get(&newsroom).copied().unwrap_or_default())
	}

	async fn content(&self, newsroom: Address, content_id: U256) -> GatewayResult<NewsroomContent> {
		Ok(self.contents.get(&(newsroom, content_id)).cloned().unwrap_or(NewsroomContent {
			content_hash: H256::zero(),
			uri: String::new(),
			timestamp: 0,
			author: Address::zero(),
		}))
	}

	async fn revision(&self, newsroom: Address, content_id: U256, revision_id: U256) -> GatewayResult<NewsroomRevision> {
		Ok(self.newsroom_revisions.get(&(newsroom, content_id, revision_id)).cloned().unwrap_or(NewsroomRevision {
			content_hash: H256::zero(),
			uri: String::new(),
			timestamp: 0,
			author: Address::zero(),
			signature: Vec::new(),
		}))
	}

	async fn revision_count(&self, newsroom: Address, content_id: U256) -> GatewayResult<U256> {
		Ok(self.revision_counts.get(&(newsroom, content_id)).copied().unwrap_or_default())
	}
}

#[async_trait]
impl RegistryGateway for MockGateway {
	async fn listing(&self, _registry: Address, listing: Address) -> GatewayResult<RegistryListing> {
		Ok(self.registry_listings.get(&listing).cloned().unwrap_or(RegistryListing {
			application_expiry: U256::zero(),
			whitelisted: false,
			owner: Address::zero(),
			unstaked_deposit: U256::zero(),
			challenge_id: U256::zero(),
		}))
	}

	async fn challenge(&self, _registry: Address, challenge_id: U256) -> GatewayResult<RegistryChallenge> {
		Ok(self.registry_challenges.get(&challenge_id).cloned().unwrap_or(RegistryChallenge {
			reward_pool: U256::zero(),
			challenger: Address::zero(),
			resolved: false,
			stake: U256::zero(),
			total_tokens: U256::zero(),
		}))
	}

	async fn appeal(&self, _registry: Address, challenge_id: U256) -> GatewayResult<RegistryAppeal> {
		Ok(self.registry_appeals.get(&challenge_id).cloned().unwrap_or(RegistryAppeal {
			requester: Address::zero(),
			appeal_fee_paid: U256::zero(),
			appeal_phase_expiry: U256::zero(),
			appeal_granted: false,
			appeal_open_to_challenge_expiry: U256::zero(),
			appeal_challenge_id: U256::zero(),
		}))
	}

	async fn request_appeal_expiry(&self, _registry: Address, challenge_id: U256) -> GatewayResult<U256> {
		Ok(self.request_appeal_expiries.get(&challenge_id).copied().unwrap_or_default())
	}

	async fn determine_reward(&self, _registry: Address, challenge_id: U256) -> GatewayResult<U256> {
		Ok(self.rewards.get(&challenge_id).copied().unwrap_or_default())
	}
}

#[async_trait]
impl ParameterizerGateway for MockGateway {
	async fn proposal(&self, _parameterizer: Address, prop_id: H256) -> GatewayResult<ContractProposal> {
		Ok(self.proposals.get(&prop_id).cloned().unwrap_or(ContractProposal {
			app_expiry: U256::zero(),
			challenge_id: U256::zero(),
			deposit: U256::zero(),
			name: String::new(),
			owner: Address::zero(),
			process_by: U256::zero(),
			value: U256::zero(),
		}))
	}
}

#[async_trait]
impl MultiSigGateway for MockGateway {
	async fn owners(&self, wallet: Address) -> GatewayResult<Vec<Address>> {
		Ok(self.wallet_owners.get(&wallet).cloned().unwrap_or_default())
	}
}

// ------------------------------------------------------------- publisher

/// Publisher that records what would have been notified.
#[derive(Default)]
pub struct RecordingPublisher {
	published: Mutex<Vec<(Channel, String)>>,
}

impl RecordingPublisher {
	pub fn published(&self) -> Vec<(Channel, String)> {
		self.published.lock().unwrap().clone()
	}
}

#[async_trait]
impl Publisher for RecordingPublisher {
	async fn publish(&self, channel: Channel, tx_hash: &str) -> Result<()> {
		self.published.lock().unwrap().push((channel, tx_hash.to_string()));
		Ok(())
	}
}
