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

//! Domain entities the processors materialize, plus the per-entity field
//! enums used for field-scoped updates. An update call names exactly the
//! fields it touched so that concurrent writers of disjoint fields compose.

use serde::{Deserialize, Serialize};

use tcr_archive_common::{util, Address, LogMeta, H256, U256};

use crate::scrape::ArticleMetadata;

/// Where a listing currently sits in the registry lifecycle. Stored as the
/// discriminant value; the order is append-only.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum GovernanceState {
	None = 0,
	Applied = 1,
	Challenged = 2,
	ChallengeFailed = 3,
	ChallengeSucceeded = 4,
	FailedChallengeOverturned = 5,
	SuccessfulChallengeOverturned = 6,
	AppealRequested = 7,
	AppealGranted = 8,
	GrantedAppealChallenged = 9,
	GrantedAppealConfirmed = 10,
	GrantedAppealOverturned = 11,
	AppWhitelisted = 12,
	ApplicationRemoved = 13,
	ListingRemoved = 14,
	TouchRemoved = 15,
}

impl GovernanceState {
	/// States in which a listing can no longer carry an active challenge.
	pub fn clears_challenge(self) -> bool {
		matches!(self, GovernanceState::AppWhitelisted | GovernanceState::ApplicationRemoved | GovernanceState::ListingRemoved)
	}

	pub fn from_i32(value: i32) -> Option<Self> {
		use GovernanceState::*;
		let state = match value {
			0 => None,
			1 => Applied,
			2 => Challenged,
			3 => ChallengeFailed,
			4 => ChallengeSucceeded,
			5 => FailedChallengeOverturned,
			6 => SuccessfulChallengeOverturned,
			7 => AppealRequested,
			8 => AppealGranted,
			9 => GrantedAppealChallenged,
			10 => GrantedAppealConfirmed,
			11 => GrantedAppealOverturned,
			12 => AppWhitelisted,
			13 => ApplicationRemoved,
			14 => ListingRemoved,
			15 => TouchRemoved,
			_ => return Option::None,
		};
		Some(state)
	}
}

impl Default for GovernanceState {
	fn default() -> Self {
		GovernanceState::None
	}
}

/// The charter of a newsroom: revision 0 of content id 0, lifted onto the
/// listing as a first-class attribute.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Charter {
	pub uri: String,
	pub content_id: U256,
	pub revision_id: U256,
	pub signature: Vec<u8>,
	pub author: Address,
	pub content_hash: H256,
	pub timestamp: i64,
}

/// A newsroom's registration state, keyed by its contract address.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Listing {
	pub address: Address,
	pub name: String,
	pub url: String,
	pub charter: Option<Charter>,
	pub owner_addresses: Vec<Address>,
	pub contributor_addresses: Vec<Address>,
	pub whitelisted: bool,
	pub last_governance_state: GovernanceState,
	pub unstaked_deposit: U256,
	pub app_expiry: i64,
	/// 0 when no challenge is open.
	pub challenge_id: U256,
	pub created_ts: i64,
	pub application_ts: i64,
	pub approval_ts: i64,
	pub last_updated_ts: i64,
}

impl Listing {
	/// Record a lifecycle transition, clearing the active challenge where
	/// the new state forbids one.
	pub fn set_state(&mut self, state: GovernanceState) {
		self.last_governance_state = state;
		if state.clears_challenge() {
			self.challenge_id = U256::zero();
		}
	}

	/// Add an owner; duplicates are ignored. Returns whether the set changed.
	pub fn add_owner(&mut self, owner: Address) -> bool {
		if self.owner_addresses.contains(&owner) {
			return false;
		}
		self.owner_addresses.push(owner);
		true
	}

	/// Remove an owner; removing an absent one is a no-op. Returns whether
	/// the set changed.
	pub fn remove_owner(&mut self, owner: Address) -> bool {
		let before = self.owner_addresses.len();
		self.owner_addresses.retain(|a| *a != owner);
		self.owner_addresses.len() != before
	}
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ListingField {
	Name,
	Url,
	Charter,
	OwnerAddresses,
	ContributorAddresses,
	Whitelisted,
	LastGovernanceState,
	UnstakedDeposit,
	AppExpiry,
	ChallengeId,
	ApplicationTimestamp,
	ApprovalTimestamp,
}

/// One revision of one content item of a newsroom. Revisions are append
/// only; (listing, content id, revision id) is the key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContentRevision {
	pub listing_address: Address,
	pub content_id: U256,
	pub revision_id: U256,
	pub editor: Address,
	pub uri: String,
	pub content_hash: H256,
	pub payload: ArticleMetadata,
	pub timestamp: i64,
}

/// An event concerning the registry lifecycle, preserved verbatim for
/// downstream consumers. Keyed (and deduplicated) by the event hash.
#[derive(Clone, Debug, PartialEq)]
pub struct GovernanceEvent {
	pub event_hash: String,
	pub listing_address: Address,
	pub sender_address: Address,
	pub event_type: String,
	pub payload: serde_json::Value,
	pub created_ts: i64,
	pub last_updated_ts: i64,
	pub log: LogMeta,
}

/// A staked dispute against a listing. Appeal challenges reuse this shape
/// under their own id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Challenge {
	pub id: U256,
	pub listing_address: Address,
	pub statement: String,
	pub reward_pool: U256,
	pub challenger: Address,
	pub resolved: bool,
	pub stake: U256,
	pub total_tokens: U256,
	pub request_appeal_expiry: i64,
	pub last_updated_ts: i64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChallengeField {
	RewardPool,
	Challenger,
	Resolved,
	Stake,
	TotalTokens,
	RequestAppealExpiry,
}

/// A request to overturn a challenge resolution, keyed by the original
/// challenge id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Appeal {
	pub challenge_id: U256,
	pub requester: Address,
	pub appeal_fee_paid: U256,
	pub appeal_phase_expiry: i64,
	pub appeal_granted: bool,
	pub appeal_open_to_challenge_expiry: i64,
	/// 0 until the granted appeal is itself challenged.
	pub appeal_challenge_id: U256,
	pub statement: String,
	pub last_updated_ts: i64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AppealField {
	AppealGranted,
	AppealOpenToChallengeExpiry,
	AppealChallengeId,
}

/// A commit-reveal poll. For registry challenges the poll id equals the
/// challenge id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Poll {
	pub id: U256,
	pub commit_end_date: i64,
	pub reveal_end_date: i64,
	pub vote_quorum: U256,
	pub votes_for: U256,
	pub votes_against: U256,
	pub is_passed: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PollField {
	VotesFor,
	VotesAgainst,
	IsPassed,
}

/// An ERC-20 transfer of the registry token, keyed by (tx hash, log index).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenTransfer {
	pub from: Address,
	pub to: Address,
	pub amount: U256,
	pub tx_hash: H256,
	pub log_index: u64,
	pub block_number: u64,
	pub transfer_ts: i64,
}

/// A single named big-integer controlling registry (or government)
/// economics. Mutated only by a passed proposal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Parameter {
	pub name: String,
	pub value: U256,
}

/// A pending or settled reparameterization proposal. The row key is the
/// on-chain 32-byte prop id; `id` keeps the synthesized decimal
/// concatenation `name‖value‖appExpiry`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterProposal {
	pub prop_id: H256,
	pub id: String,
	pub name: String,
	pub value: U256,
	pub poll_id: U256,
	pub app_expiry: i64,
	pub accepted: bool,
	pub expired: bool,
	pub active: bool,
	pub last_updated_ts: i64,
}

impl ParameterProposal {
	/// The synthesized identifier: decimal forms of the triple, concatenated.
	pub fn synthesize_id(name: &str, value: U256, app_expiry: i64) -> String {
		format!("{}{}{}", name, value, app_expiry)
	}
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProposalField {
	Accepted,
	Expired,
	Active,
}

/// A multi-signature wallet and its owner set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultiSig {
	pub address: Address,
	pub owner_addresses: Vec<Address>,
}

/// One owner row of a multi-sig wallet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultiSigOwner {
	pub owner: Address,
	pub multisig: Address,
}

impl MultiSigOwner {
	/// Row key: `owner‖'-'‖multisig`, both lowercase hex.
	pub fn key(&self) -> String {
		format!("{}-{}", util::address_string(&self.owner), util::address_string(&self.multisig))
	}
}

/// Resume point for the upstream crawler: the newest event timestamp seen
/// and the hashes of every event that carried it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CronWatermark {
	pub timestamp: i64,
	pub event_hashes: Vec<String>,
}

impl CronWatermark {
	/// Fold one processed event into the watermark.
	pub fn observe(&mut self, timestamp: i64, hash: String) {
		if timestamp > self.timestamp {
			self.timestamp = timestamp;
			self.event_hashes.clear();
			self.event_hashes.push(hash);
		} else if timestamp == self.timestamp && !self.event_hashes.contains(&hash) {
			self.event_hashes.push(hash);
		}
	}

	/// Whether an event at `timestamp` with `hash` was already delivered.
	pub fn covers(&self, timestamp: i64, hash: &str) -> bool {
		timestamp < self.timestamp
			|| (timestamp == self.timestamp && self.event_hashes.iter().any(|h| h == hash))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn terminal_states_clear_the_challenge() {
		let mut listing = Listing { challenge_id: U256::from(120u64), ..Default::default() };
		listing.set_state(GovernanceState::Challenged);
		assert_eq!(listing.challenge_id, U256::from(120u64));
		listing.set_state(GovernanceState::AppWhitelisted);
		assert_eq!(listing.challenge_id, U256::zero());
	}

	#[test]
	fn owner_set_semantics() {
		let p = Address::repeat_byte(0x01);
		let q = Address::repeat_byte(0x02);
		let mut listing = Listing { owner_addresses: vec![p], ..Default::default() };
		assert!(listing.remove_owner(p));
		assert!(listing.add_owner(q));
		// applying the same transfer again is a no-op
		assert!(!listing.remove_owner(p));
		assert!(!listing.add_owner(q));
		assert_eq!(listing.owner_addresses, vec![q]);
	}

	#[test]
	fn governance_state_round_trips() {
		for v in 0..=15 {
			let state = GovernanceState::from_i32(v).unwrap();
			assert_eq!(state as i32, v);
		}
		assert!(GovernanceState::from_i32(99).is_none());
	}

	#[test]
	fn watermark_tracks_newest_timestamp() {
		let mut mark = CronWatermark::default();
		mark.observe(100, "a".into());
		mark.observe(100, "b".into());
		mark.observe(100, "b".into());
		assert_eq!(mark.event_hashes, vec!["a".to_string(), "b".to_string()]);
		mark.observe(200, "c".into());
		assert_eq!(mark.timestamp, 200);
		assert_eq!(mark.event_hashes, vec!["c".to_string()]);
		// stale timestamps do not regress the watermark
		mark.observe(100, "d".into());
		assert_eq!(mark.timestamp, 200);
	}

	#[test]
	fn watermark_covers_replayed_events() {
		let mark = CronWatermark { timestamp: 200, event_hashes: vec!["c".into()] };
		assert!(mark.covers(100, "a"));
		assert!(mark.covers(200, "c"));
		assert!(!mark.covers(200, "d"));
		assert!(!mark.covers(300, "c"));
	}

	#[test]
	fn proposal_id_concatenates_decimal_forms() {
		let id = ParameterProposal::synthesize_id("minDeposit", U256::from(5000u64), 1_653_860_896);
		assert_eq!(id, "minDeposit50001653860896");
	}
}
