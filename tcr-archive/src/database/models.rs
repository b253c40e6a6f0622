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

//! Direct database representations of the types in `types.rs`.
//! Addresses and hashes travel as lowercase hex strings, big integers as
//! decimal strings, so the rows stay inspectable with plain psql.

use sqlx::FromRow;

use tcr_archive_common::{util, Address, Error as CommonError, U256};

use crate::error::Result;
use crate::types::{
	Appeal, Challenge, CronWatermark, GovernanceState, Listing, MultiSig, MultiSigOwner, Parameter, ParameterProposal,
	Poll,
};

pub(crate) fn addresses_to_strings(addresses: &[Address]) -> Vec<String> {
	addresses.iter().map(util::address_string).collect()
}

fn addresses_from_strings(strings: &[String]) -> Result<Vec<Address>> {
	strings.iter().map(|s| util::parse_address(s).map_err(Into::into)).collect()
}

fn parse_state(value: i32) -> Result<GovernanceState> {
	GovernanceState::from_i32(value)
		.ok_or_else(|| CommonError::Parse(format!("governance state {}", value)).into())
}

#[derive(Debug, Clone, FromRow)]
pub struct ListingRow {
	pub address: String,
	pub name: String,
	pub url: String,
	pub charter: Option<serde_json::Value>,
	pub owner_addresses: Vec<String>,
	pub contributor_addresses: Vec<String>,
	pub whitelisted: bool,
	pub last_governance_state: i32,
	pub unstaked_deposit: String,
	pub app_expiry: i64,
	pub challenge_id: String,
	pub created_ts: i64,
	pub application_ts: i64,
	pub approval_ts: i64,
	pub last_updated_ts: i64,
}

impl ListingRow {
	pub fn into_listing(self) -> Result<Listing> {
		Ok(Listing {
			address: util::parse_address(&self.address)?,
			name: self.name,
			url: self.url,
			charter: self.charter.map(serde_json::from_value).transpose()?,
			owner_addresses: addresses_from_strings(&self.owner_addresses)?,
			contributor_addresses: addresses_from_strings(&self.contributor_addresses)?,
			whitelisted: self.whitelisted,
			last_governance_state: parse_state(self.last_governance_state)?,
			unstaked_deposit: util::parse_u256(&self.unstaked_deposit)?,
			app_expiry: self.app_expiry,
			challenge_id: util::parse_u256(&self.challenge_id)?,
			created_ts: self.created_ts,
			application_ts: self.application_ts,
			approval_ts: self.approval_ts,
			last_updated_ts: self.last_updated_ts,
		})
	}
}

#[derive(Debug, Clone, FromRow)]
pub struct RevisionRow {
	pub listing_address: String,
	pub content_id: String,
	pub revision_id: String,
	pub editor_address: String,
	pub revision_uri: String,
	pub content_hash: String,
	pub payload: serde_json::Value,
	pub revision_ts: i64,
}

impl RevisionRow {
	pub fn into_revision(self) -> Result<crate::types::ContentRevision> {
		Ok(crate::types::ContentRevision {
			listing_address: util::parse_address(&self.listing_address)?,
			content_id: util::parse_u256(&self.content_id)?,
			revision_id: util::parse_u256(&self.revision_id)?,
			editor: util::parse_address(&self.editor_address)?,
			uri: self.revision_uri,
			content_hash: util::parse_h256(&self.content_hash)?,
			payload: serde_json::from_value(self.payload)?,
			timestamp: self.revision_ts,
		})
	}
}

#[derive(Debug, Clone, FromRow)]
pub struct ChallengeRow {
	pub challenge_id: String,
	pub listing_address: String,
	pub statement: String,
	pub reward_pool: String,
	pub challenger: String,
	pub resolved: bool,
	pub stake: String,
	pub total_tokens: String,
	pub request_appeal_expiry: i64,
	pub last_updated_ts: i64,
}

impl ChallengeRow {
	pub fn into_challenge(self) -> Result<Challenge> {
		Ok(Challenge {
			id: util::parse_u256(&self.challenge_id)?,
			listing_address: util::parse_address(&self.listing_address)?,
			statement: self.statement,
			reward_pool: util::parse_u256(&self.reward_pool)?,
			challenger: util::parse_address(&self.challenger)?,
			resolved: self.resolved,
			stake: util::parse_u256(&self.stake)?,
			total_tokens: util::parse_u256(&self.total_tokens)?,
			request_appeal_expiry: self.request_appeal_expiry,
			last_updated_ts: self.last_updated_ts,
		})
	}
}

#[derive(Debug, Clone, FromRow)]
pub struct AppealRow {
	pub challenge_id: String,
	pub requester: String,
	pub appeal_fee_paid: String,
	pub appeal_phase_expiry: i64,
	pub appeal_granted: bool,
	pub appeal_open_to_challenge_expiry: i64,
	pub appeal_challenge_id: String,
	pub statement: String,
	pub last_updated_ts: i64,
}

impl AppealRow {
	pub fn into_appeal(self) -> Result<Appeal> {
		Ok(Appeal {
			challenge_id: util::parse_u256(&self.challenge_id)?,
			requester: util::parse_address(&self.requester)?,
			appeal_fee_paid: util::parse_u256(&self.appeal_fee_paid)?,
			appeal_phase_expiry: self.appeal_phase_expiry,
			appeal_granted: self.appeal_granted,
			appeal_open_to_challenge_expiry: self.appeal_open_to_challenge_expiry,
			appeal_challenge_id: util::parse_u256(&self.appeal_challenge_id)?,
			statement: self.statement,
			last_updated_ts: self.last_updated_ts,
		})
	}
}

#[derive(Debug, Clone, FromRow)]
pub struct PollRow {
	pub poll_id: String,
	pub commit_end_date: i64,
	pub reveal_end_date: i64,
	pub vote_quorum: String,
	pub votes_for: String,
	pub votes_against: String,
	pub is_passed: bool,
}

impl PollRow {
	pub fn into_poll(self) -> Result<Poll> {
		Ok(Poll {
			id: util::parse_u256(&self.poll_id)?,
			commit_end_date: self.commit_end_date,
			reveal_end_date: self.reveal_end_date,
			vote_quorum: util::parse_u256(&self.vote_quorum)?,
			votes_for: util::parse_u256(&self.votes_for)?,
			votes_against: util::parse_u256(&self.votes_against)?,
			is_passed: self.is_passed,
		})
	}
}

#[derive(Debug, Clone, FromRow)]
pub struct ParameterRow {
	pub name: String,
	pub value: String,
}

impl ParameterRow {
	pub fn into_parameter(self) -> Result<Parameter> {
		Ok(Parameter { name: self.name, value: util::parse_u256(&self.value)? })
	}
}

#[derive(Debug, Clone, FromRow)]
pub struct ProposalRow {
	pub prop_id: String,
	pub id: String,
	pub name: String,
	pub value: String,
	pub poll_id: String,
	pub app_expiry: i64,
	pub accepted: bool,
	pub expired: bool,
	pub active: bool,
	pub last_updated_ts: i64,
}

impl ProposalRow {
	pub fn into_proposal(self) -> Result<ParameterProposal> {
		Ok(ParameterProposal {
			prop_id: util::parse_h256(&self.prop_id)?,
			id: self.id,
			name: self.name,
			value: util::parse_u256(&self.value)?,
			poll_id: util::parse_u256(&self.poll_id)?,
			app_expiry: self.app_expiry,
			accepted: self.accepted,
			expired: self.expired,
			active: self.active,
			last_updated_ts: self.last_updated_ts,
		})
	}
}

#[derive(Debug, Clone, FromRow)]
pub struct MultiSigRow {
	pub contract_address: String,
	pub owner_addresses: Vec<String>,
}

impl MultiSigRow {
	pub fn into_multisig(self) -> Result<MultiSig> {
		Ok(MultiSig {
			address: util::parse_address(&self.contract_address)?,
			owner_addresses: addresses_from_strings(&self.owner_addresses)?,
		})
	}
}

#[derive(Debug, Clone, FromRow)]
pub struct MultiSigOwnerRow {
	pub owner_address: String,
	pub multisig_address: String,
}

impl MultiSigOwnerRow {
	pub fn into_owner(self) -> Result<MultiSigOwner> {
		Ok(MultiSigOwner {
			owner: util::parse_address(&self.owner_address)?,
			multisig: util::parse_address(&self.multisig_address)?,
		})
	}
}

#[derive(Debug, Clone, FromRow)]
pub struct CronRow {
	pub last_ts: i64,
	pub event_hashes: Vec<String>,
}

impl From<CronRow> for CronWatermark {
	fn from(row: CronRow) -> Self {
		CronWatermark { timestamp: row.last_ts, event_hashes: row.event_hashes }
	}
}

pub(crate) fn u256_string(value: U256) -> String {
	value.to_string()
}
