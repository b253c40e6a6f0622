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

//! Typed views over the raw payload map, one enum per contract family.
//!
//! `decode` returns `Ok(None)` when the event belongs to another contract
//! or carries a name the processor does not recognize — both are silent
//! no-ops for the caller. A recognized name with a missing or mistyped
//! payload field is an error: the event was addressed to us but the
//! crawler handed us something malformed.

use tcr_archive_common::{AbiValue, Address, ContractKind, Event, Payload, H256, U256};

use crate::error::Result;

/// Statement-style fields are optional on chain; absent means empty.
fn opt_string(payload: &Payload, key: &str) -> String {
	match payload.get(key) {
		Some(AbiValue::String(s)) => s.clone(),
		_ => String::new(),
	}
}

fn opt_uint(payload: &Payload, key: &str) -> U256 {
	match payload.get(key) {
		Some(AbiValue::Uint(u)) => *u,
		_ => U256::zero(),
	}
}

/// Events emitted by a newsroom contract.
#[derive(Clone, Debug, PartialEq)]
pub enum NewsroomEvent {
	NameChanged { new_name: String },
	RevisionUpdated { editor: Address, content_id: U256, revision_id: U256, uri: String },
	OwnershipTransferred { previous_owner: Address, new_owner: Address },
	// accepted and ignored for now
	ContentPublished,
	RevisionSigned,
	RoleAdded,
	RoleRemoved,
}

impl NewsroomEvent {
	pub fn decode(event: &Event) -> Result<Option<Self>> {
		if event.contract != ContractKind::Newsroom {
			return Ok(None);
		}
		let payload = &event.payload;
		let decoded = match event.name() {
			"NameChanged" => NewsroomEvent::NameChanged { new_name: payload.string("NewName")? },
			"RevisionUpdated" => NewsroomEvent::RevisionUpdated {
				editor: payload.address("Editor")?,
				content_id: payload.uint("ContentId")?,
				revision_id: payload.uint("RevisionId")?,
				uri: payload.string("Uri")?,
			},
			"OwnershipTransferred" => NewsroomEvent::OwnershipTransferred {
				previous_owner: payload.address("PreviousOwner")?,
				new_owner: payload.address("NewOwner")?,
			},
			"ContentPublished" => NewsroomEvent::ContentPublished,
			"RevisionSigned" => NewsroomEvent::RevisionSigned,
			"RoleAdded" => NewsroomEvent::RoleAdded,
			"RoleRemoved" => NewsroomEvent::RoleRemoved,
			_ => return Ok(None),
		};
		Ok(Some(decoded))
	}
}

/// Events emitted by the token-curated registry contract.
#[derive(Clone, Debug, PartialEq)]
pub enum RegistryEvent {
	Application { listing: Address, deposit: U256, app_end_date: i64, applicant: Address, data: String },
	ApplicationWhitelisted { listing: Address },
	ApplicationRemoved { listing: Address },
	ListingRemoved { listing: Address },
	TouchAndRemoved { listing: Address },
	Deposit { listing: Address, amount: U256 },
	Withdrawal { listing: Address, amount: U256 },
	Challenge { listing: Address, challenge_id: U256, challenger: Address, data: String },
	ChallengeFailed { listing: Address, challenge_id: U256, total_tokens: U256 },
	ChallengeSucceeded { listing: Address, challenge_id: U256, total_tokens: U256 },
	FailedChallengeOverturned { listing: Address, challenge_id: U256, total_tokens: U256 },
	SuccessfulChallengeOverturned { listing: Address, challenge_id: U256, total_tokens: U256 },
	AppealRequested { listing: Address, challenge_id: U256, appeal_fee_paid: U256, requester: Address, data: String },
	AppealGranted { listing: Address, challenge_id: U256 },
	GrantedAppealChallenged { listing: Address, challenge_id: U256, appeal_challenge_id: U256, data: String },
	GrantedAppealConfirmed { listing: Address, challenge_id: U256, appeal_challenge_id: U256, total_tokens: U256 },
	GrantedAppealOverturned { listing: Address, challenge_id: U256, appeal_challenge_id: U256, total_tokens: U256 },
	RewardClaimed { challenge_id: U256, reward: U256, claimer: Address },
}

impl RegistryEvent {
	pub fn decode(event: &Event) -> Result<Option<Self>> {
		if event.contract != ContractKind::Registry {
			return Ok(None);
		}
		let p = &event.payload;
		let decoded = match event.name() {
			"Application" => RegistryEvent::Application {
				listing: p.address("ListingAddress")?,
				deposit: p.uint("Deposit")?,
				app_end_date: p.timestamp("AppEndDate")?,
				applicant: p.address("Applicant").unwrap_or_default(),
				data: opt_string(p, "Data"),
			},
			"ApplicationWhitelisted" => RegistryEvent::ApplicationWhitelisted { listing: p.address("ListingAddress")? },
			"ApplicationRemoved" => RegistryEvent::ApplicationRemoved { listing: p.address("ListingAddress")? },
			"ListingRemoved" => RegistryEvent::ListingRemoved { listing: p.address("ListingAddress")? },
			"TouchAndRemoved" => RegistryEvent::TouchAndRemoved { listing: p.address("ListingAddress")? },
			"Deposit" => RegistryEvent::Deposit { listing: p.address("ListingAddress")?, amount: p.uint("Amount")? },
			"Withdrawal" => {
				RegistryEvent::Withdrawal { listing: p.address("ListingAddress")?, amount: p.uint("Amount")? }
			}
			"Challenge" => RegistryEvent::Challenge {
				listing: p.address("ListingAddress")?,
				challenge_id: p.uint("ChallengeID")?,
				challenger: p.address("Challenger").unwrap_or_default(),
				data: opt_string(p, "Data"),
			},
			"ChallengeFailed" => RegistryEvent::ChallengeFailed {
				listing: p.address("ListingAddress")?,
				challenge_id: p.uint("ChallengeID")?,
				total_tokens: p.uint("TotalTokens")?,
			},
			"ChallengeSucceeded" => RegistryEvent::ChallengeSucceeded {
				listing: p.address("ListingAddress")?,
				challenge_id: p.uint("ChallengeID")?,
				total_tokens: p.uint("TotalTokens")?,
			},
			"FailedChallengeOverturned" => RegistryEvent::FailedChallengeOverturned {
				listing: p.address("ListingAddress")?,
				challenge_id: p.uint("ChallengeID")?,
				total_tokens: p.uint("TotalTokens")?,
			},
			"SuccessfulChallengeOverturned" => RegistryEvent::SuccessfulChallengeOverturned {
				listing: p.address("ListingAddress")?,
				challenge_id: p.uint("ChallengeID")?,
				total_tokens: p.uint("TotalTokens")?,
			},
			"AppealRequested" => RegistryEvent::AppealRequested {
				listing: p.address("ListingAddress")?,
				challenge_id: p.uint("ChallengeID")?,
				appeal_fee_paid: p.uint("AppealFeePaid")?,
				requester: p.address("Requester")?,
				data: opt_string(p, "Data"),
			},
			"AppealGranted" => RegistryEvent::AppealGranted {
				listing: p.address("ListingAddress")?,
				challenge_id: p.uint("ChallengeID")?,
			},
			"GrantedAppealChallenged" => RegistryEvent::GrantedAppealChallenged {
				listing: p.address("ListingAddress")?,
				challenge_id: p.uint("ChallengeID")?,
				appeal_challenge_id: p.uint("AppealChallengeID")?,
				data: opt_string(p, "Data"),
			},
			"GrantedAppealConfirmed" => RegistryEvent::GrantedAppealConfirmed {
				listing: p.address("ListingAddress")?,
				challenge_id: p.uint("ChallengeID")?,
				appeal_challenge_id: p.uint("AppealChallengeID")?,
				total_tokens: p.uint("TotalTokens")?,
			},
			"GrantedAppealOverturned" => RegistryEvent::GrantedAppealOverturned {
				listing: p.address("ListingAddress")?,
				challenge_id: p.uint("ChallengeID")?,
				appeal_challenge_id: p.uint("AppealChallengeID")?,
				total_tokens: p.uint("TotalTokens")?,
			},
			"RewardClaimed" => RegistryEvent::RewardClaimed {
				challenge_id: p.uint("ChallengeID")?,
				reward: opt_uint(p, "Reward"),
				claimer: p.address("Claimer").unwrap_or_default(),
			},
			_ => return Ok(None),
		};
		Ok(Some(decoded))
	}

	/// The listing a registry event concerns, when it names one directly.
	pub fn listing_address(&self) -> Option<Address> {
		use RegistryEvent::*;
		match self {
			Application { listing, .. }
			| ApplicationWhitelisted { listing }
			| ApplicationRemoved { listing }
			| ListingRemoved { listing }
			| TouchAndRemoved { listing }
			| Deposit { listing, .. }
			| Withdrawal { listing, .. }
			| Challenge { listing, .. }
			| ChallengeFailed { listing, .. }
			| ChallengeSucceeded { listing, .. }
			| FailedChallengeOverturned { listing, .. }
			| SuccessfulChallengeOverturned { listing, .. }
			| AppealRequested { listing, .. }
			| AppealGranted { listing, .. }
			| GrantedAppealChallenged { listing, .. }
			| GrantedAppealConfirmed { listing, .. }
			| GrantedAppealOverturned { listing, .. } => Some(*listing),
			RewardClaimed { .. } => None,
		}
	}
}

/// Events emitted by the commit-reveal voting contract.
#[derive(Clone, Debug, PartialEq)]
pub enum VotingEvent {
	PollCreated { vote_quorum: U256, commit_end_date: i64, reveal_end_date: i64, poll_id: U256 },
	VoteRevealed { poll_id: U256, choice: U256, votes_for: U256, votes_against: U256, voter: Address },
}

impl VotingEvent {
	pub fn decode(event: &Event) -> Result<Option<Self>> {
		if event.contract != ContractKind::Voting {
			return Ok(None);
		}
		let p = &event.payload;
		let decoded = match event.name() {
			"PollCreated" => VotingEvent::PollCreated {
				vote_quorum: p.uint("VoteQuorum")?,
				commit_end_date: p.timestamp("CommitEndDate")?,
				reveal_end_date: p.timestamp("RevealEndDate")?,
				poll_id: p.uint("PollID")?,
			},
			"VoteRevealed" => VotingEvent::VoteRevealed {
				poll_id: p.uint("PollID")?,
				choice: p.uint("Choice")?,
				votes_for: p.uint("VotesFor")?,
				votes_against: p.uint("VotesAgainst")?,
				voter: p.address("Voter").unwrap_or_default(),
			},
			_ => return Ok(None),
		};
		Ok(Some(decoded))
	}
}

/// Events shared by the parameterizer and government contracts; the two
/// processors consume them against their own tables.
#[derive(Clone, Debug, PartialEq)]
pub enum ProposalEvent {
	ReparameterizationProposal { name: String, value: U256, prop_id: H256, poll_id: U256 },
	ProposalPassed { prop_id: H256 },
	ProposalFailed { prop_id: H256 },
	ProposalExpired { prop_id: H256 },
}

impl ProposalEvent {
	pub fn decode(event: &Event, contract: ContractKind) -> Result<Option<Self>> {
		if event.contract != contract {
			return Ok(None);
		}
		let p = &event.payload;
		let decoded = match event.name() {
			"ReparameterizationProposal" | "GovtReparameterizationProposal" => {
				ProposalEvent::ReparameterizationProposal {
					name: p.string("Name")?,
					value: p.uint("Value")?,
					prop_id: p.fixed32("PropID")?,
					poll_id: opt_uint(p, "PollID"),
				}
			}
			"ProposalPassed" => ProposalEvent::ProposalPassed { prop_id: p.fixed32("PropID")? },
			"ProposalFailed" => ProposalEvent::ProposalFailed { prop_id: p.fixed32("PropID")? },
			"ProposalExpired" => ProposalEvent::ProposalExpired { prop_id: p.fixed32("PropID")? },
			_ => return Ok(None),
		};
		Ok(Some(decoded))
	}
}

/// ERC-20 transfer of the registry token.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenEvent {
	Transfer { from: Address, to: Address, amount: U256 },
}

impl TokenEvent {
	pub fn decode(event: &Event) -> Result<Option<Self>> {
		if event.contract != ContractKind::Token {
			return Ok(None);
		}
		let p = &event.payload;
		let decoded = match event.name() {
			"Transfer" => {
				TokenEvent::Transfer { from: p.address("From")?, to: p.address("To")?, amount: p.uint("Value")? }
			}
			_ => return Ok(None),
		};
		Ok(Some(decoded))
	}
}

/// Multi-sig wallet lifecycle: instantiation from the factory, owner churn
/// from the wallet itself.
#[derive(Clone, Debug, PartialEq)]
pub enum MultiSigEvent {
	ContractInstantiation { instantiation: Address },
	OwnerAddition { owner: Address },
	OwnerRemoval { owner: Address },
}

impl MultiSigEvent {
	pub fn decode(event: &Event) -> Result<Option<Self>> {
		let p = &event.payload;
		let decoded = match (event.contract, event.name()) {
			(ContractKind::MultiSigFactory, "ContractInstantiation") => {
				MultiSigEvent::ContractInstantiation { instantiation: p.address("Instantiation")? }
			}
			(ContractKind::MultiSig, "OwnerAddition") => MultiSigEvent::OwnerAddition { owner: p.address("Owner")? },
			(ContractKind::MultiSig, "OwnerRemoval") => MultiSigEvent::OwnerRemoval { owner: p.address("Owner")? },
			_ => return Ok(None),
		};
		Ok(Some(decoded))
	}
}
