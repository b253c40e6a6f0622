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

//! PostgreSQL implementations of the store traits.
//!
//! Creation is always `ON CONFLICT DO NOTHING` on the natural key and
//! updates write exactly the named columns, so redelivered events cannot
//! clobber fields another processor owns.

use async_trait::async_trait;

use tcr_archive_common::{
	util::{address_string, h256_string},
	Address, H256, U256,
};

use super::models::{addresses_to_strings, u256_string};
use super::{queries, Database};
use crate::error::Result;
use crate::stores::{
	AppealStore, ChallengeStore, CronStore, GovernanceEventStore, ListingStore, MultiSigStore, ParameterStore,
	PollStore, ProposalStore, RevisionStore, TransferStore,
};
use crate::types::{
	Appeal, AppealField, Challenge, ChallengeField, ContentRevision, CronWatermark, GovernanceEvent, Listing,
	ListingField, MultiSig, MultiSigOwner, Parameter, ParameterProposal, Poll, PollField, ProposalField, TokenTransfer,
};

/// Store over the shared tables (everything but the parameter families).
#[derive(Clone)]
pub struct PgStore {
	db: Database,
}

impl PgStore {
	pub fn new(db: Database) -> Self {
		Self { db }
	}
}

/// Store over one parameter family: the registry parameterizer's tables or
/// the government's.
#[derive(Clone)]
pub struct PgParamStore {
	db: Database,
	parameters_table: &'static str,
	proposals_table: &'static str,
}

impl PgParamStore {
	pub fn parameterizer(db: Database) -> Self {
		Self { db, parameters_table: "parameters", proposals_table: "parameter_proposals" }
	}

	pub fn government(db: Database) -> Self {
		Self { db, parameters_table: "government_parameters", proposals_table: "government_parameter_proposals" }
	}
}

fn listing_column(field: ListingField) -> &'static str {
	match field {
		ListingField::Name => "name",
		ListingField::Url => "url",
		ListingField::Charter => "charter",
		ListingField::OwnerAddresses => "owner_addresses",
		ListingField::ContributorAddresses => "contributor_addresses",
		ListingField::Whitelisted => "whitelisted",
		ListingField::LastGovernanceState => "last_governance_state",
		ListingField::UnstakedDeposit => "unstaked_deposit",
		ListingField::AppExpiry => "app_expiry",
		ListingField::ChallengeId => "challenge_id",
		ListingField::ApplicationTimestamp => "application_ts",
		ListingField::ApprovalTimestamp => "approval_ts",
	}
}

fn challenge_column(field: ChallengeField) -> &'static str {
	match field {
		ChallengeField::RewardPool => "reward_pool",
		ChallengeField::Challenger => "challenger",
		ChallengeField::Resolved => "resolved",
		ChallengeField::Stake => "stake",
		ChallengeField::TotalTokens => "total_tokens",
		ChallengeField::RequestAppealExpiry => "request_appeal_expiry",
	}
}

fn appeal_column(field: AppealField) -> &'static str {
	match field {
		AppealField::AppealGranted => "appeal_granted",
		AppealField::AppealOpenToChallengeExpiry => "appeal_open_to_challenge_expiry",
		AppealField::AppealChallengeId => "appeal_challenge_id",
	}
}

fn poll_column(field: PollField) -> &'static str {
	match field {
		PollField::VotesFor => "votes_for",
		PollField::VotesAgainst => "votes_against",
		PollField::IsPassed => "is_passed",
	}
}

fn proposal_column(field: ProposalField) -> &'static str {
	match field {
		ProposalField::Accepted => "accepted",
		ProposalField::Expired => "expired",
		ProposalField::Active => "active",
	}
}

/// `UPDATE {table} SET last_updated_ts = $2, col = $3, ... WHERE {key} = $1`
fn update_sql(table: &str, key_column: &str, columns: &[&'static str], with_last_updated: bool) -> String {
	let mut set = Vec::new();
	let mut next = 2;
	if with_last_updated {
		set.push("last_updated_ts = $2".to_string());
		next = 3;
	}
	for (i, column) in columns.iter().enumerate() {
		set.push(format!("{} = ${}", column, i + next));
	}
	format!("UPDATE {} SET {} WHERE {} = $1", table, set.join(", "), key_column)
}

#[async_trait]
impl ListingStore for PgStore {
	async fn listing(&self, address: Address) -> Result<Option<Listing>> {
		queries::listing(self.db.pool(), &address_string(&address)).await?.map(|row| row.into_listing()).transpose()
	}

	async fn create_listing(&self, listing: &Listing) -> Result<()> {
		sqlx::query(
			r#"
            INSERT INTO listings (
                address, name, url, charter, owner_addresses, contributor_addresses, whitelisted,
                last_governance_state, unstaked_deposit, app_expiry, challenge_id,
                created_ts, application_ts, approval_ts, last_updated_ts
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (address) DO NOTHING
            "#,
		)
		.bind(address_string(&listing.address))
		.bind(&listing.name)
		.bind(&listing.url)
		.bind(listing.charter.as_ref().map(serde_json::to_value).transpose()?)
		.bind(addresses_to_strings(&listing.owner_addresses))
		.bind(addresses_to_strings(&listing.contributor_addresses))
		.bind(listing.whitelisted)
		.bind(listing.last_governance_state as i32)
		.bind(u256_string(listing.unstaked_deposit))
		.bind(listing.app_expiry)
		.bind(u256_string(listing.challenge_id))
		.bind(listing.created_ts)
		.bind(listing.application_ts)
		.bind(listing.approval_ts)
		.bind(listing.last_updated_ts)
		.execute(self.db.pool())
		.await?;
		Ok(())
	}

	async fn update_listing(&self, listing: &Listing, fields: &[ListingField]) -> Result<()> {
		if fields.is_empty() {
			return Ok(());
		}
		let columns: Vec<&'static str> = fields.iter().map(|f| listing_column(*f)).collect();
		let sql = update_sql("listings", "address", &columns, true);
		let mut query =
			sqlx::query(&sql).bind(address_string(&listing.address)).bind(listing.last_updated_ts);
		for field in fields {
			query = match field {
				ListingField::Name => query.bind(listing.name.clone()),
				ListingField::Url => query.bind(listing.url.clone()),
				ListingField::Charter => {
					query.bind(listing.charter.as_ref().map(serde_json::to_value).transpose()?)
				}
				ListingField::OwnerAddresses => query.bind(addresses_to_strings(&listing.owner_addresses)),
				ListingField::ContributorAddresses => {
					query.bind(addresses_to_strings(&listing.contributor_addresses))
				}
				ListingField::Whitelisted => query.bind(listing.whitelisted),
				ListingField::LastGovernanceState => query.bind(listing.last_governance_state as i32),
				ListingField::UnstakedDeposit => query.bind(u256_string(listing.unstaked_deposit)),
				ListingField::AppExpiry => query.bind(listing.app_expiry),
				ListingField::ChallengeId => query.bind(u256_string(listing.challenge_id)),
				ListingField::ApplicationTimestamp => query.bind(listing.application_ts),
				ListingField::ApprovalTimestamp => query.bind(listing.approval_ts),
			};
		}
		query.execute(self.db.pool()).await?;
		Ok(())
	}
}

#[async_trait]
impl RevisionStore for PgStore {
	async fn revision(&self, listing: Address, content_id: U256, revision_id: U256) -> Result<Option<ContentRevision>> {
		queries::revision(
			self.db.pool(),
			&address_string(&listing),
			&u256_string(content_id),
			&u256_string(revision_id),
		)
		.await?
		.map(|row| row.into_revision())
		.transpose()
	}

	async fn create_revision(&self, revision: &ContentRevision) -> Result<()> {
		sqlx::query(
			r#"
            INSERT INTO content_revisions (
                listing_address, content_id, revision_id, editor_address, revision_uri,
                content_hash, payload, revision_ts
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (listing_address, content_id, revision_id) DO NOTHING
            "#,
		)
		.bind(address_string(&revision.listing_address))
		.bind(u256_string(revision.content_id))
		.bind(u256_string(revision.revision_id))
		.bind(address_string(&revision.editor))
		.bind(&revision.uri)
		.bind(h256_string(&revision.content_hash))
		.bind(serde_json::to_value(&revision.payload)?)
		.bind(revision.timestamp)
		.execute(self.db.pool())
		.await?;
		Ok(())
	}
}

#[async_trait]
impl GovernanceEventStore for PgStore {
	async fn record_governance_event(&self, event: &GovernanceEvent) -> Result<bool> {
		let done = sqlx::query(
			r#"
            INSERT INTO governance_events (
                event_hash, listing_address, sender_address, event_type, payload,
                created_ts, last_updated_ts, block_number, tx_hash, tx_index, block_hash, log_index
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (event_hash) DO NOTHING
            "#,
		)
		.bind(&event.event_hash)
		.bind(address_string(&event.listing_address))
		.bind(address_string(&event.sender_address))
		.bind(&event.event_type)
		.bind(&event.payload)
		.bind(event.created_ts)
		.bind(event.last_updated_ts)
		.bind(event.log.block_number as i64)
		.bind(h256_string(&event.log.tx_hash))
		.bind(event.log.tx_index as i64)
		.bind(h256_string(&event.log.block_hash))
		.bind(event.log.log_index as i64)
		.execute(self.db.pool())
		.await?;
		Ok(done.rows_affected() > 0)
	}
}

#[async_trait]
impl ChallengeStore for PgStore {
	async fn challenge(&self, id: U256) -> Result<Option<Challenge>> {
		queries::challenge(self.db.pool(), &u256_string(id)).await?.map(|row| row.into_challenge()).transpose()
	}

	async fn create_challenge(&self, challenge: &Challenge) -> Result<()> {
		sqlx::query(
			r#"
            INSERT INTO challenges (
                challenge_id, listing_address, statement, reward_pool, challenger, resolved,
                stake, total_tokens, request_appeal_expiry, last_updated_ts
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (challenge_id) DO NOTHING
            "#,
		)
		.bind(u256_string(challenge.id))
		.bind(address_string(&challenge.listing_address))
		.bind(&challenge.statement)
		.bind(u256_string(challenge.reward_pool))
		.bind(address_string(&challenge.challenger))
		.bind(challenge.resolved)
		.bind(u256_string(challenge.stake))
		.bind(u256_string(challenge.total_tokens))
		.bind(challenge.request_appeal_expiry)
		.bind(challenge.last_updated_ts)
		.execute(self.db.pool())
		.await?;
		Ok(())
	}

	async fn update_challenge(&self, challenge: &Challenge, fields: &[ChallengeField]) -> Result<()> {
		if fields.is_empty() {
			return Ok(());
		}
		let columns: Vec<&'static str> = fields.iter().map(|f| challenge_column(*f)).collect();
		let sql = update_sql("challenges", "challenge_id", &columns, true);
		let mut query = sqlx::query(&sql).bind(u256_string(challenge.id)).bind(challenge.last_updated_ts);
		for field in fields {
			query = match field {
				ChallengeField::RewardPool => query.bind(u256_string(challenge.reward_pool)),
				ChallengeField::Challenger => query.bind(address_string(&challenge.challenger)),
				ChallengeField::Resolved => query.bind(challenge.resolved),
				ChallengeField::Stake => query.bind(u256_string(challenge.stake)),
				ChallengeField::TotalTokens => query.bind(u256_string(challenge.total_tokens)),
				ChallengeField::RequestAppealExpiry => query.bind(challenge.request_appeal_expiry),
			};
		}
		query.execute(self.db.pool()).await?;
		Ok(())
	}
}

#[async_trait]
impl AppealStore for PgStore {
	async fn appeal(&self, challenge_id: U256) -> Result<Option<Appeal>> {
		queries::appeal(self.db.pool(), &u256_string(challenge_id)).await?.map(|row| row.into_appeal()).transpose()
	}

	async fn create_appeal(&self, appeal: &Appeal) -> Result<()> {
		sqlx::query(
			r#"
            INSERT INTO appeals (
                challenge_id, requester, appeal_fee_paid, appeal_phase_expiry, appeal_granted,
                appeal_open_to_challenge_expiry, appeal_challenge_id, statement, last_updated_ts
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (challenge_id) DO NOTHING
            "#,
		)
		.bind(u256_string(appeal.challenge_id))
		.bind(address_string(&appeal.requester))
		.bind(u256_string(appeal.appeal_fee_paid))
		.bind(appeal.appeal_phase_expiry)
		.bind(appeal.appeal_granted)
		.bind(appeal.appeal_open_to_challenge_expiry)
		.bind(u256_string(appeal.appeal_challenge_id))
		.bind(&appeal.statement)
		.bind(appeal.last_updated_ts)
		.execute(self.db.pool())
		.await?;
		Ok(())
	}

	async fn update_appeal(&self, appeal: &Appeal, fields: &[AppealField]) -> Result<()> {
		if fields.is_empty() {
			return Ok(());
		}
		let columns: Vec<&'static str> = fields.iter().map(|f| appeal_column(*f)).collect();
		let sql = update_sql("appeals", "challenge_id", &columns, true);
		let mut query = sqlx::query(&sql).bind(u256_string(appeal.challenge_id)).bind(appeal.last_updated_ts);
		for field in fields {
			query = match field {
				AppealField::AppealGranted => query.bind(appeal.appeal_granted),
				AppealField::AppealOpenToChallengeExpiry => query.bind(appeal.appeal_open_to_challenge_expiry),
				AppealField::AppealChallengeId => query.bind(u256_string(appeal.appeal_challenge_id)),
			};
		}
		query.execute(self.db.pool()).await?;
		Ok(())
	}
}

#[async_trait]
impl PollStore for PgStore {
	async fn poll(&self, id: U256) -> Result<Option<Poll>> {
		queries::poll(self.db.pool(), &u256_string(id)).await?.map(|row| row.into_poll()).transpose()
	}

	async fn create_poll(&self, poll: &Poll) -> Result<()> {
		sqlx::query(
			r#"
            INSERT INTO polls (
                poll_id, commit_end_date, reveal_end_date, vote_quorum, votes_for, votes_against, is_passed
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (poll_id) DO NOTHING
            "#,
		)
		.bind(u256_string(poll.id))
		.bind(poll.commit_end_date)
		.bind(poll.reveal_end_date)
		.bind(u256_string(poll.vote_quorum))
		.bind(u256_string(poll.votes_for))
		.bind(u256_string(poll.votes_against))
		.bind(poll.is_passed)
		.execute(self.db.pool())
		.await?;
		Ok(())
	}

	async fn update_poll(&self, poll: &Poll, fields: &[PollField]) -> Result<()> {
		if fields.is_empty() {
			return Ok(());
		}
		let columns: Vec<&'static str> = fields.iter().map(|f| poll_column(*f)).collect();
		let sql = update_sql("polls", "poll_id", &columns, false);
		let mut query = sqlx::query(&sql).bind(u256_string(poll.id));
		for field in fields {
			query = match field {
				PollField::VotesFor => query.bind(u256_string(poll.votes_for)),
				PollField::VotesAgainst => query.bind(u256_string(poll.votes_against)),
				PollField::IsPassed => query.bind(poll.is_passed),
			};
		}
		query.execute(self.db.pool()).await?;
		Ok(())
	}
}

#[async_trait]
impl TransferStore for PgStore {
	async fn create_transfer(&self, transfer: &TokenTransfer) -> Result<()> {
		sqlx::query(
			r#"
            INSERT INTO token_transfers (
                tx_hash, log_index, from_address, to_address, amount, block_number, transfer_ts
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (tx_hash, log_index) DO NOTHING
            "#,
		)
		.bind(h256_string(&transfer.tx_hash))
		.bind(transfer.log_index as i64)
		.bind(address_string(&transfer.from))
		.bind(address_string(&transfer.to))
		.bind(u256_string(transfer.amount))
		.bind(transfer.block_number as i64)
		.bind(transfer.transfer_ts)
		.execute(self.db.pool())
		.await?;
		Ok(())
	}
}

#[async_trait]
impl MultiSigStore for PgStore {
	async fn multisig(&self, address: Address) -> Result<Option<MultiSig>> {
		queries::multisig(self.db.pool(), &address_string(&address)).await?.map(|row| row.into_multisig()).transpose()
	}

	async fn create_multisig(&self, multisig: &MultiSig) -> Result<()> {
		sqlx::query(
			r#"
            INSERT INTO multisigs (contract_address, owner_addresses) VALUES ($1, $2)
            ON CONFLICT (contract_address) DO NOTHING
            "#,
		)
		.bind(address_string(&multisig.address))
		.bind(addresses_to_strings(&multisig.owner_addresses))
		.execute(self.db.pool())
		.await?;
		Ok(())
	}

	async fn update_multisig(&self, multisig: &MultiSig) -> Result<()> {
		sqlx::query("UPDATE multisigs SET owner_addresses = $2 WHERE contract_address = $1")
			.bind(address_string(&multisig.address))
			.bind(addresses_to_strings(&multisig.owner_addresses))
			.execute(self.db.pool())
			.await?;
		Ok(())
	}

	async fn multisig_owner(&self, owner: Address, multisig: Address) -> Result<Option<MultiSigOwner>> {
		let key = MultiSigOwner { owner, multisig }.key();
		queries::multisig_owner(self.db.pool(), &key).await?.map(|row| row.into_owner()).transpose()
	}

	async fn create_multisig_owner(&self, owner: &MultiSigOwner) -> Result<()> {
		sqlx::query(
			r#"
            INSERT INTO multisig_owners (key, owner_address, multisig_address) VALUES ($1, $2, $3)
            ON CONFLICT (key) DO NOTHING
            "#,
		)
		.bind(owner.key())
		.bind(address_string(&owner.owner))
		.bind(address_string(&owner.multisig))
		.execute(self.db.pool())
		.await?;
		Ok(())
	}

	async fn delete_multisig_owner(&self, owner: &MultiSigOwner) -> Result<()> {
		sqlx::query("DELETE FROM multisig_owners WHERE key = $1")
			.bind(owner.key())
			.execute(self.db.pool())
			.await?;
		Ok(())
	}
}

#[async_trait]
impl CronStore for PgStore {
	async fn watermark(&self) -> Result<CronWatermark> {
		Ok(queries::watermark(self.db.pool()).await?.map(Into::into).unwrap_or_default())
	}

	async fn save_watermark(&self, watermark: &CronWatermark) -> Result<()> {
		sqlx::query(
			r#"
            INSERT INTO cron (id, last_ts, event_hashes) VALUES (1, $1, $2)
            ON CONFLICT (id) DO UPDATE SET last_ts = EXCLUDED.last_ts, event_hashes = EXCLUDED.event_hashes
            "#,
		)
		.bind(watermark.timestamp)
		.bind(&watermark.event_hashes)
		.execute(self.db.pool())
		.await?;
		Ok(())
	}
}

#[async_trait]
impl ParameterStore for PgParamStore {
	async fn parameter(&self, name: &str) -> Result<Option<Parameter>> {
		queries::parameter(self.db.pool(), self.parameters_table, name)
			.await?
			.map(|row| row.into_parameter())
			.transpose()
	}

	async fn set_parameter(&self, parameter: &Parameter) -> Result<()> {
		let sql = format!(
			"INSERT INTO {} (name, value) VALUES ($1, $2) ON CONFLICT (name) DO UPDATE SET value = EXCLUDED.value",
			self.parameters_table
		);
		sqlx::query(&sql)
			.bind(&parameter.name)
			.bind(u256_string(parameter.value))
			.execute(self.db.pool())
			.await?;
		Ok(())
	}
}

#[async_trait]
impl ProposalStore for PgParamStore {
	async fn proposal(&self, prop_id: H256) -> Result<Option<ParameterProposal>> {
		queries::proposal(self.db.pool(), self.proposals_table, &h256_string(&prop_id))
			.await?
			.map(|row| row.into_proposal())
			.transpose()
	}

	async fn create_proposal(&self, proposal: &ParameterProposal) -> Result<()> {
		let sql = format!(
			r#"
            INSERT INTO {} (
                prop_id, id, name, value, poll_id, app_expiry, accepted, expired, active, last_updated_ts
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (prop_id) DO NOTHING
            "#,
			self.proposals_table
		);
		sqlx::query(&sql)
			.bind(h256_string(&proposal.prop_id))
			.bind(&proposal.id)
			.bind(&proposal.name)
			.bind(u256_string(proposal.value))
			.bind(u256_string(proposal.poll_id))
			.bind(proposal.app_expiry)
			.bind(proposal.accepted)
			.bind(proposal.expired)
			.bind(proposal.active)
			.bind(proposal.last_updated_ts)
			.execute(self.db.pool())
			.await?;
		Ok(())
	}

	async fn update_proposal(&self, proposal: &ParameterProposal, fields: &[ProposalField]) -> Result<()> {
		if fields.is_empty() {
			return Ok(());
		}
		let columns: Vec<&'static str> = fields.iter().map(|f| proposal_column(*f)).collect();
		let sql = update_sql(self.proposals_table, "prop_id", &columns, true);
		let mut query =
			sqlx::query(&sql).bind(h256_string(&proposal.prop_id)).bind(proposal.last_updated_ts);
		for field in fields {
			query = match field {
				ProposalField::Accepted => query.bind(proposal.accepted),
				ProposalField::Expired => query.bind(proposal.expired),
				ProposalField::Active => query.bind(proposal.active),
			};
		}
		query.execute(self.db.pool()).await?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn update_sql_numbers_placeholders_in_order() {
		let sql = update_sql("listings", "address", &["whitelisted", "challenge_id"], true);
		assert_eq!(sql, "UPDATE listings SET last_updated_ts = $2, whitelisted = $3, challenge_id = $4 WHERE address = $1");
		let sql = update_sql("polls", "poll_id", &["votes_for"], false);
		assert_eq!(sql, "UPDATE polls SET votes_for = $2 WHERE poll_id = $1");
	}
}
