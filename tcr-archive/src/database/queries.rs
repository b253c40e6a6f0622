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

//! Common SQL queries abstracted into rust functions.

use sqlx::PgPool;

use crate::database::models::{
	AppealRow, ChallengeRow, CronRow, ListingRow, MultiSigOwnerRow, MultiSigRow, ParameterRow, PollRow, ProposalRow,
	RevisionRow,
};
use crate::error::Result;

pub(crate) async fn listing(pool: &PgPool, address: &str) -> Result<Option<ListingRow>> {
	sqlx::query_as::<_, ListingRow>(
		r#"
        SELECT address, name, url, charter, owner_addresses, contributor_addresses, whitelisted,
               last_governance_state, unstaked_deposit, app_expiry, challenge_id,
               created_ts, application_ts, approval_ts, last_updated_ts
        FROM listings WHERE address = $1
        "#,
	)
	.bind(address)
	.fetch_optional(pool)
	.await
	.map_err(Into::into)
}

pub(crate) async fn revision(
	pool: &PgPool,
	listing_address: &str,
	content_id: &str,
	revision_id: &str,
) -> Result<Option<RevisionRow>> {
	sqlx::query_as::<_, RevisionRow>(
		r#"
        SELECT listing_address, content_id, revision_id, editor_address, revision_uri,
               content_hash, payload, revision_ts
        FROM content_revisions
        WHERE listing_address = $1 AND content_id = $2 AND revision_id = $3
        "#,
	)
	.bind(listing_address)
	.bind(content_id)
	.bind(revision_id)
	.fetch_optional(pool)
	.await
	.map_err(Into::into)
}

pub(crate) async fn challenge(pool: &PgPool, challenge_id: &str) -> Result<Option<ChallengeRow>> {
	sqlx::query_as::<_, ChallengeRow>(
		r#"
        SELECT challenge_id, listing_address, statement, reward_pool, challenger, resolved,
               stake, total_tokens, request_appeal_expiry, last_updated_ts
        FROM challenges WHERE challenge_id = $1
        "#,
	)
	.bind(challenge_id)
	.fetch_optional(pool)
	.await
	.map_err(Into::into)
}

pub(crate) async fn appeal(pool: &PgPool, challenge_id: &str) -> Result<Option<AppealRow>> {
	sqlx::query_as::<_, AppealRow>(
		r#"
        SELECT challenge_id, requester, appeal_fee_paid, appeal_phase_expiry, appeal_granted,
               appeal_open_to_challenge_expiry, appeal_challenge_id, statement, last_updated_ts
        FROM appeals WHERE challenge_id = $1
        "#,
	)
	.bind(challenge_id)
	.fetch_optional(pool)
	.await
	.map_err(Into::into)
}

pub(crate) async fn poll(pool: &PgPool, poll_id: &str) -> Result<Option<PollRow>> {
	sqlx::query_as::<_, PollRow>(
		r#"
        SELECT poll_id, commit_end_date, reveal_end_date, vote_quorum, votes_for, votes_against, is_passed
        FROM polls WHERE poll_id = $1
        "#,
	)
	.bind(poll_id)
	.fetch_optional(pool)
	.await
	.map_err(Into::into)
}

pub(crate) async fn parameter(pool: &PgPool, table: &str, name: &str) -> Result<Option<ParameterRow>> {
	let sql = format!("SELECT name, value FROM {} WHERE name = $1", table);
	sqlx::query_as::<_, ParameterRow>(&sql).bind(name).fetch_optional(pool).await.map_err(Into::into)
}

pub(crate) async fn proposal(pool: &PgPool, table: &str, prop_id: &str) -> Result<Option<ProposalRow>> {
	let sql = format!(
		"SELECT prop_id, id, name, value, poll_id, app_expiry, accepted, expired, active, last_updated_ts \
         FROM {} WHERE prop_id = $1",
		table
	);
	sqlx::query_as::<_, ProposalRow>(&sql).bind(prop_id).fetch_optional(pool).await.map_err(Into::into)
}

pub(crate) async fn multisig(pool: &PgPool, address: &str) -> Result<Option<MultiSigRow>> {
	sqlx::query_as::<_, MultiSigRow>("SELECT contract_address, owner_addresses FROM multisigs WHERE contract_address = $1")
		.bind(address)
		.fetch_optional(pool)
		.await
		.map_err(Into::into)
}

pub(crate) async fn multisig_owner(pool: &PgPool, key: &str) -> Result<Option<MultiSigOwnerRow>> {
	sqlx::query_as::<_, MultiSigOwnerRow>("SELECT owner_address, multisig_address FROM multisig_owners WHERE key = $1")
		.bind(key)
		.fetch_optional(pool)
		.await
		.map_err(Into::into)
}

pub(crate) async fn watermark(pool: &PgPool) -> Result<Option<CronRow>> {
	sqlx::query_as::<_, CronRow>("SELECT last_ts, event_hashes FROM cron WHERE id = 1")
		.fetch_optional(pool)
		.await
		.map_err(Into::into)
}
