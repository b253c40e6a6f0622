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

//! Processor for the commit-reveal voting contract.

use std::sync::Arc;

use async_trait::async_trait;

use tcr_archive_common::{Event, U256};

use crate::error::Result;
use crate::events::VotingEvent;
use crate::processors::EventProcessor;
use crate::stores::PollStore;
use crate::types::{Poll, PollField};

pub struct VotingProcessor {
	polls: Arc<dyn PollStore>,
}

impl VotingProcessor {
	pub fn new(polls: Arc<dyn PollStore>) -> Self {
		Self { polls }
	}

	async fn poll_created(
		&self,
		poll_id: U256,
		vote_quorum: U256,
		commit_end_date: i64,
		reveal_end_date: i64,
	) -> Result<()> {
		let poll = Poll {
			id: poll_id,
			commit_end_date,
			reveal_end_date,
			vote_quorum,
			votes_for: U256::zero(),
			votes_against: U256::zero(),
			is_passed: false,
		};
		self.polls.create_poll(&poll).await
	}

	async fn vote_revealed(&self, poll_id: U256, choice: U256, votes_for: U256, votes_against: U256) -> Result<()> {
		let mut poll = match self.polls.poll(poll_id).await? {
			Some(poll) => poll,
			// reveal before the poll was created is an ordering anomaly;
			// we do not fabricate a poll out of a partial tally
			None => {
				log::warn!("vote revealed for unknown poll {}", poll_id);
				return Ok(());
			}
		};
		// choice 1 is a vote for the listing, anything else counts against
		let field = if choice == U256::one() {
			poll.votes_for = votes_for;
			PollField::VotesFor
		} else {
			poll.votes_against = votes_against;
			PollField::VotesAgainst
		};
		self.polls.update_poll(&poll, &[field]).await
	}
}

#[async_trait]
impl EventProcessor for VotingProcessor {
	fn name(&self) -> &'static str {
		"voting"
	}

	async fn process(&self, event: &Event) -> Result<bool> {
		let decoded = match VotingEvent::decode(event)? {
			Some(decoded) => decoded,
			None => return Ok(false),
		};
		match decoded {
			VotingEvent::PollCreated { vote_quorum, commit_end_date, reveal_end_date, poll_id } => {
				self.poll_created(poll_id, vote_quorum, commit_end_date, reveal_end_date).await?
			}
			VotingEvent::VoteRevealed { poll_id, choice, votes_for, votes_against, .. } => {
				self.vote_revealed(poll_id, choice, votes_for, votes_against).await?
			}
		}
		Ok(true)
	}
}
