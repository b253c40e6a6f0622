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

//! Per-contract event processors.
//!
//! Each processor claims the events of one contract family, mutates the
//! entities it owns through the stores, and calls back into the gateway
//! when an event references state it has never seen (lazy backfill). A
//! processor never touches another processor's entities except through the
//! shared stores, and every write names the fields it changed.

pub mod government;
pub mod multisig;
pub mod newsroom;
pub mod parameterizer;
pub mod registry;
pub mod token;
pub mod voting;

use async_trait::async_trait;

use tcr_archive_common::Event;

use crate::error::Result;

pub use self::government::GovernmentProcessor;
pub use self::multisig::MultiSigProcessor;
pub use self::newsroom::NewsroomProcessor;
pub use self::parameterizer::ParameterizerProcessor;
pub use self::registry::RegistryProcessor;
pub use self::token::TokenProcessor;
pub use self::voting::VotingProcessor;

#[async_trait]
pub trait EventProcessor: Send + Sync {
	fn name(&self) -> &'static str;

	/// Apply one event. `Ok(false)` means the event is not addressed to
	/// this processor; the dispatcher keeps routing. `Err` means the event
	/// was recognized but could not be applied.
	async fn process(&self, event: &Event) -> Result<bool>;

	/// Whether events claimed by this processor concern a listing and
	/// should also be preserved as governance events.
	fn records_governance_events(&self) -> bool {
		false
	}
}
