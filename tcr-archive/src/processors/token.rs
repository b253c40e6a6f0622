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

//! Processor for transfers of the registry token.

use std::sync::Arc;

use async_trait::async_trait;

use tcr_archive_common::Event;

use crate::error::Result;
use crate::events::TokenEvent;
use crate::processors::EventProcessor;
use crate::stores::TransferStore;
use crate::types::TokenTransfer;

pub struct TokenProcessor {
	transfers: Arc<dyn TransferStore>,
}

impl TokenProcessor {
	pub fn new(transfers: Arc<dyn TransferStore>) -> Self {
		Self { transfers }
	}
}

#[async_trait]
impl EventProcessor for TokenProcessor {
	fn name(&self) -> &'static str {
		"token"
	}

	async fn process(&self, event: &Event) -> Result<bool> {
		let TokenEvent::Transfer { from, to, amount } = match TokenEvent::decode(event)? {
			Some(decoded) => decoded,
			None => return Ok(false),
		};
		let transfer = TokenTransfer {
			from,
			to,
			amount,
			tx_hash: event.log.tx_hash,
			log_index: event.log.log_index,
			block_number: event.log.block_number,
			transfer_ts: event.timestamp,
		};
		self.transfers.create_transfer(&transfer).await?;
		Ok(true)
	}
}
