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

//! Processor for multi-signature wallet events. The on-chain owner list is
//! authoritative: every event re-reads it and reconciles persistence
//! against it, so replays and missed events both converge.

use std::sync::Arc;

use async_trait::async_trait;

use tcr_archive_common::{Address, Event};
use tcr_archive_gateway::MultiSigGateway;

use crate::error::Result;
use crate::events::MultiSigEvent;
use crate::processors::EventProcessor;
use crate::stores::MultiSigStore;
use crate::types::{MultiSig, MultiSigOwner};

pub struct MultiSigProcessor {
	multisigs: Arc<dyn MultiSigStore>,
	gateway: Arc<dyn MultiSigGateway>,
}

impl MultiSigProcessor {
	pub fn new(multisigs: Arc<dyn MultiSigStore>, gateway: Arc<dyn MultiSigGateway>) -> Self {
		Self { multisigs, gateway }
	}

	async fn instantiated(&self, wallet: Address) -> Result<()> {
		let owners = self.gateway.owners(wallet).await?;
		let multisig = MultiSig { address: wallet, owner_addresses: owners.clone() };
		self.multisigs.create_multisig(&multisig).await?;
		for owner in owners {
			self.multisigs.create_multisig_owner(&MultiSigOwner { owner, multisig: wallet }).await?;
		}
		Ok(())
	}

	async fn owner_added(&self, wallet: Address, owner: Address) -> Result<()> {
		let on_chain = self.gateway.owners(wallet).await?;
		if on_chain.contains(&owner) && self.multisigs.multisig_owner(owner, wallet).await?.is_none() {
			self.multisigs.create_multisig_owner(&MultiSigOwner { owner, multisig: wallet }).await?;
		}
		self.sync_owner_list(wallet, on_chain).await
	}

	async fn owner_removed(&self, wallet: Address, owner: Address) -> Result<()> {
		let on_chain = self.gateway.owners(wallet).await?;
		if !on_chain.contains(&owner) && self.multisigs.multisig_owner(owner, wallet).await?.is_some() {
			self.multisigs.delete_multisig_owner(&MultiSigOwner { owner, multisig: wallet }).await?;
		}
		self.sync_owner_list(wallet, on_chain).await
	}

	async fn sync_owner_list(&self, wallet: Address, owners: Vec<Address>) -> Result<()> {
		let multisig = MultiSig { address: wallet, owner_addresses: owners };
		match self.multisigs.multisig(wallet).await? {
			Some(_) => self.multisigs.update_multisig(&multisig).await,
			// instantiation missed; the owner event is enough to backfill
			None => self.multisigs.create_multisig(&multisig).await,
		}
	}
}

#[async_trait]
impl EventProcessor for MultiSigProcessor {
	fn name(&self) -> &'static str {
		"multisig"
	}

	async fn process(&self, event: &Event) -> Result<bool> {
		let decoded = match MultiSigEvent::decode(event)? {
			Some(decoded) => decoded,
			None => return Ok(false),
		};
		match decoded {
			MultiSigEvent::ContractInstantiation { instantiation } => self.instantiated(instantiation).await?,
			MultiSigEvent::OwnerAddition { owner } => self.owner_added(event.contract_address, owner).await?,
			MultiSigEvent::OwnerRemoval { owner } => self.owner_removed(event.contract_address, owner).await?,
		}
		Ok(true)
	}
}
