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

//! Processor for newsroom contract events: naming, ownership and the
//! content revision tree. Content id 0 is the charter; its revisions are
//! mirrored onto the listing itself.

use std::sync::Arc;

use async_trait::async_trait;

use tcr_archive_common::{Address, Event, U256};
use tcr_archive_gateway::NewsroomGateway;

use crate::error::Result;
use crate::events::NewsroomEvent;
use crate::processors::EventProcessor;
use crate::scrape::{ArticleMetadata, MetadataScraper};
use crate::stores::{ListingStore, RevisionStore};
use crate::types::{Charter, ContentRevision, Listing, ListingField};

/// Content id of the charter by convention.
const CHARTER_CONTENT_ID: u64 = 0;

pub struct NewsroomProcessor {
	listings: Arc<dyn ListingStore>,
	revisions: Arc<dyn RevisionStore>,
	newsroom: Arc<dyn NewsroomGateway>,
	scraper: Arc<dyn MetadataScraper>,
}

impl NewsroomProcessor {
	pub fn new(
		listings: Arc<dyn ListingStore>,
		revisions: Arc<dyn RevisionStore>,
		newsroom: Arc<dyn NewsroomGateway>,
		scraper: Arc<dyn MetadataScraper>,
	) -> Self {
		Self { listings, revisions, newsroom, scraper }
	}

	/// Fetch the listing for `address`, synthesizing one from the contract
	/// if this is the first event we see for it. The registry-side fields
	/// stay empty until a registry event fills them.
	async fn listing_or_create(&self, address: Address, timestamp: i64) -> Result<Listing> {
		if let Some(listing) = self.listings.listing(address).await? {
			return Ok(listing);
		}
		let name = self.newsroom.name(address).await?;
		let owner = self.newsroom.owner(address).await?;
		let charter = self.latest_charter(address).await?;
		let listing = Listing {
			address,
			name,
			charter,
			owner_addresses: vec![owner],
			created_ts: timestamp,
			last_updated_ts: timestamp,
			..Default::default()
		};
		self.listings.create_listing(&listing).await?;
		Ok(listing)
	}

	async fn latest_charter(&self, address: Address) -> Result<Option<Charter>> {
		let count = self.newsroom.revision_count(address, CHARTER_CONTENT_ID.into()).await?;
		if count.is_zero() {
			return Ok(None);
		}
		let revision_id = count - U256::one();
		let revision = self.newsroom.revision(address, CHARTER_CONTENT_ID.into(), revision_id).await?;
		Ok(Some(Charter {
			uri: revision.uri,
			content_id: CHARTER_CONTENT_ID.into(),
			revision_id,
			signature: revision.signature,
			author: revision.author,
			content_hash: revision.content_hash,
			timestamp: revision.timestamp,
		}))
	}

	async fn name_changed(&self, event: &Event, new_name: String) -> Result<()> {
		let mut listing = self.listing_or_create(event.contract_address, event.timestamp).await?;
		listing.name = new_name;
		listing.last_updated_ts = event.timestamp;
		self.listings.update_listing(&listing, &[ListingField::Name]).await
	}

	async fn ownership_transferred(&self, event: &Event, previous: Address, new: Address) -> Result<()> {
		let mut listing = self.listing_or_create(event.contract_address, event.timestamp).await?;
		let removed = listing.remove_owner(previous);
		let added = listing.add_owner(new);
		if !removed && !added {
			return Ok(());
		}
		listing.last_updated_ts = event.timestamp;
		self.listings.update_listing(&listing, &[ListingField::OwnerAddresses]).await
	}

	async fn revision_updated(
		&self,
		event: &Event,
		editor: Address,
		content_id: U256,
		revision_id: U256,
		uri: String,
	) -> Result<()> {
		let newsroom = event.contract_address;
		let mut listing = self.listing_or_create(newsroom, event.timestamp).await?;
		let content = self.newsroom.content(newsroom, content_id).await?;
		let payload = match self.scraper.scrape(&uri).await {
			Ok(metadata) => metadata,
			Err(e) => {
				log::warn!("scrape failed for {}: {}", uri, e);
				ArticleMetadata::default()
			}
		};
		let revision = ContentRevision {
			listing_address: newsroom,
			content_id,
			revision_id,
			editor,
			uri: uri.clone(),
			content_hash: content.content_hash,
			payload,
			timestamp: event.timestamp,
		};
		self.revisions.create_revision(&revision).await?;

		if content_id.low_u64() != CHARTER_CONTENT_ID {
			return Ok(());
		}
		// the charter changed: the signed revision carries the fields the
		// content record does not
		let signed = self.newsroom.revision(newsroom, content_id, revision_id).await?;
		listing.charter = Some(Charter {
			uri,
			content_id,
			revision_id,
			signature: signed.signature,
			author: signed.author,
			content_hash: signed.content_hash,
			timestamp: signed.timestamp,
		});
		listing.last_updated_ts = event.timestamp;
		self.listings.update_listing(&listing, &[ListingField::Charter]).await
	}
}

#[async_trait]
impl EventProcessor for NewsroomProcessor {
	fn name(&self) -> &'static str {
		"newsroom"
	}

	fn records_governance_events(&self) -> bool {
		// every newsroom event concerns the listing keyed by its contract
		true
	}

	async fn process(&self, event: &Event) -> Result<bool> {
		let decoded = match NewsroomEvent::decode(event)? {
			Some(decoded) => decoded,
			None => return Ok(false),
		};
		match decoded {
			NewsroomEvent::NameChanged { new_name } => self.name_changed(event, new_name).await?,
			NewsroomEvent::OwnershipTransferred { previous_owner, new_owner } => {
				self.ownership_transferred(event, previous_owner, new_owner).await?
			}
			NewsroomEvent::RevisionUpdated { editor, content_id, revision_id, uri } => {
				self.revision_updated(event, editor, content_id, revision_id, uri).await?
			}
			NewsroomEvent::ContentPublished
			| NewsroomEvent::RevisionSigned
			| NewsroomEvent::RoleAdded
			| NewsroomEvent::RoleRemoved => {
				log::debug!("ignoring newsroom event {}", event.name());
			}
		}
		Ok(true)
	}
}
