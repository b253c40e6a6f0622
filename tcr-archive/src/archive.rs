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

//! Wires stores, gateway, scraper and processors into a ready dispatcher.

use std::env;
use std::sync::Arc;

use tcr_archive_common::Event;
use tcr_archive_gateway::{
	EthGateway, MultiSigGateway, NewsroomGateway, ParameterizerGateway, RegistryGateway,
};

use crate::database::{self, Database, PgNotifier, PgParamStore, PgStore};
use crate::dispatcher::Dispatcher;
use crate::error::Result;
use crate::processors::{
	EventProcessor, GovernmentProcessor, MultiSigProcessor, NewsroomProcessor, ParameterizerProcessor,
	RegistryProcessor, TokenProcessor, VotingProcessor,
};
use crate::scrape::{HttpScraper, MetadataScraper, NullScraper};
use crate::stores::{
	AppealStore, ChallengeStore, CronStore, ListingStore, MultiSigStore, NullStore, ParameterStore, PollStore,
	ProposalStore, RevisionStore, TransferStore,
};

const POSTGRES_VAR: &str = "DATABASE_URL";
const ETH_RPC_VAR: &str = "ETH_RPC_URL";

/// Which persistence adapter to wire.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StoreKind {
	Postgres,
	Null,
}

pub struct ArchiveBuilder {
	store: StoreKind,
	pg_url: Option<String>,
	eth_rpc_url: Option<String>,
	governance_channel: String,
	token_channel: String,
	scrape: bool,
}

impl Default for ArchiveBuilder {
	fn default() -> Self {
		Self {
			store: StoreKind::Postgres,
			pg_url: None,
			eth_rpc_url: None,
			governance_channel: String::new(),
			token_channel: String::new(),
			scrape: true,
		}
	}
}

impl ArchiveBuilder {
	/// Select the persistence adapter.
	///
	/// # Default
	/// Postgres.
	pub fn store_kind(mut self, kind: StoreKind) -> Self {
		self.store = kind;
		self
	}

	/// Set the url to the Postgres Database.
	///
	/// # Default
	/// defaults to value of the environment variable DATABASE_URL
	pub fn pg_url<S: Into<String>>(mut self, url: Option<S>) -> Self {
		self.pg_url = url.map(Into::into);
		self
	}

	/// Set the url of the Ethereum JSON-RPC node backing the gateway.
	///
	/// # Default
	/// defaults to value of the environment variable ETH_RPC_URL
	pub fn eth_rpc_url<S: Into<String>>(mut self, url: Option<S>) -> Self {
		self.eth_rpc_url = url.map(Into::into);
		self
	}

	/// Notification channel names; an empty name disables that topic.
	///
	/// # Default
	/// both disabled.
	pub fn channels<S: Into<String>>(mut self, governance: S, token: S) -> Self {
		self.governance_channel = governance.into();
		self.token_channel = token.into();
		self
	}

	/// Toggle HTTP metadata scraping for content revisions.
	pub fn scrape(mut self, scrape: bool) -> Self {
		self.scrape = scrape;
		self
	}

	/// Build the archive. With the Postgres store this connects and runs
	/// the migrations.
	pub async fn build(self) -> Result<Archive> {
		let eth_rpc_url = match self.eth_rpc_url {
			Some(url) => url,
			None => env::var(ETH_RPC_VAR)?,
		};
		let gateway = Arc::new(EthGateway::new(eth_rpc_url));
		let scraper: Arc<dyn MetadataScraper> =
			if self.scrape { Arc::new(HttpScraper::new()) } else { Arc::new(NullScraper) };

		match self.store {
			StoreKind::Null => {
				let store = Arc::new(NullStore);
				let processors = build_processors(store.clone(), store.clone(), store.clone(), gateway, scraper);
				let dispatcher = Dispatcher::new(processors, store.clone(), store.clone());
				Ok(Archive { dispatcher, cron: store, db: None })
			}
			StoreKind::Postgres => {
				let pg_url = match self.pg_url {
					Some(url) => url,
					None => env::var(POSTGRES_VAR)?,
				};
				database::migrate(&pg_url).await?;
				let db = Database::new(pg_url).await?;
				let store = Arc::new(PgStore::new(db.clone()));
				let registry_params = Arc::new(PgParamStore::parameterizer(db.clone()));
				let government_params = Arc::new(PgParamStore::government(db.clone()));
				let processors =
					build_processors(store.clone(), registry_params, government_params, gateway, scraper);
				let mut dispatcher = Dispatcher::new(processors, store.clone(), store.clone());
				if !self.governance_channel.is_empty() || !self.token_channel.is_empty() {
					let notifier =
						PgNotifier::new(db.pool().clone(), self.governance_channel, self.token_channel);
					dispatcher = dispatcher.with_publisher(Arc::new(notifier));
				}
				Ok(Archive { dispatcher, cron: store, db: Some(db) })
			}
		}
	}
}

fn build_processors<S, P, G>(
	store: Arc<S>,
	registry_params: Arc<P>,
	government_params: Arc<P>,
	gateway: Arc<G>,
	scraper: Arc<dyn MetadataScraper>,
) -> Vec<Box<dyn EventProcessor>>
where
	S: ListingStore
		+ RevisionStore
		+ ChallengeStore
		+ AppealStore
		+ PollStore
		+ TransferStore
		+ MultiSigStore
		+ 'static,
	P: ParameterStore + ProposalStore + 'static,
	G: NewsroomGateway + RegistryGateway + ParameterizerGateway + MultiSigGateway + 'static,
{
	// routing order: newsroom → registry → voting → parameterizer →
	// government → token → multi-sig
	vec![
		Box::new(NewsroomProcessor::new(store.clone(), store.clone(), gateway.clone(), scraper)),
		Box::new(RegistryProcessor::new(
			store.clone(),
			store.clone(),
			store.clone(),
			gateway.clone(),
			gateway.clone(),
		)),
		Box::new(VotingProcessor::new(store.clone())),
		Box::new(ParameterizerProcessor::new(registry_params.clone(), registry_params, gateway.clone())),
		Box::new(GovernmentProcessor::new(
			government_params.clone(),
			government_params,
			store.clone(),
			gateway.clone(),
		)),
		Box::new(TokenProcessor::new(store.clone())),
		Box::new(MultiSigProcessor::new(store, gateway)),
	]
}

/// A ready-to-run event archive.
pub struct Archive {
	dispatcher: Dispatcher,
	cron: Arc<dyn CronStore>,
	db: Option<Database>,
}

impl Archive {
	pub fn builder() -> ArchiveBuilder {
		ArchiveBuilder::default()
	}

	pub fn dispatcher(&self) -> &Dispatcher {
		&self.dispatcher
	}

	pub fn database(&self) -> Option<&Database> {
		self.db.as_ref()
	}

	/// Process a batch as delivered.
	pub async fn process_events(&self, events: &[Event]) -> Result<()> {
		self.dispatcher.process_events(events).await
	}

	/// Process a batch after dropping events the watermark already covers;
	/// the resume path for at-least-once crawlers.
	pub async fn process_new_events(&self, events: Vec<Event>) -> Result<()> {
		let watermark = self.cron.watermark().await?;
		let total = events.len();
		let fresh = Dispatcher::filter_seen(&watermark, events);
		if fresh.len() < total {
			log::info!("skipping {} already-processed events", total - fresh.len());
		}
		self.dispatcher.process_events(&fresh).await
	}
}
