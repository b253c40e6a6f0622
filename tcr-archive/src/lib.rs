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

//! Materializes a stream of decoded contract logs into the domain model of
//! a token-curated registry of newsrooms: listings, revisions, challenges,
//! appeals, polls, proposals, transfers and multi-sig wallets.
//!
//! The heart of the crate is the [`Dispatcher`]: it walks a batch of raw
//! events, routes each to the per-contract processor that owns it, and
//! advances the cron watermark the upstream crawler resumes from. Every
//! write is a keyed upsert or a field-scoped update, so replaying a batch
//! is harmless.

#![forbid(unsafe_code)]

// Re-exports
pub use tcr_archive_common::{AbiValue, Address, ContractKind, Event, LogMeta, Payload, RetrievalMethod, H256, U256};
pub use tcr_archive_gateway::EthGateway;

pub mod archive;
pub mod database;
pub mod dispatcher;
mod error;
pub mod events;
#[cfg(feature = "logging")]
mod logger;
pub mod processors;
pub mod scrape;
pub mod stores;
#[cfg(test)]
pub(crate) mod test_util;
pub mod types;

pub use self::archive::{Archive, ArchiveBuilder, StoreKind};
pub use self::database::{Database, DatabaseConfig};
pub use self::dispatcher::Dispatcher;
pub use self::error::{ArchiveError, Result};
#[cfg(feature = "logging")]
pub use self::logger::init_logger;
pub use self::processors::EventProcessor;
