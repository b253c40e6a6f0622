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

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use anyhow::{Context, Result};

use tcr_archive::Archive;
use tcr_archive_common::Event;

use crate::config::Config;

/// Events are flushed to the dispatcher in batches of this size; the
/// watermark advances after each batch.
const BATCH_SIZE: usize = 100;

pub async fn run(config: Config) -> Result<()> {
	let archive = Archive::builder()
		.store_kind(config.store_kind())
		.pg_url(config.pg_url())
		.eth_rpc_url(config.eth_rpc_url())
		.channels(config.governance_channel(), config.token_channel())
		.scrape(config.scrape())
		.build()
		.await?;

	let reader: Box<dyn BufRead> = match config.cli().events.as_str() {
		"-" => Box::new(BufReader::new(io::stdin())),
		path => Box::new(BufReader::new(File::open(path).with_context(|| format!("could not open {}", path))?)),
	};

	let mut batch: Vec<Event> = Vec::with_capacity(BATCH_SIZE);
	let mut total = 0usize;
	for line in reader.lines() {
		let line = line?;
		if line.trim().is_empty() {
			continue;
		}
		match serde_json::from_str::<Event>(&line) {
			Ok(event) => batch.push(event),
			Err(e) => log::warn!("skipping undecodable event: {}", e),
		}
		if batch.len() == BATCH_SIZE {
			total += flush(&archive, &config, std::mem::take(&mut batch)).await;
		}
	}
	if !batch.is_empty() {
		total += flush(&archive, &config, batch).await;
	}
	log::info!("ingested {} events", total);
	Ok(())
}

/// Process one batch; per-batch errors are logged, not fatal, so a bad
/// stretch of the feed cannot wedge ingestion.
async fn flush(archive: &Archive, config: &Config, batch: Vec<Event>) -> usize {
	let len = batch.len();
	let result = if config.cron_mode() {
		archive.process_new_events(batch).await
	} else {
		archive.process_events(&batch).await
	};
	if let Err(e) = result {
		log::error!("batch of {} finished with error: {}", len, e);
	}
	len
}
