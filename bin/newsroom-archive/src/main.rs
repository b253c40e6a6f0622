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

//! Entrypoint: ingest a feed of decoded contract logs (NDJSON from the
//! upstream crawler) into the archive.
//!
//! Exit codes: 0 normal, 1 fatal I/O, 2 configuration error.

mod archive;
mod cli_opts;
mod config;

use std::process;

pub fn main() {
	let config = match config::Config::new() {
		Ok(config) => config,
		Err(e) => {
			eprintln!("configuration error: {}", e);
			process::exit(2);
		}
	};
	if let Err(e) = tcr_archive::init_logger(config.cli().log_level(), log::LevelFilter::Debug) {
		eprintln!("could not init logging: {}", e);
		process::exit(1);
	}

	let runtime = match tokio::runtime::Runtime::new() {
		Ok(runtime) => runtime,
		Err(e) => {
			log::error!("could not start runtime: {}", e);
			process::exit(1);
		}
	};
	if let Err(e) = runtime.block_on(archive::run(config)) {
		log::error!("{:?}", e);
		process::exit(1);
	}
}
