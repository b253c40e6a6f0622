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

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "newsroom-archive", about = "Materialize newsroom registry events into Postgres")]
pub struct CliOpts {
	/// Path to a TOML configuration file.
	#[arg(short, long)]
	pub config: Option<PathBuf>,
	/// Event feed to ingest: a file of one JSON event per line, or `-` for
	/// stdin.
	#[arg(short, long, default_value = "-")]
	pub events: String,
	/// Increase stdout log verbosity (-v info, -vvv debug, -vvvv trace).
	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,
}

impl CliOpts {
	pub fn parse_opts() -> Self {
		<Self as Parser>::parse()
	}

	pub fn log_level(&self) -> log::LevelFilter {
		match self.verbose {
			0..=2 => log::LevelFilter::Info,
			3 => log::LevelFilter::Debug,
			_ => log::LevelFilter::Trace,
		}
	}
}
