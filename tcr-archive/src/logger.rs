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

//! logging

use std::path::PathBuf;

use fern::colors::{Color, ColoredLevelConfig};

use crate::error::{ArchiveError, Result};

/// Initialize stdout + file logging. The file sink lives under the platform
/// data directory (`tcr_archive/archive.logs`).
pub fn init_logger(std: log::LevelFilter, file: log::LevelFilter) -> Result<()> {
	let colors = ColoredLevelConfig::new()
		.info(Color::Green)
		.warn(Color::Yellow)
		.error(Color::Red)
		.debug(Color::Blue)
		.trace(Color::Magenta);

	let mut log_dir = archive_dir()?;
	std::fs::create_dir_all(log_dir.as_path())?;
	log_dir.push("archive.logs");

	let stdout_dispatcher = fern::Dispatch::new()
		.level_for("tcr_archive", std)
		.level_for("sqlx", log::LevelFilter::Error)
		.level_for("reqwest", log::LevelFilter::Warn)
		.format(move |out, message, record| {
			out.finish(format_args!(
				"{} {} {}",
				chrono::Local::now().format("[%H:%M]"),
				colors.color(record.level()),
				message,
			))
		})
		.chain(fern::Dispatch::new().level(std).chain(std::io::stdout()));

	let file_dispatcher = fern::Dispatch::new()
		.level(file)
		.level_for("tcr_archive", file)
		.level_for("sqlx", log::LevelFilter::Warn)
		.level_for("reqwest", log::LevelFilter::Warn)
		.format(move |out, message, record| {
			out.finish(format_args!(
				"{} [{}][{}] {}::{};{}",
				chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
				record.target(),
				record.level(),
				message,
				format_opt(record.file().map(|s| s.to_string())),
				format_opt(record.line().map(|n| n.to_string()))
			))
		})
		.chain(fern::log_file(log_dir).expect("Failed to create tcr_archive.logs file"));

	fern::Dispatch::new().chain(stdout_dispatcher).chain(file_dispatcher).apply().expect("Could not init logging");
	Ok(())
}

fn format_opt(file: Option<String>) -> String {
	match file {
		None => "".to_string(),
		Some(f) => f,
	}
}

/// Platform data directory for logs and scratch state.
/// Linux: $XDG_DATA_HOME or $HOME/.local/share/tcr_archive
fn archive_dir() -> Result<PathBuf> {
	if let Some(base_dirs) = dirs::BaseDirs::new() {
		let mut path = base_dirs.data_local_dir().to_path_buf();
		path.push("tcr_archive");
		Ok(path)
	} else {
		Err(ArchiveError::from("No valid home directory path could be retrieved from the operating system"))
	}
}
