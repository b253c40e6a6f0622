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

use std::path::Path;

use anyhow::{bail, Result};
use serde::Deserialize;

use tcr_archive::{DatabaseConfig, StoreKind};

use crate::cli_opts::CliOpts;

// unknown keys are tolerated so a config shared with other tooling parses
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct TomlConfig {
	persister_kind: Option<String>,
	cron_mode: Option<bool>,
	pubsub_topic_governance: Option<String>,
	pubsub_topic_token: Option<String>,
	eth_rpc_url: Option<String>,
	scrape: Option<bool>,
	postgres_host: Option<String>,
	postgres_port: Option<String>,
	postgres_user: Option<String>,
	postgres_password: Option<String>,
	postgres_dbname: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
	cli: CliOpts,
	toml: TomlConfig,
	store_kind: StoreKind,
}

impl Config {
	pub fn new() -> Result<Self> {
		let cli = CliOpts::parse_opts();
		let toml = cli.config.as_deref().map(Self::parse_file).transpose()?.unwrap_or_default();
		let store_kind = match toml.persister_kind.as_deref() {
			None | Some("postgres") => StoreKind::Postgres,
			Some("null") => StoreKind::Null,
			Some(other) => bail!("unknown persister-kind `{}` (expected postgres|null)", other),
		};
		Ok(Self { cli, toml, store_kind })
	}

	fn parse_file(path: &Path) -> Result<TomlConfig> {
		let toml_str = std::fs::read_to_string(path)?;
		Ok(toml::from_str(toml_str.as_str())?)
	}

	pub fn cli(&self) -> &CliOpts {
		&self.cli
	}

	pub fn store_kind(&self) -> StoreKind {
		self.store_kind
	}

	pub fn cron_mode(&self) -> bool {
		self.toml.cron_mode.unwrap_or(true)
	}

	pub fn scrape(&self) -> bool {
		self.toml.scrape.unwrap_or(true)
	}

	pub fn governance_channel(&self) -> String {
		self.toml.pubsub_topic_governance.clone().unwrap_or_default()
	}

	pub fn token_channel(&self) -> String {
		self.toml.pubsub_topic_token.clone().unwrap_or_default()
	}

	pub fn eth_rpc_url(&self) -> Option<String> {
		self.toml.eth_rpc_url.clone()
	}

	/// A URL assembled from the postgres-* settings, when any are present.
	pub fn pg_url(&self) -> Option<String> {
		let t = &self.toml;
		let any_set = t.postgres_host.is_some()
			|| t.postgres_port.is_some()
			|| t.postgres_user.is_some()
			|| t.postgres_password.is_some()
			|| t.postgres_dbname.is_some();
		if !any_set {
			return None;
		}
		let config = DatabaseConfig {
			host: t.postgres_host.clone(),
			port: t.postgres_port.clone(),
			user: t.postgres_user.clone(),
			password: t.postgres_password.clone(),
			dbname: t.postgres_dbname.clone(),
		};
		Some(config.url())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn toml_keys_are_kebab_case() {
		let parsed: TomlConfig = toml::from_str(
			r#"
            persister-kind = "postgres"
            cron-mode = false
            pubsub-topic-governance = "governance_events"
            postgres-host = "db.internal"
            postgres-dbname = "registry"
            "#,
		)
		.unwrap();
		assert_eq!(parsed.persister_kind.as_deref(), Some("postgres"));
		assert_eq!(parsed.cron_mode, Some(false));
		assert_eq!(parsed.pubsub_topic_governance.as_deref(), Some("governance_events"));
		assert_eq!(parsed.postgres_host.as_deref(), Some("db.internal"));
	}

	#[test]
	fn unknown_keys_are_tolerated() {
		let parsed: TomlConfig = toml::from_str("gcp-project = \"legacy\"").unwrap();
		assert!(parsed.persister_kind.is_none());
	}
}
