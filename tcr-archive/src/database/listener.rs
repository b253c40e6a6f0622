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

//! Notification plumbing over Postgres LISTEN/NOTIFY.
//!
//! The dispatcher publishes a `{tx_hash}` wake-up on the governance and
//! token channels through [`PgNotifier`]; downstream consumers subscribe
//! with [`Listener`], which runs a callback per notification until killed.

use std::time::Duration;

use futures::{FutureExt, StreamExt};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgListener, PgNotification, PgPool};

use async_trait::async_trait;

use crate::dispatcher::{Channel, Publisher};
use crate::error::{ArchiveError, Result};

/// A notification as received from Postgres.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notif {
	/// The channel the notification arrived on.
	pub channel: String,
	pub tx_hash: String,
}

#[derive(Serialize, Deserialize)]
struct NotifPayload {
	tx_hash: String,
}

/// Publisher over `pg_notify`. An empty channel name disables that topic.
#[derive(Clone)]
pub struct PgNotifier {
	pool: PgPool,
	governance_channel: String,
	token_channel: String,
}

impl PgNotifier {
	pub fn new(pool: PgPool, governance_channel: impl Into<String>, token_channel: impl Into<String>) -> Self {
		Self { pool, governance_channel: governance_channel.into(), token_channel: token_channel.into() }
	}

	/// Both topics on their conventional channel names.
	pub fn with_default_channels(pool: PgPool) -> Self {
		Self::new(pool, Channel::GovernanceEvents.as_str(), Channel::TokenEvents.as_str())
	}

	fn channel_name(&self, channel: Channel) -> &str {
		match channel {
			Channel::GovernanceEvents => &self.governance_channel,
			Channel::TokenEvents => &self.token_channel,
		}
	}
}

#[async_trait]
impl Publisher for PgNotifier {
	async fn publish(&self, channel: Channel, tx_hash: &str) -> Result<()> {
		let name = self.channel_name(channel);
		if name.is_empty() {
			return Ok(());
		}
		let payload = serde_json::to_string(&NotifPayload { tx_hash: tx_hash.to_string() })?;
		sqlx::query("SELECT pg_notify($1, $2)").bind(name).bind(payload).execute(&self.pool).await?;
		Ok(())
	}
}

type Task = Box<dyn Fn(Notif) -> futures::future::BoxFuture<'static, Result<()>> + Send + Sync>;

pub struct Builder {
	task: Task,
	channels: Vec<String>,
	pg_url: String,
}

impl Builder {
	pub fn new<F>(url: &str, f: F) -> Self
	where
		F: 'static + Send + Sync + Fn(Notif) -> futures::future::BoxFuture<'static, Result<()>>,
	{
		Self { task: Box::new(f), channels: Vec::new(), pg_url: url.to_string() }
	}

	#[must_use]
	pub fn listen_on(mut self, channel: impl Into<String>) -> Self {
		self.channels.push(channel.into());
		self
	}

	/// Spawns this listener which will work on its notifications in the
	/// background.
	pub async fn spawn(self) -> Result<Listener> {
		let (tx, rx) = flume::bounded(1);

		// connect and LISTEN before spawning so a notification sent right
		// after spawn() returns cannot be missed
		let mut listener = PgListener::connect(&self.pg_url).await?;
		listener.listen_all(self.channels.iter().map(|s| s.as_ref())).await?;

		let fut = async move {
			let mut stream = listener.into_stream();
			loop {
				let mut listen_fut = stream.next().fuse();
				futures::select! {
					notif = listen_fut => {
						match notif {
							Some(Ok(notif)) => {
								if let Err(e) = self.handle_notification(notif).await {
									log::error!("{:?}", e);
								}
							},
							Some(Err(e)) => {
								log::error!("{:?}", e);
							},
							None => break,
						}
					},
					r = rx.recv_async() => {
						match r {
							Ok(_) => break,
							Err(e) => {
								log::warn!("Ending due to: {:?}", e);
							}
						}
					},
					complete => break,
				};
			}
			Ok::<(), ArchiveError>(())
		};

		let handle = Some(tokio::spawn(fut));
		Ok(Listener { tx, handle })
	}

	async fn handle_notification(&self, notif: PgNotification) -> Result<()> {
		let payload: NotifPayload = serde_json::from_str(notif.payload())?;
		let notif = Notif { channel: notif.channel().to_string(), tx_hash: payload.tx_hash };
		(self.task)(notif).await
	}
}

/// A Postgres listener over the notification channels.
/// Kill it explicitly; the spawned task ends when the sender drops too.
pub struct Listener {
	// Shutdown signal
	tx: flume::Sender<()>,
	handle: Option<tokio::task::JoinHandle<Result<()>>>,
}

impl Listener {
	pub fn builder<F>(pg_url: &str, f: F) -> Builder
	where
		F: 'static + Send + Sync + Fn(Notif) -> futures::future::BoxFuture<'static, Result<()>>,
	{
		Builder::new(pg_url, f)
	}

	pub async fn kill(&mut self) -> Result<()> {
		let _ = self.tx.send_async(()).await;
		if let Some(handle) = self.handle.take() {
			match tokio::time::timeout(Duration::from_secs(1), handle).await {
				Ok(joined) => joined.map_err(|e| ArchiveError::General(format!("listener task failed: {}", e)))??,
				Err(_) => log::warn!("listener shutdown timed out"),
			}
		}
		Ok(())
	}
}
