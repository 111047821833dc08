// Subgate - Subscription-gated API access
// Copyright (C) 2018-2020 Amaury Martiny

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use sentry::protocol::{Event, Level};
use std::collections::BTreeMap;

pub const CARGO_PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Setup Sentry. Without a DSN the client is disabled and events are
/// silently dropped.
pub fn setup_sentry(dsn: Option<&str>) -> sentry::ClientInitGuard {
	let sentry = sentry::init(dsn.unwrap_or(""));
	if sentry.is_enabled() {
		log::info!(target: "subgate", "Sentry is successfully set up.")
	}

	sentry
}

/// Helper function to send an Error event to Sentry.
pub fn error(message: String, kind: &str) {
	log::debug!(target: "subgate", "{}", message);

	let mut extra = BTreeMap::new();
	extra.insert("kind".into(), kind.into());

	sentry::capture_event(Event {
		extra,
		level: Level::Error,
		message: Some(message),
		release: Some(CARGO_PKG_VERSION.into()),
		..Default::default()
	});
}
