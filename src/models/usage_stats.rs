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

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-user call counters, keyed by API name.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct UsageStats {
	pub user_id: String,
	pub usage: BTreeMap<String, i64>,
}

impl UsageStats {
	/// An empty record, as created when the user subscribes.
	pub fn empty(user_id: &str) -> Self {
		UsageStats {
			user_id: user_id.into(),
			usage: BTreeMap::new(),
		}
	}

	/// Number of recorded calls to `api`. Never-called APIs count as zero.
	pub fn count_for(&self, api: &str) -> i64 {
		self.usage.get(api).copied().unwrap_or(0)
	}
}
