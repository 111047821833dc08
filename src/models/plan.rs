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

/// A subscription plan: the APIs a subscriber may call, and how many times.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Plan {
	pub id: String,
	pub name: String,
	pub description: String,
	pub api_permissions: Vec<String>,
	/// Per-API call limits. Keys need not appear in `api_permissions`, and an
	/// API with no entry here has no limit.
	pub usage_limits: BTreeMap<String, i64>,
}

impl Plan {
	/// Whether the plan grants access to `api` at all.
	pub fn permits(&self, api: &str) -> bool {
		self.api_permissions.iter().any(|name| name == api)
	}

	/// The call limit for `api`, `None` meaning unbounded.
	pub fn limit_for(&self, api: &str) -> Option<i64> {
		self.usage_limits.get(api).copied()
	}
}

/// Request body to create or replace a plan.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewPlan {
	pub name: String,
	pub description: String,
	pub api_permissions: Vec<String>,
	pub usage_limits: BTreeMap<String, i64>,
}

impl NewPlan {
	pub fn into_plan(self, id: String) -> Plan {
		Plan {
			id,
			name: self.name,
			description: self.description,
			api_permissions: self.api_permissions,
			usage_limits: self.usage_limits,
		}
	}
}
