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

/// A named downstream API endpoint. Admins keep a catalogue of these; access
/// decisions only ever look at a plan's `api_permissions`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Permission {
	pub id: String,
	pub name: String,
	pub api_endpoint: String,
	pub description: String,
}

/// Request body to create or replace a permission.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewPermission {
	pub name: String,
	pub api_endpoint: String,
	pub description: String,
}

impl NewPermission {
	pub fn into_permission(self, id: String) -> Permission {
		Permission {
			id,
			name: self.name,
			api_endpoint: self.api_endpoint,
			description: self.description,
		}
	}
}
