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

//! Documents persisted by the [`Store`](crate::store::Store).

pub mod permission;
pub mod plan;
pub mod subscription;
pub mod usage_stats;

pub use permission::{NewPermission, Permission};
pub use plan::{NewPlan, Plan};
pub use subscription::Subscription;
pub use usage_stats::UsageStats;
