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

//! Persistence for plans, permissions, subscriptions and usage counters.
//!
//! Request handlers and the access-control core only ever see the [`Store`]
//! trait, so the same logic runs against PostgreSQL in production and
//! against [`MemoryStore`] in tests.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::models::{Permission, Plan, Subscription, UsageStats};
use async_trait::async_trait;
use std::{error::Error, fmt, sync::Arc};

/// Maximum number of documents returned by a list operation.
pub const LIST_LIMIT: usize = 100;

/// The store handle shared by every route.
pub type SharedStore = Arc<dyn Store>;

/// A persistence call failed. The underlying message is kept so it can be
/// surfaced to the caller.
#[derive(Debug)]
pub enum StoreError {
	Db(sqlx::Error),
	Other(String),
}

impl fmt::Display for StoreError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			StoreError::Db(err) => write!(f, "{}", err),
			StoreError::Other(message) => write!(f, "{}", message),
		}
	}
}

impl Error for StoreError {}

impl From<sqlx::Error> for StoreError {
	fn from(e: sqlx::Error) -> Self {
		StoreError::Db(e)
	}
}

/// Result of [`Store::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SubscribeOutcome {
	/// Subscription and its usage record were written.
	Created,
	/// The referenced plan does not exist, nothing was written.
	PlanNotFound,
	/// The user already has a subscription, nothing was written.
	AlreadySubscribed,
}

#[async_trait]
pub trait Store: Send + Sync {
	async fn get_plan(&self, id: &str) -> Result<Option<Plan>, StoreError>;
	async fn list_plans(&self, limit: usize) -> Result<Vec<Plan>, StoreError>;
	async fn insert_plan(&self, plan: &Plan) -> Result<(), StoreError>;
	/// Replace an existing plan. Returns `false` if no plan has this id.
	async fn update_plan(&self, plan: &Plan) -> Result<bool, StoreError>;
	/// Returns `false` if no plan has this id.
	async fn delete_plan(&self, id: &str) -> Result<bool, StoreError>;

	async fn list_permissions(&self, limit: usize) -> Result<Vec<Permission>, StoreError>;
	async fn insert_permission(&self, permission: &Permission) -> Result<(), StoreError>;
	async fn update_permission(&self, permission: &Permission) -> Result<bool, StoreError>;
	async fn delete_permission(&self, id: &str) -> Result<bool, StoreError>;

	async fn get_subscription(&self, user_id: &str) -> Result<Option<Subscription>, StoreError>;
	/// Atomically check that the plan exists, write the subscription and
	/// create an empty usage record for the user (an existing one is kept).
	async fn subscribe(&self, subscription: &Subscription) -> Result<SubscribeOutcome, StoreError>;

	async fn get_usage(&self, user_id: &str) -> Result<Option<UsageStats>, StoreError>;
	/// Add one to the `api` counter of `user_id`, creating the usage record
	/// if needed. Concurrent increments are never lost. Returns the new count.
	async fn increment_usage(&self, user_id: &str, api: &str) -> Result<i64, StoreError>;
}
