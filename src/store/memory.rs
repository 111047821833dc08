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

use super::{Store, StoreError, SubscribeOutcome};
use crate::models::{Permission, Plan, Subscription, UsageStats};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Collections {
	plans: HashMap<String, Plan>,
	permissions: HashMap<String, Permission>,
	subscriptions: HashMap<String, Subscription>,
	usage: HashMap<String, UsageStats>,
}

/// A [`Store`] kept in process memory. Every collection sits behind a
/// single lock, so multi-document operations are atomic.
#[derive(Default)]
pub struct MemoryStore {
	inner: RwLock<Collections>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}

/// Sort by name and truncate, to match the ordering of the SQL backend.
fn listed<T>(values: impl Iterator<Item = T>, name: fn(&T) -> &str, limit: usize) -> Vec<T> {
	let mut values: Vec<T> = values.collect();
	values.sort_by(|a, b| name(a).cmp(name(b)));
	values.truncate(limit);
	values
}

#[async_trait]
impl Store for MemoryStore {
	async fn get_plan(&self, id: &str) -> Result<Option<Plan>, StoreError> {
		Ok(self.inner.read().await.plans.get(id).cloned())
	}

	async fn list_plans(&self, limit: usize) -> Result<Vec<Plan>, StoreError> {
		let inner = self.inner.read().await;
		Ok(listed(inner.plans.values().cloned(), |p| p.name.as_str(), limit))
	}

	async fn insert_plan(&self, plan: &Plan) -> Result<(), StoreError> {
		let mut inner = self.inner.write().await;
		if inner.plans.contains_key(&plan.id) {
			return Err(StoreError::Other(format!("duplicate plan id {}", plan.id)));
		}
		inner.plans.insert(plan.id.clone(), plan.clone());
		Ok(())
	}

	async fn update_plan(&self, plan: &Plan) -> Result<bool, StoreError> {
		let mut inner = self.inner.write().await;
		match inner.plans.get_mut(&plan.id) {
			Some(existing) => {
				*existing = plan.clone();
				Ok(true)
			}
			None => Ok(false),
		}
	}

	async fn delete_plan(&self, id: &str) -> Result<bool, StoreError> {
		Ok(self.inner.write().await.plans.remove(id).is_some())
	}

	async fn list_permissions(&self, limit: usize) -> Result<Vec<Permission>, StoreError> {
		let inner = self.inner.read().await;
		Ok(listed(inner.permissions.values().cloned(), |p| p.name.as_str(), limit))
	}

	async fn insert_permission(&self, permission: &Permission) -> Result<(), StoreError> {
		let mut inner = self.inner.write().await;
		if inner.permissions.contains_key(&permission.id) {
			return Err(StoreError::Other(format!(
				"duplicate permission id {}",
				permission.id
			)));
		}
		inner
			.permissions
			.insert(permission.id.clone(), permission.clone());
		Ok(())
	}

	async fn update_permission(&self, permission: &Permission) -> Result<bool, StoreError> {
		let mut inner = self.inner.write().await;
		match inner.permissions.get_mut(&permission.id) {
			Some(existing) => {
				*existing = permission.clone();
				Ok(true)
			}
			None => Ok(false),
		}
	}

	async fn delete_permission(&self, id: &str) -> Result<bool, StoreError> {
		Ok(self.inner.write().await.permissions.remove(id).is_some())
	}

	async fn get_subscription(&self, user_id: &str) -> Result<Option<Subscription>, StoreError> {
		Ok(self.inner.read().await.subscriptions.get(user_id).cloned())
	}

	async fn subscribe(&self, subscription: &Subscription) -> Result<SubscribeOutcome, StoreError> {
		let mut inner = self.inner.write().await;
		if !inner.plans.contains_key(&subscription.plan_id) {
			return Ok(SubscribeOutcome::PlanNotFound);
		}
		if inner.subscriptions.contains_key(&subscription.user_id) {
			return Ok(SubscribeOutcome::AlreadySubscribed);
		}

		inner
			.subscriptions
			.insert(subscription.user_id.clone(), subscription.clone());
		inner
			.usage
			.entry(subscription.user_id.clone())
			.or_insert_with(|| UsageStats::empty(&subscription.user_id));

		Ok(SubscribeOutcome::Created)
	}

	async fn get_usage(&self, user_id: &str) -> Result<Option<UsageStats>, StoreError> {
		Ok(self.inner.read().await.usage.get(user_id).cloned())
	}

	async fn increment_usage(&self, user_id: &str, api: &str) -> Result<i64, StoreError> {
		let mut inner = self.inner.write().await;
		let stats = inner
			.usage
			.entry(user_id.to_string())
			.or_insert_with(|| UsageStats::empty(user_id));
		let count = stats.usage.entry(api.to_string()).or_insert(0);
		*count += 1;

		Ok(*count)
	}
}

#[cfg(test)]
mod tests {
	use super::MemoryStore;
	use crate::models::{Plan, Subscription};
	use crate::store::{Store, SubscribeOutcome};
	use std::{collections::BTreeMap, sync::Arc};

	fn plan(id: &str, name: &str) -> Plan {
		Plan {
			id: id.into(),
			name: name.into(),
			description: String::new(),
			api_permissions: vec!["search".into()],
			usage_limits: BTreeMap::new(),
		}
	}

	fn subscription(user_id: &str, plan_id: &str) -> Subscription {
		Subscription {
			user_id: user_id.into(),
			plan_id: plan_id.into(),
		}
	}

	#[tokio::test]
	async fn test_subscribe_unknown_plan_writes_nothing() {
		let store = MemoryStore::new();

		let outcome = store.subscribe(&subscription("u1", "missing")).await.unwrap();

		assert_eq!(outcome, SubscribeOutcome::PlanNotFound);
		assert!(store.get_subscription("u1").await.unwrap().is_none());
		assert!(store.get_usage("u1").await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_second_subscribe_is_rejected() {
		let store = MemoryStore::new();
		store.insert_plan(&plan("p1", "basic")).await.unwrap();
		store.insert_plan(&plan("p2", "pro")).await.unwrap();

		assert_eq!(
			store.subscribe(&subscription("u1", "p1")).await.unwrap(),
			SubscribeOutcome::Created
		);
		store.increment_usage("u1", "search").await.unwrap();
		assert_eq!(
			store.subscribe(&subscription("u1", "p2")).await.unwrap(),
			SubscribeOutcome::AlreadySubscribed
		);

		let existing = store.get_subscription("u1").await.unwrap().unwrap();
		assert_eq!(existing.plan_id, "p1");
		let usage = store.get_usage("u1").await.unwrap().unwrap();
		assert_eq!(usage.count_for("search"), 1);
	}

	#[tokio::test]
	async fn test_concurrent_increments_are_not_lost() {
		let store = Arc::new(MemoryStore::new());

		let handles: Vec<_> = (0..64)
			.map(|_| {
				let store = store.clone();
				tokio::spawn(async move { store.increment_usage("u1", "search").await })
			})
			.collect();
		for handle in handles {
			handle.await.unwrap().unwrap();
		}

		let usage = store.get_usage("u1").await.unwrap().unwrap();
		assert_eq!(usage.count_for("search"), 64);
	}

	#[tokio::test]
	async fn test_list_is_sorted_and_capped() {
		let store = MemoryStore::new();
		for (id, name) in &[("a", "zeta"), ("b", "alpha"), ("c", "mid")] {
			store.insert_plan(&plan(id, name)).await.unwrap();
		}

		let names: Vec<String> = store
			.list_plans(2)
			.await
			.unwrap()
			.into_iter()
			.map(|p| p.name)
			.collect();
		assert_eq!(names, vec!["alpha".to_string(), "mid".to_string()]);
	}

	#[tokio::test]
	async fn test_update_and_delete_report_missing() {
		let store = MemoryStore::new();

		assert!(!store.update_plan(&plan("nope", "x")).await.unwrap());
		assert!(!store.delete_plan("nope").await.unwrap());

		store.insert_plan(&plan("p1", "basic")).await.unwrap();
		assert!(store.delete_plan("p1").await.unwrap());
		assert!(store.get_plan("p1").await.unwrap().is_none());
	}
}
