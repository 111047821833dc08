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

//! Decide whether a user may call a named API.

use crate::store::{SharedStore, StoreError};
use std::fmt;

/// Why a call was denied. Only used for logging, the client always gets a
/// plain "Access denied".
#[derive(Clone, Debug, PartialEq)]
pub enum DenyReason {
	NoSubscription,
	/// The subscription points to a plan that no longer exists.
	PlanNotFound(String),
	/// The plan does not list this API.
	NotPermitted(String),
	QuotaExhausted { used: i64, limit: i64 },
}

impl fmt::Display for DenyReason {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			DenyReason::NoSubscription => write!(f, "no subscription"),
			DenyReason::PlanNotFound(plan_id) => write!(f, "plan {} not found", plan_id),
			DenyReason::NotPermitted(plan_id) => write!(f, "not permitted by plan {}", plan_id),
			DenyReason::QuotaExhausted { used, limit } => {
				write!(f, "quota exhausted ({}/{})", used, limit)
			}
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum Decision {
	Allow,
	Deny(DenyReason),
}

impl Decision {
	pub fn is_allowed(&self) -> bool {
		*self == Decision::Allow
	}
}

/// Read-only evaluation of a user's plan and usage. Holds no state besides
/// the store handle: every decision is computed from the current contents
/// of the store.
#[derive(Clone)]
pub struct AccessEvaluator {
	store: SharedStore,
}

impl AccessEvaluator {
	pub fn new(store: SharedStore) -> Self {
		AccessEvaluator { store }
	}

	/// Whether `user_id` may call `api` right now.
	pub async fn allow(&self, user_id: &str, api: &str) -> Result<bool, StoreError> {
		Ok(self.evaluate(user_id, api).await?.is_allowed())
	}

	pub async fn evaluate(&self, user_id: &str, api: &str) -> Result<Decision, StoreError> {
		let subscription = match self.store.get_subscription(user_id).await? {
			Some(subscription) => subscription,
			None => return Ok(Decision::Deny(DenyReason::NoSubscription)),
		};

		let plan = match self.store.get_plan(&subscription.plan_id).await? {
			Some(plan) => plan,
			None => return Ok(Decision::Deny(DenyReason::PlanNotFound(subscription.plan_id))),
		};
		if !plan.permits(api) {
			return Ok(Decision::Deny(DenyReason::NotPermitted(plan.id)));
		}

		// A missing usage record counts as zero calls.
		if let Some(limit) = plan.limit_for(api) {
			let used = self
				.store
				.get_usage(user_id)
				.await?
				.map_or(0, |usage| usage.count_for(api));
			if used >= limit {
				return Ok(Decision::Deny(DenyReason::QuotaExhausted { used, limit }));
			}
		}

		Ok(Decision::Allow)
	}
}

#[cfg(test)]
mod tests {
	use super::{AccessEvaluator, Decision, DenyReason};
	use crate::models::{Plan, Subscription};
	use crate::store::{MemoryStore, SharedStore};
	use crate::usage::UsageRecorder;
	use std::{collections::BTreeMap, sync::Arc};

	async fn setup(limits: &[(&str, i64)]) -> (SharedStore, AccessEvaluator) {
		let store: SharedStore = Arc::new(MemoryStore::new());
		let usage_limits: BTreeMap<String, i64> =
			limits.iter().map(|(k, v)| (k.to_string(), *v)).collect();
		store
			.insert_plan(&Plan {
				id: "p1".into(),
				name: "basic".into(),
				description: String::new(),
				api_permissions: vec!["search".into(), "lookup".into()],
				usage_limits,
			})
			.await
			.unwrap();
		store
			.subscribe(&Subscription {
				user_id: "u1".into(),
				plan_id: "p1".into(),
			})
			.await
			.unwrap();

		let evaluator = AccessEvaluator::new(store.clone());
		(store, evaluator)
	}

	#[tokio::test]
	async fn test_unknown_user_is_denied() {
		let (_, evaluator) = setup(&[]).await;

		assert_eq!(
			evaluator.evaluate("unknown_user", "search").await.unwrap(),
			Decision::Deny(DenyReason::NoSubscription)
		);
		assert!(!evaluator.allow("unknown_user", "search").await.unwrap());
	}

	#[tokio::test]
	async fn test_api_outside_plan_is_denied() {
		let (_, evaluator) = setup(&[("export", 10)]).await;

		assert_eq!(
			evaluator.evaluate("u1", "export").await.unwrap(),
			Decision::Deny(DenyReason::NotPermitted("p1".into()))
		);
	}

	#[tokio::test]
	async fn test_unlisted_limit_is_unbounded() {
		let (store, evaluator) = setup(&[("search", 1)]).await;
		for _ in 0..50 {
			store.increment_usage("u1", "lookup").await.unwrap();
		}

		assert!(evaluator.allow("u1", "lookup").await.unwrap());
	}

	#[tokio::test]
	async fn test_quota_exhausted() {
		let (store, evaluator) = setup(&[("search", 2)]).await;

		assert!(evaluator.allow("u1", "search").await.unwrap());
		store.increment_usage("u1", "search").await.unwrap();
		assert!(evaluator.allow("u1", "search").await.unwrap());
		store.increment_usage("u1", "search").await.unwrap();
		assert_eq!(
			evaluator.evaluate("u1", "search").await.unwrap(),
			Decision::Deny(DenyReason::QuotaExhausted { used: 2, limit: 2 })
		);
	}

	#[tokio::test]
	async fn test_zero_limit_denies_immediately() {
		let (_, evaluator) = setup(&[("search", 0)]).await;

		assert!(!evaluator.allow("u1", "search").await.unwrap());
	}

	#[tokio::test]
	async fn test_deleted_plan_denies() {
		let (store, evaluator) = setup(&[]).await;
		store.delete_plan("p1").await.unwrap();

		assert_eq!(
			evaluator.evaluate("u1", "search").await.unwrap(),
			Decision::Deny(DenyReason::PlanNotFound("p1".into()))
		);
	}

	#[tokio::test]
	async fn test_raising_the_limit_restores_access() {
		let (store, evaluator) = setup(&[("search", 1)]).await;
		store.increment_usage("u1", "search").await.unwrap();
		assert!(!evaluator.allow("u1", "search").await.unwrap());

		let mut plan = store.get_plan("p1").await.unwrap().unwrap();
		plan.usage_limits.insert("search".into(), 3);
		store.update_plan(&plan).await.unwrap();

		assert!(evaluator.allow("u1", "search").await.unwrap());
	}

	#[tokio::test]
	async fn test_two_calls_exhaust_a_limit_of_two() {
		let (store, evaluator) = setup(&[("search", 2)]).await;
		let recorder = UsageRecorder::new(store.clone());
		assert!(store.get_usage("u1").await.unwrap().unwrap().usage.is_empty());

		for _ in 0..2 {
			assert!(evaluator.allow("u1", "search").await.unwrap());
			recorder.record("u1", "search").await.unwrap();
		}

		let usage = store.get_usage("u1").await.unwrap().unwrap();
		assert_eq!(usage.count_for("search"), 2);
		assert!(!evaluator.allow("u1", "search").await.unwrap());
	}
}
