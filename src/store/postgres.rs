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
use sqlx::{types::Json, FromRow, Pool, Postgres};
use std::collections::BTreeMap;

/// Row of the `subscription_plans` table.
#[derive(FromRow)]
struct PlanRecord {
	id: String,
	name: String,
	description: String,
	api_permissions: Vec<String>,
	usage_limits: Json<BTreeMap<String, i64>>,
}

impl From<PlanRecord> for Plan {
	fn from(rec: PlanRecord) -> Self {
		Plan {
			id: rec.id,
			name: rec.name,
			description: rec.description,
			api_permissions: rec.api_permissions,
			usage_limits: rec.usage_limits.0,
		}
	}
}

/// Row of the `user_usage_stats` table.
#[derive(FromRow)]
struct UsageRecord {
	user_id: String,
	usage: Json<BTreeMap<String, i64>>,
}

/// A [`Store`] backed by PostgreSQL. The schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
	pool: Pool<Postgres>,
}

impl PgStore {
	pub fn new(pool: Pool<Postgres>) -> Self {
		PgStore { pool }
	}
}

#[async_trait]
impl Store for PgStore {
	async fn get_plan(&self, id: &str) -> Result<Option<Plan>, StoreError> {
		let rec = sqlx::query_as::<_, PlanRecord>(
			r#"
			SELECT id, name, description, api_permissions, usage_limits
			FROM subscription_plans
			WHERE id = $1
			"#,
		)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;

		Ok(rec.map(Plan::from))
	}

	async fn list_plans(&self, limit: usize) -> Result<Vec<Plan>, StoreError> {
		let recs = sqlx::query_as::<_, PlanRecord>(
			r#"
			SELECT id, name, description, api_permissions, usage_limits
			FROM subscription_plans
			ORDER BY name
			LIMIT $1
			"#,
		)
		.bind(limit as i64)
		.fetch_all(&self.pool)
		.await?;

		Ok(recs.into_iter().map(Plan::from).collect())
	}

	async fn insert_plan(&self, plan: &Plan) -> Result<(), StoreError> {
		sqlx::query(
			r#"
			INSERT INTO subscription_plans (id, name, description, api_permissions, usage_limits)
			VALUES ($1, $2, $3, $4, $5)
			"#,
		)
		.bind(&plan.id)
		.bind(&plan.name)
		.bind(&plan.description)
		.bind(&plan.api_permissions)
		.bind(Json(&plan.usage_limits))
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	async fn update_plan(&self, plan: &Plan) -> Result<bool, StoreError> {
		let res = sqlx::query(
			r#"
			UPDATE subscription_plans
			SET name = $2, description = $3, api_permissions = $4, usage_limits = $5
			WHERE id = $1
			"#,
		)
		.bind(&plan.id)
		.bind(&plan.name)
		.bind(&plan.description)
		.bind(&plan.api_permissions)
		.bind(Json(&plan.usage_limits))
		.execute(&self.pool)
		.await?;

		Ok(res.rows_affected() > 0)
	}

	async fn delete_plan(&self, id: &str) -> Result<bool, StoreError> {
		let res = sqlx::query("DELETE FROM subscription_plans WHERE id = $1")
			.bind(id)
			.execute(&self.pool)
			.await?;

		Ok(res.rows_affected() > 0)
	}

	async fn list_permissions(&self, limit: usize) -> Result<Vec<Permission>, StoreError> {
		let recs = sqlx::query_as::<_, (String, String, String, String)>(
			r#"
			SELECT id, name, api_endpoint, description
			FROM permissions
			ORDER BY name
			LIMIT $1
			"#,
		)
		.bind(limit as i64)
		.fetch_all(&self.pool)
		.await?;

		Ok(recs
			.into_iter()
			.map(|(id, name, api_endpoint, description)| Permission {
				id,
				name,
				api_endpoint,
				description,
			})
			.collect())
	}

	async fn insert_permission(&self, permission: &Permission) -> Result<(), StoreError> {
		sqlx::query(
			r#"
			INSERT INTO permissions (id, name, api_endpoint, description)
			VALUES ($1, $2, $3, $4)
			"#,
		)
		.bind(&permission.id)
		.bind(&permission.name)
		.bind(&permission.api_endpoint)
		.bind(&permission.description)
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	async fn update_permission(&self, permission: &Permission) -> Result<bool, StoreError> {
		let res = sqlx::query(
			r#"
			UPDATE permissions
			SET name = $2, api_endpoint = $3, description = $4
			WHERE id = $1
			"#,
		)
		.bind(&permission.id)
		.bind(&permission.name)
		.bind(&permission.api_endpoint)
		.bind(&permission.description)
		.execute(&self.pool)
		.await?;

		Ok(res.rows_affected() > 0)
	}

	async fn delete_permission(&self, id: &str) -> Result<bool, StoreError> {
		let res = sqlx::query("DELETE FROM permissions WHERE id = $1")
			.bind(id)
			.execute(&self.pool)
			.await?;

		Ok(res.rows_affected() > 0)
	}

	async fn get_subscription(&self, user_id: &str) -> Result<Option<Subscription>, StoreError> {
		let rec = sqlx::query_as::<_, (String, String)>(
			"SELECT user_id, plan_id FROM user_subscriptions WHERE user_id = $1",
		)
		.bind(user_id)
		.fetch_optional(&self.pool)
		.await?;

		Ok(rec.map(|(user_id, plan_id)| Subscription { user_id, plan_id }))
	}

	async fn subscribe(&self, subscription: &Subscription) -> Result<SubscribeOutcome, StoreError> {
		let mut tx = self.pool.begin().await?;

		// Lock the plan row so it cannot be deleted before we commit.
		let plan = sqlx::query_scalar::<_, String>(
			"SELECT id FROM subscription_plans WHERE id = $1 FOR SHARE",
		)
		.bind(&subscription.plan_id)
		.fetch_optional(&mut tx)
		.await?;
		if plan.is_none() {
			return Ok(SubscribeOutcome::PlanNotFound);
		}

		let inserted = sqlx::query(
			r#"
			INSERT INTO user_subscriptions (user_id, plan_id)
			VALUES ($1, $2)
			ON CONFLICT (user_id) DO NOTHING
			"#,
		)
		.bind(&subscription.user_id)
		.bind(&subscription.plan_id)
		.execute(&mut tx)
		.await?
		.rows_affected();
		if inserted == 0 {
			return Ok(SubscribeOutcome::AlreadySubscribed);
		}

		sqlx::query(
			r#"
			INSERT INTO user_usage_stats (user_id)
			VALUES ($1)
			ON CONFLICT (user_id) DO NOTHING
			"#,
		)
		.bind(&subscription.user_id)
		.execute(&mut tx)
		.await?;

		tx.commit().await?;
		Ok(SubscribeOutcome::Created)
	}

	async fn get_usage(&self, user_id: &str) -> Result<Option<UsageStats>, StoreError> {
		let rec = sqlx::query_as::<_, UsageRecord>(
			"SELECT user_id, usage FROM user_usage_stats WHERE user_id = $1",
		)
		.bind(user_id)
		.fetch_optional(&self.pool)
		.await?;

		Ok(rec.map(|rec| UsageStats {
			user_id: rec.user_id,
			usage: rec.usage.0,
		}))
	}

	async fn increment_usage(&self, user_id: &str, api: &str) -> Result<i64, StoreError> {
		// The conflicting row is locked for the duration of the update, so
		// concurrent increments serialize instead of overwriting each other.
		let count = sqlx::query_scalar::<_, i64>(
			r#"
			INSERT INTO user_usage_stats (user_id, usage)
			VALUES ($1, jsonb_build_object($2::text, 1))
			ON CONFLICT (user_id) DO UPDATE
			SET usage = jsonb_set(
				user_usage_stats.usage,
				ARRAY[$2::text],
				to_jsonb(COALESCE((user_usage_stats.usage ->> $2::text)::bigint, 0) + 1)
			)
			RETURNING (usage ->> $2::text)::bigint
			"#,
		)
		.bind(user_id)
		.bind(api)
		.fetch_one(&self.pool)
		.await?;

		Ok(count)
	}
}
