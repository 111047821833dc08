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

use serde_json::{json, Value};
use std::sync::Arc;
use subgate_backend::{
	routes::create_routes,
	store::{MemoryStore, SharedStore},
};
use warp::http::StatusCode;
use warp::test::request;

/// A fresh, empty store.
pub fn setup_store() -> SharedStore {
	Arc::new(MemoryStore::new())
}

/// Create a plan through the admin endpoint, and return its id.
pub async fn create_plan(
	store: &SharedStore,
	api_permissions: Value,
	usage_limits: Value,
) -> String {
	let resp = request()
		.path("/api/admin/subscription_plans")
		.method("POST")
		.json(&json!({
			"name": "basic",
			"description": "A test plan",
			"api_permissions": api_permissions,
			"usage_limits": usage_limits,
		}))
		.reply(&create_routes(store.clone()))
		.await;
	assert_eq!(resp.status(), StatusCode::CREATED);

	let body: Value = serde_json::from_slice(resp.body()).expect("Response is JSON. qed.");
	body["plan_id"]
		.as_str()
		.expect("Response has a plan_id. qed.")
		.to_string()
}

/// Subscribe `user_id` to `plan_id`, return the response status.
pub async fn subscribe(store: &SharedStore, user_id: &str, plan_id: &str) -> StatusCode {
	request()
		.path("/api/customer/subscribe")
		.method("POST")
		.json(&json!({ "user_id": user_id, "plan_id": plan_id }))
		.reply(&create_routes(store.clone()))
		.await
		.status()
}

/// Call a gated API, return the response status and body.
pub async fn call_service(
	store: &SharedStore,
	user_id: &str,
	api: &str,
) -> (StatusCode, String) {
	let resp = request()
		.path(&format!("/api/service/{}", api))
		.method("POST")
		.json(&json!({ "user_id": user_id, "api": api }))
		.reply(&create_routes(store.clone()))
		.await;

	(
		resp.status(),
		String::from_utf8_lossy(resp.body()).into_owned(),
	)
}
