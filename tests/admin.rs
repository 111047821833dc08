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

mod common;

use common::{create_plan, setup_store};
use serde_json::{json, Value};
use subgate_backend::routes::create_routes;
use warp::http::StatusCode;
use warp::test::request;

#[tokio::test]
async fn test_plan_lifecycle() {
	let store = setup_store();
	let plan_id = create_plan(&store, json!(["search"]), json!({ "search": 2 })).await;

	let resp = request()
		.path("/api/admin/subscription_plans")
		.method("GET")
		.reply(&create_routes(store.clone()))
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	let plans: Value = serde_json::from_slice(resp.body()).unwrap();
	assert_eq!(
		plans,
		json!([{
			"id": plan_id,
			"name": "basic",
			"description": "A test plan",
			"api_permissions": ["search"],
			"usage_limits": { "search": 2 },
		}])
	);

	let resp = request()
		.path(&format!("/api/admin/subscription_plans/{}", plan_id))
		.method("PUT")
		.json(&json!({
			"name": "pro",
			"description": "More searches",
			"api_permissions": ["search", "export"],
			"usage_limits": { "search": 100 },
		}))
		.reply(&create_routes(store.clone()))
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	assert_eq!(resp.body(), r#"{"message":"Subscription plan updated"}"#);
	let plan = store.get_plan(&plan_id).await.unwrap().unwrap();
	assert_eq!(plan.name, "pro");
	assert_eq!(plan.limit_for("search"), Some(100));
	assert!(plan.permits("export"));

	let resp = request()
		.path(&format!("/api/admin/subscription_plans/{}", plan_id))
		.method("DELETE")
		.reply(&create_routes(store.clone()))
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	assert_eq!(resp.body(), r#"{"message":"Subscription plan deleted"}"#);
	assert!(store.get_plan(&plan_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_unknown_plan() {
	let store = setup_store();

	let resp = request()
		.path("/api/admin/subscription_plans/missing")
		.method("PUT")
		.json(&json!({
			"name": "pro",
			"description": "",
			"api_permissions": [],
			"usage_limits": {},
		}))
		.reply(&create_routes(store.clone()))
		.await;
	assert_eq!(resp.status(), StatusCode::NOT_FOUND);
	assert_eq!(resp.body(), r#"{"detail":"Plan not found"}"#);

	let resp = request()
		.path("/api/admin/subscription_plans/missing")
		.method("DELETE")
		.reply(&create_routes(store))
		.await;
	assert_eq!(resp.status(), StatusCode::NOT_FOUND);
	assert_eq!(resp.body(), r#"{"detail":"Plan not found"}"#);
}

#[tokio::test]
async fn test_invalid_plan_body() {
	let store = setup_store();

	let resp = request()
		.path("/api/admin/subscription_plans")
		.method("POST")
		.json(&json!({ "name": "basic", "api_permissions": "search" }))
		.reply(&create_routes(store.clone()))
		.await;

	assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
	assert!(store.list_plans(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_plan_without_usage_limits_is_rejected() {
	let store = setup_store();

	let resp = request()
		.path("/api/admin/subscription_plans")
		.method("POST")
		.json(&json!({
			"name": "basic",
			"description": "",
			"api_permissions": ["search"],
		}))
		.reply(&create_routes(store.clone()))
		.await;

	assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
	assert!(store.list_plans(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_permission_lifecycle() {
	let store = setup_store();

	let resp = request()
		.path("/api/admin/permissions")
		.method("POST")
		.json(&json!({
			"name": "search",
			"api_endpoint": "/api/service/search",
			"description": "Full-text search",
		}))
		.reply(&create_routes(store.clone()))
		.await;
	assert_eq!(resp.status(), StatusCode::CREATED);
	let body: Value = serde_json::from_slice(resp.body()).unwrap();
	assert_eq!(body["message"], "Permission added");
	let permission_id = body["permission_id"].as_str().unwrap().to_string();

	let resp = request()
		.path(&format!("/api/admin/permissions/{}", permission_id))
		.method("PUT")
		.json(&json!({
			"name": "search",
			"api_endpoint": "/api/service/search",
			"description": "Search, v2",
		}))
		.reply(&create_routes(store.clone()))
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	assert_eq!(resp.body(), r#"{"message":"Permission updated"}"#);

	let resp = request()
		.path("/api/admin/permissions")
		.method("GET")
		.reply(&create_routes(store.clone()))
		.await;
	let permissions: Value = serde_json::from_slice(resp.body()).unwrap();
	assert_eq!(permissions[0]["id"], permission_id.as_str());
	assert_eq!(permissions[0]["description"], "Search, v2");

	let resp = request()
		.path(&format!("/api/admin/permissions/{}", permission_id))
		.method("DELETE")
		.reply(&create_routes(store.clone()))
		.await;
	assert_eq!(resp.status(), StatusCode::OK);

	let resp = request()
		.path(&format!("/api/admin/permissions/{}", permission_id))
		.method("DELETE")
		.reply(&create_routes(store))
		.await;
	assert_eq!(resp.status(), StatusCode::NOT_FOUND);
	assert_eq!(resp.body(), r#"{"detail":"Permission not found"}"#);
}
