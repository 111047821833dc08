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

//! `/api/admin/subscription_plans` endpoints.

use crate::{
	errors::GatewayError,
	models::NewPlan,
	routes::{MessageResponse, BODY_LIMIT},
	store::{SharedStore, LIST_LIMIT},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warp::{http::StatusCode, Filter};

const PLAN_NOT_FOUND: &str = "Plan not found";

/// Response body of `POST /api/admin/subscription_plans`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreatePlanResponse {
	pub message: String,
	pub plan_id: String,
}

async fn create_plan(
	body: NewPlan,
	store: SharedStore,
) -> Result<impl warp::Reply, warp::Rejection> {
	let plan = body.into_plan(Uuid::new_v4().to_string());
	store.insert_plan(&plan).await?;
	log::info!(target: "subgate", "Created plan [id={}] [name={}]", plan.id, plan.name);

	Ok(warp::reply::with_status(
		warp::reply::json(&CreatePlanResponse {
			message: "Subscription plan created".into(),
			plan_id: plan.id,
		}),
		StatusCode::CREATED,
	))
}

async fn update_plan(
	plan_id: String,
	body: NewPlan,
	store: SharedStore,
) -> Result<impl warp::Reply, warp::Rejection> {
	if !store.update_plan(&body.into_plan(plan_id)).await? {
		return Err(GatewayError::NotFound(PLAN_NOT_FOUND).into());
	}

	Ok(warp::reply::json(&MessageResponse::new(
		"Subscription plan updated",
	)))
}

async fn delete_plan(
	plan_id: String,
	store: SharedStore,
) -> Result<impl warp::Reply, warp::Rejection> {
	if !store.delete_plan(&plan_id).await? {
		return Err(GatewayError::NotFound(PLAN_NOT_FOUND).into());
	}
	log::info!(target: "subgate", "Deleted plan [id={}]", plan_id);

	Ok(warp::reply::json(&MessageResponse::new(
		"Subscription plan deleted",
	)))
}

async fn list_plans(store: SharedStore) -> Result<impl warp::Reply, warp::Rejection> {
	let plans = store.list_plans(LIST_LIMIT).await?;

	Ok(warp::reply::json(&plans))
}

/// Create the plan endpoints:
/// - `POST /api/admin/subscription_plans`
/// - `GET /api/admin/subscription_plans`
/// - `PUT /api/admin/subscription_plans/{id}`
/// - `DELETE /api/admin/subscription_plans/{id}`
pub fn plan_routes(
	store: SharedStore,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
	let create_store = store.clone();
	let create = warp::path!("api" / "admin" / "subscription_plans")
		.and(warp::post())
		.and(warp::body::content_length_limit(BODY_LIMIT))
		.and(warp::body::json())
		.and_then(move |body: NewPlan| create_plan(body, create_store.clone()));

	let list_store = store.clone();
	let list = warp::path!("api" / "admin" / "subscription_plans")
		.and(warp::get())
		.and_then(move || list_plans(list_store.clone()));

	let update_store = store.clone();
	let update = warp::path!("api" / "admin" / "subscription_plans" / String)
		.and(warp::put())
		.and(warp::body::content_length_limit(BODY_LIMIT))
		.and(warp::body::json())
		.and_then(move |plan_id: String, body: NewPlan| {
			update_plan(plan_id, body, update_store.clone())
		});

	let delete = warp::path!("api" / "admin" / "subscription_plans" / String)
		.and(warp::delete())
		.and_then(move |plan_id: String| delete_plan(plan_id, store.clone()));

	create
		.or(list)
		.or(update)
		.or(delete)
		// View access logs by setting `RUST_LOG=subgate`.
		.with(warp::log("subgate"))
}
