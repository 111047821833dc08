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

//! This file implements the `POST /api/service/{api_name}` endpoint, the
//! gate in front of every downstream API.

use crate::{
	access::{AccessEvaluator, Decision},
	errors::GatewayError,
	routes::{MessageResponse, BODY_LIMIT},
	store::SharedStore,
	usage::UsageRecorder,
};
use serde::{Deserialize, Serialize};
use warp::Filter;

/// Endpoint request body.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ServiceRequest {
	pub user_id: String,
	/// Required in the body, but the API being gated is always the one
	/// named in the path.
	pub api: String,
}

/// Check the caller's plan, and if the call is allowed, count it.
async fn call_service(
	api_name: String,
	body: ServiceRequest,
	evaluator: AccessEvaluator,
	recorder: UsageRecorder,
) -> Result<impl warp::Reply, warp::Rejection> {
	let decision = evaluator.evaluate(&body.user_id, &api_name).await?;
	if let Decision::Deny(reason) = decision {
		log::debug!(
			target: "subgate",
			"Denied [user_id={}] [api={}]: {}",
			body.user_id,
			api_name,
			reason
		);
		return Err(GatewayError::AccessDenied.into());
	}

	recorder.record(&body.user_id, &api_name).await.map_err(|e| {
		log::error!(
			target: "subgate",
			"Failed to record usage for [user_id={}] [api={}] with [error={}]",
			body.user_id,
			api_name,
			e
		);
		e
	})?;

	Ok(warp::reply::json(&MessageResponse::new(format!(
		"Accessed {}",
		api_name
	))))
}

/// Create the `POST /api/service/{api_name}` endpoint.
pub fn post_service(
	store: SharedStore,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
	let evaluator = AccessEvaluator::new(store.clone());
	let recorder = UsageRecorder::new(store);

	warp::path!("api" / "service" / String)
		.and(warp::post())
		.and(warp::body::content_length_limit(BODY_LIMIT))
		.and(warp::body::json())
		.and_then(move |api_name: String, body: ServiceRequest| {
			call_service(api_name, body, evaluator.clone(), recorder.clone())
		})
		// View access logs by setting `RUST_LOG=subgate`.
		.with(warp::log("subgate"))
}
