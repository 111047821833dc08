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

//! This file implements the `POST /api/customer/subscribe` endpoint.

use crate::{
	errors::GatewayError,
	models::Subscription,
	routes::{MessageResponse, BODY_LIMIT},
	store::{SharedStore, SubscribeOutcome},
};
use warp::{http::StatusCode, Filter};

/// Subscribe a user to a plan. This either writes both the subscription and
/// an empty usage record, or nothing at all.
async fn subscribe(
	body: Subscription,
	store: SharedStore,
) -> Result<impl warp::Reply, warp::Rejection> {
	match store.subscribe(&body).await? {
		SubscribeOutcome::Created => {
			log::info!(
				target: "subgate",
				"Subscribed [user_id={}] to [plan_id={}]",
				body.user_id,
				body.plan_id
			);

			Ok(warp::reply::with_status(
				warp::reply::json(&MessageResponse::new("Subscribed successfully")),
				StatusCode::CREATED,
			))
		}
		SubscribeOutcome::PlanNotFound => Err(GatewayError::NotFound("Plan not found").into()),
		SubscribeOutcome::AlreadySubscribed => Err(GatewayError::AlreadySubscribed.into()),
	}
}

/// Create the `POST /api/customer/subscribe` endpoint.
pub fn post_subscribe(
	store: SharedStore,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
	warp::path!("api" / "customer" / "subscribe")
		.and(warp::post())
		.and(warp::body::content_length_limit(BODY_LIMIT))
		.and(warp::body::json())
		.and_then(move |body: Subscription| subscribe(body, store.clone()))
		// View access logs by setting `RUST_LOG=subgate`.
		.with(warp::log("subgate"))
}
