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

//! `GET /api/customer/subscription/{user_id}` and
//! `GET /api/customer/usage/{user_id}`.

use crate::{errors::GatewayError, store::SharedStore};
use warp::Filter;

async fn view_subscription(
	user_id: String,
	store: SharedStore,
) -> Result<impl warp::Reply, warp::Rejection> {
	match store.get_subscription(&user_id).await? {
		Some(subscription) => Ok(warp::reply::json(&subscription)),
		None => Err(GatewayError::NotFound("No subscription found").into()),
	}
}

async fn view_usage(
	user_id: String,
	store: SharedStore,
) -> Result<impl warp::Reply, warp::Rejection> {
	match store.get_usage(&user_id).await? {
		Some(usage) => Ok(warp::reply::json(&usage)),
		None => Err(GatewayError::NotFound("No usage data found").into()),
	}
}

/// Create the customer read endpoints.
pub fn get_customer_records(
	store: SharedStore,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
	let subscription_store = store.clone();
	let subscription = warp::path!("api" / "customer" / "subscription" / String)
		.and(warp::get())
		.and_then(move |user_id: String| view_subscription(user_id, subscription_store.clone()));

	let usage = warp::path!("api" / "customer" / "usage" / String)
		.and(warp::get())
		.and_then(move |user_id: String| view_usage(user_id, store.clone()));

	subscription
		.or(usage)
		// View access logs by setting `RUST_LOG=subgate`.
		.with(warp::log("subgate"))
}
