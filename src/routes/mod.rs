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

pub mod admin;
pub mod customer;
pub mod error;
pub mod service;
pub mod version;

use crate::store::SharedStore;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use warp::Filter;

/// Maximum accepted JSON body size.
const BODY_LIMIT: u64 = 1024 * 16;

/// Response body carrying a single human-readable message.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MessageResponse {
	pub message: String,
}

impl MessageResponse {
	pub fn new<S: Into<String>>(message: S) -> Self {
		MessageResponse {
			message: message.into(),
		}
	}
}

/// Create all the endpoints of our API, backed by `store`. Every rejection
/// is recovered into a JSON error response.
pub fn create_routes(
	store: SharedStore,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
	version::get::get_version()
		.or(service::post::post_service(store.clone()))
		.or(admin::plans::plan_routes(store.clone()))
		.or(admin::permissions::permission_routes(store.clone()))
		.or(customer::subscribe::post_subscribe(store.clone()))
		.or(customer::view::get_customer_records(store))
		.recover(error::handle_rejection)
}
