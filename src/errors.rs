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

//! Errors returned by the access-control core and the routes.

use crate::store::StoreError;
use std::fmt;
use warp::{http::StatusCode, reject};

/// Every way a request can fail once it reached a handler.
#[derive(Debug)]
pub enum GatewayError {
	/// The requested entity does not exist. Holds the client-facing message.
	NotFound(&'static str),
	/// The caller's plan does not allow this call.
	AccessDenied,
	/// The user already has a subscription.
	AlreadySubscribed,
	/// The store failed.
	Store(StoreError),
}

impl GatewayError {
	pub fn status(&self) -> StatusCode {
		match self {
			GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
			GatewayError::AccessDenied => StatusCode::FORBIDDEN,
			GatewayError::AlreadySubscribed => StatusCode::CONFLICT,
			GatewayError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl fmt::Display for GatewayError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			GatewayError::NotFound(message) => write!(f, "{}", message),
			GatewayError::AccessDenied => write!(f, "Access denied"),
			GatewayError::AlreadySubscribed => write!(f, "User already subscribed"),
			GatewayError::Store(err) => write!(f, "{}", err),
		}
	}
}

impl std::error::Error for GatewayError {}

impl reject::Reject for GatewayError {}

impl From<StoreError> for GatewayError {
	fn from(e: StoreError) -> Self {
		GatewayError::Store(e)
	}
}

impl From<StoreError> for warp::Rejection {
	fn from(e: StoreError) -> Self {
		reject::custom(GatewayError::Store(e))
	}
}
