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

//! Turn rejections into the JSON error bodies returned by every route.
//!
//! Client errors carry `{"detail": ...}`. Server errors carry
//! `{"message": "An error occurred", "details": ...}`.

use crate::{errors::GatewayError, sentry_util};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use warp::{
	filters::body::BodyDeserializeError,
	http::StatusCode,
	reject,
	reply::{self, Json, WithStatus},
};

/// Body of a 4xx response.
#[derive(Debug, Deserialize, Serialize)]
pub struct DetailResponse {
	pub detail: String,
}

/// Body of a 500 response.
#[derive(Debug, Deserialize, Serialize)]
pub struct InternalErrorResponse {
	pub message: String,
	pub details: String,
}

fn internal_error(details: String, kind: &str) -> WithStatus<Json> {
	log::error!(target: "subgate", "Internal error ({}): {}", kind, details);
	sentry_util::error(details.clone(), kind);

	let body = InternalErrorResponse {
		message: "An error occurred".into(),
		details,
	};
	reply::with_status(reply::json(&body), StatusCode::INTERNAL_SERVER_ERROR)
}

/// This function receives a `Rejection` and maps it to a status code and a
/// JSON body. Anything we don't recognize becomes a 500.
pub async fn handle_rejection(err: warp::Rejection) -> Result<impl warp::Reply, Infallible> {
	let (code, detail) = if err.is_not_found() {
		(StatusCode::NOT_FOUND, "Not Found".to_string())
	} else if let Some(e) = err.find::<GatewayError>() {
		if let GatewayError::Store(store_err) = e {
			return Ok(internal_error(store_err.to_string(), "store"));
		}
		(e.status(), e.to_string())
	} else if let Some(e) = err.find::<BodyDeserializeError>() {
		(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
	} else if err.find::<reject::LengthRequired>().is_some() {
		(StatusCode::LENGTH_REQUIRED, "Content-Length required".to_string())
	} else if let Some(e) = err.find::<reject::MissingHeader>() {
		(StatusCode::BAD_REQUEST, e.to_string())
	} else if let Some(e) = err.find::<reject::InvalidHeader>() {
		(StatusCode::BAD_REQUEST, e.to_string())
	} else if err.find::<reject::PayloadTooLarge>().is_some() {
		(StatusCode::PAYLOAD_TOO_LARGE, "Payload too large".to_string())
	} else if err.find::<reject::UnsupportedMediaType>().is_some() {
		(
			StatusCode::UNSUPPORTED_MEDIA_TYPE,
			"Unsupported media type".to_string(),
		)
	} else if err.find::<reject::MethodNotAllowed>().is_some() {
		(
			StatusCode::METHOD_NOT_ALLOWED,
			"Method not allowed".to_string(),
		)
	} else {
		return Ok(internal_error(
			format!("Unhandled rejection: {:?}", err),
			"rejection",
		));
	};

	Ok(reply::with_status(
		reply::json(&DetailResponse { detail }),
		code,
	))
}
