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

//! `/api/admin/permissions` endpoints.

use crate::{
	errors::GatewayError,
	models::NewPermission,
	routes::{MessageResponse, BODY_LIMIT},
	store::{SharedStore, LIST_LIMIT},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warp::{http::StatusCode, Filter};

const PERMISSION_NOT_FOUND: &str = "Permission not found";

/// Response body of `POST /api/admin/permissions`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreatePermissionResponse {
	pub message: String,
	pub permission_id: String,
}

async fn add_permission(
	body: NewPermission,
	store: SharedStore,
) -> Result<impl warp::Reply, warp::Rejection> {
	let permission = body.into_permission(Uuid::new_v4().to_string());
	store.insert_permission(&permission).await?;

	Ok(warp::reply::with_status(
		warp::reply::json(&CreatePermissionResponse {
			message: "Permission added".into(),
			permission_id: permission.id,
		}),
		StatusCode::CREATED,
	))
}

async fn update_permission(
	permission_id: String,
	body: NewPermission,
	store: SharedStore,
) -> Result<impl warp::Reply, warp::Rejection> {
	if !store
		.update_permission(&body.into_permission(permission_id))
		.await?
	{
		return Err(GatewayError::NotFound(PERMISSION_NOT_FOUND).into());
	}

	Ok(warp::reply::json(&MessageResponse::new("Permission updated")))
}

async fn delete_permission(
	permission_id: String,
	store: SharedStore,
) -> Result<impl warp::Reply, warp::Rejection> {
	if !store.delete_permission(&permission_id).await? {
		return Err(GatewayError::NotFound(PERMISSION_NOT_FOUND).into());
	}

	Ok(warp::reply::json(&MessageResponse::new("Permission deleted")))
}

async fn list_permissions(store: SharedStore) -> Result<impl warp::Reply, warp::Rejection> {
	let permissions = store.list_permissions(LIST_LIMIT).await?;

	Ok(warp::reply::json(&permissions))
}

/// Create the permission endpoints, same shape as the plan ones.
pub fn permission_routes(
	store: SharedStore,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
	let add_store = store.clone();
	let add = warp::path!("api" / "admin" / "permissions")
		.and(warp::post())
		.and(warp::body::content_length_limit(BODY_LIMIT))
		.and(warp::body::json())
		.and_then(move |body: NewPermission| add_permission(body, add_store.clone()));

	let list_store = store.clone();
	let list = warp::path!("api" / "admin" / "permissions")
		.and(warp::get())
		.and_then(move || list_permissions(list_store.clone()));

	let update_store = store.clone();
	let update = warp::path!("api" / "admin" / "permissions" / String)
		.and(warp::put())
		.and(warp::body::content_length_limit(BODY_LIMIT))
		.and(warp::body::json())
		.and_then(move |permission_id: String, body: NewPermission| {
			update_permission(permission_id, body, update_store.clone())
		});

	let delete = warp::path!("api" / "admin" / "permissions" / String)
		.and(warp::delete())
		.and_then(move |permission_id: String| delete_permission(permission_id, store.clone()));

	add.or(list)
		.or(update)
		.or(delete)
		// View access logs by setting `RUST_LOG=subgate`.
		.with(warp::log("subgate"))
}
