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

//! Subscription-gated access to downstream APIs.
//!
//! Admins define plans (which APIs may be called, and how many times),
//! customers subscribe to a plan, and every call to
//! `POST /api/service/{api_name}` is let through only if the caller's plan
//! allows it, in which case the call is counted.

pub mod access;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod routes;
pub mod sentry_util;
pub mod store;
pub mod usage;
