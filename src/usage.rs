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

//! Record calls that were let through.

use crate::store::{SharedStore, StoreError};

/// Write side of usage accounting.
///
/// Increments go through [`Store::increment_usage`](crate::store::Store::increment_usage),
/// which is atomic, so two concurrent calls from the same user never lose
/// a count. The check made by [`AccessEvaluator`](crate::access::AccessEvaluator)
/// and the increment made here are still two steps: when several calls race
/// on the last unit of quota they can all pass the check, and the count may
/// then end up above the limit by at most the number of racing calls.
#[derive(Clone)]
pub struct UsageRecorder {
	store: SharedStore,
}

impl UsageRecorder {
	pub fn new(store: SharedStore) -> Self {
		UsageRecorder { store }
	}

	/// Add one call to `api` for `user_id`. Only call this after the
	/// evaluator allowed the same pair. A failed write is returned as is,
	/// it is not retried.
	pub async fn record(&self, user_id: &str, api: &str) -> Result<(), StoreError> {
		let count = self.store.increment_usage(user_id, api).await?;
		log::debug!(
			target: "subgate",
			"Recorded call [user_id={}] [api={}] [count={}]",
			user_id,
			api,
			count
		);

		Ok(())
	}
}
