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

use dotenv::dotenv;
use std::sync::Arc;
use subgate_backend::{
	config::Config,
	db::connect_db,
	routes::create_routes,
	sentry_util::{setup_sentry, CARGO_PKG_VERSION},
	store::{MemoryStore, PgStore, SharedStore},
};

/// Run a HTTP server using warp.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
	// Read from .env file if present.
	let _ = dotenv();

	env_logger::init();
	log::info!(target: "subgate", "Running Subgate v{}", CARGO_PKG_VERSION);

	let config = Config::from_env()?;
	let _guard = setup_sentry(config.sentry_dsn.as_deref());

	let store: SharedStore = match &config.database_url {
		Some(database_url) => {
			let pool = connect_db(database_url, config.max_connections).await?;
			Arc::new(PgStore::new(pool))
		}
		None => {
			log::warn!(
				target: "subgate",
				"DATABASE_URL is not set, all data will be kept in memory and lost on restart."
			);
			Arc::new(MemoryStore::new())
		}
	};

	let routes = create_routes(store);

	log::info!(target: "subgate", "Server is listening on {}:{}.", config.host, config.port);
	warp::serve(routes).run((config.host, config.port)).await;
	Ok(())
}
