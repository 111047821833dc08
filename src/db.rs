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

use sqlx::{migrate::MigrateError, postgres::PgPoolOptions, Pool, Postgres};

/// Connect to the db, create a connection pool, and bring the schema up to
/// date.
pub async fn connect_db(
	database_url: &str,
	max_connections: u32,
) -> Result<Pool<Postgres>, DbError> {
	// The pool internally shares its connections behind an Arc, so it can be
	// cloned and shared across threads.
	let pool = PgPoolOptions::new()
		.max_connections(max_connections)
		.connect(database_url)
		.await?;

	sqlx::migrate!("./migrations").run(&pool).await?;
	log::info!(target: "subgate", "Database migrations are up to date.");

	Ok(pool)
}

/// Failure to set up the database at startup.
#[derive(Debug)]
pub enum DbError {
	Connect(sqlx::Error),
	Migrate(MigrateError),
}

impl std::fmt::Display for DbError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			DbError::Connect(err) => write!(f, "cannot connect to database: {}", err),
			DbError::Migrate(err) => write!(f, "cannot run migrations: {}", err),
		}
	}
}

impl std::error::Error for DbError {}

impl From<sqlx::Error> for DbError {
	fn from(e: sqlx::Error) -> Self {
		DbError::Connect(e)
	}
}

impl From<MigrateError> for DbError {
	fn from(e: MigrateError) -> Self {
		DbError::Migrate(e)
	}
}
