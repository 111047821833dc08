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

//! Runtime configuration, read from environment variables (and from a
//! `.env` file if present, see `main.rs`).

use std::{env, fmt, net::IpAddr};

const DEFAULT_HOST: [u8; 4] = [127, 0, 0, 1];
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
	/// `SUBGATE_HTTP_HOST`.
	pub host: IpAddr,
	/// `PORT`.
	pub port: u16,
	/// `DATABASE_URL`. Without it, data is only kept in memory.
	pub database_url: Option<String>,
	/// `DATABASE_MAX_CONNECTIONS`.
	pub max_connections: u32,
	/// `SUBGATE_SENTRY_DSN`.
	pub sentry_dsn: Option<String>,
}

/// An environment variable is set but cannot be parsed.
#[derive(Debug, PartialEq)]
pub struct ConfigError {
	var: &'static str,
	value: String,
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(
			f,
			"Environment variable {} is malformed: {:?}",
			self.var, self.value
		)
	}
}

impl std::error::Error for ConfigError {}

impl Config {
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|var| env::var(var).ok())
	}

	/// Build the config from an arbitrary variable lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&'static str) -> Option<String>,
	{
		let non_empty = |var: &'static str| lookup(var).filter(|value: &String| !value.is_empty());

		Ok(Config {
			host: parse_or(&lookup, "SUBGATE_HTTP_HOST", IpAddr::from(DEFAULT_HOST))?,
			port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
			database_url: non_empty("DATABASE_URL"),
			max_connections: parse_or(
				&lookup,
				"DATABASE_MAX_CONNECTIONS",
				DEFAULT_MAX_CONNECTIONS,
			)?,
			sentry_dsn: non_empty("SUBGATE_SENTRY_DSN"),
		})
	}
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
	F: Fn(&'static str) -> Option<String>,
	T: std::str::FromStr,
{
	match lookup(var) {
		Some(value) => value.parse::<T>().map_err(|_| ConfigError { var, value }),
		None => Ok(default),
	}
}

#[cfg(test)]
mod tests {
	use super::Config;
	use std::collections::HashMap;

	fn lookup(vars: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
		let vars: HashMap<&'static str, String> =
			vars.iter().map(|(k, v)| (*k, v.to_string())).collect();
		move |var| vars.get(var).cloned()
	}

	#[test]
	fn test_defaults() {
		let config = Config::from_lookup(lookup(&[])).unwrap();

		assert_eq!(config.host.to_string(), "127.0.0.1");
		assert_eq!(config.port, 8080);
		assert_eq!(config.database_url, None);
		assert_eq!(config.max_connections, 5);
		assert_eq!(config.sentry_dsn, None);
	}

	#[test]
	fn test_overrides() {
		let config = Config::from_lookup(lookup(&[
			("SUBGATE_HTTP_HOST", "0.0.0.0"),
			("PORT", "3000"),
			("DATABASE_URL", "postgres://localhost/subgate"),
			("DATABASE_MAX_CONNECTIONS", "12"),
			("SUBGATE_SENTRY_DSN", ""),
		]))
		.unwrap();

		assert_eq!(config.host.to_string(), "0.0.0.0");
		assert_eq!(config.port, 3000);
		assert_eq!(
			config.database_url.as_deref(),
			Some("postgres://localhost/subgate")
		);
		assert_eq!(config.max_connections, 12);
		assert_eq!(config.sentry_dsn, None);
	}

	#[test]
	fn test_malformed_port() {
		let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();

		assert_eq!(
			err.to_string(),
			r#"Environment variable PORT is malformed: "eighty""#
		);
	}
}
