use std::time::Duration;

use anyhow::Context as _;

use super::Config;
use crate::logging;

/// Prefix of every environment variable read into the config, for example
/// `ACCOUNTS_DATABASE__URI`.
pub const ENV_PREFIX: &str = "ACCOUNTS";

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
	/// The log level to use, this is a tracing env filter
	pub level: String,

	/// What logging mode we should use
	pub mode: logging::Mode,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			mode: logging::Mode::Default,
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
	/// The database URL to use
	pub uri: String,

	/// Upper bound of pooled connections
	pub max_connections: usize,

	/// Milliseconds allowed for opening a new connection
	pub connect_timeout_ms: u64,

	/// Milliseconds a caller may wait for a free connection
	pub wait_timeout_ms: u64,
}

impl DatabaseConfig {
	pub fn connect_timeout(&self) -> Duration {
		Duration::from_millis(self.connect_timeout_ms)
	}

	pub fn wait_timeout(&self) -> Duration {
		Duration::from_millis(self.wait_timeout_ms)
	}
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		Self {
			uri: "postgres://localhost:5432".to_string(),
			max_connections: 20,
			connect_timeout_ms: 10_000,
			wait_timeout_ms: 10_000,
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig<T: ConfigExtension> {
	/// The name of the application
	pub name: String,

	/// The path to the config file
	pub config_file: Option<String>,

	/// The logging configuration
	pub logging: LoggingConfig,

	/// The database configuration
	pub database: DatabaseConfig,

	#[serde(flatten)]
	pub extra: T,
}

pub trait ConfigExtension: Default {
	const APP_NAME: &'static str;

	fn config_default() -> AppConfig<Self> {
		AppConfig {
			name: Self::APP_NAME.to_owned(),
			config_file: Some("config".to_owned()),
			logging: Default::default(),
			database: Default::default(),
			extra: Self::default(),
		}
	}

	fn pre_hook(_config: &mut AppConfig<Self>) -> anyhow::Result<()> {
		Ok(())
	}
}

impl<T: ConfigExtension> Default for AppConfig<T> {
	fn default() -> Self {
		T::config_default()
	}
}

fn environment() -> config::Environment {
	config::Environment::with_prefix(ENV_PREFIX)
		.prefix_separator("_")
		.separator("__")
		.try_parsing(true)
}

/// Layers the config file (when one is found) under the environment.
///
/// A file named by `ACCOUNTS_CONFIG_FILE` must exist. The default file is
/// optional and may use any extension the `config` crate understands.
pub fn parse<C: serde::de::DeserializeOwned>(default_file: Option<String>) -> anyhow::Result<(C, Option<String>)> {
	let explicit = config::Config::builder()
		.add_source(environment())
		.build()
		.context("failed to read environment")?
		.get_string("config_file")
		.ok();

	let required = explicit.is_some();
	let config_file = explicit.or(default_file);

	let mut builder = config::Config::builder();
	if let Some(path) = &config_file {
		builder = builder.add_source(config::File::with_name(path).required(required));
	}

	let config = builder
		.add_source(environment())
		.build()
		.context("failed to build config")?
		.try_deserialize()
		.context("failed to deserialize config")?;

	Ok((config, config_file))
}

impl<T: ConfigExtension + serde::de::DeserializeOwned> Config for AppConfig<T> {
	fn logging(&self) -> &LoggingConfig {
		&self.logging
	}

	fn parse() -> anyhow::Result<Self> {
		let (mut config, config_file) = parse::<Self>(Self::default().config_file)?;

		config.config_file = config_file;

		Ok(config)
	}

	fn name(&self) -> &str {
		&self.name
	}

	fn pre_hook(&mut self) -> anyhow::Result<()> {
		T::pre_hook(self)
	}
}
