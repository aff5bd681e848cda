use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct ApiConfig {
	/// Bind address for the API
	pub bind_address: SocketAddr,

	/// Time budgets for the different kinds of work
	pub timeouts: TimeoutConfig,

	/// Largest `limit` a list request may ask for
	pub max_page_size: i64,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			bind_address: SocketAddr::from(([0, 0, 0, 0, 0, 0, 0, 0], 5000)),
			timeouts: TimeoutConfig::default(),
			max_page_size: 100,
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
	/// Milliseconds a single API request may take
	pub api_ms: u64,

	/// Milliseconds a batch request may take
	pub job_ms: u64,
}

impl TimeoutConfig {
	pub fn api(&self) -> Duration {
		Duration::from_millis(self.api_ms)
	}

	pub fn job(&self) -> Duration {
		Duration::from_millis(self.job_ms)
	}
}

impl Default for TimeoutConfig {
	fn default() -> Self {
		Self {
			api_ms: 10_000,
			job_ms: 600_000,
		}
	}
}
