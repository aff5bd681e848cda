use std::sync::Arc;
use std::time::Duration;

use binary_helper::config::DatabaseConfig;
use binary_helper::logging;
use utils::context::{Context, Handler};
use utils::database::Pool;

use crate::config::ApiConfig;
use crate::logic::Logic;
use crate::store::PgStore;

const SCHEMA: &str = include_str!("../../schema.sql");

pub struct GlobalState {
	pub ctx: Context,
	pub config: ApiConfig,
	pub db: Arc<Pool>,
	pub store: Arc<PgStore>,
	pub logic: Logic,
}

impl binary_helper::global::GlobalCtx for GlobalState {
	fn ctx(&self) -> &Context {
		&self.ctx
	}
}

impl binary_helper::global::GlobalConfigProvider<ApiConfig> for GlobalState {
	fn provide_config(&self) -> &ApiConfig {
		&self.config
	}
}

impl binary_helper::global::GlobalDb for GlobalState {
	fn db(&self) -> &Arc<Pool> {
		&self.db
	}
}

impl binary_helper::global::GlobalConfig for GlobalState {}

impl crate::global::ApiState for GlobalState {
	fn logic(&self) -> &Logic {
		&self.logic
	}
}

/// A global state backed by the database in `DATABASE_URL`, or `None` when
/// it is not set so the caller can skip.
pub async fn mock_global_state(config: ApiConfig) -> Option<(Arc<GlobalState>, Handler)> {
	dotenvy::dotenv().ok();

	let Ok(uri) = std::env::var("DATABASE_URL") else {
		eprintln!("DATABASE_URL is not set, skipping");
		return None;
	};

	let logging_level = std::env::var("LOGGING_LEVEL").unwrap_or_else(|_| "info".to_string());
	logging::init(&logging_level, Default::default()).expect("failed to initialize logging");

	let db = binary_helper::global::setup_database(&DatabaseConfig {
		uri,
		max_connections: 4,
		..Default::default()
	})
	.await
	.expect("failed to connect to database");

	let client = db.get().await.expect("failed to get connection");
	client
		.batch_execute(&format!(
			"BEGIN; SELECT pg_advisory_xact_lock(7431); {SCHEMA} COMMIT;"
		))
		.await
		.expect("failed to create schema");
	drop(client);

	let (ctx, handler) = Context::new();
	let store = Arc::new(PgStore::new(db.clone()));

	let global = Arc::new(GlobalState {
		ctx,
		config,
		db,
		logic: Logic::new(store.clone()),
		store,
	});

	Some((global, handler))
}

/// A unique string tests put into names and e-mails so their rows can be told
/// apart from everything else in the database.
pub fn token() -> String {
	ulid::Ulid::new().to_string().to_lowercase()
}

pub fn request_ctx() -> (Context, Handler) {
	Context::with_timeout(Duration::from_secs(10))
}
