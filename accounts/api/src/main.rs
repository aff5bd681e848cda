use std::sync::Arc;

use accounts_api::config::ApiConfig;
use accounts_api::logic::Logic;
use accounts_api::store::PgStore;
use anyhow::Context as _;
use binary_helper::global::setup_database;
use binary_helper::{bootstrap, impl_global_traits};
use utils::context::Context;

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
struct ExtConfig {
	/// The API configuration.
	api: ApiConfig,
}

impl binary_helper::config::ConfigExtension for ExtConfig {
	const APP_NAME: &'static str = "accounts-api";
}

type AppConfig = binary_helper::config::AppConfig<ExtConfig>;

struct GlobalState {
	ctx: Context,
	config: AppConfig,
	db: Arc<utils::database::Pool>,
	logic: Logic,
}

impl_global_traits!(GlobalState);

impl binary_helper::global::GlobalConfigProvider<ApiConfig> for GlobalState {
	#[inline(always)]
	fn provide_config(&self) -> &ApiConfig {
		&self.config.extra.api
	}
}

impl accounts_api::global::ApiState for GlobalState {
	#[inline(always)]
	fn logic(&self) -> &Logic {
		&self.logic
	}
}

impl binary_helper::Global<AppConfig> for GlobalState {
	async fn new(ctx: Context, config: AppConfig) -> anyhow::Result<Self> {
		let db = setup_database(&config.database).await?;

		let logic = Logic::new(Arc::new(PgStore::new(db.clone())));

		Ok(Self { ctx, config, db, logic })
	}
}

#[tokio::main]
pub async fn main() {
	if let Err(err) = bootstrap::<AppConfig, GlobalState, _>(|global| async move {
		accounts_api::api::run(global).await.context("api server stopped unexpectedly")
	})
	.await
	{
		tracing::error!("{:#}", err);
		std::process::exit(1);
	}
}
