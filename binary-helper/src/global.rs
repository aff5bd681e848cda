use std::sync::Arc;

use anyhow::Context as _;
use utils::database::deadpool_postgres::{ManagerConfig, PoolConfig, RecyclingMethod, Runtime, Timeouts};
use utils::database::tokio_postgres::NoTls;
use utils::database::{query, Pool};

use crate::config::DatabaseConfig;

/// Implements [`GlobalCtx`], [`GlobalDb`] and [`GlobalConfig`] for a struct
/// with `ctx` and `db` fields.
#[macro_export]
macro_rules! impl_global_traits {
	($struct:ty) => {
		impl $crate::global::GlobalCtx for $struct {
			#[inline(always)]
			fn ctx(&self) -> &::utils::context::Context {
				&self.ctx
			}
		}

		impl $crate::global::GlobalDb for $struct {
			#[inline(always)]
			fn db(&self) -> &::std::sync::Arc<::utils::database::Pool> {
				&self.db
			}
		}

		impl $crate::global::GlobalConfig for $struct {}
	};
}

pub trait GlobalCtx {
	fn ctx(&self) -> &utils::context::Context;
}

pub trait GlobalConfig {
	#[inline(always)]
	fn config<C>(&self) -> &C
	where
		Self: GlobalConfigProvider<C>,
	{
		GlobalConfigProvider::provide_config(self)
	}
}

pub trait GlobalConfigProvider<C> {
	fn provide_config(&self) -> &C;
}

pub trait GlobalDb {
	fn db(&self) -> &Arc<Pool>;
}

/// Builds the connection pool and checks that the database answers.
pub async fn setup_database(config: &DatabaseConfig) -> anyhow::Result<Arc<Pool>> {
	let mut pg_config = config
		.uri
		.parse::<utils::database::tokio_postgres::Config>()
		.context("invalid database uri")?;

	pg_config.connect_timeout(config.connect_timeout());

	let manager = utils::database::deadpool_postgres::Manager::from_config(
		pg_config,
		NoTls,
		ManagerConfig {
			recycling_method: RecyclingMethod::Fast,
		},
	);

	let pool = Pool::builder(manager)
		.config(PoolConfig {
			max_size: config.max_connections,
			timeouts: Timeouts {
				wait: Some(config.wait_timeout()),
				create: Some(config.connect_timeout()),
				recycle: None,
			},
			..Default::default()
		})
		.runtime(Runtime::Tokio1)
		.build()
		.context("failed to create database pool")?;

	query("SELECT 1")
		.build()
		.execute(&pool)
		.await
		.context("failed to connect to database")?;

	tracing::info!(max_connections = config.max_connections, "connected to database");

	Ok(Arc::new(pool))
}
