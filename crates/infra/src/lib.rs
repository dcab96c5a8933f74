mod config;
mod hub;
mod repos;
mod schedule_store;
mod system;

pub use config::Config;
pub use hub::{HubError, SubscriberHub, Subscription};
pub use repos::{
    INotifierRepo, IProductRepo, IPurchaseRepo, InMemoryNotifierRepo, InMemoryProductRepo,
    InMemoryPurchaseRepo, Repos,
};
pub use schedule_store::{ScheduleSnapshot, ScheduleStore};
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::{ISys, RealSys};
use tracing::info;

#[derive(Clone)]
pub struct EaptekaContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    /// Cache of the stored reminder schedules read by the reminder job
    pub schedules: Arc<ScheduleStore>,
    pub hub: SubscriberHub,
}

impl EaptekaContext {
    pub fn new(repos: Repos, config: Config, sys: Arc<dyn ISys>) -> Self {
        let hub = SubscriberHub::new(config.subscriber_buffer, config.shutdown_timeout);
        Self {
            repos,
            config,
            sys,
            schedules: Arc::new(ScheduleStore::new()),
            hub,
        }
    }

    pub fn create_inmemory() -> Self {
        Self::new(Repos::create_inmemory(), Config::new(), Arc::new(RealSys {}))
    }

    async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        let repos = Repos::create_postgres(connection_string).await?;
        Ok(Self::new(repos, Config::new(), Arc::new(RealSys {})))
    }
}

const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

/// Will setup the infrastructure context given the environment.
/// Postgres is used when `DATABASE_URL` is set, unless the process
/// was started with the `inmemory` argument.
pub async fn setup_context() -> anyhow::Result<EaptekaContext> {
    let inmemory_requested = std::env::args().skip(1).any(|arg| arg == "inmemory");
    match std::env::var(PSQL_CONNECTION_STRING) {
        Ok(connection_string) if !inmemory_requested => {
            run_migration(&connection_string).await?;
            EaptekaContext::create_postgres(&connection_string).await
        }
        _ => {
            info!("Using in-memory repositories, nothing will be persisted");
            Ok(EaptekaContext::create_inmemory())
        }
    }
}

pub async fn run_migration(connection_string: &str) -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(connection_string)
        .await?;

    sqlx::migrate!().run(&pool).await
}
