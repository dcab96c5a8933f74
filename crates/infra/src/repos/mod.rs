mod notifier;
mod product;
mod purchase;
mod shared;

pub use notifier::{INotifierRepo, InMemoryNotifierRepo, PostgresNotifierRepo};
pub use product::{IProductRepo, InMemoryProductRepo, PostgresProductRepo};
pub use purchase::{IPurchaseRepo, InMemoryPurchaseRepo, PostgresPurchaseRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub notifiers: Arc<dyn INotifierRepo>,
    pub products: Arc<dyn IProductRepo>,
    pub purchases: Arc<dyn IPurchaseRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            notifiers: Arc::new(PostgresNotifierRepo::new(pool.clone())),
            products: Arc::new(PostgresProductRepo::new(pool.clone())),
            purchases: Arc::new(PostgresPurchaseRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            notifiers: Arc::new(InMemoryNotifierRepo::new()),
            products: Arc::new(InMemoryProductRepo::new()),
            purchases: Arc::new(InMemoryPurchaseRepo::new()),
        }
    }
}
