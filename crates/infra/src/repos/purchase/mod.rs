mod inmemory;
mod postgres;

use chrono::{DateTime, Utc};
use eapteka_domain::PurchaseEvent;
pub use inmemory::InMemoryPurchaseRepo;
pub use postgres::PostgresPurchaseRepo;

#[async_trait::async_trait]
pub trait IPurchaseRepo: Send + Sync {
    /// Every purchased product since `since`, newest first
    async fn find_since(&self, since: DateTime<Utc>) -> anyhow::Result<Vec<PurchaseEvent>>;
}
