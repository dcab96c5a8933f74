mod inmemory;
mod postgres;

use eapteka_domain::{Product, ReminderSchedule, TriggerSpec, ID};
pub use inmemory::InMemoryNotifierRepo;
pub use postgres::PostgresNotifierRepo;

/// Storage of `ReminderSchedule`s. The store is authoritative and assigns the ids.
#[async_trait::async_trait]
pub trait INotifierRepo: Send + Sync {
    /// Stores a new schedule for the product and returns it with its assigned id
    async fn insert(
        &self,
        product: &Product,
        triggers: &[TriggerSpec],
    ) -> anyhow::Result<ReminderSchedule>;
    /// All schedules with their product names resolved
    async fn find_all(&self) -> anyhow::Result<Vec<ReminderSchedule>>;
    async fn delete(&self, notifier_id: &ID) -> anyhow::Result<Option<ReminderSchedule>>;
}
