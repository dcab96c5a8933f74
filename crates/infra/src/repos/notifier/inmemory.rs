use super::INotifierRepo;
use crate::repos::shared::inmemory_repo::*;
use eapteka_domain::{Product, ReminderSchedule, TriggerSpec, ID};
use std::sync::atomic::{AtomicI64, Ordering};

pub struct InMemoryNotifierRepo {
    notifiers: std::sync::Mutex<Vec<ReminderSchedule>>,
    next_id: AtomicI64,
}

impl InMemoryNotifierRepo {
    pub fn new() -> Self {
        Self {
            notifiers: std::sync::Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryNotifierRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl INotifierRepo for InMemoryNotifierRepo {
    async fn insert(
        &self,
        product: &Product,
        triggers: &[TriggerSpec],
    ) -> anyhow::Result<ReminderSchedule> {
        let schedule = ReminderSchedule {
            id: self.next_id.fetch_add(1, Ordering::SeqCst).into(),
            product_id: product.id,
            product_name: product.name.clone(),
            triggers: triggers.to_vec(),
        };
        insert(&schedule, &self.notifiers);
        Ok(schedule)
    }

    async fn find_all(&self) -> anyhow::Result<Vec<ReminderSchedule>> {
        Ok(find_by(&self.notifiers, |_| true))
    }

    async fn delete(&self, notifier_id: &ID) -> anyhow::Result<Option<ReminderSchedule>> {
        Ok(delete(notifier_id, &self.notifiers))
    }
}
