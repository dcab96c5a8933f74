use super::IPurchaseRepo;
use crate::repos::shared::inmemory_repo::find_by;
use chrono::{DateTime, Utc};
use eapteka_domain::PurchaseEvent;

pub struct InMemoryPurchaseRepo {
    purchases: std::sync::Mutex<Vec<PurchaseEvent>>,
}

impl InMemoryPurchaseRepo {
    pub fn new() -> Self {
        Self::with_purchases(Vec::new())
    }

    pub fn with_purchases(purchases: Vec<PurchaseEvent>) -> Self {
        Self {
            purchases: std::sync::Mutex::new(purchases),
        }
    }
}

impl Default for InMemoryPurchaseRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IPurchaseRepo for InMemoryPurchaseRepo {
    async fn find_since(&self, since: DateTime<Utc>) -> anyhow::Result<Vec<PurchaseEvent>> {
        let mut purchases = find_by(&self.purchases, |p| p.created_at >= since);
        purchases.sort_by(|p1, p2| p2.created_at.cmp(&p1.created_at));
        Ok(purchases)
    }
}
