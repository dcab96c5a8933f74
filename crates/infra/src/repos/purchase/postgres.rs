use super::IPurchaseRepo;
use chrono::{DateTime, Utc};
use eapteka_domain::PurchaseEvent;
use sqlx::{FromRow, PgPool};

pub struct PostgresPurchaseRepo {
    pool: PgPool,
}

impl PostgresPurchaseRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PurchaseEventRaw {
    product_id: i64,
    created_at: DateTime<Utc>,
}

impl From<PurchaseEventRaw> for PurchaseEvent {
    fn from(raw: PurchaseEventRaw) -> Self {
        Self {
            product_id: raw.product_id.into(),
            created_at: raw.created_at,
        }
    }
}

#[async_trait::async_trait]
impl IPurchaseRepo for PostgresPurchaseRepo {
    async fn find_since(&self, since: DateTime<Utc>) -> anyhow::Result<Vec<PurchaseEvent>> {
        let purchases: Vec<PurchaseEventRaw> = sqlx::query_as(
            r#"
            SELECT pp.product_id, p.created_at
            FROM purchase AS p
            INNER JOIN purchase_product AS pp
                ON pp.purchase_id = p.id
            WHERE p.created_at >= $1
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(purchases.into_iter().map(|p| p.into()).collect())
    }
}
