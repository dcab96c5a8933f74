use super::INotifierRepo;
use eapteka_domain::{Product, ReminderSchedule, TriggerSpec, ID};
use sqlx::{FromRow, PgPool};
use tracing::{error, warn};

pub struct PostgresNotifierRepo {
    pool: PgPool,
}

impl PostgresNotifierRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct NotifierRaw {
    id: i64,
    product_id: i64,
    schedule: Vec<String>,
    product_name: Option<String>,
}

impl From<NotifierRaw> for ReminderSchedule {
    fn from(raw: NotifierRaw) -> Self {
        let triggers = raw
            .schedule
            .iter()
            .filter_map(|trigger| match trigger.parse::<TriggerSpec>() {
                Ok(trigger) => Some(trigger),
                Err(e) => {
                    warn!(
                        "Ignoring stored trigger of notifier {}: {}",
                        raw.id, e
                    );
                    None
                }
            })
            .collect();

        Self {
            id: raw.id.into(),
            product_id: raw.product_id.into(),
            product_name: raw.product_name.unwrap_or_default(),
            triggers,
        }
    }
}

fn to_schedule_column(triggers: &[TriggerSpec]) -> Vec<String> {
    triggers.iter().map(|t| t.to_string()).collect()
}

#[async_trait::async_trait]
impl INotifierRepo for PostgresNotifierRepo {
    async fn insert(
        &self,
        product: &Product,
        triggers: &[TriggerSpec],
    ) -> anyhow::Result<ReminderSchedule> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO notifier(product_id, schedule)
            VALUES($1, $2)
            RETURNING id
            "#,
        )
        .bind(product.id.inner())
        .bind(to_schedule_column(triggers))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert notifier for product: {}. DB returned error: {:?}",
                product.id, e
            );
            e
        })?;

        Ok(ReminderSchedule {
            id: id.into(),
            product_id: product.id,
            product_name: product.name.clone(),
            triggers: triggers.to_vec(),
        })
    }

    async fn find_all(&self) -> anyhow::Result<Vec<ReminderSchedule>> {
        let notifiers: Vec<NotifierRaw> = sqlx::query_as(
            r#"
            SELECT n.id, n.product_id, n.schedule, p.name AS product_name
            FROM notifier AS n
            LEFT JOIN product AS p
                ON p.id = n.product_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(notifiers.into_iter().map(|n| n.into()).collect())
    }

    async fn delete(&self, notifier_id: &ID) -> anyhow::Result<Option<ReminderSchedule>> {
        let notifier: Option<NotifierRaw> = sqlx::query_as(
            r#"
            WITH deleted AS (
                DELETE FROM notifier AS n
                WHERE n.id = $1
                RETURNING n.*
            )
            SELECT d.id, d.product_id, d.schedule, p.name AS product_name
            FROM deleted AS d
            LEFT JOIN product AS p
                ON p.id = d.product_id
            "#,
        )
        .bind(notifier_id.inner())
        .fetch_optional(&self.pool)
        .await?;

        Ok(notifier.map(|n| n.into()))
    }
}
