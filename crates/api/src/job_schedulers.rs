use chrono::{DateTime, DurationRound, Utc};
use eapteka_domain::{due_reminders, find_recurring_products, lookback_start, DeliveryEvent, Product, ID};
use eapteka_infra::EaptekaContext;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::time::Duration;
use thiserror::Error;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info};

pub fn get_start_delay(now_ts: usize, secs_before_min: usize) -> usize {
    let secs_to_next_minute = 60 - (now_ts / 1000) % 60;
    if secs_to_next_minute > secs_before_min {
        secs_to_next_minute - secs_before_min
    } else {
        secs_to_next_minute + (60 - secs_before_min)
    }
}

/// Publishes the reminders that are due at the current minute.
///
/// Ticks usually come more often than once a minute, so every minute is
/// only evaluated by the first tick that observes it.
#[derive(Debug, Default)]
pub struct ReminderEvaluator {
    last_minute: Option<DateTime<Utc>>,
}

impl ReminderEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of reminders that fired
    pub fn tick(&mut self, ctx: &EaptekaContext) -> usize {
        let now = ctx.sys.now();
        let minute = now
            .duration_trunc(chrono::Duration::minutes(1))
            .unwrap_or(now);
        if self.last_minute == Some(minute) {
            return 0;
        }
        self.last_minute = Some(minute);

        let snapshot = ctx.schedules.snapshot();
        let events = due_reminders(&snapshot, &now);
        let fired = events.len();
        for event in events {
            let subscribers = ctx.hub.publish(event);
            info!("Reminder delivered to {} subscribers", subscribers);
        }
        fired
    }
}

pub fn start_reminders_job(ctx: EaptekaContext) {
    let shutdown = ctx.hub.shutdown_token();
    let hub = ctx.hub.clone();
    hub.spawn_worker(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now as usize, 0);
        let start = Instant::now() + Duration::from_secs(secs_to_next_run as u64);
        let mut ticker = interval_at(start, ctx.config.reminders_tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut evaluator = ReminderEvaluator::new();
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    evaluator.tick(&ctx);
                }
            }
        }
        info!("Reminders job stopped");
    });
}

#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("Unable to fetch purchases: {0}")]
    FetchPurchases(anyhow::Error),
    #[error("Unable to resolve product {0}: {1}")]
    ResolveProduct(ID, anyhow::Error),
    #[error("The recommended product {0} was not found")]
    ProductNotFound(ID),
}

/// Picks one product that is bought on a regular cadence and publishes it.
/// Returns `None` when no product qualifies.
pub async fn send_recommendation<R: Rng>(
    ctx: &EaptekaContext,
    rng: &mut R,
) -> Result<Option<Product>, RecommendationError> {
    let since = lookback_start(&ctx.sys.now(), ctx.config.purchase_lookback_months);
    let purchases = ctx
        .repos
        .purchases
        .find_since(since)
        .await
        .map_err(RecommendationError::FetchPurchases)?;

    let mut candidates = find_recurring_products(&purchases, &ctx.config.restock_cadence)
        .into_iter()
        .collect::<Vec<_>>();
    candidates.sort();
    let product_id = match candidates.choose(rng) {
        Some(product_id) => *product_id,
        None => return Ok(None),
    };

    let product = ctx
        .repos
        .products
        .find(&product_id)
        .await
        .map_err(|e| RecommendationError::ResolveProduct(product_id, e))?
        .ok_or(RecommendationError::ProductNotFound(product_id))?;

    let subscribers = ctx
        .hub
        .publish(DeliveryEvent::Recommendation(product.clone()));
    info!(
        "Recommended product {} out of {} candidates to {} subscribers",
        product.id,
        candidates.len(),
        subscribers
    );
    Ok(Some(product))
}

pub fn start_recommendations_job(ctx: EaptekaContext) {
    let shutdown = ctx.hub.shutdown_token();
    let hub = ctx.hub.clone();
    hub.spawn_worker(async move {
        let period = ctx.config.recommendations_tick;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut rng = StdRng::from_entropy();
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    match send_recommendation(&ctx, &mut rng).await {
                        Ok(Some(_)) => {}
                        Ok(None) => info!("No recurring purchases found, skipping recommendation"),
                        Err(e) => error!("Recommendation skipped: {}", e),
                    }
                }
            }
        }
        info!("Recommendations job stopped");
    });
}
