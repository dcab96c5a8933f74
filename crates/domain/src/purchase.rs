use crate::shared::entity::ID;
use chrono::{DateTime, Duration, Months, Utc};
use itertools::Itertools;
use std::collections::HashSet;

/// A product bought at some point in time
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseEvent {
    pub product_id: ID,
    pub created_at: DateTime<Utc>,
}

/// Describes what a recurring restock of a product looks like.
///
/// Consecutive purchases of the same product whose gap falls inside
/// `[min_interval, max_interval]` extend the streak. Gaps shorter than
/// `noise_interval` are order corrections and are skipped. Any other gap ends
/// the walk. A product is recurring when its streak exceeds `min_streak`.
#[derive(Debug, Clone, PartialEq)]
pub struct RestockCadence {
    pub min_interval: Duration,
    pub max_interval: Duration,
    pub noise_interval: Duration,
    pub min_streak: usize,
}

impl Default for RestockCadence {
    fn default() -> Self {
        Self {
            min_interval: Duration::days(25),
            max_interval: Duration::days(35),
            noise_interval: Duration::days(1),
            min_streak: 2,
        }
    }
}

impl RestockCadence {
    /// Length of the restock streak for purchases sorted in ascending order
    pub fn streak(&self, timestamps: &[DateTime<Utc>]) -> usize {
        let mut streak = 0;
        for (prev, next) in timestamps.iter().tuple_windows() {
            let gap = *next - *prev;
            if gap >= self.min_interval && gap <= self.max_interval {
                streak += 1;
            } else if gap < self.noise_interval {
                continue;
            } else {
                break;
            }
        }
        streak
    }

    pub fn is_recurring(&self, timestamps: &[DateTime<Utc>]) -> bool {
        self.streak(timestamps) > self.min_streak
    }
}

/// Returns the products that are bought with a recurring restock cadence.
///
/// The events may come in any order.
pub fn find_recurring_products(events: &[PurchaseEvent], cadence: &RestockCadence) -> HashSet<ID> {
    events
        .iter()
        .map(|e| (e.product_id, e.created_at))
        .into_group_map()
        .into_iter()
        .filter_map(|(product_id, mut timestamps)| {
            timestamps.sort();
            if cadence.is_recurring(&timestamps) {
                Some(product_id)
            } else {
                None
            }
        })
        .collect()
}

/// Start of the purchase history window that ends at `now`
pub fn lookback_start(now: &DateTime<Utc>, months: u32) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 1, 1, 12, 0, 0).unwrap()
    }

    /// Purchases of a product separated by the given gaps, newest first like
    /// the data store delivers them
    fn purchases(product_id: i64, gaps: &[Duration]) -> Vec<PurchaseEvent> {
        let mut ts = start();
        let mut events = vec![PurchaseEvent {
            product_id: product_id.into(),
            created_at: ts,
        }];
        for gap in gaps {
            ts = ts + *gap;
            events.push(PurchaseEvent {
                product_id: product_id.into(),
                created_at: ts,
            });
        }
        events.reverse();
        events
    }

    fn days(days: &[i64]) -> Vec<Duration> {
        days.iter().map(|d| Duration::days(*d)).collect()
    }

    fn recurring(events: &[PurchaseEvent]) -> HashSet<ID> {
        find_recurring_products(events, &RestockCadence::default())
    }

    #[test]
    fn three_restock_gaps_qualify() {
        let events = purchases(1, &days(&[30, 29, 31]));
        assert_eq!(recurring(&events), vec![ID::from(1)].into_iter().collect());
    }

    #[test]
    fn two_restock_gaps_do_not_qualify() {
        let events = purchases(1, &days(&[30, 29]));
        assert!(recurring(&events).is_empty());
    }

    #[test]
    fn single_purchase_does_not_qualify() {
        assert!(recurring(&purchases(1, &[])).is_empty());
        assert!(recurring(&[]).is_empty());
    }

    #[test]
    fn band_edges_are_inclusive() {
        let events = purchases(1, &days(&[25, 35, 25]));
        assert_eq!(recurring(&events).len(), 1);

        let events = purchases(1, &days(&[24, 30, 30, 30]));
        assert!(recurring(&events).is_empty());

        let events = purchases(1, &days(&[36, 30, 30, 30]));
        assert!(recurring(&events).is_empty());
    }

    #[test]
    fn short_noise_gaps_are_tolerated() {
        let gaps = vec![
            Duration::days(30),
            Duration::hours(12),
            Duration::days(30),
            Duration::days(30),
        ];
        let events = purchases(1, &gaps);
        assert_eq!(recurring(&events).len(), 1);
    }

    #[test]
    fn out_of_band_gap_stops_the_walk() {
        let events = purchases(1, &days(&[30, 10, 30, 30]));
        assert!(recurring(&events).is_empty());

        // Only the streak before the break counts
        let events = purchases(1, &days(&[30, 30, 30, 90, 5]));
        assert_eq!(recurring(&events).len(), 1);
    }

    #[test]
    fn streak_counts_only_restock_gaps() {
        let cadence = RestockCadence::default();
        let mut timestamps = purchases(1, &[Duration::days(30), Duration::hours(2)])
            .into_iter()
            .map(|e| e.created_at)
            .collect::<Vec<_>>();
        timestamps.sort();
        assert_eq!(cadence.streak(&timestamps), 1);
    }

    #[test]
    fn input_order_does_not_matter() {
        let mut events = purchases(1, &days(&[30, 29, 31]));
        events.extend(purchases(2, &days(&[30, 29])));
        events.extend(purchases(3, &days(&[28, 28, 28, 28])));
        let expected: HashSet<ID> = vec![ID::from(1), ID::from(3)].into_iter().collect();

        assert_eq!(recurring(&events), expected);
        events.reverse();
        assert_eq!(recurring(&events), expected);
        events.swap(0, 5);
        events.swap(2, 9);
        assert_eq!(recurring(&events), expected);
    }

    #[test]
    fn cadence_is_configurable() {
        let weekly = RestockCadence {
            min_interval: Duration::days(6),
            max_interval: Duration::days(8),
            noise_interval: Duration::hours(1),
            min_streak: 1,
        };
        let events = purchases(1, &days(&[7, 7]));
        assert_eq!(find_recurring_products(&events, &weekly).len(), 1);
        assert!(recurring(&events).is_empty());
    }

    #[test]
    fn lookback_goes_back_calendar_months() {
        let now = Utc.with_ymd_and_hms(2021, 8, 31, 10, 0, 0).unwrap();
        assert_eq!(
            lookback_start(&now, 6),
            Utc.with_ymd_and_hms(2021, 2, 28, 10, 0, 0).unwrap()
        );
    }
}
