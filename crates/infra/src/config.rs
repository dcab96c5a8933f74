use eapteka_domain::RestockCadence;
use std::{fmt::Display, str::FromStr, time::Duration};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// How often the reminder schedules are evaluated against the clock.
    /// Should stay below one minute, otherwise triggers can be skipped.
    pub reminders_tick: Duration,
    /// How often a restocking recommendation is broadcast
    pub recommendations_tick: Duration,
    /// How many months of purchase history are analyzed for recommendations
    pub purchase_lookback_months: u32,
    /// Number of undelivered events buffered per subscriber before events
    /// are dropped for that subscriber
    pub subscriber_buffer: usize,
    /// Upper bound on how long shutdown waits for workers and connections.
    /// `None` waits until all of them are done.
    pub shutdown_timeout: Option<Duration>,
    /// What counts as a recurring restock of a product
    pub restock_cadence: RestockCadence,
}

fn parse_or_default<T>(name: &str, value: Option<String>, default: T) -> T
where
    T: FromStr + Display,
{
    match value {
        None => default,
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    name, value, default
                );
                default
            }
        },
    }
}

fn env_or_default<T>(name: &str, default: T) -> T
where
    T: FromStr + Display,
{
    parse_or_default(name, std::env::var(name).ok(), default)
}

impl Config {
    pub fn new() -> Self {
        let port = env_or_default("PORT", 5000);
        let reminders_tick = Duration::from_secs(env_or_default("REMINDERS_TICK_SECS", 30_u64).max(1));
        if reminders_tick > Duration::from_secs(60) {
            warn!(
                "REMINDERS_TICK_SECS is more than a minute. Reminders whose minute falls between two ticks will be skipped."
            );
        }
        let recommendations_tick =
            Duration::from_secs(env_or_default("RECOMMENDATIONS_TICK_SECS", 60 * 60_u64).max(1));
        let purchase_lookback_months = env_or_default("PURCHASE_LOOKBACK_MONTHS", 6);
        let subscriber_buffer = env_or_default("SUBSCRIBER_BUFFER", 64_usize).max(1);
        let shutdown_timeout = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .ok()
            .and_then(|secs| match secs.trim().parse::<u64>() {
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    warn!(
                        "The given SHUTDOWN_TIMEOUT_SECS: {} is not valid. Shutdown will wait without a timeout.",
                        secs
                    );
                    None
                }
            });
        info!(
            "Reminders are evaluated every {:?}, recommendations are sent every {:?}",
            reminders_tick, recommendations_tick
        );

        Self {
            port,
            reminders_tick,
            recommendations_tick,
            purchase_lookback_months,
            subscriber_buffer,
            shutdown_timeout,
            restock_cadence: RestockCadence::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_on_missing_or_invalid_values() {
        assert_eq!(parse_or_default("PORT", None, 5000), 5000);
        assert_eq!(parse_or_default("PORT", Some("8080".into()), 5000), 8080);
        assert_eq!(parse_or_default("PORT", Some(" 8080 ".into()), 5000), 8080);
        assert_eq!(parse_or_default("PORT", Some("eighty".into()), 5000), 5000);
        assert_eq!(
            parse_or_default("PURCHASE_LOOKBACK_MONTHS", Some("-3".into()), 6_u32),
            6
        );
    }
}
