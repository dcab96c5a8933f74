use crate::{
    shared::entity::{Entity, ID},
    trigger::{MalformedSchedule, TriggerSpec},
    DeliveryEvent,
};
use chrono::{DateTime, Utc};

/// A `ReminderSchedule` tells subscribers to take a product at the
/// configured times of day.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderSchedule {
    pub id: ID,
    /// The product that should be taken
    pub product_id: ID,
    /// Denormalized product name used when rendering the reminder message
    pub product_name: String,
    /// Times of day at which the reminder fires. A schedule may contain the
    /// same time twice and will then fire twice.
    pub triggers: Vec<TriggerSpec>,
}

impl ReminderSchedule {
    /// Returns every trigger of this schedule that matches `now`
    pub fn due_triggers<'a>(
        &'a self,
        now: &'a DateTime<Utc>,
    ) -> impl Iterator<Item = &'a TriggerSpec> + 'a {
        self.triggers.iter().filter(move |t| t.matches(now))
    }

    pub fn reminder_message(&self) -> String {
        reminder_message(&self.product_name)
    }
}

impl Entity for ReminderSchedule {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// The text pushed to subscribers when a reminder fires
pub fn reminder_message(product_name: &str) -> String {
    format!("Вам необходимо выпить лекарство \"{}\".", product_name)
}

/// Parses raw trigger strings, failing on the first malformed one
pub fn parse_triggers<S: AsRef<str>>(raw: &[S]) -> Result<Vec<TriggerSpec>, MalformedSchedule> {
    raw.iter().map(|t| t.as_ref().parse()).collect()
}

/// Collects one `ReminderFired` event per trigger that matches `now`
pub fn due_reminders<'a, I>(schedules: I, now: &DateTime<Utc>) -> Vec<DeliveryEvent>
where
    I: IntoIterator<Item = &'a ReminderSchedule>,
{
    let mut events = Vec::new();
    for schedule in schedules {
        for _ in schedule.due_triggers(now) {
            events.push(DeliveryEvent::ReminderFired {
                message: schedule.reminder_message(),
            });
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn schedule(id: i64, name: &str, triggers: &[&str]) -> ReminderSchedule {
        ReminderSchedule {
            id: id.into(),
            product_id: (id * 10).into(),
            product_name: name.into(),
            triggers: parse_triggers(triggers).unwrap(),
        }
    }

    #[test]
    fn renders_reminder_message() {
        assert_eq!(
            reminder_message("Аспирин"),
            "Вам необходимо выпить лекарство \"Аспирин\"."
        );
    }

    #[test]
    fn parse_triggers_stops_at_first_malformed() {
        assert!(parse_triggers(&["08:30:UTC", "09:00:UTC"]).is_ok());
        assert!(matches!(
            parse_triggers(&["08:30:UTC", "9am"]),
            Err(MalformedSchedule::FieldCount(_))
        ));
    }

    #[test]
    fn emits_one_event_per_matching_trigger() {
        let now = Utc.with_ymd_and_hms(2021, 3, 14, 8, 30, 10).unwrap();
        let schedules = vec![
            schedule(1, "X", &["08:30:UTC", "20:00:UTC"]),
            schedule(2, "Y", &["08:30:UTC", "8:30:UTC"]),
            schedule(3, "Z", &["11:30:Europe/Moscow"]),
            schedule(4, "W", &["08:31:UTC"]),
        ];

        let events = due_reminders(&schedules, &now);
        let mut messages = events
            .into_iter()
            .map(|e| match e {
                DeliveryEvent::ReminderFired { message } => message,
                other => panic!("Unexpected event: {:?}", other),
            })
            .collect::<Vec<_>>();
        messages.sort();

        assert_eq!(
            messages,
            vec![
                reminder_message("X"),
                reminder_message("Y"),
                reminder_message("Y"),
                reminder_message("Z"),
            ]
        );
    }

    #[test]
    fn emits_nothing_when_no_trigger_matches() {
        let now = Utc.with_ymd_and_hms(2021, 3, 14, 8, 31, 0).unwrap();
        let schedules = vec![schedule(1, "X", &["08:30:UTC"])];
        assert!(due_reminders(&schedules, &now).is_empty());
    }
}
