use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{de::Visitor, Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Reasons a trigger specification is refused at creation time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedSchedule {
    #[error("Trigger `{0}` should have the format HH:MM:Timezone, e.g. 08:30:Europe/Moscow")]
    FieldCount(String),
    #[error("Trigger `{trigger}` has an invalid hour `{hour}`. Expected a number between 0 and 23")]
    InvalidHour { trigger: String, hour: String },
    #[error(
        "Trigger `{trigger}` has an invalid minute `{minute}`. Expected a number between 0 and 59"
    )]
    InvalidMinute { trigger: String, minute: String },
    #[error("Trigger `{trigger}` has an unknown timezone `{timezone}`. It should be a valid IANA TimeZone")]
    UnknownTimezone { trigger: String, timezone: String },
}

/// A time of day in a named timezone at which a reminder fires.
///
/// The textual form is `HH:MM:Timezone`. Parsing accepts hours and minutes
/// without zero padding, while `Display` always renders the canonical padded
/// form, so parse -> display -> parse gives back the same value.
///
/// Two specs are equal when hour, minute and timezone name are all equal.
/// An instant is turned into the same representation with [`TriggerSpec::at`]
/// which converts it into the timezone and truncates it to the minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerSpec {
    hour: u32,
    minute: u32,
    timezone: Tz,
}

impl TriggerSpec {
    pub fn new(hour: u32, minute: u32, timezone: Tz) -> Result<Self, MalformedSchedule> {
        if hour > 23 {
            return Err(MalformedSchedule::InvalidHour {
                trigger: format!("{}:{}:{}", hour, minute, timezone.name()),
                hour: hour.to_string(),
            });
        }
        if minute > 59 {
            return Err(MalformedSchedule::InvalidMinute {
                trigger: format!("{}:{}:{}", hour, minute, timezone.name()),
                minute: minute.to_string(),
            });
        }
        Ok(Self {
            hour,
            minute,
            timezone,
        })
    }

    /// Normalizes the instant into the given timezone at minute resolution
    pub fn at(instant: &DateTime<Utc>, timezone: Tz) -> Self {
        let local = instant.with_timezone(&timezone);
        Self {
            hour: local.hour(),
            minute: local.minute(),
            timezone,
        }
    }

    pub fn matches(&self, instant: &DateTime<Utc>) -> bool {
        Self::at(instant, self.timezone) == *self
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }
}

impl FromStr for TriggerSpec {
    type Err = MalformedSchedule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = s.split(':').collect::<Vec<_>>();
        if fields.len() != 3 {
            return Err(MalformedSchedule::FieldCount(s.to_string()));
        }

        let hour = fields[0]
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|h| *h <= 23)
            .ok_or_else(|| MalformedSchedule::InvalidHour {
                trigger: s.to_string(),
                hour: fields[0].to_string(),
            })?;
        let minute = fields[1]
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|m| *m <= 59)
            .ok_or_else(|| MalformedSchedule::InvalidMinute {
                trigger: s.to_string(),
                minute: fields[1].to_string(),
            })?;
        let timezone = fields[2].trim().parse::<Tz>().map_err(|_| {
            MalformedSchedule::UnknownTimezone {
                trigger: s.to_string(),
                timezone: fields[2].to_string(),
            }
        })?;

        Ok(Self {
            hour,
            minute,
            timezone,
        })
    }
}

impl Display for TriggerSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{}",
            self.hour,
            self.minute,
            self.timezone.name()
        )
    }
}

impl Serialize for TriggerSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TriggerSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct TriggerSpecVisitor;

        impl<'de> Visitor<'de> for TriggerSpecVisitor {
            type Value = TriggerSpec;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("A trigger of the format HH:MM:Timezone")
            }

            fn visit_str<E>(self, value: &str) -> Result<TriggerSpec, E>
            where
                E: serde::de::Error,
            {
                value.parse::<TriggerSpec>().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(TriggerSpecVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 3, 14, hour, minute, second).unwrap()
    }

    #[test]
    fn parses_valid_triggers() {
        let trigger = "08:30:Europe/Moscow".parse::<TriggerSpec>().unwrap();
        assert_eq!(trigger.hour(), 8);
        assert_eq!(trigger.minute(), 30);
        assert_eq!(trigger.timezone(), chrono_tz::Europe::Moscow);

        let trigger = "0:0:UTC".parse::<TriggerSpec>().unwrap();
        assert_eq!(trigger, TriggerSpec::new(0, 0, chrono_tz::UTC).unwrap());

        assert!("23:59:America/New_York".parse::<TriggerSpec>().is_ok());
    }

    #[test]
    fn rejects_wrong_field_count() {
        for trigger in ["", "08:30", "08-30-UTC", "08:30:00:UTC"] {
            assert_eq!(
                trigger.parse::<TriggerSpec>(),
                Err(MalformedSchedule::FieldCount(trigger.to_string()))
            );
        }
    }

    #[test]
    fn rejects_invalid_hours_and_minutes() {
        assert!(matches!(
            "24:00:UTC".parse::<TriggerSpec>(),
            Err(MalformedSchedule::InvalidHour { .. })
        ));
        assert!(matches!(
            "ab:00:UTC".parse::<TriggerSpec>(),
            Err(MalformedSchedule::InvalidHour { .. })
        ));
        assert!(matches!(
            "-1:00:UTC".parse::<TriggerSpec>(),
            Err(MalformedSchedule::InvalidHour { .. })
        ));
        assert!(matches!(
            "10:60:UTC".parse::<TriggerSpec>(),
            Err(MalformedSchedule::InvalidMinute { .. })
        ));
        assert!(matches!(
            "10:x:UTC".parse::<TriggerSpec>(),
            Err(MalformedSchedule::InvalidMinute { .. })
        ));
        assert!(TriggerSpec::new(24, 0, chrono_tz::UTC).is_err());
        assert!(TriggerSpec::new(0, 60, chrono_tz::UTC).is_err());
    }

    #[test]
    fn rejects_unknown_timezones() {
        assert!(matches!(
            "08:30:Mars/Olympus".parse::<TriggerSpec>(),
            Err(MalformedSchedule::UnknownTimezone { .. })
        ));
    }

    #[test]
    fn formatting_is_canonical_and_reparses_to_the_same_trigger() {
        for input in ["8:5:UTC", "08:05:UTC", "23:59:Europe/Moscow", "00:00:Asia/Tokyo"] {
            let parsed = input.parse::<TriggerSpec>().unwrap();
            let rendered = parsed.to_string();
            assert_eq!(rendered.parse::<TriggerSpec>().unwrap(), parsed);
        }
        assert_eq!(
            "8:5:UTC".parse::<TriggerSpec>().unwrap().to_string(),
            "08:05:UTC"
        );
    }

    #[test]
    fn normalizes_instants_into_the_trigger_timezone() {
        let trigger = "08:30:Europe/Moscow".parse::<TriggerSpec>().unwrap();
        // Moscow is UTC+3
        assert!(trigger.matches(&utc(5, 30, 0)));
        assert!(!trigger.matches(&utc(8, 30, 0)));
    }

    #[test]
    fn matching_is_at_minute_resolution() {
        let trigger = "08:30:UTC".parse::<TriggerSpec>().unwrap();
        assert!(trigger.matches(&utc(8, 30, 0)));
        assert!(trigger.matches(&utc(8, 30, 59)));
        assert!(!trigger.matches(&utc(8, 29, 59)));
        assert!(!trigger.matches(&utc(8, 31, 0)));
    }

    #[test]
    fn same_time_in_another_timezone_is_a_different_trigger() {
        let utc_trigger = "08:30:UTC".parse::<TriggerSpec>().unwrap();
        let london_trigger = "08:30:Europe/London".parse::<TriggerSpec>().unwrap();
        assert_ne!(utc_trigger, london_trigger);
    }

    #[test]
    fn serializes_as_a_string() {
        let trigger = "8:30:UTC".parse::<TriggerSpec>().unwrap();
        let json = serde_json::to_string(&trigger).unwrap();
        assert_eq!(json, "\"08:30:UTC\"");
        let back: TriggerSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trigger);
        assert!(serde_json::from_str::<TriggerSpec>("\"25:00:UTC\"").is_err());
    }
}
