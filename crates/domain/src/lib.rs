mod delivery;
mod product;
mod purchase;
mod reminder;
mod shared;
mod trigger;

pub use delivery::{DeliveryEvent, Topic};
pub use product::Product;
pub use purchase::{find_recurring_products, lookback_start, PurchaseEvent, RestockCadence};
pub use reminder::{due_reminders, parse_triggers, reminder_message, ReminderSchedule};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use trigger::{MalformedSchedule, TriggerSpec};

pub use chrono_tz::Tz;
