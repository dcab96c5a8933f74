use crate::Product;

/// The push channels a subscriber can join
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Reminders,
    Recommendations,
}

/// An event fanned out to every subscriber of its `Topic`
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryEvent {
    ReminderFired { message: String },
    Recommendation(Product),
}

impl DeliveryEvent {
    pub fn topic(&self) -> Topic {
        match self {
            Self::ReminderFired { .. } => Topic::Reminders,
            Self::Recommendation(_) => Topic::Recommendations,
        }
    }
}
