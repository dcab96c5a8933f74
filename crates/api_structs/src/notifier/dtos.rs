use eapteka_domain::{ReminderSchedule, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NotifierDTO {
    pub id: ID,
    pub product_id: ID,
    /// Triggers in their canonical `HH:MM:Zone` form
    pub schedule: Vec<String>,
    pub product_name: String,
}

impl NotifierDTO {
    pub fn new(schedule: ReminderSchedule) -> Self {
        Self {
            id: schedule.id,
            product_id: schedule.product_id,
            schedule: schedule.triggers.iter().map(|t| t.to_string()).collect(),
            product_name: schedule.product_name,
        }
    }
}
