use crate::dtos::NotifierDTO;
use eapteka_domain::{ReminderSchedule, ID};
use serde::{Deserialize, Serialize};

pub type NotifierResponse = NotifierDTO;

pub mod create_notifier {
    use super::*;

    #[derive(Serialize, Deserialize)]
    pub struct RequestBody {
        pub product_id: ID,
        pub schedule: Vec<String>,
    }

    pub type APIResponse = NotifierResponse;
}

pub mod delete_notifier {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub notifier_id: ID,
    }

    pub type APIResponse = NotifierResponse;
}

pub mod get_notifiers {
    use super::*;

    #[derive(Deserialize, Serialize)]
    pub struct APIResponse {
        pub notifiers: Vec<NotifierDTO>,
    }

    impl APIResponse {
        pub fn new(notifiers: Vec<ReminderSchedule>) -> Self {
            Self {
                notifiers: notifiers.into_iter().map(NotifierDTO::new).collect(),
            }
        }
    }
}
