use crate::{APIResponse, BaseClient, ID};
use eapteka_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct NotifierClient {
    base: Arc<BaseClient>,
}

pub struct CreateNotifierInput {
    pub product_id: ID,
    /// Triggers in the `HH:MM:Zone` form, e.g. `08:30:Europe/Moscow`
    pub schedule: Vec<String>,
}

impl NotifierClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(
        &self,
        input: CreateNotifierInput,
    ) -> APIResponse<create_notifier::APIResponse> {
        let body = create_notifier::RequestBody {
            product_id: input.product_id,
            schedule: input.schedule,
        };

        self.base
            .post(body, "notifiers".into(), StatusCode::CREATED)
            .await
    }

    pub async fn list(&self) -> APIResponse<get_notifiers::APIResponse> {
        self.base.get("notifiers".into(), StatusCode::OK).await
    }

    pub async fn delete(&self, notifier_id: ID) -> APIResponse<delete_notifier::APIResponse> {
        self.base
            .delete(format!("notifiers/{}", notifier_id), StatusCode::OK)
            .await
    }
}
