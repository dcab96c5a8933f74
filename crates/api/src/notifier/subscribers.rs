use super::{create_notifier::CreateNotifierUseCase, delete_notifier::DeleteNotifierUseCase};
use crate::shared::usecase::Subscriber;
use eapteka_domain::ReminderSchedule;
use eapteka_infra::EaptekaContext;
use tracing::info;

pub struct AdmitScheduleOnNotifierCreated;

#[async_trait::async_trait(?Send)]
impl Subscriber<CreateNotifierUseCase> for AdmitScheduleOnNotifierCreated {
    async fn notify(&self, e: &ReminderSchedule, ctx: &EaptekaContext) {
        ctx.schedules.insert(e.clone());
        info!(
            "Reminder schedule {} for product {} is now evaluated",
            e.id, e.product_id
        );
    }
}

pub struct EvictScheduleOnNotifierDeleted;

#[async_trait::async_trait(?Send)]
impl Subscriber<DeleteNotifierUseCase> for EvictScheduleOnNotifierDeleted {
    async fn notify(&self, e: &ReminderSchedule, ctx: &EaptekaContext) {
        // Absent when the notifier was stored but never admitted
        if ctx.schedules.remove(&e.id).is_none() {
            info!("Deleted notifier {} was not in the schedule store", e.id);
        }
    }
}
