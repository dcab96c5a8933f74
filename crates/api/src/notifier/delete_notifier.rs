use super::subscribers::EvictScheduleOnNotifierDeleted;
use crate::error::EaptekaError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use eapteka_api_structs::delete_notifier::*;
use eapteka_domain::{ReminderSchedule, ID};
use eapteka_infra::EaptekaContext;

pub async fn delete_notifier_controller(
    path: web::Path<PathParams>,
    ctx: web::Data<EaptekaContext>,
) -> Result<HttpResponse, EaptekaError> {
    let usecase = DeleteNotifierUseCase {
        notifier_id: path.notifier_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|schedule| HttpResponse::Ok().json(APIResponse::new(schedule)))
        .map_err(EaptekaError::from)
}

#[derive(Debug)]
pub struct DeleteNotifierUseCase {
    pub notifier_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError(anyhow::Error),
}

impl From<UseCaseError> for EaptekaError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError(_) => Self::InternalError,
            UseCaseError::NotFound(notifier_id) => Self::NotFound(format!(
                "The notifier with id: {}, was not found.",
                notifier_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteNotifierUseCase {
    type Response = ReminderSchedule;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteNotifier";

    async fn execute(&mut self, ctx: &EaptekaContext) -> Result<Self::Response, Self::Error> {
        match ctx.repos.notifiers.delete(&self.notifier_id).await {
            Ok(Some(schedule)) => Ok(schedule),
            Ok(None) => Err(UseCaseError::NotFound(self.notifier_id)),
            Err(e) => Err(UseCaseError::StorageError(e)),
        }
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(EvictScheduleOnNotifierDeleted)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::notifier::test_helpers::{product, setup_context};
    use eapteka_domain::parse_triggers;

    #[actix_web::main]
    #[test]
    async fn deletes_and_evicts_schedule() {
        let ctx = setup_context(vec![]);
        let triggers = parse_triggers(&["08:30:UTC"]).unwrap();
        let stored = ctx
            .repos
            .notifiers
            .insert(&product(1, "Aspirin"), &triggers)
            .await
            .unwrap();
        ctx.schedules.insert(stored.clone());

        let usecase = DeleteNotifierUseCase {
            notifier_id: stored.id,
        };
        let deleted = execute(usecase, &ctx).await.unwrap();

        assert_eq!(deleted, stored);
        assert!(ctx.schedules.is_empty());
        assert!(ctx.repos.notifiers.find_all().await.unwrap().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn unknown_notifier_is_not_found() {
        let ctx = setup_context(vec![]);
        let usecase = DeleteNotifierUseCase {
            notifier_id: 12.into(),
        };

        let res = execute(usecase, &ctx).await;
        assert!(matches!(res, Err(UseCaseError::NotFound(id)) if id == ID::from(12)));
    }
}
