use super::subscribers::AdmitScheduleOnNotifierCreated;
use crate::error::EaptekaError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use eapteka_api_structs::create_notifier::*;
use eapteka_domain::{parse_triggers, MalformedSchedule, ReminderSchedule, ID};
use eapteka_infra::EaptekaContext;

pub async fn create_notifier_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<EaptekaContext>,
) -> Result<HttpResponse, EaptekaError> {
    let body = body.0;
    let usecase = CreateNotifierUseCase {
        product_id: body.product_id,
        schedule: body.schedule,
    };

    execute(usecase, &ctx)
        .await
        .map(|schedule| HttpResponse::Created().json(APIResponse::new(schedule)))
        .map_err(EaptekaError::from)
}

#[derive(Debug)]
pub struct CreateNotifierUseCase {
    pub product_id: ID,
    /// Raw `HH:MM:Zone` triggers
    pub schedule: Vec<String>,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidSchedule(MalformedSchedule),
    ProductNotFound(ID),
    StorageError(anyhow::Error),
}

impl From<UseCaseError> for EaptekaError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidSchedule(e) => Self::BadClientData(e.to_string()),
            UseCaseError::ProductNotFound(product_id) => Self::NotFound(format!(
                "The product with id: {}, was not found.",
                product_id
            )),
            UseCaseError::StorageError(_) => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateNotifierUseCase {
    type Response = ReminderSchedule;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateNotifier";

    async fn execute(&mut self, ctx: &EaptekaContext) -> Result<Self::Response, Self::Error> {
        let triggers = parse_triggers(&self.schedule).map_err(UseCaseError::InvalidSchedule)?;

        let product = match ctx.repos.products.find(&self.product_id).await {
            Ok(Some(product)) => product,
            Ok(None) => return Err(UseCaseError::ProductNotFound(self.product_id)),
            Err(e) => return Err(UseCaseError::StorageError(e)),
        };

        ctx.repos
            .notifiers
            .insert(&product, &triggers)
            .await
            .map_err(UseCaseError::StorageError)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(AdmitScheduleOnNotifierCreated)]
    }
}
