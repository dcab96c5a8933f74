use crate::error::EaptekaError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use eapteka_api_structs::get_notifiers::*;
use eapteka_domain::ReminderSchedule;
use eapteka_infra::EaptekaContext;

pub async fn get_notifiers_controller(
    ctx: web::Data<EaptekaContext>,
) -> Result<HttpResponse, EaptekaError> {
    let usecase = GetNotifiersUseCase {};

    execute(usecase, &ctx)
        .await
        .map(|notifiers| HttpResponse::Ok().json(APIResponse::new(notifiers)))
        .map_err(EaptekaError::from)
}

#[derive(Debug)]
pub struct GetNotifiersUseCase {}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for EaptekaError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetNotifiersUseCase {
    type Response = Vec<ReminderSchedule>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetNotifiers";

    /// The schedules currently evaluated, ordered by id
    async fn execute(&mut self, ctx: &EaptekaContext) -> Result<Self::Response, Self::Error> {
        Ok(ctx.schedules.snapshot().to_sorted_vec())
    }
}
