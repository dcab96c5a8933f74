use actix_web::{web, HttpResponse};
use eapteka_api_structs::get_service_health::*;
use eapteka_infra::EaptekaContext;

async fn status(ctx: web::Data<EaptekaContext>) -> HttpResponse {
    HttpResponse::Ok().json(APIResponse {
        message: "Yo! We are up!\r\n".into(),
        schedules: ctx.schedules.len(),
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(status));
}
