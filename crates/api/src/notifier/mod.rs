mod create_notifier;
mod delete_notifier;
mod get_notifiers;
mod subscribers;

use actix_web::web;
use create_notifier::create_notifier_controller;
use delete_notifier::delete_notifier_controller;
use get_notifiers::get_notifiers_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/notifiers", web::get().to(get_notifiers_controller));
    cfg.route("/notifiers", web::post().to(create_notifier_controller));
    cfg.route(
        "/notifiers/{notifier_id}",
        web::delete().to(delete_notifier_controller),
    );
}
