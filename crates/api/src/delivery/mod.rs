use crate::error::EaptekaError;
use actix_web::{web, HttpRequest, HttpResponse};
use actix_ws::{CloseCode, CloseReason, Message, MessageStream, Session};
use eapteka_api_structs::dtos::ProductDTO;
use eapteka_domain::{DeliveryEvent, Topic};
use eapteka_infra::{EaptekaContext, Subscription};
use futures::StreamExt;
use tracing::{info, warn};

/// Renders an event as the text frame sent to the subscriber
fn render_frame(event: DeliveryEvent) -> serde_json::Result<String> {
    match event {
        DeliveryEvent::ReminderFired { message } => Ok(message),
        DeliveryEvent::Recommendation(product) => serde_json::to_string(&ProductDTO::new(product)),
    }
}

async fn join(
    topic: Topic,
    req: HttpRequest,
    body: web::Payload,
    ctx: web::Data<EaptekaContext>,
) -> Result<HttpResponse, EaptekaError> {
    let subscription = ctx
        .hub
        .join(topic)
        .map_err(|e| EaptekaError::ServiceUnavailable(e.to_string()))?;
    let (response, session, messages) =
        actix_ws::handle(&req, body).map_err(|e| EaptekaError::BadClientData(e.to_string()))?;

    info!("Subscriber {} joined {:?}", subscription.id(), topic);
    actix_web::rt::spawn(serve_subscription(subscription, session, messages));

    Ok(response)
}

async fn reminders_controller(
    req: HttpRequest,
    body: web::Payload,
    ctx: web::Data<EaptekaContext>,
) -> Result<HttpResponse, EaptekaError> {
    join(Topic::Reminders, req, body, ctx).await
}

async fn recommendations_controller(
    req: HttpRequest,
    body: web::Payload,
    ctx: web::Data<EaptekaContext>,
) -> Result<HttpResponse, EaptekaError> {
    join(Topic::Recommendations, req, body, ctx).await
}

/// Forwards the events of the subscription to the socket until the client
/// leaves, a send fails or the hub shuts down
async fn serve_subscription(
    mut subscription: Subscription,
    mut session: Session,
    mut messages: MessageStream,
) {
    let shutdown = subscription.shutdown_token();
    let close_reason = loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break Some(CloseReason::from(CloseCode::Away)),
            event = subscription.recv() => {
                let event = match event {
                    Some(event) => event,
                    None => break Some(CloseReason::from(CloseCode::Away)),
                };
                let frame = match render_frame(event) {
                    Ok(frame) => frame,
                    Err(e) => {
                        warn!("Unable to render event for subscriber {}: {}", subscription.id(), e);
                        continue;
                    }
                };
                if session.text(frame).await.is_err() {
                    warn!("Subscriber {} closed the connection while sending", subscription.id());
                    break None;
                }
            }
            message = messages.next() => match message {
                Some(Ok(Message::Ping(bytes))) => {
                    if session.pong(&bytes).await.is_err() {
                        break None;
                    }
                }
                Some(Ok(Message::Close(reason))) => break reason,
                // Anything else the client sends is ignored
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("Protocol error from subscriber {}: {}", subscription.id(), e);
                    break Some(CloseReason::from(CloseCode::Protocol));
                }
                None => break None,
            },
        }
    };

    info!(
        "Subscriber {} of {:?} disconnected",
        subscription.id(),
        subscription.topic()
    );
    let _ = session.close(close_reason).await;
    // Leaving last keeps the shutdown barrier up until the socket is closed
    subscription.leave();
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/notifier", web::get().to(reminders_controller));
    cfg.route("/recommends", web::get().to(recommendations_controller));
}
