mod delivery;
mod error;
mod job_schedulers;
mod notifier;
mod shared;
mod status;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
use eapteka_infra::EaptekaContext;
use job_schedulers::{start_recommendations_job, start_reminders_job};
use std::{future::Future, net::TcpListener};
use tracing::{error, info};
use tracing_actix_web::TracingLogger;

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    notifier::configure_routes(cfg);
    status::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
    context: EaptekaContext,
}

impl Application {
    pub async fn new(context: EaptekaContext) -> Result<Self, std::io::Error> {
        Application::load_schedules(&context).await;
        let (server, port) = Application::configure_server(context.clone()).await?;
        Application::start_job_schedulers(context.clone());

        Ok(Self {
            server,
            port,
            context,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Seeds the schedule store with every stored notifier. The service
    /// still starts when the data store is unavailable.
    async fn load_schedules(context: &EaptekaContext) {
        match context.repos.notifiers.find_all().await {
            Ok(schedules) => {
                info!("Loaded {} reminder schedules", schedules.len());
                context.schedules.load(schedules);
            }
            Err(e) => {
                error!(
                    "Unable to load reminder schedules, starting without any: {:?}",
                    e
                );
            }
        }
    }

    fn start_job_schedulers(context: EaptekaContext) {
        start_reminders_job(context.clone());
        start_recommendations_job(context);
    }

    async fn configure_server(context: EaptekaContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .service(web::scope("/api/v1").configure(configure_server_api))
                .service(web::scope("/ws").configure(delivery::configure_routes))
        })
        .listen(listener)?
        .workers(4)
        .disable_signals()
        .run();

        Ok((server, port))
    }

    /// Runs until ctrl-c or SIGTERM
    pub async fn start(self) -> Result<(), std::io::Error> {
        self.run_until(shutdown_signal()).await
    }

    /// Runs until `signal` resolves, then stops the background jobs, closes
    /// every subscriber connection and stops the http server
    pub async fn run_until<F>(self, signal: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()>,
    {
        let handle = self.server.handle();
        let server = actix_web::rt::spawn(self.server);

        signal.await;
        info!("Shutdown requested");
        if let Err(e) = self.context.hub.shutdown().await {
            error!("Shutdown did not complete cleanly: {}", e);
        }
        handle.stop(true).await;

        match server.await {
            Ok(res) => res,
            Err(e) => Err(std::io::Error::new(std::io::ErrorKind::Other, e)),
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
            }
            Err(e) => {
                error!("Unable to listen for SIGTERM: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
