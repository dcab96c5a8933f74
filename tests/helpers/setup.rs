use chrono::{DateTime, TimeZone, Utc};
use eapteka_api::Application;
use eapteka_domain::{Product, PurchaseEvent};
use eapteka_infra::{
    Config, EaptekaContext, ISys, InMemoryProductRepo, InMemoryPurchaseRepo, Repos,
};
use eapteka_sdk::EaptekaSDK;
use std::{
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::sync::oneshot;

/// Clock that only moves when a test moves it
pub struct TestSys(AtomicI64);

impl TestSys {
    pub fn set(&self, now: DateTime<Utc>) {
        self.0.store(now.timestamp_millis(), Ordering::SeqCst);
    }
}

impl ISys for TestSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

pub fn product(id: i64, name: &str) -> Product {
    Product {
        id: id.into(),
        substance_id: None,
        name: name.into(),
        description: format!("{} description", name),
        price: 150,
        image_id: 1,
        sku: id as i32,
        substance_name: None,
    }
}

pub struct TestApp {
    pub ctx: EaptekaContext,
    pub sys: Arc<TestSys>,
    pub address: String,
    pub ws_address: String,
    stop: oneshot::Sender<()>,
    server: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl TestApp {
    /// Requests a shutdown and waits until the application has stopped
    pub async fn stop(self) -> std::io::Result<()> {
        let _ = self.stop.send(());
        self.server.await.expect("Application task to finish")
    }
}

/// Context with in-memory repositories, fast ticking jobs and a clock
/// starting one second before 08:30 UTC
pub fn test_context(products: Vec<Product>, purchases: Vec<PurchaseEvent>) -> (EaptekaContext, Arc<TestSys>) {
    let sys = Arc::new(TestSys(AtomicI64::new(
        utc(2024, 3, 1, 8, 29, 59).timestamp_millis(),
    )));
    let repos = Repos {
        products: Arc::new(InMemoryProductRepo::with_products(products)),
        purchases: Arc::new(InMemoryPurchaseRepo::with_purchases(purchases)),
        ..Repos::create_inmemory()
    };
    let mut config = Config::new();
    config.port = 0; // Random port
    config.reminders_tick = Duration::from_secs(1);
    config.recommendations_tick = Duration::from_secs(1);
    config.shutdown_timeout = Some(Duration::from_secs(10));

    let ctx = EaptekaContext::new(repos, config, sys.clone());
    (ctx, sys)
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, EaptekaSDK) {
    let (ctx, sys) = test_context(vec![product(1, "Aspirin")], vec![]);
    spawn_app_with_context(ctx, sys).await
}

pub async fn spawn_app_with_context(
    ctx: EaptekaContext,
    sys: Arc<TestSys>,
) -> (TestApp, EaptekaSDK) {
    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let ws_address = format!("ws://localhost:{}/ws", application.port());
    let (stop, stopped) = oneshot::channel::<()>();
    let server = actix_web::rt::spawn(application.run_until(async move {
        let _ = stopped.await;
    }));

    let sdk = EaptekaSDK::new(address.clone());
    let app = TestApp {
        ctx,
        sys,
        address,
        ws_address,
        stop,
        server,
    };
    (app, sdk)
}
