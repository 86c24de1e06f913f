#![allow(dead_code)]

use std::sync::Arc;

use application::{
    Clock, EvictionSweeper, ManualClock, MemoryMessageRepository, MemoryParticipantRepository,
    SweepConfig,
};
use chrono::{TimeZone, Utc};
use tokio::{net::TcpListener, sync::oneshot};
use web_api::{router, AppState};

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    pub clock: Arc<ManualClock>,
    pub sweeper: EvictionSweeper,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn join(&self, name: &str) -> reqwest::StatusCode {
        self.client
            .post(self.url("/participants"))
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .expect("join request")
            .status()
    }

    pub async fn send(&self, user: &str, body: serde_json::Value) -> reqwest::StatusCode {
        self.client
            .post(self.url("/messages"))
            .header("user", user)
            .json(&body)
            .send()
            .await
            .expect("send request")
            .status()
    }

    pub async fn messages(&self, user: &str, query: &str) -> Vec<serde_json::Value> {
        self.client
            .get(self.url(&format!("/messages{query}")))
            .header("user", user)
            .send()
            .await
            .expect("list request")
            .json()
            .await
            .expect("message list body")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// 内存存储 + 手动时钟，绑定随机端口启动服务
pub async fn spawn_server() -> TestServer {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
    ));
    let dyn_clock: Arc<dyn Clock> = clock.clone();
    let state = AppState::from_repositories(
        Arc::new(MemoryParticipantRepository::new()),
        Arc::new(MemoryMessageRepository::new()),
        dyn_clock.clone(),
    );
    let sweeper = EvictionSweeper::new(
        state.presence_service.clone(),
        state.message_service.clone(),
        dyn_clock,
        SweepConfig::default(),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let app = router(state);

    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .ok();
    });

    TestServer {
        base_url: format!("http://{addr}"),
        client: reqwest::Client::new(),
        clock,
        sweeper,
        shutdown: Some(shutdown_tx),
    }
}
