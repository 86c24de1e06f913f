//! 主应用程序入口
//!
//! 加载配置、装配存储与服务，启动 HTTP 服务和过期参与者清理任务。

use std::sync::Arc;

use anyhow::Context;
use application::{Clock, EvictionSweeper, SweepConfig, SystemClock};
use config::AppConfig;
use infrastructure::Infrastructure;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use web_api::{cors_layer, router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("加载配置失败")?;
    let infra = Infrastructure::connect(&config)
        .await
        .context("初始化存储失败")?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let state = AppState::from_repositories(
        infra.participant_repository.clone(),
        infra.message_repository.clone(),
        clock.clone(),
    );

    let shutdown = CancellationToken::new();
    let sweeper = EvictionSweeper::new(
        state.presence_service.clone(),
        state.message_service.clone(),
        clock,
        SweepConfig::from_secs(
            config.presence.sweep_interval_secs,
            config.presence.inactivity_window_secs,
        ),
    )
    .spawn(shutdown.child_token());

    let app = router(state).layer(cors_layer(&config.server.cors_origins));
    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("绑定地址 {address} 失败"))?;

    tracing::info!(address = %address, "聊天室服务器启动");
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await;

    // 服务器因错误退出时同样停止清理任务
    shutdown.cancel();
    if let Err(err) = sweeper.await {
        tracing::error!(error = %err, "清理任务异常退出");
    }
    infra.shutdown().await;
    tracing::info!("聊天室服务器已停止");

    served.context("HTTP 服务异常退出")
}

async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "监听 Ctrl+C 失败");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig_term) => {
                sig_term.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "监听终止信号失败");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("接收到 Ctrl+C 信号，开始优雅停机..."),
        _ = terminate => tracing::info!("接收到终止信号，开始优雅停机..."),
        _ = token.cancelled() => {}
    }
    token.cancel();
}
