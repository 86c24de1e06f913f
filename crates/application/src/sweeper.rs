//! 过期参与者清理任务
//!
//! 单个后台任务按固定周期运行；每一轮完整执行完毕后才会等待下一次触发，
//! 轮次之间不会重叠。失败只记录日志，不会终止任务。

use std::sync::Arc;
use std::time::Duration;

use domain::{ChatMessage, ParticipantName, Timestamp};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{
    clock::Clock,
    error::ApplicationError,
    services::{MessageService, PresenceService},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepConfig {
    pub interval: Duration,
    pub inactivity_window: Duration,
}

impl SweepConfig {
    pub fn from_secs(interval_secs: u64, inactivity_window_secs: u64) -> Self {
        Self {
            interval: Duration::from_secs(interval_secs),
            inactivity_window: Duration::from_secs(inactivity_window_secs),
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self::from_secs(15, 10)
    }
}

/// 一轮清理的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub threshold: Timestamp,
    pub evicted: Vec<ParticipantName>,
}

pub struct EvictionSweeper {
    presence_service: Arc<PresenceService>,
    message_service: Arc<MessageService>,
    clock: Arc<dyn Clock>,
    config: SweepConfig,
}

impl EvictionSweeper {
    pub fn new(
        presence_service: Arc<PresenceService>,
        message_service: Arc<MessageService>,
        clock: Arc<dyn Clock>,
        config: SweepConfig,
    ) -> Self {
        Self {
            presence_service,
            message_service,
            clock,
            config,
        }
    }

    /// 执行一轮清理：删除阈值之前的参与者，并为每人追加一条离开消息。
    pub async fn sweep_once(&self) -> Result<SweepReport, ApplicationError> {
        let now = self.clock.now();
        let window = chrono::Duration::from_std(self.config.inactivity_window)
            .unwrap_or(chrono::Duration::MAX);
        let threshold = now
            .checked_sub_signed(window)
            .unwrap_or(chrono::DateTime::<chrono::Utc>::MIN_UTC);

        let evicted = self.presence_service.evict_stale_before(threshold).await?;
        let names: Vec<ParticipantName> = evicted.into_iter().map(|p| p.name).collect();

        let farewells = names
            .iter()
            .map(|name| ChatMessage::left(name.clone(), now))
            .collect();
        if let Err(err) = self.message_service.append_many(farewells).await {
            // 参与者已被删除，离开消息只能尽力写入
            tracing::error!(
                evicted = ?names.iter().map(ParticipantName::as_str).collect::<Vec<_>>(),
                error = %err,
                "参与者已清理，但离开消息写入失败"
            );
            return Err(err);
        }

        Ok(SweepReport {
            threshold,
            evicted: names,
        })
    }

    /// 按周期运行，直到 `shutdown` 被取消。首次运行在一个周期之后。
    pub async fn run(self, shutdown: CancellationToken) {
        let period = self.config.interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            interval_secs = period.as_secs(),
            inactivity_window_secs = self.config.inactivity_window.as_secs(),
            "启动过期参与者清理任务"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("过期参与者清理任务已停止");
                    break;
                }
                _ = ticker.tick() => {
                    match self.sweep_once().await {
                        Ok(report) if !report.evicted.is_empty() => {
                            tracing::info!(
                                evicted = report.evicted.len(),
                                threshold = %report.threshold,
                                "清理过期参与者"
                            );
                        }
                        Ok(_) => tracing::trace!("没有过期参与者"),
                        Err(err) => {
                            tracing::error!(error = %err, "清理过期参与者失败，等待下一轮");
                        }
                    }
                }
            }
        }
    }

    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}
