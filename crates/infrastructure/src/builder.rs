use std::sync::Arc;

use application::{
    MemoryMessageRepository, MemoryParticipantRepository, MessageRepository,
    ParticipantRepository,
};
use config::{AppConfig, StorageBackend};
use sqlx::PgPool;
use thiserror::Error;

use crate::{
    migrations::MIGRATOR,
    repository::{create_pg_pool, PgStorage},
};

#[derive(Debug, Error)]
pub enum InfrastructureError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// 进程启动时获取一次的存储句柄，关闭时释放。
#[derive(Clone)]
pub struct Infrastructure {
    pub participant_repository: Arc<dyn ParticipantRepository>,
    pub message_repository: Arc<dyn MessageRepository>,
    pool: Option<PgPool>,
}

impl Infrastructure {
    pub async fn connect(config: &AppConfig) -> Result<Self, InfrastructureError> {
        match config.storage.backend {
            StorageBackend::Memory => {
                tracing::warn!("使用内存存储，进程重启后数据会丢失");
                Ok(Self::in_memory())
            }
            StorageBackend::Postgres => {
                tracing::info!(database = %config.sanitized_database_url(), "连接数据库");
                let pool =
                    create_pg_pool(&config.database.url, config.database.max_connections).await?;
                MIGRATOR.run(&pool).await?;
                Ok(Self::postgres(PgStorage::new(pool)))
            }
        }
    }

    pub fn in_memory() -> Self {
        Self {
            participant_repository: Arc::new(MemoryParticipantRepository::new()),
            message_repository: Arc::new(MemoryMessageRepository::new()),
            pool: None,
        }
    }

    pub fn postgres(storage: PgStorage) -> Self {
        Self {
            participant_repository: storage.participant_repository,
            message_repository: storage.message_repository,
            pool: Some(storage.pool),
        }
    }

    pub async fn shutdown(self) {
        if let Some(pool) = self.pool {
            pool.close().await;
            tracing::info!("数据库连接池已关闭");
        }
    }
}
