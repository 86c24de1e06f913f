use async_trait::async_trait;
use domain::{ChatMessage, Participant, ParticipantName, RepositoryError, Timestamp};

/// 在线参与者存储。每个方法都必须是单次原子操作。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    // 同名记录存在时返回 RepositoryError::Conflict
    async fn insert(&self, participant: Participant) -> Result<Participant, RepositoryError>;

    async fn find_by_name(
        &self,
        name: &ParticipantName,
    ) -> Result<Option<Participant>, RepositoryError>;

    async fn list(&self) -> Result<Vec<Participant>, RepositoryError>;

    // 直接设置 last_seen（不会倒退），记录不存在时返回 false
    async fn touch(&self, name: &ParticipantName, at: Timestamp) -> Result<bool, RepositoryError>;

    // 原子地删除 last_seen <= threshold 的记录，并返回恰好被删除的那些
    async fn remove_stale(
        &self,
        threshold: Timestamp,
    ) -> Result<Vec<Participant>, RepositoryError>;
}

/// 只追加的消息日志，读取顺序与追加顺序一致。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn append(&self, message: ChatMessage) -> Result<(), RepositoryError>;

    // 尽力而为，批次内不保证原子性
    async fn append_many(&self, messages: Vec<ChatMessage>) -> Result<(), RepositoryError>;

    async fn list_all(&self) -> Result<Vec<ChatMessage>, RepositoryError>;
}
