use std::sync::Arc;

use domain::{ChatMessage, DomainError, Participant, ParticipantName, RepositoryError, Timestamp};

use crate::{
    clock::Clock,
    error::ApplicationError,
    repository::{MessageRepository, ParticipantRepository},
};

#[derive(Debug, Clone)]
pub struct JoinRequest {
    pub name: String,
}

pub struct PresenceServiceDependencies {
    pub participant_repository: Arc<dyn ParticipantRepository>,
    pub message_repository: Arc<dyn MessageRepository>,
    pub clock: Arc<dyn Clock>,
}

/// 在线状态：加入、心跳、列出、按阈值清理。
pub struct PresenceService {
    deps: PresenceServiceDependencies,
}

impl PresenceService {
    pub fn new(deps: PresenceServiceDependencies) -> Self {
        Self { deps }
    }

    /// 登记参与者并追加一条 "entered the room" 状态消息。
    ///
    /// 两次写入不在同一事务中：若状态消息写入失败，参与者仍然保持登记，
    /// 调用方收到存储错误。
    pub async fn join(&self, request: JoinRequest) -> Result<Participant, ApplicationError> {
        let name = ParticipantName::parse(request.name)?;
        let now = self.deps.clock.now();

        let participant = self
            .deps
            .participant_repository
            .insert(Participant::join(name.clone(), now))
            .await
            .map_err(|err| match err {
                RepositoryError::Conflict => DomainError::ParticipantAlreadyExists.into(),
                other => ApplicationError::from(other),
            })?;

        if let Err(err) = self
            .deps
            .message_repository
            .append(ChatMessage::entered(name, now))
            .await
        {
            tracing::error!(
                participant = %participant.name,
                error = %err,
                "参与者已登记，但进入房间消息写入失败"
            );
            return Err(err.into());
        }

        tracing::info!(participant = %participant.name, "参与者进入房间");
        Ok(participant)
    }

    pub async fn heartbeat(&self, name: &str) -> Result<(), ApplicationError> {
        let name = ParticipantName::parse(name).map_err(|_| DomainError::ParticipantNotFound)?;
        let now = self.deps.clock.now();

        let touched = self.deps.participant_repository.touch(&name, now).await?;
        if !touched {
            return Err(DomainError::ParticipantNotFound.into());
        }

        tracing::debug!(participant = %name, "心跳");
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Participant>, ApplicationError> {
        Ok(self.deps.participant_repository.list().await?)
    }

    pub async fn evict_stale_before(
        &self,
        threshold: Timestamp,
    ) -> Result<Vec<Participant>, ApplicationError> {
        Ok(self
            .deps
            .participant_repository
            .remove_stale(threshold)
            .await?)
    }
}
