use std::sync::Arc;

use domain::{visible_messages, ChatMessage, DomainError, MessageKind, ParticipantName, Recipient};

use crate::{
    clock::Clock,
    error::ApplicationError,
    repository::{MessageRepository, ParticipantRepository},
};

/// 发送消息请求。字段保持可选，缺失由服务统一校验。
#[derive(Debug, Clone, Default)]
pub struct SendMessageRequest {
    /// 发送者（来自 `user` 请求头，而非请求体）
    pub from: Option<String>,
    pub to: Option<String>,
    pub text: Option<String>,
    pub kind: Option<String>,
}

pub struct MessageServiceDependencies {
    pub participant_repository: Arc<dyn ParticipantRepository>,
    pub message_repository: Arc<dyn MessageRepository>,
    pub clock: Arc<dyn Clock>,
}

pub struct MessageService {
    deps: MessageServiceDependencies,
}

/// 解析 `limit` 查询参数；非数字或非正数视为不限制。
pub fn parse_limit(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|limit| *limit > 0)
}

fn required(field: &str, value: Option<String>) -> Result<String, DomainError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(DomainError::invalid_argument(field, "is required")),
    }
}

impl MessageService {
    pub fn new(deps: MessageServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn append_many(&self, messages: Vec<ChatMessage>) -> Result<(), ApplicationError> {
        if messages.is_empty() {
            return Ok(());
        }
        Ok(self.deps.message_repository.append_many(messages).await?)
    }

    /// 校验请求体后确认发送者仍在房间内，再追加消息。
    pub async fn send(&self, request: SendMessageRequest) -> Result<ChatMessage, ApplicationError> {
        let to = Recipient::parse(required("to", request.to)?)?;
        let text = required("text", request.text)?;
        let kind = MessageKind::parse_sendable(&required("kind", request.kind)?)?;

        let from = match request.from.map(ParticipantName::parse) {
            Some(Ok(name)) => name,
            _ => return Err(DomainError::UnknownSender.into()),
        };

        let present = self
            .deps
            .participant_repository
            .find_by_name(&from)
            .await?
            .is_some();
        if !present {
            return Err(DomainError::UnknownSender.into());
        }

        let message = ChatMessage::compose(from, to, text, kind, self.deps.clock.now())?;
        self.deps.message_repository.append(message.clone()).await?;

        tracing::debug!(from = %message.from, to = %message.to, kind = %message.kind, "消息已发送");
        Ok(message)
    }

    pub async fn list_visible_to(
        &self,
        reader: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<ChatMessage>, ApplicationError> {
        let reader = reader.map(str::trim).unwrap_or_default();
        let messages = self.deps.message_repository.list_all().await?;
        Ok(visible_messages(messages, reader, limit))
    }
}
