use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;
use crate::value_objects::{format_clock_time, ParticipantName, Recipient, Timestamp};

pub const ENTERED_ROOM_TEXT: &str = "entered the room";
pub const LEFT_ROOM_TEXT: &str = "left the room";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// 公开广播
    #[serde(alias = "message")]
    Public,
    /// 私聊
    #[serde(alias = "private_message")]
    Private,
    /// 系统生成的进入/离开事件
    Status,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Status => "status",
        }
    }

    /// 解析客户端可直接发送的类型；`status` 只能由系统生成。
    pub fn parse_sendable(value: &str) -> Result<Self, DomainError> {
        match value.parse::<Self>()? {
            Self::Status => Err(DomainError::invalid_argument(
                "kind",
                "must be one of public, private",
            )),
            kind => Ok(kind),
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "public" | "message" => Ok(Self::Public),
            "private" | "private_message" => Ok(Self::Private),
            "status" => Ok(Self::Status),
            _ => Err(DomainError::invalid_argument(
                "kind",
                "must be one of public, private",
            )),
        }
    }
}

/// 聊天事件。追加后不可变，读取顺序即追加顺序。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChatMessage {
    pub from: ParticipantName,
    pub to: Recipient,
    pub text: String,
    pub kind: MessageKind,
    pub time: String,
}

impl ChatMessage {
    /// 构造一条用户消息（公开或私聊）。
    pub fn compose(
        from: ParticipantName,
        to: Recipient,
        text: impl Into<String>,
        kind: MessageKind,
        at: Timestamp,
    ) -> Result<Self, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::invalid_argument("text", "cannot be empty"));
        }
        if kind == MessageKind::Status {
            return Err(DomainError::invalid_argument(
                "kind",
                "status events are system generated",
            ));
        }
        Ok(Self {
            from,
            to,
            text,
            kind,
            time: format_clock_time(at),
        })
    }

    pub fn entered(name: ParticipantName, at: Timestamp) -> Self {
        Self::status(name, ENTERED_ROOM_TEXT, at)
    }

    pub fn left(name: ParticipantName, at: Timestamp) -> Self {
        Self::status(name, LEFT_ROOM_TEXT, at)
    }

    fn status(name: ParticipantName, text: &str, at: Timestamp) -> Self {
        Self {
            from: name,
            to: Recipient::Everyone,
            text: text.to_owned(),
            kind: MessageKind::Status,
            time: format_clock_time(at),
        }
    }
}
