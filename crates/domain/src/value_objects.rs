use std::fmt;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// 统一的时间戳类型。
pub type Timestamp = DateTime<Utc>;

/// 广播收件人哨兵值。
pub const EVERYONE: &str = "everyone";

/// 以本地时钟渲染 `HH:MM:SS`，仅用于展示。
pub fn format_clock_time(at: Timestamp) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// 经过验证的参与者名称。
///
/// 去除首尾空白后不能为空；比较区分大小写。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParticipantName(String);

impl ParticipantName {
    pub fn parse(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_owned();
        if value.is_empty() {
            return Err(DomainError::invalid_argument("name", "cannot be empty"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ParticipantName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ParticipantName> for String {
    fn from(value: ParticipantName) -> Self {
        value.0
    }
}

/// 消息收件人：所有人，或某个参与者（按名称引用，允许悬空）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Recipient {
    Everyone,
    Participant(String),
}

impl Recipient {
    pub fn parse(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_owned();
        if value.is_empty() {
            return Err(DomainError::invalid_argument("to", "cannot be empty"));
        }
        if value == EVERYONE {
            return Ok(Self::Everyone);
        }
        Ok(Self::Participant(value))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Everyone => EVERYONE,
            Self::Participant(name) => name,
        }
    }

    pub fn is_everyone(&self) -> bool {
        matches!(self, Self::Everyone)
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Recipient {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Recipient> for String {
    fn from(value: Recipient) -> Self {
        value.as_str().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participant_name_is_trimmed() {
        let name = ParticipantName::parse("  Alice ").unwrap();
        assert_eq!(name.as_str(), "Alice");
    }

    #[test]
    fn blank_participant_name_is_rejected() {
        let err = ParticipantName::parse("   ").unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument { ref field, .. } if field == "name"));
    }

    #[test]
    fn participant_names_are_case_sensitive() {
        assert_ne!(
            ParticipantName::parse("alice").unwrap(),
            ParticipantName::parse("Alice").unwrap()
        );
    }

    #[test]
    fn recipient_recognises_everyone_sentinel() {
        assert_eq!(Recipient::parse("everyone").unwrap(), Recipient::Everyone);
        assert_eq!(
            Recipient::parse("Bob").unwrap(),
            Recipient::Participant("Bob".into())
        );
        assert!(Recipient::parse("").is_err());
    }

    #[test]
    fn recipient_serializes_as_plain_string() {
        let json = serde_json::to_string(&Recipient::Everyone).unwrap();
        assert_eq!(json, "\"everyone\"");
        let parsed: Recipient = serde_json::from_str("\"Carol\"").unwrap();
        assert_eq!(parsed, Recipient::Participant("Carol".into()));
    }

    #[test]
    fn clock_time_has_fixed_shape() {
        let rendered = format_clock_time(Utc::now());
        assert_eq!(rendered.len(), 8);
        assert_eq!(rendered.matches(':').count(), 2);
    }
}
