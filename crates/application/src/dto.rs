use domain::{ChatMessage, MessageKind, Participant};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantDto {
    pub name: String,
    /// epoch 毫秒
    #[serde(rename = "lastSeen")]
    pub last_seen: i64,
}

impl From<&Participant> for ParticipantDto {
    fn from(participant: &Participant) -> Self {
        Self {
            name: participant.name.as_str().to_owned(),
            last_seen: participant.last_seen.timestamp_millis(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDto {
    pub from: String,
    pub to: String,
    pub text: String,
    pub kind: MessageKind,
    pub time: String,
}

impl From<&ChatMessage> for MessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            from: message.from.as_str().to_owned(),
            to: message.to.as_str().to_owned(),
            text: message.text.clone(),
            kind: message.kind,
            time: message.time.clone(),
        }
    }
}
