//! 聊天室在线状态核心领域模型
//!
//! 包含参与者、消息等核心实体，以及消息可见性规则。

pub mod errors;
pub mod message;
pub mod participant;
pub mod value_objects;
pub mod visibility;

// 重新导出常用类型
pub use errors::*;
pub use message::{ChatMessage, MessageKind, ENTERED_ROOM_TEXT, LEFT_ROOM_TEXT};
pub use participant::Participant;
pub use value_objects::{format_clock_time, ParticipantName, Recipient, Timestamp, EVERYONE};
pub use visibility::{is_visible_to, visible_messages};
