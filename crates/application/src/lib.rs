//! 应用层实现。
//!
//! 围绕领域模型提供用例服务：加入房间、心跳、发送与读取消息，
//! 以及后台的过期参与者清理任务。存储通过仓储 trait 抽象。

pub mod clock;
pub mod dto;
pub mod error;
pub mod memory;
pub mod repository;
pub mod services;
pub mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use dto::{MessageDto, ParticipantDto};
pub use error::ApplicationError;
pub use memory::{MemoryMessageRepository, MemoryParticipantRepository};
pub use repository::{MessageRepository, ParticipantRepository};
pub use services::{
    parse_limit, JoinRequest, MessageService, MessageServiceDependencies, PresenceService,
    PresenceServiceDependencies, SendMessageRequest,
};
pub use sweeper::{EvictionSweeper, SweepConfig, SweepReport};
