mod message_service;
mod presence_service;

pub use message_service::{
    parse_limit, MessageService, MessageServiceDependencies, SendMessageRequest,
};
pub use presence_service::{JoinRequest, PresenceService, PresenceServiceDependencies};
