use std::sync::Arc;

use application::{
    Clock, MessageRepository, MessageService, MessageServiceDependencies, ParticipantRepository,
    PresenceService, PresenceServiceDependencies,
};

#[derive(Clone)]
pub struct AppState {
    pub presence_service: Arc<PresenceService>,
    pub message_service: Arc<MessageService>,
}

impl AppState {
    pub fn new(
        presence_service: Arc<PresenceService>,
        message_service: Arc<MessageService>,
    ) -> Self {
        Self {
            presence_service,
            message_service,
        }
    }

    /// 用同一组存储句柄和时钟装配两个服务
    pub fn from_repositories(
        participant_repository: Arc<dyn ParticipantRepository>,
        message_repository: Arc<dyn MessageRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let presence_service = PresenceService::new(PresenceServiceDependencies {
            participant_repository: participant_repository.clone(),
            message_repository: message_repository.clone(),
            clock: clock.clone(),
        });
        let message_service = MessageService::new(MessageServiceDependencies {
            participant_repository,
            message_repository,
            clock,
        });
        Self::new(Arc::new(presence_service), Arc::new(message_service))
    }
}
