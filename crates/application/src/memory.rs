//! 内存实现的存储（用于测试和无数据库部署）
//!
//! 每个操作只持有一次写锁，因此插入、心跳和批量删除彼此之间是原子的。

use std::collections::HashMap;

use async_trait::async_trait;
use domain::{ChatMessage, Participant, ParticipantName, RepositoryError, Timestamp};
use tokio::sync::RwLock;

use crate::repository::{MessageRepository, ParticipantRepository};

#[derive(Debug, Default)]
pub struct MemoryParticipantRepository {
    participants: RwLock<HashMap<ParticipantName, Participant>>,
}

impl MemoryParticipantRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ParticipantRepository for MemoryParticipantRepository {
    async fn insert(&self, participant: Participant) -> Result<Participant, RepositoryError> {
        let mut participants = self.participants.write().await;
        if participants.contains_key(&participant.name) {
            return Err(RepositoryError::Conflict);
        }
        participants.insert(participant.name.clone(), participant.clone());
        Ok(participant)
    }

    async fn find_by_name(
        &self,
        name: &ParticipantName,
    ) -> Result<Option<Participant>, RepositoryError> {
        let participants = self.participants.read().await;
        Ok(participants.get(name).cloned())
    }

    async fn list(&self) -> Result<Vec<Participant>, RepositoryError> {
        let participants = self.participants.read().await;
        Ok(participants.values().cloned().collect())
    }

    async fn touch(&self, name: &ParticipantName, at: Timestamp) -> Result<bool, RepositoryError> {
        let mut participants = self.participants.write().await;
        match participants.get_mut(name) {
            Some(participant) => {
                participant.touch(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_stale(
        &self,
        threshold: Timestamp,
    ) -> Result<Vec<Participant>, RepositoryError> {
        let mut participants = self.participants.write().await;
        let stale: Vec<ParticipantName> = participants
            .values()
            .filter(|participant| participant.is_stale(threshold))
            .map(|participant| participant.name.clone())
            .collect();

        Ok(stale
            .iter()
            .filter_map(|name| participants.remove(name))
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct MemoryMessageRepository {
    messages: RwLock<Vec<ChatMessage>>,
}

impl MemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for MemoryMessageRepository {
    async fn append(&self, message: ChatMessage) -> Result<(), RepositoryError> {
        self.messages.write().await.push(message);
        Ok(())
    }

    async fn append_many(&self, messages: Vec<ChatMessage>) -> Result<(), RepositoryError> {
        self.messages.write().await.extend(messages);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<ChatMessage>, RepositoryError> {
        Ok(self.messages.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn name(value: &str) -> ParticipantName {
        ParticipantName::parse(value).unwrap()
    }

    #[tokio::test]
    async fn duplicate_insert_conflicts() {
        let repo = MemoryParticipantRepository::new();
        let now = Utc::now();

        repo.insert(Participant::join(name("Alice"), now)).await.unwrap();
        let err = repo
            .insert(Participant::join(name("Alice"), now))
            .await
            .unwrap_err();

        assert_eq!(err, RepositoryError::Conflict);
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn touch_unknown_participant_creates_nothing() {
        let repo = MemoryParticipantRepository::new();

        assert!(!repo.touch(&name("Ghost"), Utc::now()).await.unwrap());
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_stale_returns_exactly_removed() {
        let repo = MemoryParticipantRepository::new();
        let now = Utc::now();
        repo.insert(Participant::join(name("Old"), now - Duration::seconds(30)))
            .await
            .unwrap();
        repo.insert(Participant::join(name("Fresh"), now)).await.unwrap();

        let removed = repo.remove_stale(now - Duration::seconds(10)).await.unwrap();

        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].name, name("Old"));
        let remaining = repo.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, name("Fresh"));
        assert!(repo.remove_stale(now - Duration::seconds(10)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn messages_are_read_in_append_order() {
        let repo = MemoryMessageRepository::new();
        let now = Utc::now();
        repo.append(ChatMessage::entered(name("A"), now)).await.unwrap();
        repo.append_many(vec![
            ChatMessage::left(name("B"), now),
            ChatMessage::left(name("C"), now),
        ])
        .await
        .unwrap();

        let senders: Vec<_> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.from.to_string())
            .collect();
        assert_eq!(senders, vec!["A", "B", "C"]);
    }
}
