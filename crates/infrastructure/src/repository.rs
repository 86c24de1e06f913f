use std::sync::Arc;

use application::{MessageRepository, ParticipantRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{
    ChatMessage, MessageKind, Participant, ParticipantName, Recipient, RepositoryError, Timestamp,
};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};

pub(crate) fn map_sqlx_err(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::Conflict,
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        _ => RepositoryError::storage(err.to_string()),
    }
}

fn invalid_data(message: impl Into<String>) -> RepositoryError {
    RepositoryError::storage(message)
}

#[derive(Debug, FromRow)]
struct ParticipantRecord {
    name: String,
    last_seen: DateTime<Utc>,
}

impl TryFrom<ParticipantRecord> for Participant {
    type Error = RepositoryError;

    fn try_from(value: ParticipantRecord) -> Result<Self, Self::Error> {
        let name =
            ParticipantName::parse(value.name).map_err(|err| invalid_data(err.to_string()))?;
        Ok(Participant {
            name,
            last_seen: value.last_seen,
        })
    }
}

#[derive(Debug, FromRow)]
struct MessageRecord {
    sender: String,
    recipient: String,
    text: String,
    kind: String,
    display_time: String,
}

impl TryFrom<MessageRecord> for ChatMessage {
    type Error = RepositoryError;

    fn try_from(value: MessageRecord) -> Result<Self, Self::Error> {
        let from =
            ParticipantName::parse(value.sender).map_err(|err| invalid_data(err.to_string()))?;
        let to = Recipient::parse(value.recipient).map_err(|err| invalid_data(err.to_string()))?;
        let kind = value
            .kind
            .parse::<MessageKind>()
            .map_err(|err| invalid_data(err.to_string()))?;

        Ok(ChatMessage {
            from,
            to,
            text: value.text,
            kind,
            time: value.display_time,
        })
    }
}

#[derive(Clone)]
pub struct PgParticipantRepository {
    pool: PgPool,
}

impl PgParticipantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipantRepository for PgParticipantRepository {
    async fn insert(&self, participant: Participant) -> Result<Participant, RepositoryError> {
        // 主键冲突 => RepositoryError::Conflict
        let record = sqlx::query_as::<_, ParticipantRecord>(
            r#"
            INSERT INTO participants (name, last_seen)
            VALUES ($1, $2)
            RETURNING name, last_seen
            "#,
        )
        .bind(participant.name.as_str())
        .bind(participant.last_seen)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Participant::try_from(record)
    }

    async fn find_by_name(
        &self,
        name: &ParticipantName,
    ) -> Result<Option<Participant>, RepositoryError> {
        let record = sqlx::query_as::<_, ParticipantRecord>(
            r#"SELECT name, last_seen FROM participants WHERE name = $1"#,
        )
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(Participant::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<Participant>, RepositoryError> {
        let records =
            sqlx::query_as::<_, ParticipantRecord>(r#"SELECT name, last_seen FROM participants"#)
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_err)?;

        records.into_iter().map(Participant::try_from).collect()
    }

    async fn touch(&self, name: &ParticipantName, at: Timestamp) -> Result<bool, RepositoryError> {
        // GREATEST 保证迟到的心跳不会让 last_seen 倒退
        let result = sqlx::query(
            r#"UPDATE participants SET last_seen = GREATEST(last_seen, $2) WHERE name = $1"#,
        )
        .bind(name.as_str())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_stale(
        &self,
        threshold: Timestamp,
    ) -> Result<Vec<Participant>, RepositoryError> {
        let records = sqlx::query_as::<_, ParticipantRecord>(
            r#"DELETE FROM participants WHERE last_seen <= $1 RETURNING name, last_seen"#,
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        records.into_iter().map(Participant::try_from).collect()
    }
}

#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn append(&self, message: ChatMessage) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO messages (sender, recipient, text, kind, display_time)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(message.from.as_str())
        .bind(message.to.as_str())
        .bind(&message.text)
        .bind(message.kind.as_str())
        .bind(&message.time)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    async fn append_many(&self, messages: Vec<ChatMessage>) -> Result<(), RepositoryError> {
        if messages.is_empty() {
            return Ok(());
        }

        let mut query_builder = sqlx::QueryBuilder::new(
            "INSERT INTO messages (sender, recipient, text, kind, display_time) ",
        );
        query_builder.push_values(&messages, |mut b, message| {
            b.push_bind(message.from.as_str())
                .push_bind(message.to.as_str())
                .push_bind(&message.text)
                .push_bind(message.kind.as_str())
                .push_bind(&message.time);
        });

        query_builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        tracing::debug!(batch_size = messages.len(), "批量写入消息");
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<ChatMessage>, RepositoryError> {
        let records = sqlx::query_as::<_, MessageRecord>(
            r#"SELECT sender, recipient, text, kind, display_time FROM messages ORDER BY seq ASC"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        records.into_iter().map(ChatMessage::try_from).collect()
    }
}

#[derive(Clone)]
pub struct PgStorage {
    pub pool: PgPool,
    pub participant_repository: Arc<PgParticipantRepository>,
    pub message_repository: Arc<PgMessageRepository>,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self {
            participant_repository: Arc::new(PgParticipantRepository::new(pool.clone())),
            message_repository: Arc::new(PgMessageRepository::new(pool.clone())),
            pool,
        }
    }
}

pub async fn create_pg_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
