//! 基础设施层实现。
//!
//! 提供 PostgreSQL 仓储和存储后端的装配，实现应用层定义的仓储接口。

pub mod builder;
pub mod migrations;
pub mod repository;

pub use builder::{Infrastructure, InfrastructureError};
pub use migrations::MIGRATOR;
pub use repository::{create_pg_pool, PgMessageRepository, PgParticipantRepository, PgStorage};
