use async_trait::async_trait;

use domain::{ChatMessage, RepositoryError, RoomId, Timestamp, UserId};

/// 用户目录。核心对外部存储只问一个问题：这个用户存在吗。
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn user_exists(&self, user_id: &UserId) -> bool;
}

/// 房间目录。核心在隐式创建房间时写入一条创建记录，
/// 运维端点据此列举已知房间。
#[async_trait]
pub trait ChatRoomRepository: Send + Sync {
    async fn record_created(
        &self,
        room_id: &RoomId,
        created_at: Timestamp,
    ) -> Result<(), RepositoryError>;

    async fn list(&self) -> Vec<RoomId>;
}

/// 消息落库下游。尽力而为：核心发完即走，不等待结果。
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn persist(&self, message: &ChatMessage) -> Result<(), RepositoryError>;
}
