use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use application::{ChatRoomRepository, MessageRepository, UserRepository};
use domain::{ChatMessage, DomainError, RepositoryError, RoomId, Timestamp, UserId};

/// 用户目录里的一条记录。
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub user_id: UserId,
    pub created_at: Timestamp,
}

/// 房间目录里的一条记录。
#[derive(Debug, Clone)]
pub struct StoredRoom {
    pub room_id: RoomId,
    pub created_at: Timestamp,
}

/// 外部存储协作方的内存实现。
///
/// 扮演关系型存储的角色：用户目录、房间目录、消息落库。
/// 核心对它只读"用户是否存在"，只写纯数据记录。
#[derive(Default)]
pub struct InMemoryStorage {
    users: RwLock<HashMap<UserId, StoredUser>>,
    rooms: RwLock<HashMap<RoomId, StoredRoom>>,
    messages: RwLock<Vec<ChatMessage>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置演示数据：general/random 两个房间和两个演示用户。
    pub fn with_demo_data(now: Timestamp) -> Result<Self, DomainError> {
        let mut users = HashMap::new();
        for name in ["alice", "bob"] {
            let user_id = UserId::parse(name)?;
            users.insert(
                user_id.clone(),
                StoredUser {
                    user_id,
                    created_at: now,
                },
            );
        }
        let mut rooms = HashMap::new();
        for slug in ["general", "random"] {
            let room_id = RoomId::parse(slug)?;
            rooms.insert(
                room_id.clone(),
                StoredRoom {
                    room_id,
                    created_at: now,
                },
            );
        }
        Ok(Self {
            users: RwLock::new(users),
            rooms: RwLock::new(rooms),
            messages: RwLock::new(Vec::new()),
        })
    }

    /// 往用户目录里登记一个用户（启动预置和测试用）。
    pub async fn add_user(&self, user_id: UserId, created_at: Timestamp) {
        self.users.write().await.insert(
            user_id.clone(),
            StoredUser {
                user_id,
                created_at,
            },
        );
    }

    /// 某房间已落库的消息。
    pub async fn messages_in(&self, room_id: &RoomId) -> Vec<ChatMessage> {
        self.messages
            .read()
            .await
            .iter()
            .filter(|m| &m.room_id == room_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryStorage {
    async fn user_exists(&self, user_id: &UserId) -> bool {
        self.users.read().await.contains_key(user_id)
    }
}

#[async_trait]
impl ChatRoomRepository for InMemoryStorage {
    async fn record_created(
        &self,
        room_id: &RoomId,
        created_at: Timestamp,
    ) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.write().await;
        rooms.entry(room_id.clone()).or_insert_with(|| StoredRoom {
            room_id: room_id.clone(),
            created_at,
        });
        Ok(())
    }

    async fn list(&self) -> Vec<RoomId> {
        self.rooms.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl MessageRepository for InMemoryStorage {
    async fn persist(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
        self.messages.write().await.push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[tokio::test]
    async fn demo_data_seeds_rooms_and_users() {
        let storage = InMemoryStorage::with_demo_data(Utc::now()).unwrap();
        assert!(storage.user_exists(&UserId::parse("alice").unwrap()).await);
        assert!(!storage.user_exists(&UserId::parse("mallory").unwrap()).await);
        assert_eq!(storage.list().await.len(), 2);
    }

    #[tokio::test]
    async fn record_created_is_idempotent() {
        let storage = InMemoryStorage::new();
        let lobby = RoomId::parse("lobby").unwrap();
        storage.record_created(&lobby, Utc::now()).await.unwrap();
        storage.record_created(&lobby, Utc::now()).await.unwrap();
        assert_eq!(storage.list().await, vec![lobby]);
    }

    #[tokio::test]
    async fn persisted_messages_are_queryable_by_room() {
        let storage = InMemoryStorage::new();
        let general = RoomId::parse("general").unwrap();
        let message = ChatMessage {
            id: 1,
            room_id: general.clone(),
            sender_id: UserId::parse("alice").unwrap(),
            content: "hi".to_string(),
            timestamp: Utc::now(),
        };
        storage.persist(&message).await.unwrap();
        assert_eq!(storage.messages_in(&general).await, vec![message]);
    }
}
