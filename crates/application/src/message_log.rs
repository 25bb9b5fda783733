use std::collections::{HashMap, VecDeque};

use tokio::sync::RwLock;

use domain::{ChatMessage, RoomId, Timestamp, UserId};

/// 每房间默认保留并在加入时回放的消息条数。
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

#[derive(Default)]
struct RoomLog {
    next_id: u64,
    entries: VecDeque<ChatMessage>,
}

/// 每房间独立的有界消息日志。
///
/// 序列号在房间内单调递增、无空洞，从 1 开始；淘汰旧记录不会
/// 重置计数。这里只负责内存里的近期历史，持久化由下游协作方处理。
pub struct MessageLog {
    history_limit: usize,
    rooms: RwLock<HashMap<RoomId, RoomLog>>,
}

impl MessageLog {
    pub fn new(history_limit: usize) -> Self {
        Self {
            history_limit,
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// 分配下一个序列号并追加记录，返回完整的消息。
    /// 超出保留条数时最旧的记录先被淘汰。
    pub async fn append(
        &self,
        room_id: RoomId,
        sender_id: UserId,
        content: String,
        timestamp: Timestamp,
    ) -> ChatMessage {
        let mut rooms = self.rooms.write().await;
        let log = rooms.entry(room_id.clone()).or_default();
        log.next_id += 1;
        let message = ChatMessage {
            id: log.next_id,
            room_id,
            sender_id,
            content,
            timestamp,
        };
        log.entries.push_back(message.clone());
        while log.entries.len() > self.history_limit {
            log.entries.pop_front();
        }
        message
    }

    /// 房间当前保留的记录，最早的在前；未知房间返回空。
    pub async fn recent(&self, room_id: &RoomId) -> Vec<ChatMessage> {
        let rooms = self.rooms.read().await;
        rooms
            .get(room_id)
            .map(|log| log.entries.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
