use serde::{Deserialize, Serialize};

use crate::value_objects::{RoomId, Timestamp, UserId};

/// 房间内的一条聊天消息。
///
/// `id` 是房间内单调递增、无空洞的序列号，从 1 开始，由消息日志分配。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub room_id: RoomId,
    pub sender_id: UserId,
    pub content: String,
    pub timestamp: Timestamp,
}
