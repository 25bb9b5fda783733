use serde::{Deserialize, Serialize};

use crate::message::ChatMessage;
use crate::value_objects::{RoomId, Timestamp, UserId};

/// 服务端出站帧。
///
/// 每个帧序列化后带 `type` 标签和 RFC-3339 时间戳，发送一次即丢弃。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// 连接建立后的欢迎帧
    Connected {
        message: String,
        timestamp: Timestamp,
    },
    /// 有用户加入了房间
    UserJoined {
        user_id: UserId,
        room_id: RoomId,
        timestamp: Timestamp,
    },
    /// 有用户离开了房间
    UserLeft {
        user_id: UserId,
        room_id: RoomId,
        timestamp: Timestamp,
    },
    /// 加入成功，附带该房间最近的历史消息（最早的在前）
    RoomJoined {
        room_id: RoomId,
        recent_messages: Vec<ChatMessage>,
        timestamp: Timestamp,
    },
    /// 离开成功
    RoomLeft {
        room_id: RoomId,
        timestamp: Timestamp,
    },
    /// 房间内的聊天消息，时间戳取自消息记录本身
    Message {
        #[serde(flatten)]
        message: ChatMessage,
    },
    /// 输入状态指示
    TypingIndicator {
        user_id: UserId,
        room_id: RoomId,
        is_typing: bool,
        timestamp: Timestamp,
    },
    /// 错误提示，只发给事件的来源连接
    Error {
        message: String,
        timestamp: Timestamp,
    },
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn message_frame_flattens_record() {
        let frame = ServerFrame::Message {
            message: ChatMessage {
                id: 1,
                room_id: RoomId::parse("general").unwrap(),
                sender_id: UserId::parse("alice").unwrap(),
                content: "hi".to_string(),
                timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            },
        };
        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(value["type"], "message");
        assert_eq!(value["id"], 1);
        assert_eq!(value["room_id"], "general");
        assert_eq!(value["sender_id"], "alice");
        assert_eq!(value["content"], "hi");
        assert_eq!(value["timestamp"], "2024-05-01T12:00:00Z");
    }

    #[test]
    fn frames_round_trip() {
        let frame = ServerFrame::RoomJoined {
            room_id: RoomId::parse("general").unwrap(),
            recent_messages: Vec::new(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        };
        let json = serde_json::to_string(&frame).unwrap();
        let decoded: ServerFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, frame);
    }
}
