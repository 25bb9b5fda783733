use serde::{Deserialize, Serialize};

/// 客户端入站事件。
///
/// 按 `type` 字段区分变体；新增事件类型必须在这里加变体，
/// 由编译器保证各处 match 覆盖完整。
///
/// 字符串字段带默认值：字段缺失与传空串等价，统一由会话协议
/// 校验并以 error 帧回复来源连接。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// 向房间发送消息
    SendMessage {
        #[serde(default)]
        room_id: String,
        #[serde(default)]
        content: String,
    },
    /// 加入房间
    JoinRoom {
        #[serde(default)]
        room_id: String,
    },
    /// 离开房间
    LeaveRoom {
        #[serde(default)]
        room_id: String,
    },
    /// 输入状态
    Typing {
        #[serde(default)]
        room_id: String,
        #[serde(default)]
        is_typing: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_send_message() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"type":"send_message","room_id":"general","content":"hi"}"#)
                .unwrap();
        assert_eq!(
            event,
            ClientEvent::SendMessage {
                room_id: "general".to_string(),
                content: "hi".to_string(),
            }
        );
    }

    #[test]
    fn missing_fields_decode_as_empty() {
        // 缺失字段与空串等价，由会话协议统一拒绝
        let event: ClientEvent = serde_json::from_str(r#"{"type":"join_room"}"#).unwrap();
        assert_eq!(
            event,
            ClientEvent::JoinRoom {
                room_id: String::new()
            }
        );
    }

    #[test]
    fn typing_flag_defaults_to_false() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"type":"typing","room_id":"general"}"#).unwrap();
        assert_eq!(
            event,
            ClientEvent::Typing {
                room_id: "general".to_string(),
                is_typing: false,
            }
        );
    }

    #[test]
    fn unknown_type_error_names_the_variant() {
        let err = serde_json::from_str::<ClientEvent>(r#"{"type":"dance"}"#).unwrap_err();
        assert!(err.to_string().contains("dance"));
    }
}
