//! 会话协议
//!
//! 把入站文本帧解码成事件并驱动注册表、调度器与消息日志。
//! 所有会话共享同一个服务实例；单个事件的失败只会以 error 帧
//! 回给来源连接，绝不影响其他会话。

use std::sync::Arc;

use uuid::Uuid;

use domain::{ChatMessage, ClientEvent, RoomId, ServerFrame, Timestamp, UserId};

use crate::clock::Clock;
use crate::connection::ConnectionHandle;
use crate::dispatcher::Dispatcher;
use crate::message_log::MessageLog;
use crate::registry::ConnectionRegistry;
use crate::repository::{ChatRoomRepository, MessageRepository};

/// 会话协议的依赖集合。
pub struct ChatServiceDependencies {
    pub registry: Arc<ConnectionRegistry>,
    pub message_log: Arc<MessageLog>,
    pub message_repository: Arc<dyn MessageRepository>,
    pub room_repository: Arc<dyn ChatRoomRepository>,
    pub clock: Arc<dyn Clock>,
}

pub struct ChatService {
    registry: Arc<ConnectionRegistry>,
    dispatcher: Dispatcher,
    message_log: Arc<MessageLog>,
    message_repository: Arc<dyn MessageRepository>,
    room_repository: Arc<dyn ChatRoomRepository>,
    clock: Arc<dyn Clock>,
}

impl ChatService {
    pub fn new(deps: ChatServiceDependencies) -> Self {
        let dispatcher = Dispatcher::new(deps.registry.clone());
        Self {
            registry: deps.registry,
            dispatcher,
            message_log: deps.message_log,
            message_repository: deps.message_repository,
            room_repository: deps.room_repository,
            clock: deps.clock,
        }
    }

    /// 连接进入 Open 状态：登记句柄并发送欢迎帧。
    ///
    /// 同名用户的旧连接被覆盖，并触发旧句柄的关闭信号，
    /// 让它的传输尽快释放。
    pub async fn connect(&self, user_id: UserId, handle: ConnectionHandle) {
        if let Some(displaced) = self.registry.register(user_id.clone(), handle).await {
            tracing::info!(user_id = %user_id, "connection superseded, closing stale transport");
            displaced.close();
        }
        let total = self.registry.connection_count().await;
        tracing::info!(
            user_id = %user_id,
            total,
            "user connected"
        );
        let frame = ServerFrame::Connected {
            message: format!("Welcome {user_id}! You are now connected."),
            timestamp: self.clock.now(),
        };
        self.dispatcher.send_to(&user_id, frame).await;
    }

    /// 会话进入 Closed 状态：带身份校验地注销。
    ///
    /// 幂等：连接已被调度器的失败路径摘除、或者该会话早已被
    /// 同名新连接顶替时，这里什么都不做。
    pub async fn disconnect(&self, user_id: &UserId, connection_id: Uuid) {
        if self
            .registry
            .unregister_connection(user_id, connection_id)
            .await
        {
            let total = self.registry.connection_count().await;
            tracing::info!(
                user_id = %user_id,
                total,
                "user disconnected"
            );
        }
    }

    /// 处理一个入站文本帧。
    ///
    /// 解码失败（JSON 损坏、未知 `type`、字段类型不对）回 error 帧，
    /// 错误文本里带 serde 的说明（含未知变体名），连接保持打开。
    pub async fn handle_frame(&self, user_id: &UserId, raw: &str) {
        match serde_json::from_str::<ClientEvent>(raw) {
            Ok(event) => self.handle_event(user_id, event).await,
            Err(err) => self.send_error(user_id, err.to_string()).await,
        }
    }

    /// 按事件类型分发。新增变体时编译器会强制补全这里。
    pub async fn handle_event(&self, user_id: &UserId, event: ClientEvent) {
        match event {
            ClientEvent::SendMessage { room_id, content } => {
                self.handle_send_message(user_id, room_id, content).await
            }
            ClientEvent::JoinRoom { room_id } => self.handle_join_room(user_id, room_id).await,
            ClientEvent::LeaveRoom { room_id } => self.handle_leave_room(user_id, room_id).await,
            ClientEvent::Typing { room_id, is_typing } => {
                self.handle_typing(user_id, room_id, is_typing).await
            }
        }
    }

    async fn handle_send_message(&self, user_id: &UserId, room_id: String, content: String) {
        let Ok(room_id) = RoomId::parse(room_id) else {
            return self
                .send_error(user_id, "room_id and content are required")
                .await;
        };
        if content.is_empty() {
            return self
                .send_error(user_id, "room_id and content are required")
                .await;
        }

        let message = self
            .message_log
            .append(room_id.clone(), user_id.clone(), content, self.clock.now())
            .await;
        self.persist_message(message.clone());

        // 不排除发送者：已加入房间的发送者会收到自己的回显
        self.dispatcher
            .broadcast(&room_id, ServerFrame::Message { message }, None)
            .await;
    }

    async fn handle_join_room(&self, user_id: &UserId, room_id: String) {
        let Ok(room_id) = RoomId::parse(room_id) else {
            return self.send_error(user_id, "room_id is required").await;
        };

        let outcome = self.registry.join_room(user_id, &room_id).await;
        let now = self.clock.now();
        if outcome.created_room {
            self.record_room_created(room_id.clone(), now);
        }

        // 只通知加入之前已有的成员；重复加入时不会通知自己
        let notification = ServerFrame::UserJoined {
            user_id: user_id.clone(),
            room_id: room_id.clone(),
            timestamp: now,
        };
        for member in &outcome.prior_members {
            if member == user_id {
                continue;
            }
            self.dispatcher.send_to(member, notification.clone()).await;
        }

        let recent_messages = self.message_log.recent(&room_id).await;
        tracing::info!(user_id = %user_id, room_id = %room_id, "user joined room");
        self.dispatcher
            .send_to(
                user_id,
                ServerFrame::RoomJoined {
                    room_id,
                    recent_messages,
                    timestamp: now,
                },
            )
            .await;
    }

    async fn handle_leave_room(&self, user_id: &UserId, room_id: String) {
        let Ok(room_id) = RoomId::parse(room_id) else {
            return self.send_error(user_id, "room_id is required").await;
        };

        self.registry.leave_room(user_id, &room_id).await;
        let now = self.clock.now();
        self.dispatcher
            .broadcast(
                &room_id,
                ServerFrame::UserLeft {
                    user_id: user_id.clone(),
                    room_id: room_id.clone(),
                    timestamp: now,
                },
                Some(user_id),
            )
            .await;

        tracing::info!(user_id = %user_id, room_id = %room_id, "user left room");
        self.dispatcher
            .send_to(
                user_id,
                ServerFrame::RoomLeft {
                    room_id,
                    timestamp: now,
                },
            )
            .await;
    }

    /// 输入状态是尽力而为的：房间标识无效就直接丢弃，不回错误。
    async fn handle_typing(&self, user_id: &UserId, room_id: String, is_typing: bool) {
        let Ok(room_id) = RoomId::parse(room_id) else {
            return;
        };
        let frame = ServerFrame::TypingIndicator {
            user_id: user_id.clone(),
            room_id: room_id.clone(),
            is_typing,
            timestamp: self.clock.now(),
        };
        self.dispatcher.broadcast(&room_id, frame, Some(user_id)).await;
    }

    async fn send_error(&self, user_id: &UserId, message: impl Into<String>) {
        let frame = ServerFrame::Error {
            message: message.into(),
            timestamp: self.clock.now(),
        };
        self.dispatcher.send_to(user_id, frame).await;
    }

    /// 消息落库，发完即走。
    fn persist_message(&self, message: ChatMessage) {
        let repository = self.message_repository.clone();
        tokio::spawn(async move {
            if let Err(err) = repository.persist(&message).await {
                tracing::warn!(error = %err, "failed to persist message");
            }
        });
    }

    /// 房间创建记录，发完即走。
    fn record_room_created(&self, room_id: RoomId, created_at: Timestamp) {
        let repository = self.room_repository.clone();
        tokio::spawn(async move {
            if let Err(err) = repository.record_created(&room_id, created_at).await {
                tracing::warn!(room_id = %room_id, error = %err, "failed to record room creation");
            }
        });
    }
}
