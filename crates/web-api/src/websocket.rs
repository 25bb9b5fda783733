//! WebSocket 传输层
//!
//! 负责连接升级和会话生命周期（Connecting → Open → Closed）：
//! 入站帧交给会话协议，出站帧从有界队列泵到套接字。

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use application::ConnectionHandle;
use domain::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// 连接升级入口。路径里的用户标识必须在用户目录里存在。
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let user_id = UserId::parse(user_id)?;
    if !state.user_repository.user_exists(&user_id).await {
        tracing::warn!(user_id = %user_id, "websocket upgrade refused: unknown user");
        return Err(ApiError::forbidden("unknown user"));
    }
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user_id)))
}

/// 单个连接的主循环。
async fn handle_socket(socket: WebSocket, state: AppState, user_id: UserId) {
    let (mut sink, mut stream) = socket.split();

    let (tx, mut rx) = mpsc::channel(state.websocket.outbound_capacity);
    let handle = ConnectionHandle::new(tx);
    let connection_id = handle.connection_id();

    // 进入 Open：登记连接并发送欢迎帧
    state
        .chat_service
        .connect(user_id.clone(), handle.clone())
        .await;

    // 发送任务：把有界队列里的帧写到套接字；
    // 被同名新连接顶替时由关闭信号唤醒退出
    let mut send_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = handle.closed() => break,
                frame = rx.recv() => {
                    let Some(frame) = frame else { break };
                    let payload = match serde_json::to_string(&frame) {
                        Ok(json) => json,
                        Err(err) => {
                            tracing::warn!(error = %err, "failed to serialize outbound frame");
                            continue;
                        }
                    };
                    if sink.send(WsMessage::Text(payload.into())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // 接收任务：逐帧读取，交给会话协议
    let recv_state = state.clone();
    let recv_user_id = user_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(message) = stream.next().await {
            match message {
                Ok(WsMessage::Text(text)) => {
                    recv_state
                        .chat_service
                        .handle_frame(&recv_user_id, text.as_str())
                        .await;
                }
                Ok(WsMessage::Close(_)) => break,
                // Ping/Pong 由 axum 自动应答，二进制帧直接忽略
                Ok(_) => {}
                Err(err) => {
                    tracing::debug!(user_id = %recv_user_id, error = %err, "websocket read error");
                    break;
                }
            }
        }
    });

    // 任一方向结束即视为连接断开，另一个方向同步收掉
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    // 进入 Closed：恰好一次的注销（若已被失败路径摘除则为空操作）
    state.chat_service.disconnect(&user_id, connection_id).await;
}
