use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, Notify};
use uuid::Uuid;

use domain::ServerFrame;

/// 发送失败的原因。
///
/// 队列打满和通道关闭都按连接死亡处理，由调度器负责摘除。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("outbound queue full")]
    QueueFull,
    #[error("outbound channel closed")]
    Closed,
}

/// 单个活跃连接的能力句柄。
///
/// 由有界出站队列加关闭信号构成，注册表只保存句柄，
/// 不感知底下具体的传输类型。`connection_id` 用来区分
/// 同名用户被顶替的旧会话和接替它的新会话。
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    connection_id: Uuid,
    outbound: mpsc::Sender<ServerFrame>,
    shutdown: Arc<Notify>,
}

impl ConnectionHandle {
    pub fn new(outbound: mpsc::Sender<ServerFrame>) -> Self {
        Self {
            connection_id: Uuid::new_v4(),
            outbound,
            shutdown: Arc::new(Notify::new()),
        }
    }

    pub fn connection_id(&self) -> Uuid {
        self.connection_id
    }

    /// 非阻塞入队一帧。慢速或已断开的对端不会拖住调用方。
    pub fn try_send(&self, frame: ServerFrame) -> Result<(), SendError> {
        self.outbound.try_send(frame).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => SendError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => SendError::Closed,
        })
    }

    /// 触发关闭信号，唤醒传输层的发送任务退出。
    pub fn close(&self) {
        self.shutdown.notify_one();
    }

    /// 等待关闭信号。信号先于等待到达时也不会丢失。
    pub async fn closed(&self) {
        self.shutdown.notified().await;
    }
}
