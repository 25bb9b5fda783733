use std::sync::Arc;

use domain::{RoomId, ServerFrame, UserId};

use crate::registry::ConnectionRegistry;

/// 面向注册表执行单发与群发的调度器。
///
/// 发送失败一律按连接死亡处理：把该连接从注册表摘除、吞掉错误。
/// 一次失败既不会传播给调用方，也不会中断对其余成员的投递。
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ConnectionRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// 给单个用户发一帧；没有连接则忽略。
    pub async fn send_to(&self, user_id: &UserId, frame: ServerFrame) {
        let Some(handle) = self.registry.handle_of(user_id).await else {
            return;
        };
        if let Err(err) = handle.try_send(frame) {
            tracing::warn!(user_id = %user_id, error = %err, "send failed, dropping connection");
            // 连接按死亡处理：收掉传输并从注册表摘除
            handle.close();
            self.registry.unregister(user_id).await;
        }
    }

    /// 向房间成员广播，可排除一个用户。
    ///
    /// 成员集取调用时点的快照，发送在锁外逐个进行，
    /// 广播期间的成员变动不影响本次扇出。
    pub async fn broadcast(&self, room_id: &RoomId, frame: ServerFrame, exclude: Option<&UserId>) {
        let members = self.registry.members_of(room_id).await;
        for member in members {
            if Some(&member) == exclude {
                continue;
            }
            self.send_to(&member, frame.clone()).await;
        }
    }

    /// 向所有活跃连接广播，摘除策略与单发一致。
    pub async fn broadcast_all(&self, frame: ServerFrame) {
        for user_id in self.registry.connected_users().await {
            self.send_to(&user_id, frame.clone()).await;
        }
    }
}
