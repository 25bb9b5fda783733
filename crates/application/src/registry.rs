use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;
use uuid::Uuid;

use domain::{RoomId, UserId};

use crate::connection::ConnectionHandle;

/// `join_room` 的结果。
#[derive(Debug)]
pub struct JoinOutcome {
    /// 加入之前房间已有的成员集合，用于通知。
    pub prior_members: HashSet<UserId>,
    /// 本次加入是否隐式创建了房间。
    pub created_room: bool,
}

#[derive(Default)]
struct RegistryInner {
    connections: HashMap<UserId, ConnectionHandle>,
    room_members: HashMap<RoomId, HashSet<UserId>>,
    user_rooms: HashMap<UserId, HashSet<RoomId>>,
}

impl RegistryInner {
    fn remove_user(&mut self, user_id: &UserId) {
        self.connections.remove(user_id);
        for members in self.room_members.values_mut() {
            members.remove(user_id);
        }
        self.user_rooms.remove(user_id);
    }
}

/// 进程内唯一的连接与房间成员表。
///
/// 三张映射放在同一把锁后面：注册、注销、加入、离开在每个键上
/// 可线性化，双向索引（用户在房间成员集里 ⇔ 房间在用户房间集里）
/// 不会出现只改了一半的中间状态。读操作返回快照，广播扇出不持锁。
#[derive(Default)]
pub struct ConnectionRegistry {
    inner: RwLock<RegistryInner>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 安装或覆盖该用户的连接，返回被顶替的旧句柄。
    ///
    /// 覆盖本身不报错也不关闭旧传输，旧句柄交给调用方处置。
    pub async fn register(
        &self,
        user_id: UserId,
        handle: ConnectionHandle,
    ) -> Option<ConnectionHandle> {
        let mut inner = self.inner.write().await;
        inner.connections.insert(user_id, handle)
    }

    /// 移除连接，并把该用户从所有房间的成员集中清掉。
    /// 对不存在的用户是空操作。
    pub async fn unregister(&self, user_id: &UserId) {
        let mut inner = self.inner.write().await;
        inner.remove_user(user_id);
    }

    /// 带身份校验的注销：仅当登记在册的连接正是 `connection_id`
    /// 时才移除。被顶替的旧会话在收尾时不能误删它的接替者。
    pub async fn unregister_connection(&self, user_id: &UserId, connection_id: Uuid) -> bool {
        let mut inner = self.inner.write().await;
        let is_current = inner
            .connections
            .get(user_id)
            .is_some_and(|handle| handle.connection_id() == connection_id);
        if is_current {
            inner.remove_user(user_id);
        }
        is_current
    }

    /// 把用户加进房间成员集，房间不存在则创建。重复加入是幂等的。
    pub async fn join_room(&self, user_id: &UserId, room_id: &RoomId) -> JoinOutcome {
        let mut inner = self.inner.write().await;
        let created_room = !inner.room_members.contains_key(room_id);
        let members = inner.room_members.entry(room_id.clone()).or_default();
        let prior_members = members.clone();
        members.insert(user_id.clone());
        inner
            .user_rooms
            .entry(user_id.clone())
            .or_default()
            .insert(room_id.clone());
        JoinOutcome {
            prior_members,
            created_room,
        }
    }

    /// 把用户移出房间成员集。空出来的房间保留，不做回收。
    pub async fn leave_room(&self, user_id: &UserId, room_id: &RoomId) {
        let mut inner = self.inner.write().await;
        if let Some(members) = inner.room_members.get_mut(room_id) {
            members.remove(user_id);
        }
        if let Some(rooms) = inner.user_rooms.get_mut(user_id) {
            rooms.remove(room_id);
        }
    }

    /// 房间当前成员集的快照，未知房间返回空集。
    pub async fn members_of(&self, room_id: &RoomId) -> HashSet<UserId> {
        let inner = self.inner.read().await;
        inner.room_members.get(room_id).cloned().unwrap_or_default()
    }

    /// 用户当前所在房间集的快照。
    pub async fn rooms_of(&self, user_id: &UserId) -> HashSet<RoomId> {
        let inner = self.inner.read().await;
        inner.user_rooms.get(user_id).cloned().unwrap_or_default()
    }

    pub async fn handle_of(&self, user_id: &UserId) -> Option<ConnectionHandle> {
        let inner = self.inner.read().await;
        inner.connections.get(user_id).cloned()
    }

    /// 所有活跃连接用户的快照。
    pub async fn connected_users(&self) -> Vec<UserId> {
        let inner = self.inner.read().await;
        inner.connections.keys().cloned().collect()
    }

    /// 当前活跃连接数，供健康检查上报。
    pub async fn connection_count(&self) -> usize {
        self.inner.read().await.connections.len()
    }
}
