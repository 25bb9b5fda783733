//! 连接注册表单元测试
//!
//! 覆盖单连接不变式、双向成员索引一致性和带身份校验的注销。

use tokio::sync::mpsc;

use domain::{RoomId, ServerFrame, UserId};

use crate::connection::ConnectionHandle;
use crate::registry::ConnectionRegistry;

fn user(name: &str) -> UserId {
    UserId::parse(name).unwrap()
}

fn room(name: &str) -> RoomId {
    RoomId::parse(name).unwrap()
}

fn handle() -> (ConnectionHandle, mpsc::Receiver<ServerFrame>) {
    let (tx, rx) = mpsc::channel(8);
    (ConnectionHandle::new(tx), rx)
}

#[tokio::test]
async fn at_most_one_connection_per_user() {
    let registry = ConnectionRegistry::new();
    let alice = user("alice");
    let (first, _rx1) = handle();
    let (second, _rx2) = handle();
    let first_id = first.connection_id();
    let second_id = second.connection_id();

    assert!(registry.register(alice.clone(), first).await.is_none());

    // 覆盖注册：旧句柄被返回，表里只剩新句柄
    let displaced = registry.register(alice.clone(), second).await.unwrap();
    assert_eq!(displaced.connection_id(), first_id);
    assert_eq!(registry.connection_count().await, 1);
    assert_eq!(
        registry.handle_of(&alice).await.unwrap().connection_id(),
        second_id
    );
}

#[tokio::test]
async fn unregister_purges_all_memberships() {
    let registry = ConnectionRegistry::new();
    let alice = user("alice");
    let (conn, _rx) = handle();
    registry.register(alice.clone(), conn).await;
    registry.join_room(&alice, &room("general")).await;
    registry.join_room(&alice, &room("random")).await;

    registry.unregister(&alice).await;

    assert!(registry.handle_of(&alice).await.is_none());
    assert!(registry.members_of(&room("general")).await.is_empty());
    assert!(registry.members_of(&room("random")).await.is_empty());
    assert!(registry.rooms_of(&alice).await.is_empty());
}

#[tokio::test]
async fn unregister_unknown_user_is_noop() {
    let registry = ConnectionRegistry::new();
    registry.unregister(&user("ghost")).await;
    assert_eq!(registry.connection_count().await, 0);
}

#[tokio::test]
async fn stale_session_cannot_evict_its_successor() {
    let registry = ConnectionRegistry::new();
    let alice = user("alice");
    let (first, _rx1) = handle();
    let (second, _rx2) = handle();
    let first_id = first.connection_id();
    let second_id = second.connection_id();

    registry.register(alice.clone(), first).await;
    registry.register(alice.clone(), second).await;

    // 被顶替的旧会话收尾：身份不匹配，什么都不动
    assert!(!registry.unregister_connection(&alice, first_id).await);
    assert_eq!(registry.connection_count().await, 1);

    // 接替者自己的收尾正常生效
    assert!(registry.unregister_connection(&alice, second_id).await);
    assert!(registry.handle_of(&alice).await.is_none());
}

#[tokio::test]
async fn join_and_leave_keep_bidirectional_index() {
    let registry = ConnectionRegistry::new();
    let alice = user("alice");
    let bob = user("bob");
    let general = room("general");

    registry.join_room(&alice, &general).await;
    registry.join_room(&bob, &general).await;

    assert!(registry.members_of(&general).await.contains(&alice));
    assert!(registry.rooms_of(&alice).await.contains(&general));

    registry.leave_room(&alice, &general).await;

    assert!(!registry.members_of(&general).await.contains(&alice));
    assert!(!registry.rooms_of(&alice).await.contains(&general));
    assert!(registry.members_of(&general).await.contains(&bob));
}

#[tokio::test]
async fn join_reports_prior_members_and_creation() {
    let registry = ConnectionRegistry::new();
    let alice = user("alice");
    let bob = user("bob");
    let general = room("general");

    let outcome = registry.join_room(&alice, &general).await;
    assert!(outcome.created_room);
    assert!(outcome.prior_members.is_empty());

    let outcome = registry.join_room(&bob, &general).await;
    assert!(!outcome.created_room);
    assert_eq!(outcome.prior_members.len(), 1);
    assert!(outcome.prior_members.contains(&alice));

    // 重复加入是幂等的
    let outcome = registry.join_room(&bob, &general).await;
    assert!(registry.members_of(&general).await.len() == 2);
    assert!(outcome.prior_members.contains(&bob));
}

#[tokio::test]
async fn emptied_room_is_retained() {
    let registry = ConnectionRegistry::new();
    let alice = user("alice");
    let general = room("general");

    registry.join_room(&alice, &general).await;
    registry.leave_room(&alice, &general).await;
    assert!(registry.members_of(&general).await.is_empty());

    // 房间没有被回收：再次加入不会重新创建
    let outcome = registry.join_room(&alice, &general).await;
    assert!(!outcome.created_room);
}
