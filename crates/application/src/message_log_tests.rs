//! 消息日志单元测试

use chrono::{TimeZone, Utc};

use domain::{RoomId, Timestamp, UserId};

use crate::message_log::MessageLog;

fn at() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn room(name: &str) -> RoomId {
    RoomId::parse(name).unwrap()
}

fn sender() -> UserId {
    UserId::parse("alice").unwrap()
}

#[tokio::test]
async fn sequences_start_at_one_without_gaps() {
    let log = MessageLog::default();
    let general = room("general");
    for expected in 1..=5u64 {
        let message = log
            .append(general.clone(), sender(), format!("m{expected}"), at())
            .await;
        assert_eq!(message.id, expected);
    }
    let ids: Vec<u64> = log.recent(&general).await.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn retains_only_most_recent_twenty() {
    let log = MessageLog::default();
    let general = room("general");
    for n in 1..=25u64 {
        log.append(general.clone(), sender(), format!("m{n}"), at())
            .await;
    }

    let recent = log.recent(&general).await;
    assert_eq!(recent.len(), 20);
    // 25 次追加之后保留第 6 到第 25 条，最早的在前
    assert_eq!(recent.first().unwrap().id, 6);
    assert_eq!(recent.last().unwrap().id, 25);
    assert_eq!(recent.first().unwrap().content, "m6");
}

#[tokio::test]
async fn eviction_does_not_reset_sequence() {
    let log = MessageLog::new(3);
    let general = room("general");
    for n in 1..=10u64 {
        log.append(general.clone(), sender(), format!("m{n}"), at())
            .await;
    }
    let message = log.append(general.clone(), sender(), "next".into(), at()).await;
    assert_eq!(message.id, 11);
}

#[tokio::test]
async fn rooms_are_independent() {
    let log = MessageLog::default();
    let general = room("general");
    let random = room("random");

    log.append(general.clone(), sender(), "a".into(), at()).await;
    log.append(general.clone(), sender(), "b".into(), at()).await;
    let first_in_random = log.append(random.clone(), sender(), "c".into(), at()).await;

    assert_eq!(first_in_random.id, 1);
    assert_eq!(log.recent(&general).await.len(), 2);
    assert_eq!(log.recent(&random).await.len(), 1);
}

#[tokio::test]
async fn unknown_room_has_empty_history() {
    let log = MessageLog::default();
    assert!(log.recent(&room("nowhere")).await.is_empty());
}
