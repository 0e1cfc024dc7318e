// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn stats(player_id: &str) -> ServerFrame {
    ServerFrame::StatsUpdate { player_id: player_id.to_string() }
}

fn security_notification() -> ServerFrame {
    ServerFrame::Notification {
        title: "alert".into(),
        message: "hi".into(),
        level: crate::protocol::NotificationLevel::Warning,
    }
}

#[tokio::test]
async fn enqueue_under_capacity_succeeds_in_order() {
    let (queue, mut rx) = OutboundQueue::new(4);
    assert_eq!(queue.enqueue(stats("p1")), EnqueueOutcome::Enqueued);
    assert_eq!(queue.enqueue(stats("p2")), EnqueueOutcome::Enqueued);

    assert!(matches!(rx.recv().await, Some(ServerFrame::StatsUpdate { player_id }) if player_id == "p1"));
    assert!(matches!(rx.recv().await, Some(ServerFrame::StatsUpdate { player_id }) if player_id == "p2"));
}

#[tokio::test]
async fn overflow_drops_oldest_non_critical_and_enqueues_backpressure_marker() {
    let (queue, mut rx) = OutboundQueue::new(1);
    assert_eq!(queue.enqueue(stats("p1")), EnqueueOutcome::Enqueued);
    assert_eq!(queue.enqueue(stats("p2")), EnqueueOutcome::DroppedOldest);

    assert!(matches!(rx.recv().await, Some(ServerFrame::Backpressure)));
}

#[tokio::test]
async fn critical_frame_is_never_evicted_by_a_later_non_critical_frame() {
    let (queue, mut rx) = OutboundQueue::new(1);
    assert_eq!(queue.enqueue(security_notification()), EnqueueOutcome::Enqueued);
    // Queue full of a single critical frame; a non-critical arrival has nothing to evict.
    assert_eq!(queue.enqueue(stats("p1")), EnqueueOutcome::Closed);

    assert!(matches!(rx.recv().await, Some(ServerFrame::Notification { .. })));
}

#[tokio::test]
async fn critical_frame_evicts_a_queued_non_critical_frame_to_make_room() {
    let (queue, mut rx) = OutboundQueue::new(1);
    assert_eq!(queue.enqueue(stats("p1")), EnqueueOutcome::Enqueued);
    assert_eq!(queue.enqueue(security_notification()), EnqueueOutcome::DroppedOldest);

    assert!(matches!(rx.recv().await, Some(ServerFrame::Notification { .. })));
}
