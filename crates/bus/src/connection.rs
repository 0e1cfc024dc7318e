// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-connection outbound queue and backpressure policy.
//!
//! Mirrors the daemon's WAL-backed event bus: a buffer guarded by a plain
//! mutex plus a non-blocking wake channel, so enqueueing from many
//! publisher tasks never blocks on the connection's writer.

use crate::protocol::{is_critical, ServerFrame};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    Enqueued,
    DroppedOldest,
    /// No non-critical frame could be evicted to make room; the connection
    /// is now force-closed and `OutboundReceiver::recv` will drain whatever
    /// remains, then return `None`.
    Closed,
}

#[derive(Clone)]
pub struct OutboundQueue {
    inner: Arc<Mutex<VecDeque<ServerFrame>>>,
    wake_tx: mpsc::Sender<()>,
    force_closed: Arc<AtomicBool>,
    capacity: usize,
}

pub struct OutboundReceiver {
    inner: Arc<Mutex<VecDeque<ServerFrame>>>,
    wake_rx: mpsc::Receiver<()>,
    force_closed: Arc<AtomicBool>,
}

impl OutboundQueue {
    pub fn new(capacity: usize) -> (Self, OutboundReceiver) {
        let inner = Arc::new(Mutex::new(VecDeque::with_capacity(capacity)));
        let (wake_tx, wake_rx) = mpsc::channel(1);
        let force_closed = Arc::new(AtomicBool::new(false));
        (
            Self { inner: Arc::clone(&inner), wake_tx, force_closed: Arc::clone(&force_closed), capacity },
            OutboundReceiver { inner, wake_rx, force_closed },
        )
    }

    /// Enqueue a frame, applying the bounded-queue backpressure policy: on
    /// overflow, drop the oldest non-critical frame and replace the
    /// incoming non-critical frame with a `Backpressure` marker (critical
    /// frames are enqueued as-is). If every queued frame is critical and
    /// none can be evicted, the connection is force-closed and the frame
    /// is not delivered.
    pub fn enqueue(&self, frame: ServerFrame) -> EnqueueOutcome {
        if self.force_closed.load(Ordering::Acquire) {
            return EnqueueOutcome::Closed;
        }

        let critical = is_critical(&frame);
        let mut queue = self.inner.lock();

        if queue.len() < self.capacity {
            queue.push_back(frame);
            drop(queue);
            let _ = self.wake_tx.try_send(());
            return EnqueueOutcome::Enqueued;
        }

        let Some(evict_at) = queue.iter().position(|queued| !is_critical(queued)) else {
            drop(queue);
            self.force_closed.store(true, Ordering::Release);
            let _ = self.wake_tx.try_send(());
            return EnqueueOutcome::Closed;
        };
        queue.remove(evict_at);
        queue.push_back(if critical { frame } else { ServerFrame::Backpressure });
        drop(queue);
        let _ = self.wake_tx.try_send(());
        EnqueueOutcome::DroppedOldest
    }
}

impl OutboundReceiver {
    /// Wait for and return the next frame. Returns `None` once the queue is
    /// drained and either every `OutboundQueue` handle has been dropped or
    /// the connection was force-closed by the backpressure policy.
    pub async fn recv(&mut self) -> Option<ServerFrame> {
        loop {
            if let Some(frame) = self.inner.lock().pop_front() {
                return Some(frame);
            }
            if self.force_closed.load(Ordering::Acquire) {
                return None;
            }
            self.wake_rx.recv().await?;
        }
    }

    /// Whether this connection was closed by the backpressure policy
    /// (as opposed to the `OutboundQueue` simply being dropped).
    pub fn is_force_closed(&self) -> bool {
        self.force_closed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
