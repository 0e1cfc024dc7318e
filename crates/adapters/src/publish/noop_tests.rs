// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn publish_always_succeeds_and_does_nothing() {
    let publisher = NoOpPublisher::new();
    let result = publisher.publish(&Channel::Global, &Event::Backpressure).await;
    assert!(result.is_ok());
}
