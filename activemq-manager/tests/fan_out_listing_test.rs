// Copyright 2024 The ActiveMQ Manager Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Concurrency and failure handling of listings.

mod common;

use std::time::Duration;

use activemq_manager::core::admin::ClientBuilder;
use activemq_manager::core::concurrent::FailurePolicy;
use activemq_manager::core::concurrent::FanOutState;
use activemq_manager::core::resource::ResourceKind;
use activemq_manager::core::ActiveMQError;
use common::FakeBroker;
use futures::StreamExt;

fn many_queues(count: usize) -> FakeBroker {
    (0..count).fold(FakeBroker::new().with_delay(Duration::from_millis(20)), |broker, i| {
        broker.with_queue(&format!("queue-{i:02}"), i as u64)
    })
}

#[tokio::test]
async fn listing_respects_worker_bound() {
    let (client, broker) = common::client_with(ClientBuilder::new().workers(4), many_queues(40));

    let queues = client.broker().queues().await.unwrap().collect_all().await.unwrap();
    assert_eq!(queues.len(), 40);
    assert!(broker.peak() <= 4, "peak concurrency {} exceeds 4 workers", broker.peak());
    assert!(broker.peak() > 1);
    assert_eq!(broker.in_flight(), 0);
    // one search plus one read per queue
    assert_eq!(broker.calls(), 41);
}

#[tokio::test]
async fn single_worker_runs_sequentially() {
    let (client, broker) = common::client_with(ClientBuilder::new().workers(1), many_queues(5));
    let queues = client.fetch_all(ResourceKind::Queue).await.unwrap().collect_all().await.unwrap();
    assert_eq!(queues.len(), 5);
    assert_eq!(broker.peak(), 1);
}

#[tokio::test]
async fn fail_fast_surfaces_first_error() {
    let (client, _) = common::client(
        FakeBroker::new()
            .with_queue("q1", 1)
            .with_queue("q2", 2)
            .with_queue("q3", 3)
            .failing("q2"),
    );

    let err = client
        .fetch_all(ResourceKind::Queue)
        .await
        .unwrap()
        .collect_all()
        .await
        .unwrap_err();
    match err {
        ActiveMQError::RemoteOperation(remote) => assert_eq!(remote.status, 500),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn best_effort_reports_shortfall() {
    let (client, _) = common::client_with(
        ClientBuilder::new().workers(2).failure_policy(FailurePolicy::BestEffort),
        FakeBroker::new()
            .with_queue("q1", 1)
            .with_queue("q2", 2)
            .with_queue("q3", 3)
            .failing("q2"),
    );

    let mut stream = client.broker().queues().await.unwrap();
    let mut names = Vec::new();
    while let Some(queue) = stream.next().await {
        names.push(queue.unwrap().name().to_string());
    }
    names.sort();
    assert_eq!(names, vec!["q1", "q3"]);

    let summary = stream.summary().unwrap();
    assert_eq!(summary.submitted, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(stream.state(), FanOutState::Closed);
}

#[tokio::test]
async fn deadline_aborts_slow_listing() {
    let (client, _) = common::client_with(
        ClientBuilder::new().workers(1).fan_out_deadline_ms(50),
        many_queues(20),
    );
    let err = client
        .fetch_all(ResourceKind::Queue)
        .await
        .unwrap()
        .collect_all()
        .await
        .unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test]
async fn early_close_stops_outstanding_fetches() {
    let (client, broker) = common::client_with(ClientBuilder::new().workers(3), many_queues(30));
    let mut stream = client.broker().queues().await.unwrap();
    assert!(stream.next().await.unwrap().is_ok());
    stream.close().await;
    assert_eq!(stream.state(), FanOutState::Closed);
    assert!(broker.calls() < 31);
}
