//! Integration tests for the bounded task queue.

use std::collections::HashSet;
use std::time::Duration;

use dataproc_rs::error::Error;
use dataproc_rs::model::{Task, preload_tasks};
use dataproc_rs::queue;
use tokio::time::timeout;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn tasks_are_consumed_once() {
    let total = 100;
    let (mut producer, source) = queue::channel(total);
    for task in preload_tasks(total) {
        producer.enqueue(task).unwrap();
    }
    assert_eq!(producer.close(), total);

    let consumers: Vec<_> = (0..4)
        .map(|_| {
            let source = source.clone();
            tokio::spawn(async move {
                let mut seen = Vec::new();
                while let Some(task) = source.dequeue().await {
                    seen.push(task.id);
                    tokio::task::yield_now().await;
                }
                seen
            })
        })
        .collect();

    let mut all = HashSet::new();
    for consumer in consumers {
        for id in consumer.await.unwrap() {
            // Each task id should be observed at most once.
            assert!(all.insert(id), "task {id} delivered twice");
        }
    }
    assert_eq!(all.len(), total);
    assert_eq!(all, (1..=total as u64).collect::<HashSet<_>>());
}

#[tokio::test]
async fn drains_buffer_then_reports_empty_forever() {
    let (mut producer, source) = queue::channel(2);
    producer.enqueue(Task::new(1, "a", 10)).unwrap();
    producer.enqueue(Task::new(2, "b", 20)).unwrap();
    producer.close();

    assert_eq!(source.dequeue().await.map(|t| t.id), Some(1));
    assert_eq!(source.dequeue().await.map(|t| t.id), Some(2));
    assert!(source.dequeue().await.is_none());
    assert!(source.dequeue().await.is_none());
}

#[tokio::test]
async fn blocked_consumer_wakes_on_close() {
    let (producer, source) = queue::channel(1);

    let waiter = tokio::spawn(async move { source.dequeue().await });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!waiter.is_finished());

    producer.close();
    let got = timeout(Duration::from_secs(1), waiter)
        .await
        .expect("consumer still blocked after close")
        .unwrap();
    assert!(got.is_none());
}

#[tokio::test]
async fn blocked_consumer_wakes_on_enqueue() {
    let (mut producer, source) = queue::channel(1);

    let waiter = tokio::spawn(async move { source.dequeue().await.map(|t| t.id) });
    tokio::time::sleep(Duration::from_millis(20)).await;

    producer.enqueue(Task::new(99, "wake", 0)).unwrap();
    let got = timeout(Duration::from_secs(1), waiter)
        .await
        .expect("consumer not woken")
        .unwrap();
    assert_eq!(got, Some(99));
}

#[tokio::test]
async fn enqueue_beyond_capacity_fails() {
    let (mut producer, _source) = queue::channel(2);
    producer.enqueue(Task::new(1, "a", 0)).unwrap();
    producer.enqueue(Task::new(2, "b", 0)).unwrap();

    let err = producer.enqueue(Task::new(3, "c", 0)).unwrap_err();
    assert!(matches!(
        err,
        Error::QueueFull {
            capacity: 2,
            task_id: 3
        }
    ));
    assert_eq!(producer.enqueued(), 2);
}

#[tokio::test]
async fn zero_capacity_rounds_up_to_one() {
    let (mut producer, source) = queue::channel(0);
    assert_eq!(producer.capacity(), 1);
    producer.enqueue(Task::new(1, "only", 0)).unwrap();
    producer.close();
    assert!(source.dequeue().await.is_some());
    assert!(source.dequeue().await.is_none());
}

#[tokio::test]
async fn enqueue_without_consumers_fails() {
    let (mut producer, source) = queue::channel(4);
    drop(source);
    let err = producer.enqueue(Task::new(5, "orphan", 0)).unwrap_err();
    assert!(matches!(err, Error::QueueClosed { task_id: 5 }));
}
