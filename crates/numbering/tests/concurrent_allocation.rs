//! Concurrency tests for sequence allocation.
//!
//! Verifies:
//! - N allocations from M concurrent tasks yield exactly {1..=N}
//! - Different sequences run independently, each starting at 1

use std::collections::BTreeSet;
use std::sync::Arc;

use erha_numbering::{InMemorySequenceStore, SequenceGenerator};

const TASKS: usize = 16;
const PER_TASK: usize = 50;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_allocations_are_unique_and_gapless() {
    let generator = Arc::new(SequenceGenerator::new(InMemorySequenceStore::new()));

    let mut handles = Vec::with_capacity(TASKS);
    for _ in 0..TASKS {
        let generator = generator.clone();
        handles.push(tokio::spawn(async move {
            let mut values = Vec::with_capacity(PER_TASK);
            for _ in 0..PER_TASK {
                values.push(generator.next_value("QUOTE").await.unwrap());
            }
            values
        }));
    }

    let mut all = Vec::with_capacity(TASKS * PER_TASK);
    for handle in handles {
        let values = handle.await.unwrap();
        // Each caller observes its own values in increasing order.
        assert!(values.windows(2).all(|w| w[0] < w[1]));
        all.extend(values);
    }

    let unique: BTreeSet<i64> = all.iter().copied().collect();
    assert_eq!(unique.len(), all.len(), "duplicate value issued");
    let expected: BTreeSet<i64> = (1..=(TASKS * PER_TASK) as i64).collect();
    assert_eq!(unique, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn independent_sequences_each_start_at_one() {
    let generator = Arc::new(SequenceGenerator::new(InMemorySequenceStore::new()));

    let spawn_run = |name: &'static str| {
        let generator = generator.clone();
        tokio::spawn(async move {
            let mut values = Vec::with_capacity(PER_TASK);
            for _ in 0..PER_TASK {
                values.push(generator.next_value(name).await.unwrap());
            }
            values
        })
    };

    let quotes = spawn_run("QUOTE");
    let jobs = spawn_run("JOB");

    let expected: Vec<i64> = (1..=PER_TASK as i64).collect();
    assert_eq!(quotes.await.unwrap(), expected);
    assert_eq!(jobs.await.unwrap(), expected);
}
