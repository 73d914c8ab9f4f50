//! Parallel execution tests
//!
//! These tests verify partitioned execution on the context's rayon pool.

mod common;

use common::*;
use gamestats_core::{BasicPartition, FlowContext, JobError, LocalScheduler, Partition, Task};
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn test_parallel_collect() {
    let context = create_test_context_with("parallel-collect", 4, 4);
    let data: Vec<i32> = (1..=10).collect();
    let collection = context.parallelize(&data);

    let tasks = collection
        .partitions()
        .into_iter()
        .map(|partition| {
            let collection = &collection;
            Task::new(partition, move |p: &dyn Partition| {
                Ok(collection.compute(p)?.to_vec())
            })
        })
        .collect();

    let result = context.scheduler().execute_and_collect(tasks).unwrap();
    assert_eq!(result, data);
    context.stop();
}

#[test]
fn test_parallel_sum_uses_every_partition() {
    let context = create_test_context_with("parallel-sum", 3, 3);
    let data: Vec<u64> = (1..=100).collect();
    let collection = context.parallelize(data);
    let visited = AtomicUsize::new(0);

    let tasks = collection
        .partitions()
        .into_iter()
        .map(|partition| {
            let collection = &collection;
            let visited = &visited;
            Task::new(partition, move |p: &dyn Partition| {
                visited.fetch_add(1, Ordering::SeqCst);
                Ok(collection.compute(p)?.iter().sum::<u64>())
            })
        })
        .collect();

    let partials = context.scheduler().execute_tasks(tasks).unwrap();
    assert_eq!(partials.len(), 3);
    assert_eq!(partials.iter().sum::<u64>(), 5050);
    assert_eq!(visited.load(Ordering::SeqCst), 3);
    context.stop();
}

#[test]
fn test_empty_partitions() {
    let context = create_test_context_with("parallel-empty", 2, 8);
    let data = vec![1, 2, 3];
    let collection = context.parallelize(&data);

    let sizes: Vec<usize> = collection
        .partitions()
        .iter()
        .map(|p| collection.compute(p).unwrap().len())
        .collect();
    assert_eq!(sizes.len(), 8);
    assert_eq!(sizes.iter().sum::<usize>(), 3);
    context.stop();
}

#[test]
fn test_failed_task_fails_job() {
    let scheduler = LocalScheduler::new(2).unwrap();
    let tasks: Vec<Task<'_, u32>> = (0..4)
        .map(|i| {
            Task::new(BasicPartition::new(i), move |p: &dyn Partition| {
                if p.index() == 3 {
                    Err(JobError::InvalidPartition(p.index()))
                } else {
                    Ok(p.index() as u32)
                }
            })
        })
        .collect();

    let err = scheduler.execute_tasks(tasks).unwrap_err();
    assert!(matches!(err, JobError::TaskFailed { partition: 3, .. }));
}

#[test]
fn test_run_stops_context() {
    let result = FlowContext::run("parallel-run", 2, 2, |context| {
        Ok(context.parallelize(vec![1u8, 2, 3]).len())
    })
    .unwrap();
    assert_eq!(result, 3);
}
