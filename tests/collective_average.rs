mod common;

use std::{num::NonZeroUsize, thread};

use dist_train_utils::{LocalGroup, ProcessGroup, ReduceOp, UtilErr, all_reduce_mean, average};
use ndarray::{Array1, array};

use common::init_logger;

fn local_group(n: usize) -> Vec<LocalGroup> {
    LocalGroup::new(NonZeroUsize::new(n).unwrap())
}

#[test]
fn every_worker_sees_the_mean() {
    init_logger();
    let handles = local_group(4);

    let results: Vec<_> = thread::scope(|s| {
        let joins: Vec<_> = handles
            .iter()
            .map(|g| {
                s.spawn(move || {
                    let loss = array![g.rank() as f32 + 1.0];
                    average(g, &loss)
                })
            })
            .collect();

        joins.into_iter().map(|j| j.join().unwrap()).collect()
    });

    for res in results {
        assert_eq!(res.unwrap(), array![2.5]);
    }
}

#[test]
fn gradients_are_averaged_over_many_steps() {
    init_logger();
    let handles = local_group(3);

    let results: Vec<_> = thread::scope(|s| {
        let joins: Vec<_> = handles
            .iter()
            .map(|g| {
                s.spawn(move || {
                    let mut weights = Array1::<f32>::zeros(4);
                    for step in 0..10 {
                        let grad = Array1::from_elem(4, (g.rank() + step) as f32);
                        let avg = all_reduce_mean(g, &grad, ReduceOp::Sum, g.world_size()).unwrap();
                        weights -= &avg;
                    }
                    weights
                })
            })
            .collect();

        joins.into_iter().map(|j| j.join().unwrap()).collect()
    });

    // mean gradient at step s is s + 1, summed over 10 steps gives 55.
    for weights in results {
        assert_eq!(weights, Array1::from_elem(4, -55.0));
    }
}

#[test]
fn boxed_groups_can_be_used_as_handles() {
    init_logger();
    let handles: Vec<Box<dyn ProcessGroup + Send + Sync>> = local_group(2)
        .into_iter()
        .map(|g| Box::new(g) as Box<dyn ProcessGroup + Send + Sync>)
        .collect();

    let results: Vec<_> = thread::scope(|s| {
        let joins: Vec<_> = handles
            .iter()
            .map(|g| {
                s.spawn(move || {
                    let metric = array![[g.rank() as f32, 10.0]];
                    all_reduce_mean(g, &metric, ReduceOp::Min, 1)
                })
            })
            .collect();

        joins.into_iter().map(|j| j.join().unwrap()).collect()
    });

    for res in results {
        assert_eq!(res.unwrap(), array![[0.0, 10.0]]);
    }
}

#[test]
fn mismatched_shapes_fail_on_every_worker() {
    init_logger();
    let handles = local_group(2);

    let results: Vec<_> = thread::scope(|s| {
        let joins: Vec<_> = handles
            .iter()
            .map(|g| {
                s.spawn(move || {
                    let value = Array1::<f32>::ones(g.rank() + 2);
                    average(g, &value)
                })
            })
            .collect();

        joins.into_iter().map(|j| j.join().unwrap()).collect()
    });

    for res in results {
        assert!(matches!(res, Err(UtilErr::ShapeMismatch { .. })));
    }
}
