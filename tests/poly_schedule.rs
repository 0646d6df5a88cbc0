mod common;

use std::num::NonZeroUsize;

use dist_train_utils::{ParamGroups, PolyLrConfig, PolyLrScheduler, TrainingConfig};

use common::init_logger;

/// A minimal optimizer exposing one learning rate per parameter group.
struct Sgd {
    groups: Vec<(Vec<f32>, f32)>,
}

impl ParamGroups for Sgd {
    fn num_groups(&self) -> usize {
        self.groups.len()
    }

    fn learning_rate(&self, group: usize) -> f32 {
        self.groups[group].1
    }

    fn set_learning_rate(&mut self, group: usize, lr: f32) {
        self.groups[group].1 = lr;
    }
}

#[test]
fn linear_schedule_boundaries_and_monotonicity() {
    init_logger();
    let mut lrs: Vec<f32> = vec![0.1];
    let mut sched =
        PolyLrScheduler::new(&mut lrs, 1., NonZeroUsize::new(100).unwrap(), None).unwrap();

    assert_eq!(lrs[0], 0.1);

    let mut prev = lrs[0];
    for _ in 0..100 {
        sched.step(&mut lrs).unwrap();
        assert!(lrs[0] < prev);
        prev = lrs[0];
    }

    assert_eq!(sched.last_iter(), 100);
    assert_eq!(lrs[0], 0.0);
}

#[test]
fn drives_an_external_optimizer() {
    init_logger();
    let mut sgd = Sgd {
        groups: vec![(vec![0.0; 3], 0.4), (vec![0.0; 2], 0.04)],
    };

    let cfg = PolyLrConfig {
        power: 0.9,
        total_iter: NonZeroUsize::new(10).unwrap(),
        last_iter: None,
    };
    let mut sched = PolyLrScheduler::from_config(&cfg, &mut sgd).unwrap();

    for _ in 0..3 {
        sched.step(&mut sgd).unwrap();
    }

    let factor = 0.7_f64.powf(0.9) as f32;
    assert!((sgd.learning_rate(0) - 0.4 * factor).abs() < 1e-6);
    assert!((sgd.learning_rate(1) - 0.04 * factor).abs() < 1e-7);
    assert_eq!(sched.get_lr(), sched.last_lr());
}

#[test]
fn resumed_schedule_matches_uninterrupted_one() {
    init_logger();
    let total = NonZeroUsize::new(20).unwrap();

    let mut lrs: Vec<f32> = vec![1.0, 0.5];
    let mut sched = PolyLrScheduler::new(&mut lrs, 2., total, None).unwrap();
    for _ in 0..8 {
        sched.step(&mut lrs).unwrap();
    }

    let mut resumed_lrs: Vec<f32> = vec![1.0, 0.5];
    let resumed = PolyLrScheduler::new(&mut resumed_lrs, 2., total, Some(7)).unwrap();

    assert_eq!(resumed.last_iter(), sched.last_iter());
    assert_eq!(resumed_lrs, lrs);
}

#[test]
fn schedule_from_json_config() {
    init_logger();
    let cfg = TrainingConfig::from_json(
        r#"{
            "sampler": {
                "dataset_len": 100,
                "total_iter": 50,
                "batch_size": 8,
                "world_size": 4,
                "rank": 3,
                "last_iter": 24,
                "seed": 1
            },
            "schedule": { "power": 1.0, "total_iter": 50, "last_iter": 24 },
            "reduce_op": "sum"
        }"#,
    )
    .unwrap();

    let mut lrs: Vec<f32> = vec![0.2];
    let sched = PolyLrScheduler::from_config(&cfg.schedule, &mut lrs).unwrap();

    assert_eq!(sched.last_iter(), 25);
    assert_eq!(lrs, vec![0.1]);
}
