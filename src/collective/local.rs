use std::{num::NonZeroUsize, sync::Arc};

use log::{debug, warn};
use parking_lot::{Condvar, Mutex};

use super::{ProcessGroup, ReduceOp};
use crate::error::{Result, UtilErr};

/// The reason a round could not be reduced.
#[derive(Debug, Clone, Copy)]
enum Failure {
    Length { got: usize, expected: usize },
    Op { got: ReduceOp, expected: ReduceOp },
}

impl Failure {
    fn to_err(self) -> UtilErr {
        match self {
            Failure::Length { got, expected } => UtilErr::ShapeMismatch {
                what: "all_reduce buffer",
                got,
                expected,
            },
            Failure::Op { got, expected } => UtilErr::Collective(format!(
                "reduce op mismatch: got {got:?}, expected {expected:?}"
            )),
        }
    }
}

/// The state of the collective round currently in flight.
#[derive(Debug, Default)]
struct Round {
    generation: u64,
    arrived: usize,
    departed: usize,
    draining: bool,
    op: ReduceOp,
    acc: Vec<f32>,
    failure: Option<Failure>,
}

#[derive(Debug)]
struct Rendezvous {
    world_size: usize,
    round: Mutex<Round>,
    cvar: Condvar,
}

/// An in-process process group, every rank is a thread of the same process.
///
/// Useful to run the collective helpers on a single machine. Each `all_reduce`
/// is one round: all ranks contribute, the last one to arrive publishes the reduced
/// buffer and every rank copies it out. A new round only starts once every rank has
/// left the previous one.
///
/// There is no timeout, a rank that never calls `all_reduce` blocks the rest forever.
///
/// Handles can't be cloned, every rank owns exactly one:
///
/// ```compile_fail
/// fn assert_clone<T: Clone>() {}
/// assert_clone::<dist_train_utils::LocalGroup>();
/// ```
#[derive(Debug)]
pub struct LocalGroup {
    rank: usize,
    shared: Arc<Rendezvous>,
}

impl LocalGroup {
    /// Creates the handles of a new group.
    ///
    /// # Arguments
    /// * `world_size` - The amount of ranks in the group.
    ///
    /// # Returns
    /// One handle per rank, the handle at position `i` has rank `i`.
    pub fn new(world_size: NonZeroUsize) -> Vec<Self> {
        let shared = Arc::new(Rendezvous {
            world_size: world_size.get(),
            round: Mutex::new(Round::default()),
            cvar: Condvar::new(),
        });

        (0..world_size.get())
            .map(|rank| Self {
                rank,
                shared: Arc::clone(&shared),
            })
            .collect()
    }
}

impl ProcessGroup for LocalGroup {
    fn rank(&self) -> usize {
        self.rank
    }

    fn world_size(&self) -> usize {
        self.shared.world_size
    }

    fn all_reduce(&self, buf: &mut [f32], op: ReduceOp) -> Result<()> {
        let shared = &*self.shared;
        let mut round = shared.round.lock();

        while round.draining {
            shared.cvar.wait(&mut round);
        }

        if round.arrived == 0 {
            round.op = op;
            round.acc.clear();
            round.acc.extend_from_slice(buf);
            round.failure = None;
        } else if round.failure.is_none() {
            if buf.len() != round.acc.len() {
                round.failure = Some(Failure::Length {
                    got: buf.len(),
                    expected: round.acc.len(),
                });
            } else if op != round.op {
                round.failure = Some(Failure::Op {
                    got: op,
                    expected: round.op,
                });
            } else {
                op.fold_into(&mut round.acc, buf);
            }
        }

        round.arrived += 1;
        let rank = self.rank;
        let generation = round.generation;

        if round.arrived == shared.world_size {
            if let Some(failure) = round.failure {
                warn!(generation = generation; "all_reduce round poisoned: {failure:?}");
            } else {
                debug!(generation = generation, len = buf.len(); "all_reduce round reduced");
            }

            round.draining = true;
            shared.cvar.notify_all();
        } else {
            while !round.draining {
                shared.cvar.wait(&mut round);
            }
        }

        let outcome = match round.failure {
            Some(failure) => Err(failure.to_err()),
            None => {
                buf.copy_from_slice(&round.acc);
                Ok(())
            }
        };

        round.departed += 1;
        if round.departed == shared.world_size {
            round.arrived = 0;
            round.departed = 0;
            round.draining = false;
            round.generation += 1;
            shared.cvar.notify_all();
        }

        debug!(rank = rank, generation = generation; "left all_reduce round");
        outcome
    }
}
