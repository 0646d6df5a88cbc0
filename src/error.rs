use std::{error::Error, fmt};

/// The crate's result type.
pub type Result<T> = std::result::Result<T, UtilErr>;

/// Failures surfaced by the averaging helper, the schedule and the sampler.
#[derive(Debug)]
pub enum UtilErr {
    /// An argument is invalid, it's rejected before any work is done.
    InvalidArgument(String),
    RankOutOfRange {
        rank: usize,
        world_size: usize,
    },
    /// Collective participants disagree on a buffer length.
    ShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    /// The collective substrate failed, the whole job must be torn down.
    Collective(String),
    /// The sampler was iterated more than once.
    SamplerExhausted,
    Config(serde_json::Error),
}

impl fmt::Display for UtilErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UtilErr::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            UtilErr::RankOutOfRange { rank, world_size } => {
                write!(f, "rank {rank} is out of range for world size {world_size}")
            }
            UtilErr::ShapeMismatch {
                what,
                got,
                expected,
            } => write!(f, "shape mismatch for {what}: got {got}, expected {expected}"),
            UtilErr::Collective(detail) => write!(f, "collective failure: {detail}"),
            UtilErr::SamplerExhausted => {
                write!(f, "sampler already consumed, it can only be iterated once")
            }
            UtilErr::Config(e) => write!(f, "invalid config: {e}"),
        }
    }
}

impl Error for UtilErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            UtilErr::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for UtilErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Config(value)
    }
}
