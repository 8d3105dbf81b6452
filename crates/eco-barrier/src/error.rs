use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BarrierError {
    #[error("a barrier needs at least one party")]
    NoParties,

    #[error("barrier poisoned: a participant panicked")]
    Poisoned,
}

pub type BarrierResult<T> = Result<T, BarrierError>;
