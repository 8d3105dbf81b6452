use eco_barrier::BarrierError;
use eco_core::{EcoError, FieldId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("a simulation needs at least one role")]
    NoRoles,

    #[error("field {field:?} is claimed by both {first:?} and {second:?}")]
    FieldOwnedTwice {
        field:  String,
        first:  String,
        second: String,
    },

    #[error("role {role:?} claims {field}, which is not in the schema")]
    UnknownField {
        role:  String,
        field: FieldId,
    },

    #[error("barrier expects {got} parties but the driver runs {expected}")]
    PartyCountMismatch {
        expected: usize,
        got:      usize,
    },

    #[error("worker for role {role:?} panicked")]
    WorkerPanicked { role: String },

    #[error(transparent)]
    Core(#[from] EcoError),

    #[error("barrier error: {0}")]
    Barrier(#[from] BarrierError),
}

pub type SimResult<T> = Result<T, SimError>;
