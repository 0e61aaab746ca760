//! Core value types: the request graph and the stage identifiers.

mod graph;
#[cfg(test)]
mod graph_test;
mod stage_kind;
#[cfg(test)]
mod stage_kind_test;

pub use graph::{EdgeRejection, Graph, NoEulerianCircuit};
pub use stage_kind::{StageKind, UnknownStage};
