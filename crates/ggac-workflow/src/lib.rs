//! GGAC Workflow
//!
//! This crate builds the campaign workflow: for every parameter group a
//! preparation task and a set of simulation -> conversion chains.
//!
//! Key properties of an assembled [`Workflow`]:
//! - Names are a pure function of `(stage, group, index)`, so assembly is
//!   idempotent and safe to resubmit
//! - No two tasks produce the same logical name
//! - Every input is a registered replica or an output of an earlier task
//! - The DAG is implicit in the names; [`Graph`] derives the edges

mod artifact;
mod assembler;
mod error;
mod graph;
mod group;
mod ledger;
mod naming;
mod task;
mod workflow;

pub use artifact::Artifact;
pub use assembler::{AssemblyParams, GraphAssembler, StageBindings, StageEnvironment};
pub use error::WorkflowError;
pub use graph::Graph;
pub use group::{GroupPlan, ParameterGroup};
pub use naming::{Stage, artifact_name, task_id};
pub use task::Task;
pub use workflow::Workflow;
