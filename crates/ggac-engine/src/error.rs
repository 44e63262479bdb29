use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the planner adapter.
#[derive(Debug, Error)]
pub enum EngineError {
  /// The workflow breaks a naming invariant and must not be planned.
  #[error("workflow rejected: {0}")]
  Workflow(#[from] ggac_workflow::WorkflowError),

  /// The request references a site or transformation the catalogs lack.
  #[error("catalog mismatch: {0}")]
  Catalog(#[from] ggac_catalog::CatalogError),

  /// A document could not be serialized.
  #[error("serialization error: {0}")]
  Serialize(#[from] serde_json::Error),

  /// The planner executable could not be started.
  #[error("failed to start planner '{}': {source}", .program.display())]
  Spawn {
    program: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The planner ran and reported failure. Its stderr is passed through as is.
  #[error("planner exited with {}: {stderr}", exit_label(.status))]
  PlannerFailed { status: Option<i32>, stderr: String },

  /// An I/O error occurred while writing documents.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

fn exit_label(status: &Option<i32>) -> String {
  match status {
    Some(code) => format!("status {code}"),
    None => "signal".to_string(),
  }
}
