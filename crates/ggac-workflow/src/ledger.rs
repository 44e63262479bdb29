use std::collections::HashSet;

use crate::error::WorkflowError;

/// Names available to consume at the current point of assembly.
///
/// Seeded with the replica names; every produced output is added as soon as
/// its task is registered. A task may only consume names already present, and
/// may never produce one that is.
#[derive(Debug, Default)]
pub(crate) struct Ledger {
  available: HashSet<String>,
  task_ids: HashSet<String>,
}

impl Ledger {
  pub(crate) fn seeded<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
    Self {
      available: names.into_iter().map(str::to_string).collect(),
      task_ids: HashSet::new(),
    }
  }

  pub(crate) fn contains(&self, name: &str) -> bool {
    self.available.contains(name)
  }

  pub(crate) fn register_task(&mut self, task_id: &str) -> Result<(), WorkflowError> {
    if !self.task_ids.insert(task_id.to_string()) {
      return Err(WorkflowError::DuplicateTaskId(task_id.to_string()));
    }
    Ok(())
  }

  pub(crate) fn consume(&self, name: &str, task_id: &str) -> Result<(), WorkflowError> {
    if !self.available.contains(name) {
      return Err(WorkflowError::UnavailableArtifact {
        name: name.to_string(),
        task_id: task_id.to_string(),
      });
    }
    Ok(())
  }

  pub(crate) fn produce(&mut self, name: &str, task_id: &str) -> Result<(), WorkflowError> {
    if !self.available.insert(name.to_string()) {
      return Err(WorkflowError::ArtifactCollision {
        name: name.to_string(),
        task_id: task_id.to_string(),
      });
    }
    Ok(())
  }
}
