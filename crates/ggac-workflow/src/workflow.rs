use serde::Serialize;

use crate::artifact::Artifact;
use crate::error::WorkflowError;
use crate::graph::Graph;
use crate::ledger::Ledger;
use crate::naming::Stage;
use crate::task::Task;

/// An assembled workflow ready to be handed to the planner.
///
/// The DAG is implicit: a task depends on whichever task produces one of its
/// input names. Only the assembler builds workflows, and the task list cannot
/// be changed afterwards:
///
/// ```compile_fail
/// fn reorder(workflow: &mut ggac_workflow::Workflow) {
///   workflow.tasks.reverse();
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workflow {
  name: String,
  tasks: Vec<Task>,
}

impl Workflow {
  pub(crate) fn new(name: String, tasks: Vec<Task>) -> Self {
    Self { name, tasks }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Tasks in registration order.
  pub fn tasks(&self) -> &[Task] {
    &self.tasks
  }

  /// Build the graph structure for traversal.
  pub fn graph(&self) -> Graph {
    Graph::new(&self.tasks)
  }

  /// Get a task by ID.
  pub fn task(&self, task_id: &str) -> Option<&Task> {
    self.tasks.iter().find(|t| t.id() == task_id)
  }

  /// Tasks of one stage, in registration order.
  pub fn tasks_in(&self, stage: Stage) -> impl Iterator<Item = &Task> {
    self.tasks.iter().filter(move |t| t.stage() == stage)
  }

  /// Every output artifact, in registration order.
  pub fn outputs(&self) -> impl Iterator<Item = &Artifact> {
    self.tasks.iter().flat_map(|t| t.outputs())
  }

  /// Re-check the naming invariants against the given replicas: unique task
  /// ids, unique output names, and no input consumed before it exists.
  pub fn validate(&self, replicas: &[Artifact]) -> Result<(), WorkflowError> {
    let mut ledger = Ledger::seeded(replicas.iter().map(|a| a.logical_name.as_str()));

    for task in &self.tasks {
      ledger.register_task(task.id())?;
      for input in task.inputs() {
        ledger.consume(&input.logical_name, task.id())?;
      }
      for output in task.outputs() {
        ledger.produce(&output.logical_name, task.id())?;
      }
    }

    Ok(())
  }
}
