use std::collections::{HashMap, HashSet};

use crate::task::Task;

/// The DAG implied by matching input names to output names.
#[derive(Debug, Clone)]
pub struct Graph {
  /// Adjacency list: task_id -> list of downstream task_ids.
  adjacency: HashMap<String, Vec<String>>,
  /// Reverse adjacency: task_id -> list of upstream task_ids.
  reverse_adjacency: HashMap<String, Vec<String>>,
  /// Tasks that consume nothing produced inside the workflow, in task order.
  entry_points: Vec<String>,
  /// Tasks with multiple upstream tasks.
  join_points: HashSet<String>,
}

impl Graph {
  /// Derive edges from the tasks' declared inputs and outputs.
  pub fn new(tasks: &[Task]) -> Self {
    let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
    let mut reverse_adjacency: HashMap<String, Vec<String>> = HashMap::new();

    // Logical name -> producing task
    let producers: HashMap<&str, &str> = tasks
      .iter()
      .flat_map(|t| t.outputs().iter().map(move |o| (o.logical_name.as_str(), t.id())))
      .collect();

    for task in tasks {
      adjacency.entry(task.id().to_string()).or_default();
      let upstream = reverse_adjacency.entry(task.id().to_string()).or_default();

      for input in task.inputs() {
        if let Some(&producer) = producers.get(input.logical_name.as_str())
          && !upstream.iter().any(|u| u == producer)
        {
          upstream.push(producer.to_string());
        }
      }
    }

    for task in tasks {
      for from in &reverse_adjacency[task.id()] {
        adjacency
          .entry(from.clone())
          .or_default()
          .push(task.id().to_string());
      }
    }

    let entry_points: Vec<String> = tasks
      .iter()
      .filter(|t| reverse_adjacency.get(t.id()).is_none_or(|v| v.is_empty()))
      .map(|t| t.id().to_string())
      .collect();

    let join_points: HashSet<String> = reverse_adjacency
      .iter()
      .filter(|(_, incoming)| incoming.len() > 1)
      .map(|(id, _)| id.clone())
      .collect();

    Self {
      adjacency,
      reverse_adjacency,
      entry_points,
      join_points,
    }
  }

  /// Get entry points (tasks with no upstream tasks).
  pub fn entry_points(&self) -> &[String] {
    &self.entry_points
  }

  /// Get downstream tasks for a given task.
  pub fn downstream(&self, task_id: &str) -> &[String] {
    self
      .adjacency
      .get(task_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Get upstream tasks for a given task.
  pub fn upstream(&self, task_id: &str) -> &[String] {
    self
      .reverse_adjacency
      .get(task_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Check if a task is a join point (has multiple upstream tasks).
  pub fn is_join_point(&self, task_id: &str) -> bool {
    self.join_points.contains(task_id)
  }

  /// Number of edges in the graph.
  pub fn edge_count(&self) -> usize {
    self.adjacency.values().map(Vec::len).sum()
  }
}
