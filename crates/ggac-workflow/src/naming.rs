//! Deterministic names for tasks and the files they produce.
//!
//! Every name is a pure function of `(stage, group, index)`, so assembling the
//! same parameters twice yields the same names. Stage prefixes differ, which
//! keeps names unique across stages at the same `(group, index)` and keeps the
//! unindexed preparation names apart from the indexed ones.

use serde::Serialize;

use crate::group::ParameterGroup;

/// Pipeline stage of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
  /// Renders the group's run macro from the shared template.
  Prepare,
  /// Runs one simulation replicate.
  Simulate,
  /// Converts a simulation output into an ntuple.
  Convert,
}

impl Stage {
  /// File-name prefix of this stage's output.
  pub fn prefix(self) -> &'static str {
    match self {
      Stage::Prepare => "macro",
      Stage::Simulate => "g4out",
      Stage::Convert => "Converted",
    }
  }

  /// File extension of this stage's output.
  pub fn extension(self) -> &'static str {
    match self {
      Stage::Prepare => "mac",
      Stage::Simulate | Stage::Convert => "root",
    }
  }

  /// Prefix used in task ids.
  pub fn task_prefix(self) -> &'static str {
    match self {
      Stage::Prepare => "prepare",
      Stage::Simulate => "simulate",
      Stage::Convert => "convert",
    }
  }
}

/// Logical name of the file a task produces:
/// `{prefix}_{group}_{index:03}.{ext}`, or `{prefix}_{group}.{ext}` without an index.
pub fn artifact_name(stage: Stage, group: &ParameterGroup, index: Option<u32>) -> String {
  format!(
    "{}.{}",
    stem(stage.prefix(), group, index),
    stage.extension()
  )
}

/// Id of the task for `(stage, group, index)`.
pub fn task_id(stage: Stage, group: &ParameterGroup, index: Option<u32>) -> String {
  stem(stage.task_prefix(), group, index)
}

fn stem(prefix: &str, group: &ParameterGroup, index: Option<u32>) -> String {
  match index {
    Some(index) => format!("{prefix}_{group}_{index:03}"),
    None => format!("{prefix}_{group}"),
  }
}
