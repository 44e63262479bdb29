use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::documents::{PlanDocuments, write_documents};
use crate::error::EngineError;
use crate::request::{PlanRequest, PlanResult};

/// Boundary to the external workflow planner.
///
/// Implementations translate the workflow and catalogs into whatever the
/// planner reads and surface its result or error unchanged. Scheduling,
/// retries and submission all happen on the other side of this trait.
#[async_trait]
pub trait WorkflowEngine: Send + Sync {
  /// Plan (and optionally submit) a workflow.
  async fn plan(&self, request: PlanRequest<'_>) -> Result<PlanResult, EngineError>;
}

/// Runs `pegasus-plan` on documents written to the working directory.
pub struct PegasusPlanner {
  program: PathBuf,
  work_dir: PathBuf,
}

impl PegasusPlanner {
  /// Create a planner adapter.
  ///
  /// # Arguments
  /// * `program` - Planner executable, looked up on `PATH` if relative
  /// * `work_dir` - Directory the documents are written to
  pub fn new(program: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
      work_dir: work_dir.into(),
    }
  }

  pub fn work_dir(&self) -> &Path {
    &self.work_dir
  }
}

#[async_trait]
impl WorkflowEngine for PegasusPlanner {
  async fn plan(&self, request: PlanRequest<'_>) -> Result<PlanResult, EngineError> {
    let documents = write_documents(&self.work_dir, &request).await?;
    let args = planner_args(&request, &documents);

    info!(
      program = %self.program.display(),
      workflow = %request.workflow.name(),
      submit = request.options.submit,
      "invoking planner"
    );
    debug!(?args, "planner arguments");

    let output = Command::new(&self.program)
      .args(&args)
      .current_dir(&self.work_dir)
      .output()
      .await
      .map_err(|source| EngineError::Spawn {
        program: self.program.clone(),
        source,
      })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if !output.status.success() {
      return Err(EngineError::PlannerFailed {
        status: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
      });
    }

    Ok(PlanResult {
      documents,
      submit_dir: parse_submit_dir(&stdout),
      submitted: request.options.submit,
      output: stdout,
    })
  }
}

/// Writes the documents without invoking a planner.
pub struct DryRunEngine {
  work_dir: PathBuf,
}

impl DryRunEngine {
  pub fn new(work_dir: impl Into<PathBuf>) -> Self {
    Self {
      work_dir: work_dir.into(),
    }
  }
}

#[async_trait]
impl WorkflowEngine for DryRunEngine {
  async fn plan(&self, request: PlanRequest<'_>) -> Result<PlanResult, EngineError> {
    let documents = write_documents(&self.work_dir, &request).await?;
    info!(dir = %self.work_dir.display(), "dry run, planner not invoked");

    Ok(PlanResult {
      documents,
      submit_dir: None,
      submitted: false,
      output: String::new(),
    })
  }
}

/// Command line for `pegasus-plan`.
pub fn planner_args(request: &PlanRequest<'_>, documents: &PlanDocuments) -> Vec<OsString> {
  let mut args: Vec<OsString> = vec![
    "--conf".into(),
    documents.properties.clone().into(),
    "--dir".into(),
    request.options.run_dir.clone().into(),
    "--sites".into(),
    request.execution_sites.join(",").into(),
    "--output-sites".into(),
    request.output_site.into(),
  ];

  if request.options.submit {
    args.push("--submit".into());
  }

  args.push(documents.workflow.clone().into());
  args
}

/// The planner announces the submit directory on the line suggesting the
/// `pegasus-run` command.
fn parse_submit_dir(stdout: &str) -> Option<PathBuf> {
  stdout
    .lines()
    .filter(|line| line.contains("pegasus-run"))
    .filter_map(|line| line.split_whitespace().last())
    .find(|token| token.starts_with('/'))
    .map(PathBuf::from)
}
