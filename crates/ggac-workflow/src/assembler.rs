use std::collections::HashSet;

use ggac_config::{Profile, StageDef, StagesDef};
use tracing::{debug, info};

use crate::artifact::Artifact;
use crate::error::WorkflowError;
use crate::group::{GroupPlan, ParameterGroup};
use crate::ledger::Ledger;
use crate::naming::{Stage, artifact_name, task_id};
use crate::task::Task;
use crate::workflow::Workflow;

/// Where and how the tasks of one stage run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageEnvironment {
  /// Transformation every task of the stage references.
  pub transformation: String,
  /// Execution site selected for the stage.
  pub site: String,
  pub container_image: Option<String>,
}

impl StageEnvironment {
  pub fn new(transformation: impl Into<String>, site: impl Into<String>) -> Self {
    Self {
      transformation: transformation.into(),
      site: site.into(),
      container_image: None,
    }
  }

  fn profiles(&self) -> Vec<Profile> {
    let mut profiles = vec![Profile::selector("execution.site", &self.site)];
    if let Some(image) = &self.container_image {
      profiles.push(Profile::condor("+SingularityImage", format!("\"{image}\"")));
    }
    profiles
  }
}

impl From<&StageDef> for StageEnvironment {
  fn from(def: &StageDef) -> Self {
    Self {
      transformation: def.transformation.clone(),
      site: def.site.clone(),
      container_image: def.container_image.clone(),
    }
  }
}

/// Environments for all three stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageBindings {
  pub prepare: StageEnvironment,
  pub simulate: StageEnvironment,
  pub convert: StageEnvironment,
}

impl StageBindings {
  pub fn get(&self, stage: Stage) -> &StageEnvironment {
    match stage {
      Stage::Prepare => &self.prepare,
      Stage::Simulate => &self.simulate,
      Stage::Convert => &self.convert,
    }
  }
}

impl From<&StagesDef> for StageBindings {
  fn from(def: &StagesDef) -> Self {
    Self {
      prepare: (&def.prepare).into(),
      simulate: (&def.simulate).into(),
      convert: (&def.convert).into(),
    }
  }
}

/// Parameters of one assembly pass.
#[derive(Debug, Clone)]
pub struct AssemblyParams {
  pub name: String,
  /// Groups in submission order.
  pub groups: Vec<GroupPlan>,
  /// Replicates per group unless a group overrides it.
  pub jobs_per_group: u32,
  /// Logical name of the macro template read by every preparation task.
  pub config_template: String,
  /// Pre-registered input files. Every simulation task consumes all of them.
  pub replicas: Vec<Artifact>,
}

/// Builds the campaign workflow.
///
/// For each group: one preparation task rendering the group's run macro, then
/// `jobs` simulation -> conversion chains consuming it. Groups never depend on
/// each other. Assembly performs no I/O; the only failures are bad group
/// labels, a missing template, and invariant violations on artifact names.
#[derive(Debug, Clone)]
pub struct GraphAssembler {
  stages: StageBindings,
}

impl GraphAssembler {
  pub fn new(stages: StageBindings) -> Self {
    Self { stages }
  }

  pub fn assemble(&self, params: &AssemblyParams) -> Result<Workflow, WorkflowError> {
    let mut seen = HashSet::new();
    let replicas: Vec<Artifact> = params
      .replicas
      .iter()
      .filter(|a| seen.insert(a.logical_name.as_str()))
      .map(|a| Artifact::replica(a.logical_name.clone()))
      .collect();

    let ledger = Ledger::seeded(replicas.iter().map(|a| a.logical_name.as_str()));
    if !ledger.contains(&params.config_template) {
      return Err(WorkflowError::MissingConfigTemplate(
        params.config_template.clone(),
      ));
    }

    let mut groups = HashSet::new();
    for plan in &params.groups {
      if !groups.insert(&plan.group) {
        return Err(WorkflowError::DuplicateGroup(plan.group.to_string()));
      }
    }

    let task_count: usize = params
      .groups
      .iter()
      .map(|p| 1 + 2 * p.jobs.unwrap_or(params.jobs_per_group) as usize)
      .sum();

    let mut builder = Builder {
      stages: &self.stages,
      ledger,
      tasks: Vec::with_capacity(task_count),
    };

    for plan in &params.groups {
      let jobs = plan.jobs.unwrap_or(params.jobs_per_group);
      let template = Artifact::replica(params.config_template.clone());
      let run_macro = builder.prepare(&plan.group, template)?;

      for index in 0..jobs {
        let sim_output = builder.simulate(&plan.group, index, &replicas, &run_macro)?;
        builder.convert(&plan.group, index, sim_output)?;
      }

      debug!(group = %plan.group, jobs, "assembled group");
    }

    info!(
      workflow = %params.name,
      groups = params.groups.len(),
      tasks = builder.tasks.len(),
      "assembled workflow"
    );

    Ok(Workflow::new(params.name.clone(), builder.tasks))
  }
}

struct Builder<'a> {
  stages: &'a StageBindings,
  ledger: Ledger,
  tasks: Vec<Task>,
}

impl Builder<'_> {
  fn prepare(
    &mut self,
    group: &ParameterGroup,
    template: Artifact,
  ) -> Result<Artifact, WorkflowError> {
    let output = artifact_name(Stage::Prepare, group, None);
    let arguments = vec![
      template.logical_name.clone(),
      group.to_string(),
      output.clone(),
    ];
    self.push(Stage::Prepare, group, None, output, arguments, vec![template])
  }

  fn simulate(
    &mut self,
    group: &ParameterGroup,
    index: u32,
    replicas: &[Artifact],
    run_macro: &Artifact,
  ) -> Result<Artifact, WorkflowError> {
    let output = artifact_name(Stage::Simulate, group, Some(index));
    let arguments = vec![run_macro.logical_name.clone(), output.clone()];

    let mut inputs = Vec::with_capacity(replicas.len() + 1);
    inputs.extend_from_slice(replicas);
    inputs.push(run_macro.clone());

    self.push(Stage::Simulate, group, Some(index), output, arguments, inputs)
  }

  fn convert(
    &mut self,
    group: &ParameterGroup,
    index: u32,
    sim_output: Artifact,
  ) -> Result<Artifact, WorkflowError> {
    let output = artifact_name(Stage::Convert, group, Some(index));
    let arguments = vec![sim_output.logical_name.clone(), output.clone()];
    self.push(
      Stage::Convert,
      group,
      Some(index),
      output,
      arguments,
      vec![sim_output],
    )
  }

  /// Check the task against the ledger, then register it.
  fn push(
    &mut self,
    stage: Stage,
    group: &ParameterGroup,
    index: Option<u32>,
    output: String,
    arguments: Vec<String>,
    inputs: Vec<Artifact>,
  ) -> Result<Artifact, WorkflowError> {
    let id = task_id(stage, group, index);

    self.ledger.register_task(&id)?;
    for input in &inputs {
      self.ledger.consume(&input.logical_name, &id)?;
    }
    self.ledger.produce(&output, &id)?;

    let environment = self.stages.get(stage);
    let produced = Artifact::produced(output, id.clone());

    self.tasks.push(Task::new(
      id,
      stage,
      environment.transformation.clone(),
      arguments,
      inputs,
      vec![produced.clone()],
      environment.profiles(),
    ));

    Ok(produced)
  }
}
