//! Tests for GraphAssembler::assemble and the implied graph.

use std::collections::HashSet;

use ggac_config::{Namespace, RunConfig};
use ggac_workflow::{
  Artifact, AssemblyParams, GraphAssembler, GroupPlan, ParameterGroup, Stage, StageBindings,
  StageEnvironment, Workflow, WorkflowError,
};

fn replicas() -> Vec<Artifact> {
  ["template.mac", "Multipole_z1.a90", "z0.a90", "z1.a90"]
    .into_iter()
    .map(Artifact::replica)
    .collect()
}

fn groups(labels: &[&str]) -> Vec<GroupPlan> {
  labels
    .iter()
    .map(|l| GroupPlan::new(ParameterGroup::new(*l).unwrap()))
    .collect()
}

fn params(labels: &[&str], jobs: u32) -> AssemblyParams {
  AssemblyParams {
    name: "test-workflow".to_string(),
    groups: groups(labels),
    jobs_per_group: jobs,
    config_template: "template.mac".to_string(),
    replicas: replicas(),
  }
}

fn assembler() -> GraphAssembler {
  GraphAssembler::new(StageBindings::from(&RunConfig::default().stages))
}

fn assemble(labels: &[&str], jobs: u32) -> Workflow {
  assembler().assemble(&params(labels, jobs)).unwrap()
}

fn output_names(workflow: &Workflow) -> Vec<&str> {
  workflow
    .outputs()
    .map(|a| a.logical_name.as_str())
    .collect()
}

#[test]
fn test_three_groups_ten_jobs() {
  let workflow = assemble(&["Z0", "Z2", "Z4"], 10);

  assert_eq!(workflow.tasks().len(), 63);
  assert_eq!(workflow.tasks_in(Stage::Prepare).count(), 3);
  assert_eq!(workflow.tasks_in(Stage::Simulate).count(), 30);
  assert_eq!(workflow.tasks_in(Stage::Convert).count(), 30);

  let names = output_names(&workflow);
  let unique: HashSet<&str> = names.iter().copied().collect();
  assert_eq!(names.len(), 63);
  assert_eq!(unique.len(), 63);
}

#[test]
fn test_task_count_formula() {
  for (labels, jobs) in [
    (&["A"][..], 0),
    (&["A"][..], 1),
    (&["A", "B"][..], 3),
    (&["A", "B", "C", "D"][..], 25),
  ] {
    let workflow = assemble(labels, jobs);
    assert_eq!(
      workflow.tasks().len(),
      labels.len() * (1 + 2 * jobs as usize),
      "groups={labels:?} jobs={jobs}"
    );

    let names = output_names(&workflow);
    let unique: HashSet<&str> = names.iter().copied().collect();
    assert_eq!(names.len(), unique.len());
  }
}

#[test]
fn test_zero_jobs_yields_only_preparation() {
  let workflow = assemble(&["Z0", "Z2"], 0);

  assert_eq!(workflow.tasks().len(), 2);
  assert!(workflow.tasks().iter().all(|t| t.stage() == Stage::Prepare));
  assert!(workflow.validate(&replicas()).is_ok());
}

#[test]
fn test_no_groups_yields_empty_workflow() {
  let workflow = assemble(&[], 10);
  assert!(workflow.tasks().is_empty());
}

#[test]
fn test_conversion_consumes_paired_simulation_output() {
  let workflow = assemble(&["Z0", "Z2"], 5);

  for convert in workflow.tasks_in(Stage::Convert) {
    let sim_id = convert.id().replacen("convert", "simulate", 1);
    let sim = workflow.task(&sim_id).unwrap();

    assert_eq!(convert.inputs().len(), 1);
    assert_eq!(
      convert.inputs()[0].logical_name,
      sim.outputs()[0].logical_name
    );
    assert_eq!(convert.inputs()[0].producer.as_deref(), Some(sim.id()));
  }
}

#[test]
fn test_simulation_consumes_replicas_and_group_macro() {
  let workflow = assemble(&["Z2"], 2);
  let sim = workflow.task("simulate_Z2_001").unwrap();

  let inputs: Vec<&str> = sim
    .inputs()
    .iter()
    .map(|a| a.logical_name.as_str())
    .collect();
  assert_eq!(
    inputs,
    vec![
      "template.mac",
      "Multipole_z1.a90",
      "z0.a90",
      "z1.a90",
      "macro_Z2.mac"
    ]
  );
  assert_eq!(sim.arguments(), ["macro_Z2.mac", "g4out_Z2_001.root"]);
  assert_eq!(sim.outputs()[0].logical_name, "g4out_Z2_001.root");
}

#[test]
fn test_preparation_arguments() {
  let workflow = assemble(&["Z4"], 1);
  let prep = workflow.task("prepare_Z4").unwrap();

  assert_eq!(prep.arguments(), ["template.mac", "Z4", "macro_Z4.mac"]);
  assert_eq!(prep.inputs(), [Artifact::replica("template.mac")]);
  assert_eq!(prep.transformation(), "prepare");
}

#[test]
fn test_tasks_are_registered_after_their_producers() {
  let workflow = assemble(&["Z0", "Z2", "Z4"], 4);

  let mut seen = HashSet::new();
  for task in workflow.tasks() {
    for input in task.inputs() {
      if let Some(producer) = &input.producer {
        assert!(seen.contains(producer.as_str()), "{} before {}", task.id(), producer);
      }
    }
    seen.insert(task.id());
  }
}

#[test]
fn test_assembly_is_idempotent() {
  let first = assemble(&["Z0", "Z2", "Z4"], 10);
  let second = assemble(&["Z0", "Z2", "Z4"], 10);
  assert_eq!(first, second);
}

#[test]
fn test_group_order_is_preserved() {
  let workflow = assemble(&["Z4", "Z0"], 1);
  let preps: Vec<&str> = workflow.tasks_in(Stage::Prepare).map(|t| t.id()).collect();
  assert_eq!(preps, ["prepare_Z4", "prepare_Z0"]);
}

#[test]
fn test_per_group_job_override() {
  let mut params = params(&[], 3);
  params.groups = vec![
    GroupPlan::new(ParameterGroup::new("Z0").unwrap()),
    GroupPlan::with_jobs(ParameterGroup::new("Z2").unwrap(), 1),
  ];

  let workflow = assembler().assemble(&params).unwrap();
  assert_eq!(workflow.tasks().len(), (1 + 2 * 3) + (1 + 2));
}

#[test]
fn test_stage_environments_are_distinct() {
  let workflow = assemble(&["Z0"], 1);
  let site_of = |id: &str| {
    workflow
      .task(id)
      .unwrap()
      .profiles()
      .iter()
      .find(|p| p.namespace == Namespace::Selector && p.key == "execution.site")
      .map(|p| p.value.clone())
      .unwrap()
  };

  assert_eq!(site_of("simulate_Z0_000"), "condorpool_simulation");
  assert_eq!(site_of("convert_Z0_000"), "condorpool_ntuple");
}

#[test]
fn test_container_image_becomes_task_profile() {
  let mut stages = StageBindings::from(&RunConfig::default().stages);
  stages.simulate = StageEnvironment {
    container_image: Some("/cvmfs/sim:1".to_string()),
    ..StageEnvironment::new("simulation", "condorpool_simulation")
  };

  let workflow = GraphAssembler::new(stages)
    .assemble(&params(&["Z0"], 1))
    .unwrap();
  let sim = workflow.task("simulate_Z0_000").unwrap();

  assert!(
    sim
      .profiles()
      .iter()
      .any(|p| p.key == "+SingularityImage" && p.value == "\"/cvmfs/sim:1\"")
  );
}

#[test]
fn test_missing_template_is_rejected() {
  let mut params = params(&["Z0"], 1);
  params.config_template = "absent.mac".to_string();

  let err = assembler().assemble(&params).unwrap_err();
  assert!(matches!(err, WorkflowError::MissingConfigTemplate(name) if name == "absent.mac"));
}

#[test]
fn test_duplicate_group_is_rejected() {
  let err = assembler()
    .assemble(&params(&["Z0", "Z0"], 1))
    .unwrap_err();
  assert!(matches!(err, WorkflowError::DuplicateGroup(label) if label == "Z0"));
}

#[test]
fn test_replica_shadowing_an_output_is_an_invariant_violation() {
  let mut params = params(&["Z0"], 2);
  params.replicas.push(Artifact::replica("g4out_Z0_001.root"));

  let err = assembler().assemble(&params).unwrap_err();
  assert!(err.is_invariant_violation());
  assert!(matches!(
    err,
    WorkflowError::ArtifactCollision { ref name, ref task_id }
      if name == "g4out_Z0_001.root" && task_id == "simulate_Z0_001"
  ));
}

#[test]
fn test_validate_rejects_unknown_replica_set() {
  let workflow = assemble(&["Z0"], 1);
  let err = workflow.validate(&[]).unwrap_err();

  assert!(matches!(
    err,
    WorkflowError::UnavailableArtifact { ref name, .. } if name == "template.mac"
  ));
}

#[test]
fn test_graph_is_chained_per_replicate() {
  let workflow = assemble(&["Z0", "Z2"], 3);
  let graph = workflow.graph();

  assert_eq!(graph.entry_points(), ["prepare_Z0", "prepare_Z2"]);
  assert_eq!(
    graph.downstream("prepare_Z0"),
    ["simulate_Z0_000", "simulate_Z0_001", "simulate_Z0_002"]
  );
  assert_eq!(graph.upstream("convert_Z2_001"), ["simulate_Z2_001"]);
  assert_eq!(graph.downstream("convert_Z2_001"), [] as [String; 0]);
  assert!(!graph.is_join_point("simulate_Z0_000"));
  // prepare -> sim, sim -> convert for each replicate
  assert_eq!(graph.edge_count(), 2 * 3 * 2);
}

#[test]
fn test_workflow_serializes_tasks_in_order() {
  let workflow = assemble(&["Z0"], 1);
  let value = serde_json::to_value(&workflow).unwrap();

  assert_eq!(value["name"], "test-workflow");
  assert_eq!(value["tasks"][0]["id"], "prepare_Z0");
  assert_eq!(value["tasks"][1]["stage"], "simulate");
  assert_eq!(value["tasks"][2]["outputs"][0]["logical_name"], "Converted_Z0_000.root");
}

#[test]
fn test_workflow_is_read_through_accessors() {
  let workflow = assemble(&["Z0"], 2);

  assert_eq!(workflow.name(), "test-workflow");
  let ids: Vec<&str> = workflow.tasks().iter().map(|t| t.id()).collect();
  assert_eq!(
    ids,
    [
      "prepare_Z0",
      "simulate_Z0_000",
      "convert_Z0_000",
      "simulate_Z0_001",
      "convert_Z0_001",
    ]
  );
  assert_eq!(workflow.task("convert_Z0_001").map(|t| t.id()), Some("convert_Z0_001"));
}
