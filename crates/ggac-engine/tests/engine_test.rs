//! Integration tests for the planner adapters.

use std::path::Path;

use ggac_catalog::{
  CatalogError, ReplicaCatalog, SiteCatalog, Transformation, TransformationCatalog, build_replica_catalog,
  build_site_catalog, build_transformation_catalog,
};
use ggac_config::{PlannerProperties, RunConfig};
use ggac_engine::{
  DryRunEngine, EngineError, PegasusPlanner, PlanOptions, PlanRequest, WorkflowEngine,
  planner_args,
};
use ggac_workflow::{
  Artifact, AssemblyParams, GraphAssembler, GroupPlan, ParameterGroup, StageBindings, Workflow,
};

struct Fixture {
  _dir: tempfile::TempDir,
  work_dir: std::path::PathBuf,
  workflow: Workflow,
  sites: SiteCatalog,
  transformations: TransformationCatalog,
  replicas: ReplicaCatalog,
  execution_sites: Vec<String>,
  options: PlanOptions,
}

impl Fixture {
  fn request(&self) -> PlanRequest<'_> {
    PlanRequest {
      workflow: &self.workflow,
      sites: &self.sites,
      transformations: &self.transformations,
      replicas: &self.replicas,
      execution_sites: &self.execution_sites,
      output_site: "remote",
      options: &self.options,
    }
  }
}

async fn fixture(submit: bool) -> Fixture {
  let dir = tempfile::tempdir().expect("failed to create temp dir");
  let input_dir = dir.path().join("inputs");
  let work_dir = dir.path().join("work");
  std::fs::create_dir_all(&input_dir).unwrap();
  for name in ["template.mac", "z0.a90"] {
    std::fs::write(input_dir.join(name), "").unwrap();
  }

  let config = RunConfig::default();
  let sites = build_site_catalog(&config.resolved_sites(&work_dir)).unwrap();
  let transformations = build_transformation_catalog(
    config
      .stages
      .iter()
      .map(|s| Transformation::for_stage(s, config.executable_path(s))),
  )
  .unwrap();
  let replicas = build_replica_catalog(&input_dir).await.unwrap();

  let workflow = GraphAssembler::new(StageBindings::from(&config.stages))
    .assemble(&AssemblyParams {
      name: "engine-test".to_string(),
      groups: vec![GroupPlan::new(ParameterGroup::new("Z2").unwrap())],
      jobs_per_group: 2,
      config_template: "template.mac".to_string(),
      replicas: replicas.artifacts(),
    })
    .unwrap();

  Fixture {
    work_dir: work_dir.clone(),
    _dir: dir,
    workflow,
    sites,
    transformations,
    replicas,
    execution_sites: config.execution_sites.clone(),
    options: PlanOptions {
      run_dir: work_dir.join("runs"),
      submit,
      properties: PlannerProperties::default(),
    },
  }
}

fn read_json(path: &Path) -> serde_json::Value {
  serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_dry_run_writes_all_documents() {
  let fx = fixture(false).await;
  let engine = DryRunEngine::new(&fx.work_dir);

  let result = engine.plan(fx.request()).await.unwrap();

  assert!(!result.submitted);
  assert_eq!(result.submit_dir, None);

  let sites = read_json(&result.documents.sites);
  assert_eq!(sites["pegasus"], "5.0");
  assert_eq!(sites["sites"].as_array().unwrap().len(), 4);
  let local = &sites["sites"][0];
  assert_eq!(local["name"], "local");
  assert_eq!(local["arch"], "x86_64");
  assert_eq!(local["directories"][0]["type"], "sharedScratch");
  assert_eq!(
    local["directories"][0]["fileServers"][0]["operation"],
    "all"
  );
  let pool = &sites["sites"][1];
  assert_eq!(pool["os.type"], "linux");
  assert_eq!(pool["profiles"]["pegasus"]["style"], "condor");
  assert_eq!(pool["profiles"]["condor"]["universe"], "vanilla");

  let transformations = read_json(&result.documents.transformations);
  assert_eq!(transformations["pegasus"], "5.0");
  let entries = transformations["transformations"].as_array().unwrap();
  assert_eq!(entries.len(), 3);
  let ntuple = entries.iter().find(|t| t["name"] == "ntuple").unwrap();
  assert_eq!(ntuple["sites"][0]["name"], "local");
  assert_eq!(ntuple["sites"][0]["type"], "stageable");
  assert_eq!(ntuple["sites"][0]["arch"], "x86_64");
  assert!(ntuple["sites"][0]["pfn"].as_str().unwrap().ends_with("run_ntuple"));
  assert_eq!(ntuple["profiles"]["pegasus"]["clusters.size"], "1");

  let replicas = read_json(&result.documents.replicas);
  assert_eq!(replicas["pegasus"], "5.0");
  let template = &replicas["replicas"][0];
  assert_eq!(template["lfn"], "template.mac");
  assert_eq!(template["pfns"][0]["site"], "local");
  assert!(
    template["pfns"][0]["pfn"]
      .as_str()
      .unwrap()
      .ends_with("template.mac")
  );
  assert!(template.get("site").is_none());

  let workflow = read_json(&result.documents.workflow);
  let jobs = workflow["jobs"].as_array().unwrap();
  assert_eq!(jobs.len(), 5);
  assert_eq!(jobs[0]["id"], "prepare_Z2");
  assert_eq!(jobs[1]["name"], "simulation");
  assert_eq!(
    jobs[1]["profiles"]["selector"]["execution.site"],
    "condorpool_simulation"
  );
  assert_eq!(jobs[2]["uses"][0]["lfn"], "g4out_Z2_000.root");
  assert_eq!(jobs[2]["uses"][0]["type"], "input");
  assert_eq!(jobs[2]["uses"][1]["stageOut"], true);

  let properties = std::fs::read_to_string(&result.documents.properties).unwrap();
  assert!(properties.contains("dagman.retry = 3"));
}

#[tokio::test]
async fn test_workflow_with_unknown_replica_is_rejected() {
  let mut fx = fixture(false).await;
  fx.workflow = GraphAssembler::new(StageBindings::from(&RunConfig::default().stages))
    .assemble(&AssemblyParams {
      name: "engine-test".to_string(),
      groups: vec![GroupPlan::new(ParameterGroup::new("Z2").unwrap())],
      jobs_per_group: 1,
      config_template: "other.mac".to_string(),
      replicas: vec![Artifact::replica("other.mac")],
    })
    .unwrap();

  let err = DryRunEngine::new(&fx.work_dir)
    .plan(fx.request())
    .await
    .unwrap_err();
  assert!(matches!(err, EngineError::Workflow(_)));
}

#[tokio::test]
async fn test_job_without_transformation_is_rejected() {
  let mut fx = fixture(false).await;
  let config = RunConfig::default();
  fx.transformations = build_transformation_catalog(vec![Transformation::for_stage(
    &config.stages.prepare,
    config.executable_path(&config.stages.prepare),
  )])
  .unwrap();

  let err = DryRunEngine::new(&fx.work_dir)
    .plan(fx.request())
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    EngineError::Catalog(CatalogError::TransformationNotFound(ref name)) if name == "simulation"
  ));
  assert!(!fx.work_dir.join(ggac_engine::WORKFLOW_FILE).exists());
}

#[tokio::test]
async fn test_unknown_output_site_is_rejected() {
  let fx = fixture(false).await;
  let mut request = fx.request();
  request.output_site = "remote_server";

  let err = DryRunEngine::new(&fx.work_dir)
    .plan(request)
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    EngineError::Catalog(CatalogError::UnknownSite { .. })
  ));
}

#[tokio::test]
async fn test_planner_args() {
  let fx = fixture(true).await;
  let documents = ggac_engine::PlanDocuments::in_dir(&fx.work_dir);
  let args: Vec<String> = planner_args(&fx.request(), &documents)
    .into_iter()
    .map(|a| a.into_string().unwrap())
    .collect();

  let run_dir = fx.work_dir.join("runs").display().to_string();
  let conf = documents.properties.display().to_string();
  let workflow = documents.workflow.display().to_string();

  assert_eq!(
    args,
    vec![
      "--conf",
      conf.as_str(),
      "--dir",
      run_dir.as_str(),
      "--sites",
      "condorpool_simulation,condorpool_ntuple",
      "--output-sites",
      "remote",
      "--submit",
      workflow.as_str(),
    ]
  );
}

#[cfg(unix)]
#[tokio::test]
async fn test_successful_planner_result_is_returned() {
  let fx = fixture(false).await;
  let engine = PegasusPlanner::new("true", &fx.work_dir);

  let result = engine.plan(fx.request()).await.unwrap();
  assert_eq!(result.submit_dir, None);
  assert!(result.documents.workflow.exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_planner_failure_is_surfaced() {
  let fx = fixture(false).await;
  let engine = PegasusPlanner::new("false", &fx.work_dir);

  let err = engine.plan(fx.request()).await.unwrap_err();
  assert!(matches!(err, EngineError::PlannerFailed { status: Some(1), .. }));
}

#[tokio::test]
async fn test_missing_planner_is_a_spawn_error() {
  let fx = fixture(false).await;
  let engine = PegasusPlanner::new("ggac-no-such-planner", &fx.work_dir);

  let err = engine.plan(fx.request()).await.unwrap_err();
  assert!(matches!(err, EngineError::Spawn { .. }));
}
